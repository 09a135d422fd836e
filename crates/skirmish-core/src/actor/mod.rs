//! Actor types for the arena.
//!
//! - [`ActorId`]: Unique identity of an actor, also used as the non-owning
//!   reference held by lock and dash state
//! - [`ActorTag`]: Category used to select lock candidates
//! - [`BodyState`]: Physical state owned by the actor (position, velocity, facing)
//! - [`Actor`]: The complete actor container
//!
//! # Example
//!
//! ```
//! use skirmish_core::actor::{Actor, ActorId, ActorTag, BodyState};
//! use glam::Vec3;
//!
//! let actor = Actor::new(
//!     ActorId::new(7),
//!     ActorTag::Controllable,
//!     BodyState::at_position(Vec3::new(1.0, 0.0, 2.0)),
//! );
//!
//! assert_eq!(actor.id().as_u64(), 7);
//! assert!(actor.is_controllable());
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::BodyState;

/// Unique identifier for an actor.
///
/// Lock and dash state refer to other actors only through their `ActorId`;
/// the referenced actor is looked up in the registry when its position is
/// needed, so the core never owns another actor's lifetime.
///
/// # Ordering
///
/// Actor IDs are ordered by their numeric value, which gives the registry its
/// deterministic iteration order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(u64);

impl ActorId {
    /// Creates a new `ActorId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ActorId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<ActorId> for u64 {
    fn from(id: ActorId) -> Self {
        id.0
    }
}

/// Actor category.
///
/// Only `Controllable` actors are considered as lock candidates, and only
/// they may have a locomotion controller attached.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorTag {
    /// Player-driven actor (local or remote)
    Controllable,
    /// Static or passive body that takes part in collisions only
    Obstacle,
}

impl fmt::Display for ActorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Controllable => write!(f, "Controllable"),
            Self::Obstacle => write!(f, "Obstacle"),
        }
    }
}

/// An actor in the arena.
///
/// # Invariants
///
/// - The `ActorId` must be unique within an arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    id: ActorId,
    tag: ActorTag,
    body: BodyState,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(id: ActorId, tag: ActorTag, body: BodyState) -> Self {
        Self { id, tag, body }
    }

    /// Returns the actor's unique identifier.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Returns the actor's category.
    #[must_use]
    pub const fn tag(&self) -> ActorTag {
        self.tag
    }

    /// Returns `true` if this actor can be locked on to and controlled.
    #[must_use]
    pub const fn is_controllable(&self) -> bool {
        matches!(self.tag, ActorTag::Controllable)
    }

    /// Returns the actor's physical state.
    #[must_use]
    pub const fn body(&self) -> &BodyState {
        &self.body
    }

    /// Returns the actor's physical state mutably.
    #[must_use]
    pub fn body_mut(&mut self) -> &mut BodyState {
        &mut self.body
    }

    /// Shorthand for `self.body().position`.
    #[must_use]
    pub const fn position(&self) -> glam::Vec3 {
        self.body.position
    }
}
