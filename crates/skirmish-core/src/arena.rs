//! Actor registry for the simulation.
//!
//! The Arena holds every actor in play. It provides:
//! - Actor storage with deterministic iteration order (`BTreeMap`)
//! - Lock candidate snapshots for the controllable category
//! - Contact bookkeeping so physics can report contact *begin* events only
//! - Tick tracking
//!
//! # Example
//!
//! ```
//! use skirmish_core::arena::Arena;
//! use skirmish_core::actor::{ActorTag, BodyState};
//! use glam::Vec3;
//!
//! let mut arena = Arena::new();
//! let a = arena.spawn(ActorTag::Controllable, BodyState::at_position(Vec3::ZERO));
//! let b = arena.spawn(ActorTag::Controllable, BodyState::at_position(Vec3::X));
//! arena.spawn(ActorTag::Obstacle, BodyState::at_position(Vec3::Z));
//!
//! let ids: Vec<_> = arena.lock_candidates().iter().map(|c| c.id).collect();
//! assert_eq!(ids, vec![a, b]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorId, ActorTag, BodyState};
use crate::lock::LockCandidate;

/// Unordered pair of touching actors, stored lower id first.
pub type ContactPair = (ActorId, ActorId);

/// Builds a normalized contact pair.
#[must_use]
pub fn contact_pair(a: ActorId, b: ActorId) -> ContactPair {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Registry of all actors in a match.
///
/// # Determinism
///
/// Actor IDs are assigned monotonically and stored in a `BTreeMap`, so every
/// iteration (and every lock candidate snapshot) visits actors in ID order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing actor ID counter.
    next_id: u64,
    /// Actor storage with deterministic iteration order.
    actors: BTreeMap<ActorId, Actor>,
    /// Pairs whose bounding spheres overlapped at the end of the last step.
    touching: BTreeSet<ContactPair>,
    /// Pairs that started touching during the last step.
    begun: Vec<ContactPair>,
    /// Current simulation tick.
    tick: u64,
}

impl Arena {
    /// Creates a new empty arena at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            actors: BTreeMap::new(),
            touching: BTreeSet::new(),
            begun: Vec::new(),
            tick: 0,
        }
    }

    /// Spawns a new actor and returns its ID.
    pub fn spawn(&mut self, tag: ActorTag, body: BodyState) -> ActorId {
        let id = ActorId::new(self.next_id);
        self.next_id += 1;
        self.actors.insert(id, Actor::new(id, tag, body));
        id
    }

    /// Removes an actor and any contacts it was part of.
    pub fn despawn(&mut self, id: ActorId) -> Option<Actor> {
        self.touching.retain(|&(a, b)| a != id && b != id);
        self.begun.retain(|&(a, b)| a != id && b != id);
        self.actors.remove(&id)
    }

    /// Returns an actor by ID.
    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Returns a mutable actor by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// Position of an actor, if it exists.
    #[must_use]
    pub fn position(&self, id: ActorId) -> Option<Vec3> {
        self.actors.get(&id).map(Actor::position)
    }

    /// Returns an iterator over actor IDs in sorted order.
    pub fn actor_ids_sorted(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.actors.keys().copied()
    }

    /// Returns an iterator over actors in ID order.
    pub fn actors_sorted(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.actors.values()
    }

    /// Returns an iterator over mutable actors in ID order.
    pub fn actors_sorted_mut(&mut self) -> impl Iterator<Item = &mut Actor> + '_ {
        self.actors.values_mut()
    }

    /// Snapshot of every controllable actor, in ID order.
    ///
    /// This is the candidate set handed to the lock resolver. It is rebuilt on
    /// every call; nothing is cached.
    #[must_use]
    pub fn lock_candidates(&self) -> Vec<LockCandidate> {
        self.actors
            .values()
            .filter(|actor| actor.is_controllable())
            .map(|actor| LockCandidate::new(actor.id(), actor.position()))
            .collect()
    }

    /// Returns the number of actors.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Returns true if the arena has no actors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Returns `true` if `a` and `b` were touching at the end of the last step.
    #[must_use]
    pub fn is_touching(&self, a: ActorId, b: ActorId) -> bool {
        self.touching.contains(&contact_pair(a, b))
    }

    /// Replaces the set of touching pairs. Pairs that were not touching
    /// before become the begun contacts of this step, in sorted order.
    pub fn replace_touching(&mut self, now: BTreeSet<ContactPair>) -> &[ContactPair] {
        self.begun = now.difference(&self.touching).copied().collect();
        self.touching = now;
        &self.begun
    }

    /// Pairs that started touching during the last physics step.
    #[must_use]
    pub fn begun_contacts(&self) -> &[ContactPair] {
        &self.begun
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the simulation tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
