//! Network ownership gate.
//!
//! In a replicated match every instance simulates every actor's body, but only
//! the instance holding authority over an actor reads its input, drives its
//! forces and attaches the camera rig to it. The locomotion controller takes
//! an [`Authority`] at construction and consults it instead of querying the
//! networking layer itself.

use std::collections::BTreeSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::actor::ActorId;

/// Predicate deciding whether this instance drives a given actor.
pub trait Authority: Send + Sync {
    /// Returns `true` if the local instance has authority over `actor`.
    fn has_authority(&self, actor: ActorId) -> bool;
}

/// Authority over every actor. Used for offline play and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullAuthority;

impl Authority for FullAuthority {
    fn has_authority(&self, _actor: ActorId) -> bool {
        true
    }
}

/// Authority over an explicit set of locally owned actors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalAuthority {
    owned: BTreeSet<ActorId>,
}

impl LocalAuthority {
    /// Creates an authority set from the given owned actors.
    #[must_use]
    pub fn new(owned: impl IntoIterator<Item = ActorId>) -> Self {
        Self {
            owned: owned.into_iter().collect(),
        }
    }
}

impl Authority for LocalAuthority {
    fn has_authority(&self, actor: ActorId) -> bool {
        self.owned.contains(&actor)
    }
}

impl<F> Authority for F
where
    F: Fn(ActorId) -> bool + Send + Sync,
{
    fn has_authority(&self, actor: ActorId) -> bool {
        self(actor)
    }
}

/// Follow and look-at anchors the camera rig should track.
///
/// Offsets are relative to the actor's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRigBinding {
    /// Actor the rig is attached to.
    pub actor: ActorId,
    /// Offset of the point the camera follows.
    pub follow_offset: Vec3,
    /// Offset of the point the camera looks at.
    pub look_at_offset: Vec3,
}

impl CameraRigBinding {
    /// World-space follow point for an actor at `position`.
    #[must_use]
    pub fn follow_point(&self, position: Vec3) -> Vec3 {
        position + self.follow_offset
    }

    /// World-space look-at point for an actor at `position`.
    #[must_use]
    pub fn look_at_point(&self, position: Vec3) -> Vec3 {
        position + self.look_at_offset
    }
}
