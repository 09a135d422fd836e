//! Target lock resolution.
//!
//! [`TargetLockResolver`] picks the nearest candidate within a lock radius,
//! excluding the seeker itself. It is a pure function of the positions it is
//! given: no state is kept between calls, and the candidate set is passed in
//! explicitly rather than discovered from the arena.
//!
//! # Tie-breaking
//!
//! When two candidates are at exactly the same distance, the default
//! [`TieBreak::FirstEncountered`] keeps whichever appears first in the
//! candidate slice. [`TieBreak::LowestId`] makes the result independent of
//! enumeration order.
//!
//! # Example
//!
//! ```
//! use skirmish_core::actor::ActorId;
//! use skirmish_core::lock::{LockCandidate, TargetLockResolver};
//! use glam::Vec3;
//!
//! let resolver = TargetLockResolver::new(5.0);
//! let seeker = LockCandidate::new(ActorId::new(0), Vec3::ZERO);
//! let candidates = [
//!     seeker,
//!     LockCandidate::new(ActorId::new(1), Vec3::new(4.0, 0.0, 0.0)),
//!     LockCandidate::new(ActorId::new(2), Vec3::new(0.0, 0.0, 2.0)),
//! ];
//!
//! assert_eq!(resolver.find(&seeker, &candidates), Some(ActorId::new(2)));
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::actor::ActorId;

/// Rule for choosing between candidates at exactly equal distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TieBreak {
    /// Keep the candidate that comes first in the candidate sequence.
    #[default]
    FirstEncountered,
    /// Keep the candidate with the lowest [`ActorId`].
    LowestId,
}

/// Identity and position of an actor as seen by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LockCandidate {
    /// Actor identity.
    pub id: ActorId,
    /// World position at query time.
    pub position: Vec3,
}

impl LockCandidate {
    /// Creates a candidate.
    #[must_use]
    pub const fn new(id: ActorId, position: Vec3) -> Self {
        Self { id, position }
    }
}

/// Lock-on state of a controlled actor, recomputed every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockState {
    /// Nothing within range.
    #[default]
    Unlocked,
    /// Locked on to the given actor.
    Locked(ActorId),
}

impl LockState {
    /// Returns the locked actor, if any.
    #[must_use]
    pub const fn target(self) -> Option<ActorId> {
        match self {
            Self::Unlocked => None,
            Self::Locked(id) => Some(id),
        }
    }

    /// Returns `true` when locked on to something.
    #[must_use]
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Locked(_))
    }
}

impl From<Option<ActorId>> for LockState {
    fn from(target: Option<ActorId>) -> Self {
        target.map_or(Self::Unlocked, Self::Locked)
    }
}

/// Nearest-candidate lock resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetLockResolver {
    max_distance: f32,
    tie_break: TieBreak,
}

impl TargetLockResolver {
    /// Creates a resolver with the given lock radius and first-encountered
    /// tie-breaking.
    #[must_use]
    pub const fn new(max_distance: f32) -> Self {
        Self {
            max_distance,
            tie_break: TieBreak::FirstEncountered,
        }
    }

    /// Returns a copy using the given tie-break rule.
    #[must_use]
    pub const fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Lock radius. Candidates must be strictly closer than this.
    #[must_use]
    pub const fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Tie-break rule in use.
    #[must_use]
    pub const fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Returns the nearest candidate strictly within the lock radius whose
    /// identity differs from `seeker`, or `None`.
    ///
    /// Candidates with non-finite positions never qualify.
    #[must_use]
    pub fn find(&self, seeker: &LockCandidate, candidates: &[LockCandidate]) -> Option<ActorId> {
        let mut best: Option<(ActorId, f32)> = None;

        for candidate in candidates {
            if candidate.id == seeker.id {
                continue;
            }
            let distance = seeker.position.distance(candidate.position);
            // Negated so NaN distances are rejected too.
            if !(distance < self.max_distance) {
                continue;
            }

            let better = match best {
                None => true,
                Some((best_id, best_distance)) => match self.tie_break {
                    TieBreak::FirstEncountered => distance < best_distance,
                    TieBreak::LowestId => {
                        distance < best_distance
                            || (distance == best_distance && candidate.id < best_id)
                    }
                },
            };
            if better {
                best = Some((candidate.id, distance));
            }
        }

        best.map(|(id, _)| id)
    }
}
