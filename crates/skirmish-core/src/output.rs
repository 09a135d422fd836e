//! Outputs emitted by locomotion controllers.
//!
//! Controllers never mutate bodies directly. The input and physics phases
//! produce [`Output`]s that are routed to resolvers by [`OutputKind`]:
//! - [`Command`]: Requests to change physical state (`ApplyForce`, `SetFacing`)
//! - [`Event`]: Notifications of lock and dash transitions and contacts
//!
//! The presentation phase bypasses the resolvers: its [`Presentation`] signal
//! goes straight to the presentation sink.
//!
//! # Example
//!
//! ```
//! use skirmish_core::actor::ActorId;
//! use skirmish_core::controller::Drive;
//! use skirmish_core::output::{Command, Output, OutputKind};
//! use glam::Vec3;
//!
//! let output = Output::Command(Command::ApplyForce {
//!     target: ActorId::new(1),
//!     force: Vec3::new(3.0, 0.0, 0.0),
//!     drive: Drive::Move,
//! });
//!
//! assert_eq!(output.kind(), OutputKind::Command);
//! assert_eq!(output.actor(), ActorId::new(1));
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::actor::ActorId;
use crate::controller::Drive;

// =============================================================================
// Commands
// =============================================================================

/// Physical state change requests, applied by the physics resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Apply a continuous force for one physics step.
    ApplyForce {
        /// Body receiving the force.
        target: ActorId,
        /// Force vector in newtons.
        force: Vec3,
        /// Which drive produced the force.
        drive: Drive,
    },
    /// Turn the body to face a direction.
    SetFacing {
        /// Body to turn.
        target: ActorId,
        /// Unit facing vector.
        facing: Vec3,
    },
}

impl Command {
    /// Actor the command applies to.
    #[must_use]
    pub const fn target(&self) -> ActorId {
        match self {
            Self::ApplyForce { target, .. } | Self::SetFacing { target, .. } => *target,
        }
    }
}

// =============================================================================
// Events
// =============================================================================

/// Notifications of state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// Lock acquired from the unlocked state.
    LockAcquired {
        /// Locking actor.
        actor: ActorId,
        /// Newly locked target.
        target: ActorId,
    },
    /// Lock moved from one target to another in a single tick.
    LockSwitched {
        /// Locking actor.
        actor: ActorId,
        /// Previous target.
        from: ActorId,
        /// New target.
        to: ActorId,
    },
    /// Lock released; nothing is in range.
    LockReleased {
        /// Locking actor.
        actor: ActorId,
        /// Target that was released.
        target: ActorId,
    },
    /// Dash started toward the locked target.
    DashStarted {
        /// Dashing actor.
        actor: ActorId,
        /// Dash target.
        target: ActorId,
    },
    /// Dash ended by contact with its target.
    DashEnded {
        /// Dashing actor.
        actor: ActorId,
        /// Dash target that was hit.
        target: ActorId,
    },
    /// Dash ended because its target no longer exists.
    DashAbandoned {
        /// Dashing actor.
        actor: ActorId,
        /// Dash target that disappeared.
        target: ActorId,
    },
    /// Two bodies started touching.
    Contact {
        /// Lower-id body of the pair.
        a: ActorId,
        /// Higher-id body of the pair.
        b: ActorId,
    },
}

impl Event {
    /// Actor the event is attributed to.
    #[must_use]
    pub const fn actor(&self) -> ActorId {
        match self {
            Self::LockAcquired { actor, .. }
            | Self::LockSwitched { actor, .. }
            | Self::LockReleased { actor, .. }
            | Self::DashStarted { actor, .. }
            | Self::DashEnded { actor, .. }
            | Self::DashAbandoned { actor, .. } => *actor,
            Self::Contact { a, .. } => *a,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LockAcquired { actor, target } => write!(f, "{actor} locked {target}"),
            Self::LockSwitched { actor, from, to } => {
                write!(f, "{actor} switched lock {from} -> {to}")
            }
            Self::LockReleased { actor, target } => write!(f, "{actor} released {target}"),
            Self::DashStarted { actor, target } => write!(f, "{actor} dashing at {target}"),
            Self::DashEnded { actor, target } => write!(f, "{actor} hit {target}"),
            Self::DashAbandoned { actor, target } => write!(f, "{actor} lost {target}"),
            Self::Contact { a, b } => write!(f, "{a} touched {b}"),
        }
    }
}

// =============================================================================
// Presentation
// =============================================================================

/// Cosmetic signals for animation and UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Presentation {
    /// Planar speed of the actor's body.
    Speed {
        /// Actor being animated.
        actor: ActorId,
        /// Planar velocity magnitude in meters per second.
        speed: f32,
    },
}

impl Presentation {
    /// Actor the signal is for.
    #[must_use]
    pub const fn actor(&self) -> ActorId {
        match self {
            Self::Speed { actor, .. } => *actor,
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// Routing category of an [`Output`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// [`Output::Command`]
    Command,
    /// [`Output::Event`]
    Event,
}

/// Anything a controller emits for the resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// Physical state change request.
    Command(Command),
    /// State transition notification.
    Event(Event),
}

impl Output {
    /// Routing category.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        match self {
            Self::Command(_) => OutputKind::Command,
            Self::Event(_) => OutputKind::Event,
        }
    }

    /// Actor the output belongs to, used for deterministic ordering.
    #[must_use]
    pub const fn actor(&self) -> ActorId {
        match self {
            Self::Command(command) => command.target(),
            Self::Event(event) => event.actor(),
        }
    }

    /// Returns the command, if this is one.
    #[must_use]
    pub const fn as_command(&self) -> Option<&Command> {
        match self {
            Self::Command(command) => Some(command),
            _ => None,
        }
    }

    /// Returns the event, if this is one.
    #[must_use]
    pub const fn as_event(&self) -> Option<&Event> {
        match self {
            Self::Event(event) => Some(event),
            _ => None,
        }
    }
}

impl From<Command> for Output {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

impl From<Event> for Output {
    fn from(event: Event) -> Self {
        Self::Event(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let a = ActorId::new(1);
        let command: Output = Command::SetFacing {
            target: a,
            facing: Vec3::X,
        }
        .into();
        let event: Output = Event::DashStarted {
            actor: a,
            target: ActorId::new(2),
        }
        .into();

        assert_eq!(command.kind(), OutputKind::Command);
        assert_eq!(event.kind(), OutputKind::Event);
        assert!(command.as_command().is_some());
        assert!(event.as_event().is_some());
        assert!(command.as_event().is_none());
        assert!(event.as_command().is_none());
    }

    #[test]
    fn actor_attribution() {
        let event = Event::LockSwitched {
            actor: ActorId::new(3),
            from: ActorId::new(1),
            to: ActorId::new(2),
        };
        assert_eq!(Output::Event(event).actor(), ActorId::new(3));
        assert_eq!(
            Event::Contact {
                a: ActorId::new(4),
                b: ActorId::new(9)
            }
            .actor(),
            ActorId::new(4)
        );
    }

    #[test]
    fn event_display() {
        let event = Event::DashEnded {
            actor: ActorId::new(1),
            target: ActorId::new(2),
        };
        assert_eq!(event.to_string(), "1 hit 2");
    }

    #[test]
    fn output_serialization_roundtrip() {
        let output = Output::Command(Command::ApplyForce {
            target: ActorId::new(1),
            force: Vec3::new(0.0, 0.0, -40.0),
            drive: Drive::Dash(ActorId::new(2)),
        });
        let json = serde_json::to_string(&output).unwrap();
        let back: Output = serde_json::from_str(&json).unwrap();
        assert_eq!(output, back);
    }
}
