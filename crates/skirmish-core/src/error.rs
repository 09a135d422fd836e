//! Error types.
//!
//! Runtime paths of the core never fail: a missing lock or dash target is an
//! `Option`. Errors only arise while setting a simulation up, and an actor
//! whose setup fails must not be activated.

use thiserror::Error;

use crate::actor::ActorId;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value outside its valid range.
    #[error("invalid value {value} for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: f32,
        /// Constraint that was violated.
        reason: &'static str,
    },
}

/// Errors raised while wiring actors into a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// The actor does not exist in the arena.
    #[error("actor {0} does not exist")]
    UnknownActor(ActorId),
    /// Controllers can only drive controllable actors.
    #[error("actor {0} is not controllable")]
    NotControllable(ActorId),
    /// The actor already has a controller.
    #[error("actor {0} already has a controller")]
    AlreadyControlled(ActorId),
}
