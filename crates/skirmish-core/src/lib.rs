//! # Skirmish Core
//!
//! Lock-on and dash locomotion for a multiplayer arena game.
//!
//! Each controllable actor gets a [`LocomotionController`] that turns camera
//! relative input into a movement force, keeps a lock on the nearest rival in
//! range, and on the dash trigger pursues that rival with a stronger force
//! until the two bodies touch. A [`CrosshairPresenter`] shows the lock.
//!
//! ## Architecture
//!
//! - **Actors**: identity, category and rigid body state in an [`Arena`]
//! - **Controllers**: per-actor state machines that emit [`Output`]s
//! - **Resolvers**: apply outputs to the arena (physics, event log)
//!
//! [`Simulation`] runs the three per-tick phases (input, physics,
//! presentation) in a fixed order over double-buffered arenas.
//!
//! ## Usage
//!
//! ```
//! use skirmish_core::{
//!     ActorTag, BodyState, Buttons, InputFrame, ScriptedInput, Simulation, SimulationConfig,
//! };
//! use skirmish_core::view::PerspectiveCamera;
//! use glam::Vec3;
//!
//! let mut sim =
//!     Simulation::new(SimulationConfig::default(), PerspectiveCamera::default()).unwrap();
//! let player = sim
//!     .arena_mut()
//!     .spawn(ActorTag::Controllable, BodyState::at_position(Vec3::ZERO));
//! let rival = sim
//!     .arena_mut()
//!     .spawn(ActorTag::Controllable, BodyState::at_position(Vec3::X * 3.0));
//!
//! let input = ScriptedInput::new([InputFrame::default(), InputFrame::press(Buttons::DASH)]);
//! sim.attach_controller(player, Box::new(input)).unwrap();
//!
//! sim.step();
//! sim.step();
//! assert!(sim.controller(player).unwrap().is_dashing());
//! assert_eq!(sim.lock_target(player), Some(rival));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod actor;
pub mod arena;
pub mod authority;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod lock;
pub mod output;
pub mod presenter;
pub mod resolver;
pub mod simulation;
pub mod view;

#[cfg(test)]
mod tests;

pub use actor::{Actor, ActorId, ActorTag, BodyState};
pub use arena::Arena;
pub use authority::{Authority, CameraRigBinding, FullAuthority, LocalAuthority};
pub use config::{CrosshairConfig, LocomotionConfig, SimulationConfig};
pub use controller::{DashState, Drive, LocomotionController};
pub use error::{ConfigError, SimulationError};
pub use input::{Buttons, IdleInput, InputFrame, InputSource, ScriptedInput};
pub use lock::{LockCandidate, LockState, TargetLockResolver, TieBreak};
pub use output::{Command, Event, Output, OutputKind, Presentation};
pub use presenter::{CrosshairFrame, CrosshairPresenter, Rgba};
pub use simulation::{PresentationSink, Simulation, SpeedRecorder};
pub use view::{PerspectiveCamera, ViewProvider};
