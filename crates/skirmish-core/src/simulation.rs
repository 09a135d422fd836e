//! Simulation module with the three-phase tick loop.
//!
//! The `Simulation` struct owns the arena, one [`LocomotionController`] per
//! controlled actor, and the resolvers. Each call to [`Simulation::step()`]
//! runs one tick in a fixed order:
//!
//! 1. **INPUT**: Poll input for every authoritative controller and run
//!    `update` in parallel against one frozen candidate snapshot
//! 2. **PHYSICS**: Run `fixed_update` for every authoritative controller,
//!    route all commands and events to the resolvers, then deliver contact
//!    begin events back to the controllers
//! 3. **PRESENTATION**: Run `late_update` and forward the speed to the
//!    presentation sink, if one is installed
//!
//! The arenas are then swapped and the tick advances.
//!
//! # Determinism
//!
//! - Controllers read from the immutable `current` arena only
//! - Outputs are stably sorted by actor ID before resolution
//! - Actors, controllers and contacts are iterated in ID order
//!
//! # Example
//!
//! ```
//! use skirmish_core::actor::{ActorTag, BodyState};
//! use skirmish_core::config::SimulationConfig;
//! use skirmish_core::input::IdleInput;
//! use skirmish_core::simulation::Simulation;
//! use skirmish_core::view::PerspectiveCamera;
//! use glam::Vec3;
//!
//! let mut sim =
//!     Simulation::new(SimulationConfig::default(), PerspectiveCamera::default()).unwrap();
//!
//! let player = sim
//!     .arena_mut()
//!     .spawn(ActorTag::Controllable, BodyState::at_position(Vec3::ZERO));
//! let rival = sim
//!     .arena_mut()
//!     .spawn(ActorTag::Controllable, BodyState::at_position(Vec3::X * 3.0));
//! sim.attach_controller(player, Box::new(IdleInput)).unwrap();
//!
//! sim.step();
//!
//! assert_eq!(sim.tick(), 1);
//! assert_eq!(sim.lock_target(player), Some(rival));
//! ```

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use glam::Vec3;
use tracing::{info, trace};

use crate::actor::ActorId;
use crate::arena::Arena;
use crate::authority::{Authority, CameraRigBinding, FullAuthority};
use crate::config::SimulationConfig;
use crate::controller::LocomotionController;
use crate::error::{ConfigError, SimulationError};
use crate::input::{InputFrame, InputSource};
use crate::output::{Event, Output, Presentation};
use crate::presenter::{CrosshairFrame, CrosshairPresenter};
use crate::resolver::{EventResolver, PhysicsResolver, Resolver};
use crate::view::ViewProvider;

// =============================================================================
// PresentationSink
// =============================================================================

/// Receiver for cosmetic per-actor signals, such as an animator.
pub trait PresentationSink: Send {
    /// Called once per tick for every controlled actor with its planar speed.
    fn set_speed(&mut self, actor: ActorId, speed: f32);
}

/// Sink that remembers the latest speed per actor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeedRecorder {
    speeds: BTreeMap<ActorId, f32>,
}

impl SpeedRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest speed reported for `actor`.
    #[must_use]
    pub fn speed(&self, actor: ActorId) -> Option<f32> {
        self.speeds.get(&actor).copied()
    }
}

impl PresentationSink for SpeedRecorder {
    fn set_speed(&mut self, actor: ActorId, speed: f32) {
        self.speeds.insert(actor, speed);
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// The tick orchestrator.
///
/// # Double Buffering
///
/// The simulation uses two arenas:
/// - `current`: Read-only snapshot for the controllers
/// - `next`: Mutable state that resolvers write to
///
/// After each tick, the buffers are swapped to avoid copying.
pub struct Simulation {
    /// Current arena state (read-only during controller phases).
    current: Arena,
    /// Next arena state (written to by resolvers).
    next: Arena,
    /// One controller per controlled actor.
    controllers: BTreeMap<ActorId, LocomotionController>,
    /// Input sources, keyed by the actor they drive.
    inputs: BTreeMap<ActorId, Box<dyn InputSource>>,
    /// Camera used for input orientation and crosshair projection.
    view: Box<dyn ViewProvider>,
    /// Resolvers that process controller outputs, in order.
    resolvers: Vec<Box<dyn Resolver>>,
    /// Event log, always routed after the other resolvers.
    events: EventResolver,
    /// Optional animation sink.
    sink: Option<Box<dyn PresentationSink>>,
    /// Camera rig of the most recently attached authoritative controller.
    camera_rig: Option<CameraRigBinding>,
    authority: Arc<dyn Authority>,
    presenter: CrosshairPresenter,
    config: SimulationConfig,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("current", &self.current)
            .field("controllers", &self.controllers)
            .field("inputs", &format!("[{} inputs]", self.inputs.len()))
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("events", &self.events)
            .field("has_sink", &self.sink.is_some())
            .field("camera_rig", &self.camera_rig)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates a simulation with full local authority and no presentation sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `config` fails validation.
    pub fn new(
        config: SimulationConfig,
        view: impl ViewProvider + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            current: Arena::default(),
            next: Arena::default(),
            controllers: BTreeMap::new(),
            inputs: BTreeMap::new(),
            view: Box::new(view),
            resolvers: vec![Box::new(PhysicsResolver::with_dt(config.fixed_dt))],
            events: EventResolver::new(),
            sink: None,
            camera_rig: None,
            authority: Arc::new(FullAuthority),
            presenter: CrosshairPresenter::new(config.crosshair),
            config,
        })
    }

    /// Replaces the authority used for controllers attached from now on.
    #[must_use]
    pub fn with_authority(mut self, authority: Arc<dyn Authority>) -> Self {
        self.authority = authority;
        self
    }

    /// Installs a presentation sink.
    #[must_use]
    pub fn with_presentation_sink(mut self, sink: Box<dyn PresentationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Attaches a locomotion controller and its input source to `actor`.
    ///
    /// If this instance has authority over the actor, its camera rig becomes
    /// the active one.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::UnknownActor`] if the actor is not in the arena
    /// - [`SimulationError::NotControllable`] if the actor is an obstacle
    /// - [`SimulationError::AlreadyControlled`] if a controller is attached
    pub fn attach_controller(
        &mut self,
        actor: ActorId,
        input: Box<dyn InputSource>,
    ) -> Result<(), SimulationError> {
        let entry = self.current.get(actor).ok_or(SimulationError::UnknownActor(actor))?;
        if !entry.is_controllable() {
            return Err(SimulationError::NotControllable(actor));
        }
        if self.controllers.contains_key(&actor) {
            return Err(SimulationError::AlreadyControlled(actor));
        }

        let controller =
            LocomotionController::new(actor, self.config.locomotion, Arc::clone(&self.authority));
        if let Some(rig) = controller.start() {
            self.camera_rig = Some(rig);
        }
        info!(%actor, authoritative = controller.is_authoritative(), "controller attached");

        self.controllers.insert(actor, controller);
        self.inputs.insert(actor, input);
        Ok(())
    }

    /// Removes the controller and input source of `actor`.
    pub fn detach_controller(&mut self, actor: ActorId) -> Option<LocomotionController> {
        self.inputs.remove(&actor);
        if self.camera_rig.is_some_and(|rig| rig.actor == actor) {
            self.camera_rig = None;
        }
        self.controllers.remove(&actor)
    }

    /// Removes `actor` from the arena and detaches its controller.
    ///
    /// Controllers dashing at the removed actor abandon the dash on their next
    /// physics phase.
    pub fn despawn(&mut self, actor: ActorId) -> bool {
        self.detach_controller(actor);
        self.current.despawn(actor).is_some()
    }

    /// Executes one tick.
    pub fn step(&mut self) {
        let tick = self.current.current_tick();
        trace!(tick, controllers = self.controllers.len(), "step");

        // PHASE 1: INPUT
        let mut outputs = self.run_input_phase();

        // PHASE 2: PHYSICS
        outputs.extend(self.run_fixed_phase());
        outputs.sort_by_key(Output::actor);

        self.next.clone_from(&self.current);
        for resolver in &self.resolvers {
            route(&**resolver, &outputs, &self.current, &mut self.next);
        }
        route(&self.events, &outputs, &self.current, &mut self.next);
        self.deliver_contacts();

        // PHASE 3: PRESENTATION
        self.run_presentation_phase();

        std::mem::swap(&mut self.current, &mut self.next);
        self.current.advance_tick();
    }

    /// Polls inputs and runs `update` for every authoritative controller.
    fn run_input_phase(&mut self) -> Vec<Output> {
        let mut frames: BTreeMap<ActorId, InputFrame> = BTreeMap::new();
        for (id, controller) in &self.controllers {
            if !controller.is_authoritative() {
                continue;
            }
            let frame = self
                .inputs
                .get_mut(id)
                .map_or_else(InputFrame::default, |source| source.poll());
            frames.insert(*id, frame);
        }

        let candidates = self.current.lock_candidates();
        let current = &self.current;
        let view: &dyn ViewProvider = &*self.view;

        self.controllers
            .par_iter_mut()
            .filter_map(|(id, controller)| {
                let frame = frames.get(id)?;
                let body = current.get(*id)?.body();
                Some(controller.update(frame, view, body, &candidates))
            })
            .flatten()
            .collect()
    }

    /// Runs `fixed_update` for every authoritative controller.
    fn run_fixed_phase(&mut self) -> Vec<Output> {
        let current = &self.current;
        let mut outputs = Vec::new();
        for controller in self.controllers.values_mut() {
            if !controller.is_authoritative() {
                continue;
            }
            let Some(actor) = current.get(controller.actor()) else {
                continue;
            };
            outputs.extend(controller.fixed_update(actor.body(), |id| current.position(id)));
        }
        outputs
    }

    /// Reports contact begin events to both participants and the event log.
    ///
    /// A dash whose target is still touching after the physics step also
    /// ends, so a dash started from resting contact does not run forever.
    fn deliver_contacts(&mut self) {
        let mut events = Vec::new();
        for &(a, b) in self.next.begun_contacts() {
            events.push(Event::Contact { a, b });
            for (actor, other) in [(a, b), (b, a)] {
                if let Some(controller) = self.controllers.get_mut(&actor) {
                    events.extend(controller.on_collision(other));
                }
            }
        }
        for controller in self.controllers.values_mut() {
            let Some(target) = controller.dash_state().target() else {
                continue;
            };
            if self.next.is_touching(controller.actor(), target) {
                events.extend(controller.on_collision(target));
            }
        }
        self.events.record(events);
    }

    fn run_presentation_phase(&mut self) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        for controller in self.controllers.values() {
            if let Some(entry) = self.next.get(controller.actor()) {
                let Presentation::Speed { actor, speed } = controller.late_update(entry.body());
                sink.set_speed(actor, speed);
            }
        }
    }

    /// Returns a read-only reference to the current arena state.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.current
    }

    /// Returns a mutable reference to the current arena.
    ///
    /// Use this for setup (spawning actors) between steps.
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.current
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.current.current_tick()
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Controller attached to `actor`, if any.
    #[must_use]
    pub fn controller(&self, actor: ActorId) -> Option<&LocomotionController> {
        self.controllers.get(&actor)
    }

    /// Replaces the camera, e.g. after the rig moved.
    pub fn set_view(&mut self, view: impl ViewProvider + 'static) {
        self.view = Box::new(view);
    }

    /// The active camera rig binding, if an authoritative controller exists.
    #[must_use]
    pub const fn camera_rig(&self) -> Option<CameraRigBinding> {
        self.camera_rig
    }

    /// Lock target of `actor`'s controller.
    #[must_use]
    pub fn lock_target(&self, actor: ActorId) -> Option<ActorId> {
        self.controllers.get(&actor)?.lock_target()
    }

    /// World position of `actor`'s lock target.
    #[must_use]
    pub fn lock_target_position(&self, actor: ActorId) -> Option<Vec3> {
        self.current.position(self.lock_target(actor)?)
    }

    /// Crosshair frame for `actor`'s lock, projected through the current view.
    #[must_use]
    pub fn crosshair(&self, actor: ActorId) -> CrosshairFrame {
        self.presenter
            .present(self.lock_target_position(actor), &*self.view)
    }

    /// Drains the events recorded since the last call.
    pub fn take_events(&self) -> Vec<Event> {
        self.events.take_events()
    }

    /// Adds a custom resolver, run after the built-in ones.
    pub fn add_resolver(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// Returns the number of resolvers, not counting the event log.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }
}

/// Hands `resolver` the outputs whose kind it handles.
fn route(resolver: &dyn Resolver, outputs: &[Output], current: &Arena, next: &mut Arena) {
    let relevant: Vec<&Output> = outputs
        .iter()
        .filter(|output| resolver.handles().contains(&output.kind()))
        .collect();
    resolver.resolve(&relevant, current, next);
}

// =============================================================================
// Tests
// =============================================================================
