//! Test helper functions for setting up simulations and actors.

use glam::Vec3;

use crate::actor::{ActorId, ActorTag, BodyState};
use crate::config::SimulationConfig;
use crate::input::{Buttons, InputFrame, ScriptedInput};
use crate::output::Event;
use crate::simulation::Simulation;
use crate::view::PerspectiveCamera;

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A simulation with default configuration and a camera at the origin
/// looking down -Z.
pub fn simulation() -> Simulation {
    init_tracing();
    Simulation::new(SimulationConfig::default(), PerspectiveCamera::default())
        .expect("default configuration is valid")
}

/// Spawns a controllable actor at `position`.
pub fn spawn_player(sim: &mut Simulation, position: Vec3) -> ActorId {
    sim.arena_mut()
        .spawn(ActorTag::Controllable, BodyState::at_position(position))
}

/// Spawns an immovable obstacle at `position`.
pub fn spawn_obstacle(sim: &mut Simulation, position: Vec3) -> ActorId {
    sim.arena_mut()
        .spawn(ActorTag::Obstacle, BodyState::at_position(position))
}

/// Input that presses dash on the first poll and is idle afterwards.
pub fn dash_now() -> ScriptedInput {
    ScriptedInput::new([InputFrame::press(Buttons::DASH)])
}

/// Input that holds the given axes forever.
pub fn hold_axes(horizontal: f32, vertical: f32) -> ScriptedInput {
    ScriptedInput::default().then_hold(InputFrame::axes(horizontal, vertical))
}

/// Current position of `actor`.
pub fn position(sim: &Simulation, actor: ActorId) -> Vec3 {
    sim.arena().position(actor).expect("actor exists")
}

/// Steps until `done` matches a recorded event or `max_ticks` pass.
///
/// Returns every event drained along the way.
pub fn step_until(
    sim: &mut Simulation,
    max_ticks: usize,
    done: impl Fn(&Event) -> bool,
) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        sim.step();
        let drained = sim.take_events();
        let finished = drained.iter().any(&done);
        events.extend(drained);
        if finished {
            break;
        }
    }
    events
}
