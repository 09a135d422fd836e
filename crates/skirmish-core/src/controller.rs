//! Locomotion, lock-on and dash state machine.
//!
//! A [`LocomotionController`] belongs to one controllable actor and is driven
//! through three per-tick callbacks, always in this order:
//!
//! 1. [`update`](LocomotionController::update): input and state. Resolves the
//!    input direction, turns the body toward its planar velocity, recomputes
//!    the lock and may start a dash.
//! 2. [`fixed_update`](LocomotionController::fixed_update): physics. Emits
//!    exactly one force, from either the dash or the movement drive.
//! 3. [`late_update`](LocomotionController::late_update): presentation.
//!    Emits the planar speed for animation.
//!
//! Contacts reported by physics go to
//! [`on_collision`](LocomotionController::on_collision) between phases 2 and 3.
//!
//! # States
//!
//! ```text
//!            lock present, no dash, dash pressed
//!   Idle ---------------------------------------> Dashing(target)
//!    ^                                                |
//!    +------ contact with target / target gone -------+
//! ```
//!
//! The dash target is a snapshot of the lock at the moment the dash began.
//! Later lock changes, including losing the lock entirely, do not affect it.

use std::fmt;
use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::actor::{ActorId, BodyState};
use crate::authority::{Authority, CameraRigBinding};
use crate::config::LocomotionConfig;
use crate::input::{Buttons, InputFrame};
use crate::lock::{LockCandidate, LockState, TargetLockResolver};
use crate::output::{Command, Event, Output, Presentation};
use crate::view::{planar, planar_direction, ViewProvider};

/// Dash sub-state. `Idle` is the free-movement state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DashState {
    /// Free movement under player input.
    #[default]
    Idle,
    /// Pursuing the given actor until contact.
    Dashing(ActorId),
}

impl DashState {
    /// Dash target, if dashing.
    #[must_use]
    pub const fn target(self) -> Option<ActorId> {
        match self {
            Self::Idle => None,
            Self::Dashing(target) => Some(target),
        }
    }
}

/// Source of the force applied in a physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Drive {
    /// Player-directed movement.
    Move,
    /// Pursuit of a dash target.
    Dash(ActorId),
}

/// Per-actor locomotion controller.
pub struct LocomotionController {
    actor: ActorId,
    config: LocomotionConfig,
    resolver: TargetLockResolver,
    authority: Arc<dyn Authority>,
    /// Planar input direction from the last `update`, not normalized.
    direction: Vec3,
    lock: LockState,
    dash: DashState,
}

impl fmt::Debug for LocomotionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocomotionController")
            .field("actor", &self.actor)
            .field("config", &self.config)
            .field("authoritative", &self.is_authoritative())
            .field("direction", &self.direction)
            .field("lock", &self.lock)
            .field("dash", &self.dash)
            .finish()
    }
}

impl LocomotionController {
    /// Creates a controller for `actor` in the idle state.
    #[must_use]
    pub fn new(actor: ActorId, config: LocomotionConfig, authority: Arc<dyn Authority>) -> Self {
        Self {
            actor,
            config,
            resolver: TargetLockResolver::new(config.lock_radius).with_tie_break(config.tie_break),
            authority,
            direction: Vec3::ZERO,
            lock: LockState::Unlocked,
            dash: DashState::Idle,
        }
    }

    /// The controlled actor.
    #[must_use]
    pub const fn actor(&self) -> ActorId {
        self.actor
    }

    /// Parameters in use.
    #[must_use]
    pub const fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Whether this instance drives the actor.
    #[must_use]
    pub fn is_authoritative(&self) -> bool {
        self.authority.has_authority(self.actor)
    }

    /// Current lock state.
    #[must_use]
    pub const fn lock_state(&self) -> LockState {
        self.lock
    }

    /// Currently locked target, if any.
    #[must_use]
    pub const fn lock_target(&self) -> Option<ActorId> {
        self.lock.target()
    }

    /// Current dash state.
    #[must_use]
    pub const fn dash_state(&self) -> DashState {
        self.dash
    }

    /// Whether a dash is in progress.
    #[must_use]
    pub const fn is_dashing(&self) -> bool {
        matches!(self.dash, DashState::Dashing(_))
    }

    /// Planar input direction from the last update.
    #[must_use]
    pub const fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Camera rig anchors for this actor, if this instance has authority.
    #[must_use]
    pub fn start(&self) -> Option<CameraRigBinding> {
        if !self.is_authoritative() {
            return None;
        }
        Some(CameraRigBinding {
            actor: self.actor,
            follow_offset: self.config.camera_follow_offset,
            look_at_offset: self.config.camera_look_at_offset,
        })
    }

    /// Input and state phase.
    ///
    /// `candidates` is every controllable actor at query time; the controlled
    /// actor may appear in it and is skipped.
    pub fn update(
        &mut self,
        input: &InputFrame,
        view: &dyn ViewProvider,
        body: &BodyState,
        candidates: &[LockCandidate],
    ) -> Vec<Output> {
        let mut outputs = Vec::new();

        self.direction = planar_direction(input.horizontal, input.vertical, view.orientation());

        // Facing follows velocity, so it trails input changes by a step.
        let planar_velocity = planar(body.velocity);
        if planar_velocity != Vec3::ZERO {
            outputs.push(Output::Command(Command::SetFacing {
                target: self.actor,
                facing: planar_velocity.normalize(),
            }));
        }

        let seeker = LockCandidate::new(self.actor, body.position);
        let lock = LockState::from(self.resolver.find(&seeker, candidates));
        if let Some(event) = self.transition_lock(lock) {
            outputs.push(Output::Event(event));
        }

        if let (Some(target), DashState::Idle) = (self.lock.target(), self.dash) {
            if input.was_pressed(Buttons::DASH) {
                self.dash = DashState::Dashing(target);
                info!(actor = %self.actor, %target, "dash started");
                outputs.push(Output::Event(Event::DashStarted {
                    actor: self.actor,
                    target,
                }));
            }
        }

        outputs
    }

    fn transition_lock(&mut self, next: LockState) -> Option<Event> {
        let previous = std::mem::replace(&mut self.lock, next);
        let actor = self.actor;
        match (previous, next) {
            (LockState::Unlocked, LockState::Locked(target)) => {
                debug!(%actor, %target, "lock acquired");
                Some(Event::LockAcquired { actor, target })
            }
            (LockState::Locked(from), LockState::Locked(to)) if from != to => {
                debug!(%actor, %from, %to, "lock switched");
                Some(Event::LockSwitched { actor, from, to })
            }
            (LockState::Locked(target), LockState::Unlocked) => {
                debug!(%actor, %target, "lock released");
                Some(Event::LockReleased { actor, target })
            }
            _ => None,
        }
    }

    /// Physics phase.
    ///
    /// `locate` returns the current position of another actor, or `None` if it
    /// no longer exists. Always emits exactly one `ApplyForce` command, from
    /// the dash drive while dashing and from the movement drive otherwise.
    pub fn fixed_update(
        &mut self,
        body: &BodyState,
        locate: impl Fn(ActorId) -> Option<Vec3>,
    ) -> Vec<Output> {
        let mut outputs = Vec::with_capacity(2);

        if let DashState::Dashing(target) = self.dash {
            if let Some(target_position) = locate(target) {
                let force = planar(target_position - body.position)
                    .normalize_or_zero()
                    * self.config.dash_force;
                trace!(actor = %self.actor, %target, ?force, "dash force");
                outputs.push(Output::Command(Command::ApplyForce {
                    target: self.actor,
                    force,
                    drive: Drive::Dash(target),
                }));
                return outputs;
            }

            warn!(actor = %self.actor, %target, "dash target no longer exists");
            self.dash = DashState::Idle;
            outputs.push(Output::Event(Event::DashAbandoned {
                actor: self.actor,
                target,
            }));
        }

        let force = self.direction.normalize_or_zero() * self.config.move_force;
        trace!(actor = %self.actor, ?force, "move force");
        outputs.push(Output::Command(Command::ApplyForce {
            target: self.actor,
            force,
            drive: Drive::Move,
        }));
        outputs
    }

    /// Contact notification from physics.
    ///
    /// Ends the dash when `other` is the dash target; anything else is ignored.
    pub fn on_collision(&mut self, other: ActorId) -> Option<Event> {
        match self.dash {
            DashState::Dashing(target) if target == other => {
                self.dash = DashState::Idle;
                info!(actor = %self.actor, %target, "dash ended on contact");
                Some(Event::DashEnded {
                    actor: self.actor,
                    target,
                })
            }
            _ => None,
        }
    }

    /// Presentation phase: planar speed for the animation sink.
    #[must_use]
    pub fn late_update(&self, body: &BodyState) -> Presentation {
        Presentation::Speed {
            actor: self.actor,
            speed: planar(body.velocity).length(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::{FullAuthority, LocalAuthority};
    use crate::view::PerspectiveCamera;

    const SELF: ActorId = ActorId::new(0);
    const NEAR: ActorId = ActorId::new(1);
    const FAR: ActorId = ActorId::new(2);

    fn controller() -> LocomotionController {
        LocomotionController::new(SELF, LocomotionConfig::default(), Arc::new(FullAuthority))
    }

    fn body() -> BodyState {
        BodyState::at_position(Vec3::ZERO)
    }

    fn candidates(near_x: f32) -> Vec<LockCandidate> {
        vec![
            LockCandidate::new(SELF, Vec3::ZERO),
            LockCandidate::new(NEAR, Vec3::new(near_x, 0.0, 0.0)),
        ]
    }

    fn forces(outputs: &[Output]) -> Vec<(Vec3, Drive)> {
        outputs
            .iter()
            .filter_map(|o| match o.as_command() {
                Some(Command::ApplyForce { force, drive, .. }) => Some((*force, *drive)),
                _ => None,
            })
            .collect()
    }

    fn events(outputs: &[Output]) -> Vec<Event> {
        outputs.iter().filter_map(|o| o.as_event().copied()).collect()
    }

    mod lock_tests {
        use super::*;

        #[test]
        fn lock_acquired_then_released() {
            let mut c = controller();
            let camera = PerspectiveCamera::default();

            let out = c.update(&InputFrame::default(), &camera, &body(), &candidates(3.0));
            assert_eq!(c.lock_target(), Some(NEAR));
            assert_eq!(
                events(&out),
                vec![Event::LockAcquired {
                    actor: SELF,
                    target: NEAR
                }]
            );

            let out = c.update(&InputFrame::default(), &camera, &body(), &candidates(9.0));
            assert_eq!(c.lock_target(), None);
            assert_eq!(
                events(&out),
                vec![Event::LockReleased {
                    actor: SELF,
                    target: NEAR
                }]
            );
        }

        #[test]
        fn steady_lock_emits_nothing() {
            let mut c = controller();
            let camera = PerspectiveCamera::default();
            c.update(&InputFrame::default(), &camera, &body(), &candidates(3.0));
            let out = c.update(&InputFrame::default(), &camera, &body(), &candidates(3.0));
            assert!(events(&out).is_empty());
        }

        #[test]
        fn lock_switches_to_nearer_actor() {
            let mut c = controller();
            let camera = PerspectiveCamera::default();
            c.update(&InputFrame::default(), &camera, &body(), &candidates(3.0));

            let mut cands = candidates(3.0);
            cands.push(LockCandidate::new(FAR, Vec3::new(0.0, 0.0, 1.0)));
            let out = c.update(&InputFrame::default(), &camera, &body(), &cands);

            assert_eq!(c.lock_target(), Some(FAR));
            assert_eq!(
                events(&out),
                vec![Event::LockSwitched {
                    actor: SELF,
                    from: NEAR,
                    to: FAR
                }]
            );
        }
    }

    mod dash_tests {
        use super::*;

        #[test]
        fn trigger_with_lock_starts_dash() {
            let mut c = controller();
            let camera = PerspectiveCamera::default();
            let out = c.update(
                &InputFrame::press(Buttons::DASH),
                &camera,
                &body(),
                &candidates(3.0),
            );

            assert_eq!(c.dash_state(), DashState::Dashing(NEAR));
            assert!(events(&out).contains(&Event::DashStarted {
                actor: SELF,
                target: NEAR
            }));
        }

        #[test]
        fn trigger_without_lock_does_nothing() {
            let mut c = controller();
            let camera = PerspectiveCamera::default();
            c.update(&InputFrame::press(Buttons::DASH), &camera, &body(), &candidates(8.0));
            assert_eq!(c.dash_state(), DashState::Idle);
        }

        #[test]
        fn held_button_without_edge_does_not_dash() {
            let mut c = controller();
            let camera = PerspectiveCamera::default();
            let held = InputFrame {
                held: Buttons::DASH,
                ..InputFrame::default()
            };
            c.update(&held, &camera, &body(), &candidates(3.0));
            assert!(!c.is_dashing());
        }

        #[test]
        fn second_trigger_does_not_retarget() {
            let mut c = controller();
            let camera = PerspectiveCamera::default();
            c.update(&InputFrame::press(Buttons::DASH), &camera, &body(), &candidates(3.0));

            let mut cands = candidates(3.0);
            cands.push(LockCandidate::new(FAR, Vec3::new(0.0, 0.0, 1.0)));
            let out = c.update(&InputFrame::press(Buttons::DASH), &camera, &body(), &cands);

            assert_eq!(c.lock_target(), Some(FAR));
            assert_eq!(c.dash_state(), DashState::Dashing(NEAR));
            assert!(!events(&out)
                .iter()
                .any(|e| matches!(e, Event::DashStarted { .. })));
        }

        #[test]
        fn dash_survives_lock_loss() {
            let mut c = controller();
            let camera = PerspectiveCamera::default();
            c.update(&InputFrame::press(Buttons::DASH), &camera, &body(), &candidates(3.0));
            c.update(&InputFrame::default(), &camera, &body(), &candidates(20.0));

            assert_eq!(c.lock_target(), None);
            assert_eq!(c.dash_state(), DashState::Dashing(NEAR));
        }

        #[test]
        fn collision_with_other_keeps_dashing() {
            let mut c = controller();
            let camera = PerspectiveCamera::default();
            c.update(&InputFrame::press(Buttons::DASH), &camera, &body(), &candidates(3.0));

            assert_eq!(c.on_collision(FAR), None);
            assert_eq!(c.dash_state(), DashState::Dashing(NEAR));
        }

        #[test]
        fn collision_with_target_ends_dash() {
            let mut c = controller();
            let camera = PerspectiveCamera::default();
            c.update(&InputFrame::press(Buttons::DASH), &camera, &body(), &candidates(3.0));

            assert_eq!(
                c.on_collision(NEAR),
                Some(Event::DashEnded {
                    actor: SELF,
                    target: NEAR
                })
            );
            assert_eq!(c.dash_state(), DashState::Idle);
        }

        #[test]
        fn collision_while_idle_is_ignored() {
            let mut c = controller();
            assert_eq!(c.on_collision(NEAR), None);
        }
    }

    mod force_tests {
        use super::*;

        #[test]
        fn free_applies_normalized_move_force() {
            let mut c = controller();
            let camera = PerspectiveCamera::default();
            c.update(&InputFrame::axes(1.0, 1.0), &camera, &body(), &[]);

            let out = c.fixed_update(&body(), |_| None);
            let applied = forces(&out);
            assert_eq!(applied.len(), 1);
            let (force, drive) = applied[0];
            assert_eq!(drive, Drive::Move);
            assert!((force.length() - 3.0).abs() < 1e-5);
            assert!(force.y.abs() < 1e-6);
        }

        #[test]
        fn free_without_input_applies_zero_force() {
            let mut c = controller();
            let out = c.fixed_update(&body(), |_| None);
            assert_eq!(forces(&out), vec![(Vec3::ZERO, Drive::Move)]);
        }

        #[test]
        fn dashing_pursues_target_on_ground_plane() {
            let mut c = controller();
            let camera = PerspectiveCamera::default();
            c.update(&InputFrame::press(Buttons::DASH), &camera, &body(), &candidates(3.0));
            // Input is ignored while dashing.
            c.update(&InputFrame::axes(0.0, 1.0), &camera, &body(), &candidates(3.0));

            let out =
                c.fixed_update(&body(), |id| (id == NEAR).then_some(Vec3::new(3.0, 2.0, 0.0)));
            let applied = forces(&out);
            assert_eq!(applied.len(), 1);
            let (force, drive) = applied[0];
            assert_eq!(drive, Drive::Dash(NEAR));
            assert!(force.abs_diff_eq(Vec3::new(40.0, 0.0, 0.0), 1e-4));
        }

        #[test]
        fn vanished_dash_target_falls_back_to_movement() {
            let mut c = controller();
            let camera = PerspectiveCamera::default();
            c.update(&InputFrame::press(Buttons::DASH), &camera, &body(), &candidates(3.0));

            let out = c.fixed_update(&body(), |_| None);
            assert_eq!(c.dash_state(), DashState::Idle);
            assert_eq!(
                events(&out),
                vec![Event::DashAbandoned {
                    actor: SELF,
                    target: NEAR
                }]
            );
            assert_eq!(forces(&out).len(), 1);
            assert_eq!(forces(&out)[0].1, Drive::Move);
        }
    }

    mod facing_and_presentation_tests {
        use super::*;

        #[test]
        fn facing_follows_planar_velocity() {
            let mut c = controller();
            let camera = PerspectiveCamera::default();
            let moving = BodyState {
                velocity: Vec3::new(0.0, -5.0, 2.0),
                ..body()
            };
            let out = c.update(&InputFrame::axes(1.0, 0.0), &camera, &moving, &[]);
            let facing = out.iter().find_map(|o| match o.as_command() {
                Some(Command::SetFacing { facing, .. }) => Some(*facing),
                _ => None,
            });
            assert_eq!(facing, Some(Vec3::Z));
        }

        #[test]
        fn resting_body_keeps_facing() {
            let mut c = controller();
            let camera = PerspectiveCamera::default();
            let out = c.update(&InputFrame::axes(1.0, 0.0), &camera, &body(), &[]);
            assert!(out.iter().all(|o| o.as_command().is_none()));
        }

        #[test]
        fn speed_ignores_vertical_velocity() {
            let c = controller();
            let falling = BodyState {
                velocity: Vec3::new(3.0, -9.0, 4.0),
                ..body()
            };
            let Presentation::Speed { speed, .. } = c.late_update(&falling);
            assert!((speed - 5.0).abs() < 1e-5);
        }
    }

    mod authority_tests {
        use super::*;

        #[test]
        fn authoritative_controller_binds_camera() {
            let rig = controller().start().unwrap();
            assert_eq!(rig.actor, SELF);
            assert_eq!(rig.follow_offset, LocomotionConfig::default().camera_follow_offset);
        }

        #[test]
        fn remote_controller_does_not_bind_camera() {
            let c = LocomotionController::new(
                SELF,
                LocomotionConfig::default(),
                Arc::new(LocalAuthority::new([NEAR])),
            );
            assert!(!c.is_authoritative());
            assert!(c.start().is_none());
        }
    }
}
