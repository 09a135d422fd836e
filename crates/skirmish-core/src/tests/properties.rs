//! Property tests for lock selection and the locomotion state machine.

use std::sync::Arc;

use glam::Vec3;
use proptest::prelude::*;

use crate::actor::{ActorId, BodyState};
use crate::authority::FullAuthority;
use crate::config::LocomotionConfig;
use crate::controller::{DashState, LocomotionController};
use crate::input::{Buttons, InputFrame};
use crate::lock::{LockCandidate, TargetLockResolver, TieBreak};
use crate::output::{Command, Output};
use crate::view::PerspectiveCamera;

const SEEKER: ActorId = ActorId::new(0);

fn position() -> impl Strategy<Value = Vec3> {
    (-10.0f32..10.0, -10.0f32..10.0, -10.0f32..10.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

/// The seeker at index 0 followed by up to 12 other candidates.
fn candidates() -> impl Strategy<Value = Vec<LockCandidate>> {
    (position(), prop::collection::vec(position(), 0..12)).prop_map(|(seeker, others)| {
        std::iter::once(LockCandidate::new(SEEKER, seeker))
            .chain(
                others
                    .into_iter()
                    .zip(1..)
                    .map(|(p, id)| LockCandidate::new(ActorId::new(id), p)),
            )
            .collect()
    })
}

fn input() -> impl Strategy<Value = InputFrame> {
    (-1.0f32..=1.0, -1.0f32..=1.0, any::<bool>()).prop_map(|(h, v, dash)| {
        let frame = InputFrame::axes(h, v);
        if dash {
            frame.with_pressed(Buttons::DASH)
        } else {
            frame
        }
    })
}

fn force_count(outputs: &[Output]) -> usize {
    outputs
        .iter()
        .filter(|o| matches!(o.as_command(), Some(Command::ApplyForce { .. })))
        .count()
}

proptest! {
    #[test]
    fn never_self_and_always_in_range(cands in candidates(), radius in 0.1f32..15.0) {
        let resolver = TargetLockResolver::new(radius);
        let seeker = cands[0];
        if let Some(found) = resolver.find(&seeker, &cands) {
            prop_assert_ne!(found, SEEKER);
            let target = cands.iter().find(|c| c.id == found).unwrap();
            prop_assert!(seeker.position.distance(target.position) < radius);
        }
    }

    #[test]
    fn result_is_nearest_qualifying(cands in candidates(), radius in 0.1f32..15.0) {
        let resolver = TargetLockResolver::new(radius);
        let seeker = cands[0];
        let best = cands[1..]
            .iter()
            .map(|c| seeker.position.distance(c.position))
            .filter(|d| *d < radius)
            .fold(None, |acc: Option<f32>, d| Some(acc.map_or(d, |a| a.min(d))));

        match resolver.find(&seeker, &cands) {
            Some(found) => {
                let target = cands.iter().find(|c| c.id == found).unwrap();
                prop_assert_eq!(Some(seeker.position.distance(target.position)), best);
            }
            None => prop_assert_eq!(best, None),
        }
    }

    #[test]
    fn resolver_is_idempotent(cands in candidates(), radius in 0.1f32..15.0) {
        let resolver = TargetLockResolver::new(radius);
        let seeker = cands[0];
        prop_assert_eq!(resolver.find(&seeker, &cands), resolver.find(&seeker, &cands));
    }

    #[test]
    fn lowest_id_ignores_enumeration_order(cands in candidates(), radius in 0.1f32..15.0) {
        let resolver = TargetLockResolver::new(radius).with_tie_break(TieBreak::LowestId);
        let seeker = cands[0];
        let mut reversed = cands.clone();
        reversed.reverse();
        prop_assert_eq!(resolver.find(&seeker, &cands), resolver.find(&seeker, &reversed));
    }

    #[test]
    fn exactly_one_force_per_physics_step(
        frames in prop::collection::vec(input(), 1..40),
        cands in candidates(),
    ) {
        let mut controller =
            LocomotionController::new(SEEKER, LocomotionConfig::default(), Arc::new(FullAuthority));
        let camera = PerspectiveCamera::default();
        let body = BodyState::at_position(cands[0].position);

        for frame in &frames {
            controller.update(frame, &camera, &body, &cands);
            let outputs = controller.fixed_update(&body, |id| {
                cands.iter().find(|c| c.id == id).map(|c| c.position)
            });
            prop_assert_eq!(force_count(&outputs), 1);
        }
    }

    #[test]
    fn dash_persists_until_target_contact(
        frames in prop::collection::vec(input(), 1..40),
        others in prop::collection::vec(position(), 0..8),
        bumps in prop::collection::vec(1u64..20, 0..8),
    ) {
        let target = ActorId::new(100);
        let mut controller =
            LocomotionController::new(SEEKER, LocomotionConfig::default(), Arc::new(FullAuthority));
        let camera = PerspectiveCamera::default();
        let body = BodyState::default();

        let start = [
            LockCandidate::new(SEEKER, Vec3::ZERO),
            LockCandidate::new(target, Vec3::X),
        ];
        controller.update(&InputFrame::press(Buttons::DASH), &camera, &body, &start);
        prop_assert_eq!(controller.dash_state(), DashState::Dashing(target));

        // Arbitrary lock changes and contacts with anything but the target.
        let shuffled: Vec<LockCandidate> = others
            .into_iter()
            .zip(1..)
            .map(|(p, id)| LockCandidate::new(ActorId::new(id), p))
            .collect();
        for frame in &frames {
            controller.update(frame, &camera, &body, &shuffled);
            for bump in &bumps {
                prop_assert_eq!(controller.on_collision(ActorId::new(*bump)), None);
            }
            prop_assert_eq!(controller.dash_state(), DashState::Dashing(target));
        }

        prop_assert!(controller.on_collision(target).is_some());
        prop_assert_eq!(controller.dash_state(), DashState::Idle);
    }
}
