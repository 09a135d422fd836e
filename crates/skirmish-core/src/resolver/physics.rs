//! Physics resolver for force commands, integration and contacts.
//!
//! The `PhysicsResolver` is a minimal rigid-body stand-in:
//! - `SetFacing` commands: Turn the body
//! - `ApplyForce` commands: Accumulated per body for this step
//! - Integration: semi-implicit Euler, `v += F/m * dt` then `p += v * dt`
//! - Contacts: sphere overlap tests, positional separation, and contact
//!   begin bookkeeping in the arena
//!
//! Obstacles are immovable: they receive no forces and are never pushed.
//!
//! # Fixed Timestep
//!
//! The resolver integrates with a fixed timestep of 1/50 seconds so that runs
//! are reproducible regardless of frame time.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;

use crate::actor::{ActorId, ActorTag, BodyState};
use crate::arena::{contact_pair, Arena, ContactPair};
use crate::output::{Command, Output, OutputKind};

use super::Resolver;

/// Fixed timestep for physics integration (1/50 second = 20ms).
pub const FIXED_DT: f32 = 1.0 / 50.0;

/// Bodies this close beyond touching still count as in contact.
///
/// Separation leaves bodies exactly touching; without the slop a resting pair
/// would flicker in and out of contact.
const CONTACT_SLOP: f32 = 1e-3;

/// Resolver for physical commands and integration.
///
/// # Processing Order
///
/// 1. Apply facing changes from `SetFacing` commands (last write wins)
/// 2. Sum `ApplyForce` commands per body
/// 3. Integrate every movable body
/// 4. Detect and separate overlapping pairs, record contacts in `next`
///
/// # Example
///
/// ```
/// use skirmish_core::resolver::{PhysicsResolver, Resolver};
/// use skirmish_core::output::OutputKind;
///
/// let resolver = PhysicsResolver::new();
/// assert!(resolver.handles().contains(&OutputKind::Command));
/// ```
#[derive(Debug, Clone)]
pub struct PhysicsResolver {
    /// Fixed timestep for physics integration
    dt: f32,
}

impl Default for PhysicsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsResolver {
    /// Creates a new physics resolver with the default fixed timestep.
    #[must_use]
    pub fn new() -> Self {
        Self { dt: FIXED_DT }
    }

    /// Creates a physics resolver with a custom timestep.
    #[must_use]
    pub fn with_dt(dt: f32) -> Self {
        Self { dt }
    }

    /// Returns the timestep used for physics integration.
    #[must_use]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    fn integrate(&self, next: &mut Arena, forces: &BTreeMap<ActorId, Vec3>) {
        let dt = self.dt;
        for actor in next.actors_sorted_mut() {
            if actor.tag() == ActorTag::Obstacle {
                continue;
            }
            let force = forces.get(&actor.id()).copied().unwrap_or(Vec3::ZERO);
            let body = actor.body_mut();
            if body.mass > 0.0 {
                body.velocity += force / body.mass * dt;
            }
            body.position += body.velocity * dt;
        }
    }

    /// Finds touching pairs in ID order and pushes overlapping bodies apart.
    fn resolve_contacts(next: &mut Arena) -> BTreeSet<ContactPair> {
        let bodies: Vec<(ActorId, bool, BodyState)> = next
            .actors_sorted()
            .map(|actor| (actor.id(), actor.tag() != ActorTag::Obstacle, *actor.body()))
            .collect();

        let mut touching = BTreeSet::new();
        let mut corrections: BTreeMap<ActorId, Vec3> = BTreeMap::new();

        for (i, (a, a_movable, a_body)) in bodies.iter().enumerate() {
            for (b, b_movable, b_body) in &bodies[i + 1..] {
                let reach = a_body.radius + b_body.radius;
                let offset = b_body.position - a_body.position;
                if offset.length() > reach + CONTACT_SLOP {
                    continue;
                }
                touching.insert(contact_pair(*a, *b));

                if !a_body.overlaps(b_body) {
                    continue;
                }
                let normal = offset.try_normalize().unwrap_or(Vec3::X);
                let depth = reach - offset.length();
                let (a_share, b_share) = match (a_movable, b_movable) {
                    (true, true) => (0.5, 0.5),
                    (true, false) => (1.0, 0.0),
                    (false, true) => (0.0, 1.0),
                    (false, false) => (0.0, 0.0),
                };
                *corrections.entry(*a).or_default() -= normal * depth * a_share;
                *corrections.entry(*b).or_default() += normal * depth * b_share;
            }
        }

        for (id, correction) in corrections {
            if correction == Vec3::ZERO {
                continue;
            }
            if let Some(actor) = next.get_mut(id) {
                let body = actor.body_mut();
                body.position += correction;
                // Drop the velocity component that drove the body into contact.
                let push = correction.normalize_or_zero();
                let into = body.velocity.dot(push);
                if into < 0.0 {
                    body.velocity -= push * into;
                }
            }
        }

        touching
    }
}

impl Resolver for PhysicsResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Command]
    }

    fn resolve(&self, outputs: &[&Output], _current: &Arena, next: &mut Arena) {
        let mut forces: BTreeMap<ActorId, Vec3> = BTreeMap::new();

        for output in outputs {
            match output.as_command() {
                Some(Command::ApplyForce { target, force, .. }) => {
                    *forces.entry(*target).or_default() += *force;
                }
                Some(Command::SetFacing { target, facing }) => {
                    if let Some(actor) = next.get_mut(*target) {
                        actor.body_mut().facing = *facing;
                    }
                }
                None => {}
            }
        }

        self.integrate(next, &forces);
        let touching = Self::resolve_contacts(next);
        next.replace_touching(touching);
    }
}
