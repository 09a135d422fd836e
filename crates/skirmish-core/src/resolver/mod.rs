//! Resolvers turn controller outputs into state changes.
//!
//! Resolvers are the write side of a tick. Controllers only propose changes by
//! emitting [`Output`]s; each resolver declares which output kinds it handles
//! via [`Resolver::handles()`] and applies them.
//!
//! # Invariants
//!
//! - Lookups of the tick's starting state MUST read `current`
//! - `next` MAY be read and written for state the resolver itself is building
//!   this tick (physics integrates and resolves contacts in place on `next`)
//! - Resolvers MUST be deterministic given the same inputs and output order
//!
//! # Available Resolvers
//!
//! - [`PhysicsResolver`]: Applies forces and facing, integrates, detects contacts
//! - [`EventResolver`]: Records events for telemetry (no state mutation)

mod event;
mod physics;

pub use event::EventResolver;
pub use physics::{PhysicsResolver, FIXED_DT};

use crate::arena::Arena;
use crate::output::{Output, OutputKind};

/// Resolver processes outputs and mutates the next arena state.
///
/// # Example
///
/// ```
/// use skirmish_core::arena::Arena;
/// use skirmish_core::output::{Output, OutputKind};
/// use skirmish_core::resolver::Resolver;
///
/// struct CountingResolver;
///
/// impl Resolver for CountingResolver {
///     fn handles(&self) -> &[OutputKind] {
///         &[OutputKind::Event]
///     }
///
///     fn resolve(&self, outputs: &[&Output], _current: &Arena, _next: &mut Arena) {
///         let _ = outputs.len();
///     }
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Returns the output kinds this resolver handles.
    fn handles(&self) -> &[OutputKind];

    /// Resolves outputs into state mutations.
    ///
    /// * `outputs` - The outputs routed to this resolver (filtered by `handles()`)
    /// * `current` - State at the start of the phase (read-only)
    /// * `next` - State being built (mutate this)
    fn resolve(&self, outputs: &[&Output], current: &Arena, next: &mut Arena);
}
