//! Application state shared across request handlers.

use gantry_hooks::HookRegistry;

/// Immutable server state: the registry is populated once at startup
/// and never mutated, so handlers share it without locking.
pub(crate) struct AppState {
    pub(crate) registry: HookRegistry,
}
