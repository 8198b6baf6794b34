//! Shared application state.
//!
//! `AppState` is handed to the guard middleware through
//! `from_fn_with_state`. It carries only immutable policy; the guard keeps no
//! per-user state between requests.

use crate::guard::GuardPolicy;

#[derive(Debug, Clone, Copy, Default)]
pub struct AppState {
    pub guard: GuardPolicy,
}

impl AppState {
    #[must_use]
    pub fn new(guard: GuardPolicy) -> Self {
        Self { guard }
    }
}
