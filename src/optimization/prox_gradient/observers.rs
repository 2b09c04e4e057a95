//! Progress observers for the proximal-gradient solver.
//!
//! Observers are argmin [`Observe`] implementations attached with
//! `ObserverMode::Every(print_every)`. They read the solver state and the
//! per-iteration key/value pairs (`loss`, `step_size`, `rel_change`) and never
//! mutate either.
use crate::optimization::prox_gradient::types::AgdState;
use argmin::core::{Error, KV, State, observers::Observe};
use tracing::info;

/// Emits one `tracing` event per observed iteration.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observe<AgdState> for TracingObserver {
    fn observe_iter(&mut self, state: &AgdState, kv: &KV) -> Result<(), Error> {
        info!(
            iter = state.get_iter(),
            objective = state.get_cost(),
            metrics = ?kv,
            "proximal gradient iteration"
        );
        Ok(())
    }
}
