//! The entry point for planning: a state guard in front of a strategy.

use tracing::warn;

use crate::error::Result;
use crate::plan::{PlanInput, SchedulePlan};
use crate::strategy::{GreedyStrategy, SchedulingStrategy};

/// Refuses to plan against an inactive availability and otherwise hands the
/// input, untouched, to the configured strategy.
#[derive(Debug, Clone, Default)]
pub struct SchedulingPolicy<S = GreedyStrategy> {
    strategy: S,
}

impl SchedulingPolicy {
    /// A policy backed by [`GreedyStrategy`].
    pub fn greedy() -> Self {
        Self::new(GreedyStrategy)
    }
}

impl<S: SchedulingStrategy> SchedulingPolicy<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Build a plan for `input`.
    ///
    /// # Errors
    /// Returns `AgendaError::InvalidState` when the availability is not active;
    /// the strategy is not consulted in that case.
    pub fn build_plan(&self, input: &PlanInput) -> Result<SchedulePlan> {
        let availability = &input.availability;
        if !availability.is_active() {
            warn!(
                availability_id = availability.id(),
                state = %availability.state(),
                "refusing to plan against inactive availability"
            );
            return Err(availability.invalid_state());
        }
        Ok(self.strategy.build_plan(input))
    }
}
