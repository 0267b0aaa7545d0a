//! JSON documents read and written by the CLI.

use std::collections::BTreeMap;

use agenda_engine::{Availability, Interval, PlanInput, PlanOptions, Task, TodoList};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A planning request as read from disk or stdin.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub availability: Availability,
    #[serde(default)]
    pub todo_lists: Vec<TodoList>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Planning instant; the CLI falls back to the system clock without it.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

impl PlanRequest {
    /// Build engine input. `now_override` wins over the request's own `now`,
    /// and the system clock is read only when neither is set.
    pub fn into_plan_input(self, now_override: Option<DateTime<Utc>>) -> PlanInput {
        let now = now_override.or(self.now).unwrap_or_else(Utc::now);
        PlanInput::new(
            self.availability,
            self.todo_lists,
            self.tasks,
            PlanOptions::at(now),
        )
    }
}

/// Working capacity of an availability.
#[derive(Debug, Serialize)]
pub struct CapacityReport {
    pub availability_id: String,
    pub total_minutes: i64,
    pub total_hours: f64,
    pub minutes_by_day: BTreeMap<NaiveDate, i64>,
    pub intervals: Vec<Interval>,
}

impl From<&Availability> for CapacityReport {
    fn from(availability: &Availability) -> Self {
        let intervals = availability.valid_intervals();
        Self {
            availability_id: availability.id().to_string(),
            total_minutes: agenda_engine::interval::total_minutes(&intervals),
            total_hours: availability.valid_hours(),
            minutes_by_day: availability.valid_minutes_by_day(),
            intervals,
        }
    }
}
