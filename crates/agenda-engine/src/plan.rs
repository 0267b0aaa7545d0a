//! Scheduling inputs and outputs.
//!
//! Todo lists and tasks are snapshots owned by the caller; the engine only reads
//! the fields it needs for ordering and sizing. A [`SchedulePlan`] is an
//! ephemeral result, never persisted by the engine.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, DurationRound, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::availability::Availability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
    Abandoned,
}

impl TaskStatus {
    /// Only pending and in-progress tasks take up calendar time.
    pub fn is_schedulable(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }
}

/// A todo list attached to an availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: String,
    pub availability_id: String,
    /// Priority among the lists of the same availability, lowest first.
    pub order_in_availability: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub todo_list_id: String,
    pub status: TaskStatus,
    pub duration_minutes: i64,
    /// Priority inside the task's list, lowest first.
    pub order_in_list: i32,
}

/// Options controlling a planning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOptions {
    /// The instant before which nothing may be scheduled.
    pub now: DateTime<Utc>,
}

impl PlanOptions {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Build options from a Unix timestamp in milliseconds.
    ///
    /// Returns `None` if the timestamp is out of the representable range.
    pub fn from_millis(now_ms: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(now_ms).map(Self::at)
    }

    /// `now` truncated to the whole minute.
    pub fn now_truncated(&self) -> DateTime<Utc> {
        self.now
            .duration_trunc(Duration::minutes(1))
            .unwrap_or(self.now)
    }
}

/// Everything a strategy needs to build a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInput {
    pub availability: Availability,
    #[serde(default)]
    pub todo_lists: Vec<TodoList>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub options: PlanOptions,
}

impl PlanInput {
    pub fn new(
        availability: Availability,
        todo_lists: Vec<TodoList>,
        tasks: Vec<Task>,
        options: PlanOptions,
    ) -> Self {
        Self {
            availability,
            todo_lists,
            tasks,
            options,
        }
    }
}

/// One contiguous slice of a task's duration placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedBlock {
    pub task_id: String,
    pub todo_list_id: String,
    pub availability_id: String,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl PlannedBlock {
    /// The UTC calendar date the block starts on.
    pub fn day(&self) -> NaiveDate {
        self.scheduled_start.date_naive()
    }
}

/// The result of a planning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePlan {
    /// Blocks in scheduling order, which is also ascending start order.
    pub planned_blocks: Vec<PlannedBlock>,
    /// Tasks that did not fit completely, in processing order.
    pub unplanned_task_ids: Vec<String>,
    /// Number of blocks starting on each UTC date.
    pub tasks_per_day: BTreeMap<NaiveDate, usize>,
}

impl SchedulePlan {
    /// Blocks starting on `date` (UTC).
    pub fn blocks_on(&self, date: NaiveDate) -> impl Iterator<Item = &PlannedBlock> + '_ {
        self.planned_blocks.iter().filter(move |b| b.day() == date)
    }

    pub fn blocks_for_task<'a>(
        &'a self,
        task_id: &'a str,
    ) -> impl Iterator<Item = &'a PlannedBlock> + 'a {
        self.planned_blocks
            .iter()
            .filter(move |b| b.task_id == task_id)
    }

    pub fn planned_minutes_for(&self, task_id: &str) -> i64 {
        self.blocks_for_task(task_id)
            .map(|b| b.duration_minutes)
            .sum()
    }

    /// True if the task received blocks and is not listed as unplanned.
    pub fn is_fully_planned(&self, task_id: &str) -> bool {
        self.blocks_for_task(task_id).next().is_some()
            && !self.unplanned_task_ids.iter().any(|id| id == task_id)
    }

    pub fn total_planned_minutes(&self) -> i64 {
        self.planned_blocks.iter().map(|b| b.duration_minutes).sum()
    }
}
