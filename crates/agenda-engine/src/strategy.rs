//! Scheduling strategies: turning free capacity and a task queue into blocks.
//!
//! [`GreedyStrategy`] is a first-fit packer. Tasks are taken in priority order
//! and each one is poured into the earliest remaining capacity, splitting it
//! across as many intervals as needed. There is no backtracking: a task that
//! does not fit in what is left is reported as unplanned and the next task is
//! tried.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace};

use crate::interval::Interval;
use crate::plan::{PlanInput, PlannedBlock, SchedulePlan, Task, TaskStatus, TodoList};

/// A packing algorithm that builds a plan from a [`PlanInput`].
///
/// Implementations must be pure: the same input always yields the same plan.
pub trait SchedulingStrategy {
    fn build_plan(&self, input: &PlanInput) -> SchedulePlan;
}

impl<S: SchedulingStrategy + ?Sized> SchedulingStrategy for &S {
    fn build_plan(&self, input: &PlanInput) -> SchedulePlan {
        (**self).build_plan(input)
    }
}

impl<S: SchedulingStrategy + ?Sized> SchedulingStrategy for Box<S> {
    fn build_plan(&self, input: &PlanInput) -> SchedulePlan {
        (**self).build_plan(input)
    }
}

/// Priority-ordered first-fit packing with task splitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyStrategy;

impl GreedyStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl SchedulingStrategy for GreedyStrategy {
    fn build_plan(&self, input: &PlanInput) -> SchedulePlan {
        let availability = &input.availability;
        let now = input.options.now_truncated();
        let intervals = future_intervals(availability.valid_intervals(), now);
        let queue = priority_queue(availability.id(), &input.todo_lists, &input.tasks);

        let mut cursor = Cursor::new(&intervals, now);
        let mut plan = SchedulePlan::default();

        for task in queue {
            if task.duration_minutes <= 0 {
                debug!(task_id = %task.id, duration = task.duration_minutes, "skipping task without duration");
                continue;
            }

            // Durations past the `Duration` range can never fit; fill what exists.
            let mut remaining =
                Duration::try_minutes(task.duration_minutes).unwrap_or(Duration::MAX);
            while remaining > Duration::zero() {
                let Some(interval_end) = cursor.next_free() else {
                    debug!(task_id = %task.id, remaining = remaining.num_minutes(), "capacity exhausted");
                    plan.unplanned_task_ids.push(task.id.clone());
                    break;
                };

                let start = cursor.at;
                let consumed = remaining.min(interval_end - start);
                let end = start + consumed;
                cursor.at = end;
                remaining = remaining - consumed;

                let minutes = rounded_minutes(consumed);
                if minutes <= 0 {
                    continue;
                }

                trace!(task_id = %task.id, %start, %end, "planned block");
                *plan.tasks_per_day.entry(start.date_naive()).or_insert(0) += 1;
                plan.planned_blocks.push(PlannedBlock {
                    task_id: task.id.clone(),
                    todo_list_id: task.todo_list_id.clone(),
                    availability_id: availability.id().to_string(),
                    scheduled_start: start,
                    scheduled_end: end,
                    duration_minutes: minutes,
                });
            }
        }

        debug!(
            availability_id = availability.id(),
            intervals = intervals.len(),
            blocks = plan.planned_blocks.len(),
            unplanned = plan.unplanned_task_ids.len(),
            "built greedy plan"
        );
        plan
    }
}

/// Position in the interval list: the interval being filled and the instant
/// within it where the next block starts.
struct Cursor<'a> {
    intervals: &'a [Interval],
    index: usize,
    at: DateTime<Utc>,
}

impl<'a> Cursor<'a> {
    fn new(intervals: &'a [Interval], now: DateTime<Utc>) -> Self {
        let at = intervals.first().map_or(now, |i| i.start.max(now));
        Self {
            intervals,
            index: 0,
            at,
        }
    }

    /// Move to the next instant with free capacity and return the end of the
    /// interval containing it, or `None` once every interval is used up.
    fn next_free(&mut self) -> Option<DateTime<Utc>> {
        while let Some(interval) = self.intervals.get(self.index) {
            if self.at < interval.start {
                self.at = interval.start;
            }
            if self.at < interval.end {
                return Some(interval.end);
            }
            self.index += 1;
        }
        None
    }
}

/// Drop intervals that are over by `now` and clip the rest to start no earlier.
fn future_intervals(intervals: Vec<Interval>, now: DateTime<Utc>) -> Vec<Interval> {
    intervals
        .into_iter()
        .filter(|i| i.end > now)
        .map(|i| Interval::new(i.start.max(now), i.end))
        .collect()
}

/// Order schedulable tasks for packing.
///
/// Lists attached to `availability_id` are ranked by `order_in_availability`;
/// inside a list tasks are ranked by `order_in_list`. Every in-progress task of
/// every list comes before any pending task, so the queue is the concatenation
/// of two passes over the ranked lists. Ties fall back to ids.
fn priority_queue<'a>(
    availability_id: &str,
    todo_lists: &'a [TodoList],
    tasks: &'a [Task],
) -> Vec<&'a Task> {
    let mut seen = HashSet::new();
    let mut lists: Vec<&TodoList> = todo_lists
        .iter()
        .filter(|l| l.availability_id == availability_id)
        .filter(|l| seen.insert(l.id.as_str()))
        .collect();
    lists.sort_by(|a, b| {
        a.order_in_availability
            .cmp(&b.order_in_availability)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut by_list: HashMap<&str, Vec<&Task>> = HashMap::new();
    for task in tasks.iter().filter(|t| t.status.is_schedulable()) {
        by_list
            .entry(task.todo_list_id.as_str())
            .or_default()
            .push(task);
    }
    for group in by_list.values_mut() {
        group.sort_by(|a, b| {
            a.order_in_list
                .cmp(&b.order_in_list)
                .then_with(|| a.id.cmp(&b.id))
        });
    }

    let pass = |status: TaskStatus| {
        lists
            .iter()
            .filter_map(|l| by_list.get(l.id.as_str()))
            .flat_map(move |group| group.iter().copied().filter(move |t| t.status == status))
            .collect::<Vec<_>>()
    };

    let mut queue = pass(TaskStatus::InProgress);
    queue.extend(pass(TaskStatus::Pending));
    queue
}

/// Whole minutes in `duration`, rounding half a minute up.
fn rounded_minutes(duration: Duration) -> i64 {
    (duration.num_seconds() + 30).div_euclid(60)
}
