//! # agenda-engine
//!
//! Recurring availability expansion and greedy task scheduling.
//!
//! A project declares when work may happen as an [`Availability`]: a date range
//! plus time segments such as "09:00-12:00 on weekdays" or "22:00-02:00 on the
//! 1st and 15th". The engine expands those rules into merged UTC intervals and
//! packs a prioritized queue of tasks into them, first fit, splitting tasks
//! across intervals when needed.
//!
//! Everything here is synchronous and pure: no I/O, no clock reads (the current
//! instant is passed in through [`PlanOptions`]), no shared mutable state.
//!
//! ## Modules
//!
//! - [`time_range`] — `HH:mm` ranges, including ranges crossing midnight
//! - [`date_range`] — inclusive `YYYY-MM-DD` ranges
//! - [`rules`] — weekday, day-of-month and specific-date rule sets
//! - [`segment`] — a time range plus its rules, expanded per calendar day
//! - [`interval`] — absolute intervals and merging
//! - [`availability`] — the availability aggregate and its capacity
//! - [`plan`] — tasks, lists, planned blocks and plan results
//! - [`strategy`] — the strategy trait and the greedy packer
//! - [`policy`] — the active-state guard in front of a strategy
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```rust
//! use agenda_engine::{
//!     Availability, DateRange, PlanInput, PlanOptions, SchedulingPolicy, SegmentRules, Task,
//!     TaskStatus, TimeRange, TimeSegment, TodoList,
//! };
//! use chrono::{TimeZone, Utc};
//!
//! let segment = TimeSegment::new(
//!     "mornings",
//!     TimeRange::parse("09:00", "11:00").unwrap(),
//!     SegmentRules::weekdays([1, 2, 3, 4, 5]).unwrap(),
//! )
//! .unwrap();
//! let availability = Availability::create(
//!     "avail-1",
//!     "project-1",
//!     DateRange::parse("2026-03-16", "2026-03-20").unwrap(),
//!     vec![segment],
//! )
//! .unwrap();
//!
//! let lists = vec![TodoList {
//!     id: "list-1".into(),
//!     availability_id: "avail-1".into(),
//!     order_in_availability: 1,
//! }];
//! let tasks = vec![Task {
//!     id: "task-1".into(),
//!     todo_list_id: "list-1".into(),
//!     status: TaskStatus::Pending,
//!     duration_minutes: 90,
//!     order_in_list: 1,
//! }];
//! let now = Utc.with_ymd_and_hms(2026, 3, 16, 8, 0, 0).unwrap();
//!
//! let input = PlanInput::new(availability, lists, tasks, PlanOptions::at(now));
//! let plan = SchedulingPolicy::greedy().build_plan(&input).unwrap();
//!
//! assert_eq!(plan.planned_blocks.len(), 1);
//! assert_eq!(plan.planned_blocks[0].duration_minutes, 90);
//! assert!(plan.unplanned_task_ids.is_empty());
//! ```

pub mod availability;
pub mod date_range;
pub mod error;
pub mod interval;
pub mod plan;
pub mod policy;
pub mod rules;
pub mod segment;
pub mod strategy;
pub mod time_range;

pub use availability::{Availability, AvailabilityEvent, AvailabilityState};
pub use date_range::DateRange;
pub use error::AgendaError;
pub use interval::{merge_intervals, Interval};
pub use plan::{
    PlanInput, PlanOptions, PlannedBlock, SchedulePlan, Task, TaskStatus, TodoList,
};
pub use policy::SchedulingPolicy;
pub use rules::{DayOfMonthSet, DayOfWeekSet, SegmentRules, SpecificDateSet};
pub use segment::TimeSegment;
pub use strategy::{GreedyStrategy, SchedulingStrategy};
pub use time_range::TimeRange;
