//! Tests for the greedy first-fit strategy.

use agenda_engine::{
    Availability, DateRange, GreedyStrategy, PlanInput, PlanOptions, SchedulePlan,
    SchedulingStrategy, SegmentRules, Task, TaskStatus, TimeRange, TimeSegment, TodoList,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

// ── Helpers ─────────────────────────────────────────────────────────────────

const AVAIL: &str = "avail-1";

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn on_dates(id: &str, start: &str, end: &str, dates: &[&str]) -> TimeSegment {
    TimeSegment::new(
        id,
        TimeRange::parse(start, end).unwrap(),
        SegmentRules::specific_dates(dates.iter().copied()).unwrap(),
    )
    .unwrap()
}

fn availability(start: &str, end: &str, segments: Vec<TimeSegment>) -> Availability {
    Availability::create(AVAIL, "project-1", DateRange::parse(start, end).unwrap(), segments)
        .unwrap()
}

fn list(id: &str, order: i32) -> TodoList {
    TodoList {
        id: id.to_string(),
        availability_id: AVAIL.to_string(),
        order_in_availability: order,
    }
}

fn task(id: &str, list: &str, status: TaskStatus, minutes: i64, order: i32) -> Task {
    Task {
        id: id.to_string(),
        todo_list_id: list.to_string(),
        status,
        duration_minutes: minutes,
        order_in_list: order,
    }
}

fn plan(
    availability: Availability,
    lists: Vec<TodoList>,
    tasks: Vec<Task>,
    now: DateTime<Utc>,
) -> SchedulePlan {
    let input = PlanInput::new(availability, lists, tasks, PlanOptions::at(now));
    GreedyStrategy.build_plan(&input)
}

fn spans(plan: &SchedulePlan) -> Vec<(&str, DateTime<Utc>, DateTime<Utc>)> {
    plan.planned_blocks
        .iter()
        .map(|b| (b.task_id.as_str(), b.scheduled_start, b.scheduled_end))
        .collect()
}

// ── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn task_longer_than_window_is_partially_planned() {
    let a = availability(
        "2026-03-16",
        "2026-03-16",
        vec![on_dates("s1", "09:00", "10:00", &["2026-03-16"])],
    );
    let result = plan(
        a,
        vec![list("L", 1)],
        vec![task("t1", "L", TaskStatus::Pending, 70, 1)],
        at(2026, 3, 16, 8, 0),
    );

    assert_eq!(spans(&result), vec![("t1", at(2026, 3, 16, 9, 0), at(2026, 3, 16, 10, 0))]);
    assert_eq!(result.planned_blocks[0].duration_minutes, 60);
    assert_eq!(result.unplanned_task_ids, vec!["t1".to_string()]);
}

#[test]
fn huge_duration_fills_capacity_and_stays_unplanned() {
    let a = availability(
        "2026-03-16",
        "2026-03-16",
        vec![on_dates("s1", "09:00", "10:00", &["2026-03-16"])],
    );
    let result = plan(
        a,
        vec![list("L", 1)],
        vec![
            task("huge", "L", TaskStatus::Pending, i64::MAX, 1),
            task("next", "L", TaskStatus::Pending, 10, 2),
        ],
        at(2026, 3, 16, 8, 0),
    );

    assert_eq!(spans(&result), vec![("huge", at(2026, 3, 16, 9, 0), at(2026, 3, 16, 10, 0))]);
    assert_eq!(result.planned_blocks[0].duration_minutes, 60);
    assert_eq!(
        result.unplanned_task_ids,
        vec!["huge".to_string(), "next".to_string()]
    );
}

#[test]
fn task_is_split_across_two_windows() {
    let a = availability(
        "2026-03-16",
        "2026-03-16",
        vec![
            on_dates("s1", "09:00", "10:00", &["2026-03-16"]),
            on_dates("s2", "10:30", "11:30", &["2026-03-16"]),
        ],
    );
    let result = plan(
        a,
        vec![list("L", 1)],
        vec![task("t1", "L", TaskStatus::Pending, 70, 1)],
        at(2026, 3, 16, 8, 0),
    );

    assert_eq!(
        spans(&result),
        vec![
            ("t1", at(2026, 3, 16, 9, 0), at(2026, 3, 16, 10, 0)),
            ("t1", at(2026, 3, 16, 10, 30), at(2026, 3, 16, 10, 40)),
        ]
    );
    assert_eq!(result.planned_minutes_for("t1"), 70);
    assert!(result.unplanned_task_ids.is_empty());
    assert!(result.is_fully_planned("t1"));
    assert_eq!(result.tasks_per_day.get(&day(2026, 3, 16)), Some(&2));
}

#[test]
fn higher_priority_list_wins_the_window() {
    let a = availability(
        "2026-03-16",
        "2026-03-16",
        vec![on_dates("s1", "09:00", "12:00", &["2026-03-16"])],
    );
    let result = plan(
        a,
        vec![list("B", 2), list("A", 1)],
        vec![
            task("b1", "B", TaskStatus::Pending, 120, 1),
            task("a1", "A", TaskStatus::Pending, 120, 1),
        ],
        at(2026, 3, 16, 8, 0),
    );

    assert_eq!(result.planned_minutes_for("a1"), 120);
    assert!(result.is_fully_planned("a1"));
    // B gets the remaining hour but cannot finish.
    assert_eq!(result.planned_minutes_for("b1"), 60);
    assert_eq!(result.unplanned_task_ids, vec!["b1".to_string()]);
}

#[test]
fn in_progress_tasks_go_before_any_pending_task() {
    let a = availability(
        "2026-03-16",
        "2026-03-16",
        vec![on_dates("s1", "09:00", "13:00", &["2026-03-16"])],
    );
    let result = plan(
        a,
        vec![list("A", 1), list("B", 2)],
        vec![
            task("a-pending", "A", TaskStatus::Pending, 60, 1),
            task("b-started", "B", TaskStatus::InProgress, 60, 5),
            task("a-started", "A", TaskStatus::InProgress, 60, 9),
            task("b-pending", "B", TaskStatus::Pending, 60, 1),
        ],
        at(2026, 3, 16, 8, 0),
    );

    let order: Vec<&str> = result.planned_blocks.iter().map(|b| b.task_id.as_str()).collect();
    assert_eq!(order, vec!["a-started", "b-started", "a-pending", "b-pending"]);
}

#[test]
fn tasks_follow_order_in_list() {
    let a = availability(
        "2026-03-16",
        "2026-03-16",
        vec![on_dates("s1", "09:00", "12:00", &["2026-03-16"])],
    );
    let result = plan(
        a,
        vec![list("A", 1)],
        vec![
            task("third", "A", TaskStatus::Pending, 30, 3),
            task("first", "A", TaskStatus::Pending, 30, 1),
            task("second", "A", TaskStatus::Pending, 30, 2),
        ],
        at(2026, 3, 16, 8, 0),
    );

    assert_eq!(
        spans(&result),
        vec![
            ("first", at(2026, 3, 16, 9, 0), at(2026, 3, 16, 9, 30)),
            ("second", at(2026, 3, 16, 9, 30), at(2026, 3, 16, 10, 0)),
            ("third", at(2026, 3, 16, 10, 0), at(2026, 3, 16, 10, 30)),
        ]
    );
}

#[test]
fn done_abandoned_and_foreign_tasks_are_ignored() {
    let a = availability(
        "2026-03-16",
        "2026-03-16",
        vec![on_dates("s1", "09:00", "12:00", &["2026-03-16"])],
    );
    let foreign = TodoList {
        id: "X".to_string(),
        availability_id: "other".to_string(),
        order_in_availability: 0,
    };
    let result = plan(
        a,
        vec![list("A", 1), foreign],
        vec![
            task("done", "A", TaskStatus::Done, 30, 1),
            task("dropped", "A", TaskStatus::Abandoned, 30, 2),
            task("elsewhere", "X", TaskStatus::Pending, 30, 1),
            task("orphan", "missing", TaskStatus::Pending, 30, 1),
            task("real", "A", TaskStatus::Pending, 30, 3),
        ],
        at(2026, 3, 16, 8, 0),
    );

    assert_eq!(spans(&result), vec![("real", at(2026, 3, 16, 9, 0), at(2026, 3, 16, 9, 30))]);
    assert!(result.unplanned_task_ids.is_empty());
}

#[test]
fn non_positive_durations_are_skipped() {
    let a = availability(
        "2026-03-16",
        "2026-03-16",
        vec![on_dates("s1", "09:00", "10:00", &["2026-03-16"])],
    );
    let result = plan(
        a,
        vec![list("A", 1)],
        vec![
            task("zero", "A", TaskStatus::Pending, 0, 1),
            task("negative", "A", TaskStatus::Pending, -5, 2),
            task("ok", "A", TaskStatus::Pending, 15, 3),
        ],
        at(2026, 3, 16, 8, 0),
    );

    assert_eq!(spans(&result), vec![("ok", at(2026, 3, 16, 9, 0), at(2026, 3, 16, 9, 15))]);
    assert!(result.unplanned_task_ids.is_empty());
}

// ── Clock handling ──────────────────────────────────────────────────────────

#[test]
fn past_capacity_is_not_used() {
    let a = availability(
        "2026-03-16",
        "2026-03-17",
        vec![on_dates("s1", "09:00", "10:00", &["2026-03-16", "2026-03-17"])],
    );
    let result = plan(
        a,
        vec![list("A", 1)],
        vec![task("t", "A", TaskStatus::Pending, 30, 1)],
        at(2026, 3, 16, 11, 0),
    );
    assert_eq!(spans(&result), vec![("t", at(2026, 3, 17, 9, 0), at(2026, 3, 17, 9, 30))]);
}

#[test]
fn now_inside_an_interval_clips_its_start() {
    let a = availability(
        "2026-03-16",
        "2026-03-16",
        vec![on_dates("s1", "09:00", "10:00", &["2026-03-16"])],
    );
    let now = Utc.with_ymd_and_hms(2026, 3, 16, 9, 20, 45).unwrap();
    let result = plan(
        a,
        vec![list("A", 1)],
        vec![task("t", "A", TaskStatus::Pending, 60, 1)],
        now,
    );
    // now is truncated to 09:20, leaving 40 minutes.
    assert_eq!(spans(&result), vec![("t", at(2026, 3, 16, 9, 20), at(2026, 3, 16, 10, 0))]);
    assert_eq!(result.unplanned_task_ids, vec!["t".to_string()]);
}

#[test]
fn everything_in_the_past_leaves_all_tasks_unplanned() {
    let a = availability(
        "2026-03-16",
        "2026-03-16",
        vec![on_dates("s1", "09:00", "10:00", &["2026-03-16"])],
    );
    let result = plan(
        a,
        vec![list("A", 1)],
        vec![
            task("t1", "A", TaskStatus::InProgress, 30, 1),
            task("t2", "A", TaskStatus::Pending, 30, 2),
        ],
        at(2026, 4, 1, 0, 0),
    );
    assert!(result.planned_blocks.is_empty());
    assert_eq!(result.unplanned_task_ids, vec!["t1".to_string(), "t2".to_string()]);
    assert!(result.tasks_per_day.is_empty());
}

#[test]
fn from_millis_matches_datetime() {
    let now = at(2026, 3, 16, 8, 0);
    assert_eq!(
        PlanOptions::from_millis(now.timestamp_millis()),
        Some(PlanOptions::at(now))
    );
}

// ── Output shape ────────────────────────────────────────────────────────────

#[test]
fn task_spanning_midnight_counts_on_both_days() {
    let a = availability(
        "2026-03-16",
        "2026-03-17",
        vec![on_dates("night", "23:00", "01:00", &["2026-03-16"])],
    );
    let result = plan(
        a,
        vec![list("A", 1)],
        vec![task("late", "A", TaskStatus::Pending, 90, 1)],
        at(2026, 3, 16, 8, 0),
    );

    // The merged interval 23:00-01:00 is continuous, so a single block covers it.
    assert_eq!(spans(&result), vec![("late", at(2026, 3, 16, 23, 0), at(2026, 3, 17, 0, 30))]);
    assert_eq!(result.tasks_per_day.get(&day(2026, 3, 16)), Some(&1));

    // With a gap at midnight the task splits into two day buckets.
    let gapped = availability(
        "2026-03-16",
        "2026-03-17",
        vec![
            on_dates("late", "23:00", "23:45", &["2026-03-16"]),
            on_dates("early", "00:15", "02:00", &["2026-03-17"]),
        ],
    );
    let result = plan(
        gapped,
        vec![list("A", 1)],
        vec![task("late", "A", TaskStatus::Pending, 90, 1)],
        at(2026, 3, 16, 8, 0),
    );
    assert_eq!(result.planned_blocks.len(), 2);
    assert_eq!(result.tasks_per_day.get(&day(2026, 3, 16)), Some(&1));
    assert_eq!(result.tasks_per_day.get(&day(2026, 3, 17)), Some(&1));
    assert_eq!(result.blocks_on(day(2026, 3, 17)).count(), 1);
}

#[test]
fn blocks_carry_list_and_availability_ids() {
    let a = availability(
        "2026-03-16",
        "2026-03-16",
        vec![on_dates("s1", "09:00", "10:00", &["2026-03-16"])],
    );
    let result = plan(
        a,
        vec![list("A", 1)],
        vec![task("t", "A", TaskStatus::Pending, 10, 1)],
        at(2026, 3, 16, 8, 0),
    );
    let block = &result.planned_blocks[0];
    assert_eq!(block.todo_list_id, "A");
    assert_eq!(block.availability_id, AVAIL);
    assert_eq!(block.duration_minutes, 10);
    assert!(block.scheduled_end > block.scheduled_start);
}

#[test]
fn empty_inputs_produce_empty_plan() {
    let a = availability("2026-03-16", "2026-03-16", vec![]);
    let result = plan(a, vec![], vec![], at(2026, 3, 16, 8, 0));
    assert_eq!(result, SchedulePlan::default());
}

#[test]
fn input_order_does_not_change_the_plan() {
    let segments = vec![
        on_dates("s1", "09:00", "10:00", &["2026-03-16"]),
        on_dates("s2", "11:00", "12:30", &["2026-03-16"]),
    ];
    let mut lists = vec![list("A", 1), list("B", 2), list("C", 2)];
    let mut tasks = vec![
        task("a1", "A", TaskStatus::Pending, 40, 1),
        task("b1", "B", TaskStatus::InProgress, 30, 1),
        task("c1", "C", TaskStatus::Pending, 50, 1),
        task("c0", "C", TaskStatus::Pending, 10, 1),
    ];
    let now = at(2026, 3, 16, 8, 0);

    let forward = plan(
        availability("2026-03-16", "2026-03-16", segments.clone()),
        lists.clone(),
        tasks.clone(),
        now,
    );
    lists.reverse();
    tasks.reverse();
    let backward = plan(
        availability("2026-03-16", "2026-03-16", segments.into_iter().rev().collect()),
        lists,
        tasks,
        now,
    );

    assert_eq!(forward, backward);
}
