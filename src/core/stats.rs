use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::habit::Habit;

/// A completed/total pair with its rounded percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}

impl Progress {
    pub fn new(completed: u32, total: u32) -> Self {
        let percentage = if total > 0 {
            (completed as f64 / total as f64 * 100.0).round() as u32
        } else {
            0
        };
        Self {
            completed,
            total,
            percentage,
        }
    }
}

/// Per-category accumulation of goals and completions.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub category: String,
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}

/// A habit reduced to its ranking value (completion rate or streak).
#[derive(Debug, Clone, PartialEq)]
pub struct RankedHabit {
    pub id: String,
    pub name: String,
    pub color: String,
    pub value: u32,
}

/// Per-habit record fed to the motivation prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitPattern {
    pub name: String,
    pub completion_rate: u32,
    pub streak: u32,
    pub was_completed_last_week: bool,
    pub is_completed_today: bool,
    pub skipped_today: bool,
    pub skipped_last_week_same_day: bool,
}

/// How many habits are done today, out of all tracked habits.
pub fn todays_progress(habits: &[Habit], today: u32) -> Progress {
    let completed = habits.iter().filter(|h| h.completed_on(today)).count() as u32;
    Progress::new(completed, habits.len() as u32)
}

/// Completions inside the current 7-aligned window, out of one slot per habit
/// per day. The window closes on days that are 0 mod 7, clipped to the month;
/// this is a fixed convention, not a calendar week.
pub fn weekly_stats(habits: &[Habit], today: u32, days_in_month: u32) -> Progress {
    let rem = today % 7;
    let offset = if rem == 0 { 7 } else { rem };
    let week_start = (today + 1).saturating_sub(offset).max(1);
    let week_end = (week_start + 6).min(days_in_month);

    let mut completed = 0;
    let mut total = 0;
    for habit in habits {
        for day in week_start..=week_end {
            total += 1;
            if habit.completed_on(day) {
                completed += 1;
            }
        }
    }
    Progress::new(completed, total)
}

/// Total completions against the summed monthly goals.
pub fn monthly_stats(habits: &[Habit]) -> Progress {
    let mut completed = 0;
    let mut total = 0;
    for habit in habits {
        total += habit.goal;
        completed += habit.completed_days.len() as u32;
    }
    Progress::new(completed, total)
}

/// Days on which every tracked habit was completed. An empty habit list
/// reports 0, not the whole month.
pub fn perfect_days(habits: &[Habit], days_in_month: u32) -> u32 {
    if habits.is_empty() {
        return 0;
    }
    (1..=days_in_month)
        .filter(|day| habits.iter().all(|h| h.completed_on(*day)))
        .count() as u32
}

/// Group habits by category, with an explicit "Other" bucket for habits that
/// have none. Groups appear in first-seen order.
pub fn category_rollup(habits: &[Habit]) -> Vec<CategoryStats> {
    let mut groups: Vec<CategoryStats> = Vec::new();
    for habit in habits {
        let label = habit.category.as_deref().unwrap_or("Other");
        let idx = match groups.iter().position(|g| g.category == label) {
            Some(idx) => idx,
            None => {
                groups.push(CategoryStats {
                    category: label.to_string(),
                    completed: 0,
                    total: 0,
                    percentage: 0,
                });
                groups.len() - 1
            }
        };
        groups[idx].total += habit.goal;
        groups[idx].completed += habit.completed_days.len() as u32;
    }
    for group in &mut groups {
        group.percentage = Progress::new(group.completed, group.total).percentage;
    }
    groups
}

/// Top `n` habits by completion rate, descending. Ties keep their original
/// order (the sort is stable).
pub fn most_consistent(habits: &[Habit], n: usize) -> Vec<RankedHabit> {
    let mut ranked: Vec<RankedHabit> = habits
        .iter()
        .map(|h| RankedHabit {
            id: h.id.clone(),
            name: h.name.clone(),
            color: h.color.clone(),
            value: h.completion_rate(),
        })
        .collect();
    ranked.sort_by(|a, b| b.value.cmp(&a.value));
    ranked.truncate(n);
    ranked
}

/// Top `n` habits by current streak, descending. Habits not completed today
/// carry streak 0, which keeps stale habits off the board.
pub fn streak_leaders(habits: &[Habit], today: u32, n: usize) -> Vec<RankedHabit> {
    let mut ranked: Vec<RankedHabit> = habits
        .iter()
        .map(|h| RankedHabit {
            id: h.id.clone(),
            name: h.name.clone(),
            color: h.color.clone(),
            value: h.current_streak(today),
        })
        .collect();
    ranked.sort_by(|a, b| b.value.cmp(&a.value));
    ranked.truncate(n);
    ranked
}

/// Names of habits not completed today.
pub fn skipped_today(habits: &[Habit], today: u32) -> Vec<String> {
    habits
        .iter()
        .filter(|h| !h.completed_on(today))
        .map(|h| h.name.clone())
        .collect()
}

/// Build the per-habit pattern records the motivation prompt embeds.
pub fn habit_patterns(habits: &[Habit], today: u32) -> Vec<HabitPattern> {
    habits
        .iter()
        .map(|h| {
            let is_completed_today = h.completed_on(today);
            let was_completed_last_week = today
                .checked_sub(7)
                .is_some_and(|day| day >= 1 && h.completed_on(day));
            HabitPattern {
                name: h.name.clone(),
                completion_rate: h.completion_rate(),
                streak: h.current_streak(today),
                was_completed_last_week,
                is_completed_today,
                skipped_today: !is_completed_today,
                skipped_last_week_same_day: !was_completed_last_week && !is_completed_today,
            }
        })
        .collect()
}

/// Local stand-in when the remote generator is unreachable.
pub fn fallback_motivation(skipped: usize) -> String {
    if skipped == 0 {
        "Amazing progress today! You're building momentum. Keep up the great work! 🌟".to_string()
    } else {
        format!(
            "You have {} habit(s) to complete today. Small steps lead to big changes—you've got this! 💪",
            skipped
        )
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(
        if month == 12 { year + 1 } else { year },
        if month == 12 { 1 } else { month + 1 },
        1,
    )
    .unwrap()
    .pred_opt()
    .unwrap()
    .day()
}
