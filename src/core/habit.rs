use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display palette cycled through when creating habits.
pub const COLORS: [&str; 15] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E9", "#F8B500", "#00CED1", "#FF69B4", "#32CD32", "#FF8C00",
];

/// A tracked habit: a monthly goal plus the day-of-month numbers it was
/// completed on. Days are unique; order is not significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub color: String,
    pub goal: u32,
    pub completed_days: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Habit {
    pub fn new(name: impl Into<String>, color: impl Into<String>, goal: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
            goal,
            completed_days: Vec::new(),
            category: None,
            notes: None,
            created_at: Some(chrono::Local::now().to_rfc3339()),
        }
    }

    /// Color assigned to the n-th habit in a collection.
    pub fn color_for(index: usize) -> &'static str {
        COLORS[index % COLORS.len()]
    }

    pub fn completed_on(&self, day: u32) -> bool {
        self.completed_days.contains(&day)
    }

    /// Toggle completion for a day: add if absent, remove if present.
    pub fn toggle_day(&mut self, day: u32) {
        if let Some(pos) = self.completed_days.iter().position(|d| *d == day) {
            self.completed_days.remove(pos);
        } else {
            self.completed_days.push(day);
        }
    }

    /// Completion percentage against the goal, rounded. Not clamped: a habit
    /// completed more often than its goal reports over 100%.
    pub fn completion_rate(&self) -> u32 {
        if self.goal == 0 {
            return 0;
        }
        (self.completed_days.len() as f64 / self.goal as f64 * 100.0).round() as u32
    }

    /// Consecutive completed days walking backward from `today` inclusive.
    /// The streak is anchored at today: a habit not completed today reports 0
    /// even when yesterday ended a long run.
    pub fn current_streak(&self, today: u32) -> u32 {
        let mut streak = 0;
        let mut day = today;
        while day >= 1 && self.completed_on(day) {
            streak += 1;
            if day == 1 {
                break;
            }
            day -= 1;
        }
        streak
    }

    /// Longest run of consecutive days anywhere in the completion record.
    pub fn longest_streak(&self) -> u32 {
        if self.completed_days.is_empty() {
            return 0;
        }
        let mut days = self.completed_days.clone();
        days.sort_unstable();
        days.dedup();

        let mut best = 1u32;
        let mut current = 1u32;
        for window in days.windows(2) {
            if window[1] - window[0] == 1 {
                current += 1;
            } else {
                best = best.max(current);
                current = 1;
            }
        }
        best.max(current)
    }
}

/// Starter collection shown before the user has tracked anything.
pub fn default_habits() -> Vec<Habit> {
    let seed: [(&str, &str, &str, u32, &[u32]); 13] = [
        ("1", "Drink 2L of Water", "#45B7D1", 31, &[1, 2, 3, 5, 7, 8, 10]),
        ("2", "Exercise or Move Your Body", "#F8B500", 23, &[1, 2, 3, 4, 5, 8, 9, 10]),
        ("3", "Read for 20 Minutes", "#FF8C00", 31, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]),
        ("4", "Eat 3+ Servings of Fruit/Veggies", "#96CEB4", 31, &[2, 4, 6, 8, 10]),
        ("5", "Sleep 7+ Hours", "#FFEAA7", 31, &[1, 2, 3, 5, 6, 7, 8, 9]),
        ("6", "Morning Stretch or Yoga", "#FF6B6B", 31, &[1, 3, 5, 7, 9]),
        ("7", "Floss & Brush Twice Daily", "#DDA0DD", 31, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]),
        ("8", "No Social Media for 1 Hour", "#BB8FCE", 23, &[1, 2, 5, 8]),
        ("9", "Write in Journal", "#F8B500", 9, &[1, 5, 9]),
        ("10", "Skincare Routine", "#4ECDC4", 31, &[1, 2, 3, 4, 5, 6, 7]),
        ("11", "No Phone After 9PM", "#FF69B4", 23, &[2, 4, 6]),
        ("12", "Make Your Bed", "#32CD32", 31, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]),
        ("13", "No Spend Day", "#00CED1", 15, &[1, 5, 10]),
    ];

    seed.iter()
        .map(|(id, name, color, goal, days)| Habit {
            id: (*id).to_string(),
            name: (*name).to_string(),
            color: (*color).to_string(),
            goal: *goal,
            completed_days: days.to_vec(),
            category: None,
            notes: None,
            created_at: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn habit_with_days(days: &[u32], goal: u32) -> Habit {
        Habit {
            id: "t".to_string(),
            name: "Test".to_string(),
            color: "#FF6B6B".to_string(),
            goal,
            completed_days: days.to_vec(),
            category: None,
            notes: None,
            created_at: None,
        }
    }

    #[test]
    fn completion_rate_rounds() {
        let h = habit_with_days(&[1, 2, 3], 9);
        assert_eq!(h.completion_rate(), 33);
    }

    #[test]
    fn completion_rate_zero_goal() {
        let h = habit_with_days(&[1, 2, 3], 0);
        assert_eq!(h.completion_rate(), 0);
    }

    #[test]
    fn completion_rate_can_exceed_hundred() {
        let h = habit_with_days(&[1, 2, 3, 4, 5], 4);
        assert_eq!(h.completion_rate(), 125);
    }

    #[test]
    fn toggle_day_adds_and_removes() {
        let mut h = habit_with_days(&[3], 31);
        h.toggle_day(5);
        assert!(h.completed_on(5));
        h.toggle_day(5);
        assert!(!h.completed_on(5));
        assert_eq!(h.completed_days, vec![3]);
    }

    #[test]
    fn streak_counts_back_from_today() {
        let h = habit_with_days(&[8, 9, 10], 31);
        assert_eq!(h.current_streak(10), 3);
    }

    #[test]
    fn streak_is_one_for_today_only() {
        let h = habit_with_days(&[10], 31);
        assert_eq!(h.current_streak(10), 1);
    }

    #[test]
    fn streak_is_zero_when_today_incomplete() {
        let h = habit_with_days(&[9], 31);
        assert_eq!(h.current_streak(10), 0);
    }

    #[test]
    fn streak_stops_at_day_one() {
        let h = habit_with_days(&[1, 2], 31);
        assert_eq!(h.current_streak(2), 2);
    }

    #[test]
    fn longest_streak_empty() {
        let h = habit_with_days(&[], 31);
        assert_eq!(h.longest_streak(), 0);
    }

    #[test]
    fn longest_streak_single_day() {
        let h = habit_with_days(&[5], 31);
        assert_eq!(h.longest_streak(), 1);
    }

    #[test]
    fn longest_streak_finds_best_run() {
        let h = habit_with_days(&[1, 2, 3, 7, 8], 31);
        assert_eq!(h.longest_streak(), 3);
    }

    #[test]
    fn longest_streak_ignores_order() {
        let h = habit_with_days(&[8, 1, 7, 3, 2], 31);
        assert_eq!(h.longest_streak(), 3);
    }

    #[test]
    fn default_habits_match_seed() {
        let habits = default_habits();
        assert_eq!(habits.len(), 13);
        assert_eq!(habits[0].name, "Drink 2L of Water");
        assert_eq!(habits[1].goal, 23);
        assert_eq!(habits[2].completed_days.len(), 10);
    }

    #[test]
    fn serde_roundtrip_uses_camel_case() {
        let mut h = habit_with_days(&[1, 2], 31);
        h.category = Some("Health".to_string());
        let json = serde_json::to_string(&h).unwrap();
        assert!(json.contains("\"completedDays\""));
        let back: Habit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }
}
