//! XP levels, daily streaks and achievement rules.
//!
//! Everything here is a pure function of ledger figures so the same rules
//! apply whether a value is computed at award time or on a dashboard read.

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

/// Cumulative XP required for levels 1..=10.
const STANDARD_THRESHOLDS: &[i64] = &[0, 100, 250, 450, 700, 1000, 1350, 1750, 2200, 2700];

/// XP per level once the explicit table is exhausted.
const STANDARD_OVERFLOW_STEP: i64 = 600;

/// Cumulative XP threshold table.
///
/// `thresholds[n]` is the XP needed to reach level `n + 1`. Past the end of
/// the table every further level costs `overflow_step` more XP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    thresholds: Vec<i64>,
    overflow_step: i64,
}

/// Position of a user on the level curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: i32,
    pub total_xp: i64,
    /// XP at which the current level started.
    pub current_level_xp: i64,
    /// XP at which the next level starts.
    pub next_level_xp: i64,
    pub xp_to_next_level: i64,
}

/// One row of the published level table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelThreshold {
    pub level: i32,
    pub xp_required: i64,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            thresholds: STANDARD_THRESHOLDS.to_vec(),
            overflow_step: STANDARD_OVERFLOW_STEP,
        }
    }
}

impl LevelTable {
    /// Build a custom table. Thresholds must start at 0 and strictly increase.
    pub fn new(thresholds: Vec<i64>, overflow_step: i64) -> Result<Self, String> {
        if thresholds.first() != Some(&0) {
            return Err("Level table must start at 0 XP".to_string());
        }
        if thresholds.windows(2).any(|w| w[1] <= w[0]) {
            return Err("Level thresholds must strictly increase".to_string());
        }
        if overflow_step <= 0 {
            return Err("Overflow step must be positive".to_string());
        }
        Ok(Self {
            thresholds,
            overflow_step,
        })
    }

    /// Cumulative XP needed to reach `level` (levels start at 1).
    pub fn threshold(&self, level: i32) -> i64 {
        let idx = (level.max(1) - 1) as usize;
        match self.thresholds.get(idx) {
            Some(&xp) => xp,
            None => {
                let last = *self.thresholds.last().unwrap_or(&0);
                let beyond = (idx + 1 - self.thresholds.len()) as i64;
                last + beyond * self.overflow_step
            }
        }
    }

    /// Level reached with `total_xp` cumulative XP. Negative totals are level 1.
    pub fn level_for_xp(&self, total_xp: i64) -> i32 {
        let within = self
            .thresholds
            .iter()
            .take_while(|&&t| total_xp >= t)
            .count()
            .max(1);
        if within < self.thresholds.len() {
            return within as i32;
        }
        let last = *self.thresholds.last().unwrap_or(&0);
        let extra = (total_xp - last) / self.overflow_step;
        self.thresholds.len() as i32 + extra as i32
    }

    /// Full position on the curve for a total.
    pub fn progress(&self, total_xp: i64) -> LevelProgress {
        let level = self.level_for_xp(total_xp);
        let current_level_xp = self.threshold(level);
        let next_level_xp = self.threshold(level + 1);
        LevelProgress {
            level,
            total_xp,
            current_level_xp,
            next_level_xp,
            xp_to_next_level: (next_level_xp - total_xp).max(0),
        }
    }

    /// The first `count` levels with their thresholds.
    pub fn listing(&self, count: i32) -> Vec<LevelThreshold> {
        (1..=count)
            .map(|level| LevelThreshold {
                level,
                xp_required: self.threshold(level),
            })
            .collect()
    }
}

/// Result of crediting XP to a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpAward {
    pub previous_level: i32,
    pub new_level: i32,
    pub total_xp: i64,
}

impl XpAward {
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.previous_level
    }
}

/// Compute the level change caused by moving from `previous_total` to
/// `new_total` XP.
pub fn award(table: &LevelTable, previous_total: i64, new_total: i64) -> XpAward {
    XpAward {
        previous_level: table.level_for_xp(previous_total),
        new_level: table.level_for_xp(new_total),
        total_xp: new_total,
    }
}

// ---------------------------------------------------------------------------
// Streaks
// ---------------------------------------------------------------------------

/// Streak counters after recording activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub current: i32,
    pub longest: i32,
    pub last_activity: NaiveDate,
}

/// Record qualifying activity on `today`.
///
/// Same-day activity leaves the counter alone, activity on the day after
/// the last one extends it, anything later restarts it at 1.
pub fn record_activity(
    last_activity: Option<NaiveDate>,
    current: i32,
    longest: i32,
    today: NaiveDate,
) -> StreakUpdate {
    let current = match last_activity {
        Some(last) if last == today => current.max(1),
        Some(last) if last.succ_opt() == Some(today) => current + 1,
        _ => 1,
    };
    StreakUpdate {
        current,
        longest: longest.max(current),
        last_activity: today,
    }
}

/// Streak as seen on `today`: a streak whose last activity is older than
/// yesterday has lapsed and reads as 0.
pub fn effective_streak(last_activity: Option<NaiveDate>, current: i32, today: NaiveDate) -> i32 {
    match last_activity {
        Some(last) if last == today || last.succ_opt() == Some(today) => current,
        _ => 0,
    }
}

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

/// Condition under which an achievement unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementRule {
    LessonsCompleted(i32),
    CoursesCompleted(i32),
    ReachedLevel(i32),
    PerfectScore,
    Streak(i32),
}

/// A catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct Achievement {
    pub code: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub rule: AchievementRule,
}

/// Every achievement the platform awards. Codes are persisted in
/// `user_achievements.achievement_code` and must never be renamed.
pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        code: "first-lesson",
        title: "First Steps",
        description: "Complete your first lesson",
        rule: AchievementRule::LessonsCompleted(1),
    },
    Achievement {
        code: "ten-lessons",
        title: "Getting Serious",
        description: "Complete 10 lessons",
        rule: AchievementRule::LessonsCompleted(10),
    },
    Achievement {
        code: "first-adventure",
        title: "Adventurer",
        description: "Complete your first course",
        rule: AchievementRule::CoursesCompleted(1),
    },
    Achievement {
        code: "five-adventures",
        title: "Seasoned Explorer",
        description: "Complete 5 courses",
        rule: AchievementRule::CoursesCompleted(5),
    },
    Achievement {
        code: "level-5",
        title: "Rising Star",
        description: "Reach level 5",
        rule: AchievementRule::ReachedLevel(5),
    },
    Achievement {
        code: "level-10",
        title: "Superstar",
        description: "Reach level 10",
        rule: AchievementRule::ReachedLevel(10),
    },
    Achievement {
        code: "perfect-score",
        title: "Flawless",
        description: "Score 100 on a lesson",
        rule: AchievementRule::PerfectScore,
    },
    Achievement {
        code: "week-streak",
        title: "On Fire",
        description: "Learn 7 days in a row",
        rule: AchievementRule::Streak(7),
    },
];

/// Ledger figures the achievement rules look at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub level: i32,
    pub lessons_completed: i32,
    pub courses_completed: i32,
    pub perfect_scores: i32,
    pub current_streak: i32,
}

impl AchievementRule {
    pub fn is_met(&self, snapshot: &LedgerSnapshot) -> bool {
        match *self {
            Self::LessonsCompleted(n) => snapshot.lessons_completed >= n,
            Self::CoursesCompleted(n) => snapshot.courses_completed >= n,
            Self::ReachedLevel(n) => snapshot.level >= n,
            Self::PerfectScore => snapshot.perfect_scores > 0,
            Self::Streak(n) => snapshot.current_streak >= n,
        }
    }
}

/// Achievements whose rule is met and that the user does not hold yet.
pub fn newly_earned(
    snapshot: &LedgerSnapshot,
    already_unlocked: &[String],
) -> Vec<&'static Achievement> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| a.rule.is_met(snapshot))
        .filter(|a| !already_unlocked.iter().any(|code| code == a.code))
        .collect()
}

/// Look up a catalog entry by code.
pub fn find_achievement(code: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // -- Levels -------------------------------------------------------------

    #[test]
    fn level_boundaries_follow_table() {
        let table = LevelTable::default();
        assert_eq!(table.level_for_xp(0), 1);
        assert_eq!(table.level_for_xp(99), 1);
        assert_eq!(table.level_for_xp(100), 2);
        assert_eq!(table.level_for_xp(249), 2);
        assert_eq!(table.level_for_xp(250), 3);
        assert_eq!(table.level_for_xp(2699), 9);
        assert_eq!(table.level_for_xp(2700), 10);
    }

    #[test]
    fn levels_continue_past_the_table() {
        let table = LevelTable::default();
        assert_eq!(table.level_for_xp(3299), 10);
        assert_eq!(table.level_for_xp(3300), 11);
        assert_eq!(table.level_for_xp(3900), 12);
        assert_eq!(table.threshold(12), 3900);
    }

    #[test]
    fn negative_xp_is_level_one() {
        assert_eq!(LevelTable::default().level_for_xp(-50), 1);
    }

    #[test]
    fn level_function_is_monotonic() {
        let table = LevelTable::default();
        let mut previous = table.level_for_xp(0);
        for xp in (0..10_000).step_by(7) {
            let level = table.level_for_xp(xp);
            assert!(level >= previous, "level dropped at {xp} xp");
            previous = level;
        }
    }

    #[test]
    fn threshold_and_level_agree() {
        let table = LevelTable::default();
        for level in 1..=20 {
            assert_eq!(table.level_for_xp(table.threshold(level)), level);
        }
    }

    #[test]
    fn progress_reports_distance_to_next_level() {
        let progress = LevelTable::default().progress(120);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.current_level_xp, 100);
        assert_eq!(progress.next_level_xp, 250);
        assert_eq!(progress.xp_to_next_level, 130);
    }

    #[test]
    fn custom_table_must_be_well_formed() {
        assert!(LevelTable::new(vec![0, 10, 30], 50).is_ok());
        assert!(LevelTable::new(vec![5, 10], 50).is_err());
        assert!(LevelTable::new(vec![0, 10, 10], 50).is_err());
        assert!(LevelTable::new(vec![0, 10], 0).is_err());
    }

    #[test]
    fn award_detects_level_up() {
        let table = LevelTable::default();
        let up = award(&table, 90, 110);
        assert!(up.leveled_up());
        assert_eq!(up.previous_level, 1);
        assert_eq!(up.new_level, 2);

        let flat = award(&table, 110, 120);
        assert!(!flat.leveled_up());
    }

    #[test]
    fn listing_starts_at_level_one() {
        let listing = LevelTable::default().listing(3);
        assert_eq!(listing.len(), 3);
        assert_eq!(listing[0].xp_required, 0);
        assert_eq!(listing[2].level, 3);
        assert_eq!(listing[2].xp_required, 250);
    }

    // -- Streaks ------------------------------------------------------------

    #[test]
    fn first_activity_starts_streak() {
        let update = record_activity(None, 0, 0, date(2026, 3, 1));
        assert_eq!(update.current, 1);
        assert_eq!(update.longest, 1);
    }

    #[test]
    fn same_day_activity_counts_once() {
        let today = date(2026, 3, 2);
        let update = record_activity(Some(today), 3, 5, today);
        assert_eq!(update.current, 3);
        assert_eq!(update.longest, 5);
    }

    #[test]
    fn consecutive_day_extends_streak() {
        let update = record_activity(Some(date(2026, 2, 28)), 4, 4, date(2026, 3, 1));
        assert_eq!(update.current, 5);
        assert_eq!(update.longest, 5);
    }

    #[test]
    fn gap_resets_streak_but_keeps_longest() {
        let update = record_activity(Some(date(2026, 3, 1)), 6, 6, date(2026, 3, 3));
        assert_eq!(update.current, 1);
        assert_eq!(update.longest, 6);
    }

    #[test]
    fn lapsed_streak_reads_as_zero() {
        let today = date(2026, 3, 10);
        assert_eq!(effective_streak(Some(date(2026, 3, 10)), 4, today), 4);
        assert_eq!(effective_streak(Some(date(2026, 3, 9)), 4, today), 4);
        assert_eq!(effective_streak(Some(date(2026, 3, 8)), 4, today), 0);
        assert_eq!(effective_streak(None, 0, today), 0);
    }

    // -- Achievements -------------------------------------------------------

    #[test]
    fn catalog_codes_are_unique() {
        for (i, a) in ACHIEVEMENTS.iter().enumerate() {
            assert!(
                ACHIEVEMENTS[i + 1..].iter().all(|b| b.code != a.code),
                "duplicate code {}",
                a.code
            );
        }
    }

    #[test]
    fn first_lesson_unlocks_first_steps() {
        let snapshot = LedgerSnapshot {
            level: 1,
            lessons_completed: 1,
            ..Default::default()
        };
        let earned = newly_earned(&snapshot, &[]);
        let codes: Vec<_> = earned.iter().map(|a| a.code).collect();
        assert_eq!(codes, vec!["first-lesson"]);
    }

    #[test]
    fn held_achievements_are_not_granted_again() {
        let snapshot = LedgerSnapshot {
            level: 5,
            lessons_completed: 12,
            courses_completed: 1,
            perfect_scores: 1,
            current_streak: 7,
        };
        let held = vec!["first-lesson".to_string(), "level-5".to_string()];
        let codes: Vec<_> = newly_earned(&snapshot, &held)
            .iter()
            .map(|a| a.code)
            .collect();
        assert!(!codes.contains(&"first-lesson"));
        assert!(!codes.contains(&"level-5"));
        assert!(codes.contains(&"ten-lessons"));
        assert!(codes.contains(&"first-adventure"));
        assert!(codes.contains(&"perfect-score"));
        assert!(codes.contains(&"week-streak"));
    }

    #[test]
    fn find_achievement_by_code() {
        assert_eq!(find_achievement("level-10").unwrap().title, "Superstar");
        assert!(find_achievement("nope").is_none());
    }
}
