//! Gamification ledger: lifetime XP, level, streak and achievements.

use chrono::{NaiveDate, Utc};
use learnloop_core::gamification::{
    award, effective_streak, find_achievement, newly_earned, record_activity, Achievement,
    LevelProgress, LevelTable, XpAward, ACHIEVEMENTS,
};
use learnloop_core::types::{DbId, Timestamp};
use learnloop_db::models::user_stats::{UpdateUserStats, UserStats};
use learnloop_db::repositories::{AchievementRepo, UserStatsRepo};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

/// What a passing lesson attempt contributes to the ledger.
#[derive(Debug, Clone, Copy)]
pub struct LedgerCredit {
    /// XP to add. Zero for repeat passes.
    pub xp: i32,
    /// The lesson was passed for the first time.
    pub first_pass: bool,
    /// The attempt scored 100.
    pub perfect_score: bool,
    /// The attempt moved its enrollment to COMPLETED.
    pub course_completed: bool,
    /// UTC calendar day of the activity.
    pub today: NaiveDate,
}

/// Ledger state after a credit.
#[derive(Debug)]
pub struct LedgerOutcome {
    pub award: XpAward,
    pub stats: UserStats,
    pub unlocked: Vec<&'static Achievement>,
}

/// Apply a credit to `user_id`'s ledger.
///
/// Must run inside the caller's transaction: the ledger row is locked for
/// the duration so concurrent completions for the same user apply one
/// after the other.
pub async fn credit(
    conn: &mut PgConnection,
    levels: &LevelTable,
    user_id: DbId,
    entry: LedgerCredit,
) -> Result<LedgerOutcome, sqlx::Error> {
    let current = UserStatsRepo::lock_or_create(&mut *conn, user_id).await?;

    let new_total = current.total_xp + i64::from(entry.xp);
    let xp_award = award(levels, current.total_xp, new_total);
    let streak = record_activity(
        current.last_activity_date,
        current.current_streak,
        current.longest_streak,
        entry.today,
    );

    let update = UpdateUserStats {
        total_xp: new_total,
        level: xp_award.new_level,
        current_streak: streak.current,
        longest_streak: streak.longest,
        last_activity_date: Some(streak.last_activity),
        lessons_completed: current.lessons_completed + i32::from(entry.first_pass),
        courses_completed: current.courses_completed + i32::from(entry.course_completed),
        perfect_scores: current.perfect_scores + i32::from(entry.perfect_score),
    };
    let stats = UserStatsRepo::save(&mut *conn, user_id, &update).await?;

    if xp_award.leveled_up() {
        tracing::info!(
            user_id,
            previous_level = xp_award.previous_level,
            new_level = xp_award.new_level,
            total_xp = new_total,
            "Level up",
        );
    }

    let held = AchievementRepo::codes_for_user(&mut *conn, user_id).await?;
    let mut unlocked = Vec::new();
    for achievement in newly_earned(&stats.snapshot(), &held) {
        if AchievementRepo::grant(&mut *conn, user_id, achievement.code)
            .await?
            .is_some()
        {
            tracing::info!(user_id, code = achievement.code, "Achievement unlocked");
            unlocked.push(achievement);
        }
    }

    Ok(LedgerOutcome {
        award: xp_award,
        stats,
        unlocked,
    })
}

// ---------------------------------------------------------------------------
// Read models
// ---------------------------------------------------------------------------

/// Streak counters as displayed. A lapsed streak reads as 0.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakView {
    pub current: i32,
    pub longest: i32,
    pub last_activity_date: Option<NaiveDate>,
}

/// Ledger figures for `/users/stats` and dashboards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
    #[serde(flatten)]
    pub level: LevelProgress,
    pub lessons_completed: i32,
    pub courses_completed: i32,
    pub perfect_scores: i32,
    pub streak: StreakView,
}

/// An achievement catalog entry from one user's point of view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementView {
    pub code: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
    pub unlocked_at: Option<Timestamp>,
}

impl AchievementView {
    fn new(achievement: &'static Achievement, unlocked_at: Option<Timestamp>) -> Self {
        Self {
            code: achievement.code,
            title: achievement.title,
            description: achievement.description,
            unlocked: unlocked_at.is_some(),
            unlocked_at,
        }
    }

    /// View of an achievement unlocked just now.
    pub fn unlocked_now(achievement: &'static Achievement) -> Self {
        Self::new(achievement, Some(Utc::now()))
    }
}

/// Current ledger figures for a user. Users without a ledger row yet read
/// as a fresh level-1 ledger.
pub async fn stats_view(
    pool: &PgPool,
    levels: &LevelTable,
    user_id: DbId,
) -> Result<StatsView, sqlx::Error> {
    let today = Utc::now().date_naive();
    let view = match UserStatsRepo::find_for_user(pool, user_id).await? {
        Some(stats) => StatsView {
            level: levels.progress(stats.total_xp),
            lessons_completed: stats.lessons_completed,
            courses_completed: stats.courses_completed,
            perfect_scores: stats.perfect_scores,
            streak: StreakView {
                current: effective_streak(stats.last_activity_date, stats.current_streak, today),
                longest: stats.longest_streak,
                last_activity_date: stats.last_activity_date,
            },
        },
        None => StatsView {
            level: levels.progress(0),
            lessons_completed: 0,
            courses_completed: 0,
            perfect_scores: 0,
            streak: StreakView {
                current: 0,
                longest: 0,
                last_activity_date: None,
            },
        },
    };
    Ok(view)
}

/// The whole achievement catalog with the user's unlock state.
pub async fn achievement_catalog(
    pool: &PgPool,
    user_id: DbId,
) -> Result<Vec<AchievementView>, sqlx::Error> {
    let unlocked = AchievementRepo::list_for_user(pool, user_id).await?;
    Ok(ACHIEVEMENTS
        .iter()
        .map(|a| {
            let unlocked_at = unlocked
                .iter()
                .find(|u| u.achievement_code == a.code)
                .map(|u| u.unlocked_at);
            AchievementView::new(a, unlocked_at)
        })
        .collect())
}

/// The user's most recent unlocks, newest first.
pub async fn recent_achievements(
    pool: &PgPool,
    user_id: DbId,
    limit: usize,
) -> Result<Vec<AchievementView>, sqlx::Error> {
    let unlocked = AchievementRepo::list_for_user(pool, user_id).await?;
    Ok(unlocked
        .iter()
        .filter_map(|u| find_achievement(&u.achievement_code).map(|a| (a, u.unlocked_at)))
        .take(limit)
        .map(|(a, at)| AchievementView::new(a, Some(at)))
        .collect())
}
