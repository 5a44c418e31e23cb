//! Course and lesson vocabulary plus authoring validation.
//!
//! String constants must match the CHECK constraints in
//! `20260301000003_create_courses_tables.sql`.

use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const DIFFICULTY_BEGINNER: &str = "beginner";
pub const DIFFICULTY_INTERMEDIATE: &str = "intermediate";
pub const DIFFICULTY_ADVANCED: &str = "advanced";

/// All valid difficulty values, in ascending order.
pub const VALID_DIFFICULTIES: &[&str] = &[
    DIFFICULTY_BEGINNER,
    DIFFICULTY_INTERMEDIATE,
    DIFFICULTY_ADVANCED,
];

pub const LESSON_VIDEO: &str = "video";
pub const LESSON_INTERACTIVE: &str = "interactive";
pub const LESSON_GAME: &str = "game";
pub const LESSON_QUIZ: &str = "quiz";
pub const LESSON_READING: &str = "reading";
pub const LESSON_PROJECT: &str = "project";

/// All valid lesson types.
pub const VALID_LESSON_TYPES: &[&str] = &[
    LESSON_VIDEO,
    LESSON_INTERACTIVE,
    LESSON_GAME,
    LESSON_QUIZ,
    LESSON_READING,
    LESSON_PROJECT,
];

/// Maximum slug length.
pub const MAX_SLUG_LENGTH: usize = 120;

/// Scores are percentages.
pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

static SLUG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is a valid regex")
});

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that a difficulty string is one of the known tiers.
pub fn validate_difficulty(difficulty: &str) -> Result<(), String> {
    if VALID_DIFFICULTIES.contains(&difficulty) {
        Ok(())
    } else {
        Err(format!(
            "Invalid difficulty '{difficulty}'. Must be one of: {}",
            VALID_DIFFICULTIES.join(", ")
        ))
    }
}

/// Validate that a lesson type string is known.
pub fn validate_lesson_type(lesson_type: &str) -> Result<(), String> {
    if VALID_LESSON_TYPES.contains(&lesson_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid lesson type '{lesson_type}'. Must be one of: {}",
            VALID_LESSON_TYPES.join(", ")
        ))
    }
}

/// Validate a course slug: lowercase alphanumerics separated by single dashes.
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH {
        return Err(format!(
            "Slug must be between 1 and {MAX_SLUG_LENGTH} characters"
        ));
    }
    if !SLUG_PATTERN.is_match(slug) {
        return Err(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits and single dashes"
        ));
    }
    Ok(())
}

/// Validate a score (submitted or required) is a percentage.
pub fn validate_score(score: i32) -> Result<(), String> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(format!(
            "Score {score} is out of range ({MIN_SCORE}-{MAX_SCORE})"
        ))
    }
}

/// Derive a slug from a title ("Fractions & Decimals!" -> "fractions-decimals").
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug.truncate(MAX_SLUG_LENGTH);
    slug.trim_end_matches('-').to_string()
}
