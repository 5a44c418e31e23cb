//! Course catalog query normalisation.
//!
//! Raw query-string values are turned into a whitelisted sort column,
//! direction and clamped page window before any SQL is built.

use serde::Serialize;

use crate::course;

/// Default page size for course listings.
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Maximum page size for course listings.
pub const MAX_PAGE_SIZE: i64 = 50;

/// Maximum search term length.
pub const MAX_SEARCH_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    CreatedAt,
    Difficulty,
    TotalXp,
    LessonCount,
}

impl SortField {
    /// Parse the `sortBy` query value. `None` means the default ordering.
    pub fn parse(value: Option<&str>) -> Result<Self, String> {
        match value {
            None | Some("createdAt") => Ok(Self::CreatedAt),
            Some("title") => Ok(Self::Title),
            Some("difficulty") => Ok(Self::Difficulty),
            Some("totalXp") => Ok(Self::TotalXp),
            Some("lessonCount") => Ok(Self::LessonCount),
            Some(other) => Err(format!(
                "Invalid sortBy '{other}'. Must be one of: title, createdAt, difficulty, totalXp, lessonCount"
            )),
        }
    }

    /// SQL expression to order by. Only ever one of these fixed strings.
    pub fn sql_expr(&self) -> &'static str {
        match self {
            Self::Title => "c.title",
            Self::CreatedAt => "c.created_at",
            Self::Difficulty => {
                "CASE c.difficulty WHEN 'beginner' THEN 1 WHEN 'intermediate' THEN 2 ELSE 3 END"
            }
            Self::TotalXp => "c.total_xp",
            Self::LessonCount => "lesson_count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse the `sortDirection` query value (default descending).
    pub fn parse(value: Option<&str>) -> Result<Self, String> {
        match value.map(str::to_ascii_lowercase).as_deref() {
            None | Some("desc") => Ok(Self::Desc),
            Some("asc") => Ok(Self::Asc),
            Some(other) => Err(format!(
                "Invalid sortDirection '{other}'. Must be asc or desc"
            )),
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a 1-based page number.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// A resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub page_size: i64,
}

impl PageWindow {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: clamp_page(page),
            page_size: clamp_limit(page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Number of pages needed for `total` items.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

/// Paginated list envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, total: i64, window: PageWindow) -> Self {
        Self {
            items,
            total,
            page: window.page,
            page_size: window.page_size,
            total_pages: total_pages(total, window.page_size),
        }
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Validated catalog filters.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub subject: Option<String>,
    pub difficulty: Option<String>,
    pub is_premium: Option<bool>,
    /// `ILIKE` pattern, already wrapped in `%` and escaped.
    pub search_pattern: Option<String>,
}

impl CourseFilter {
    pub fn new(
        subject: Option<&str>,
        difficulty: Option<&str>,
        is_premium: Option<bool>,
        search: Option<&str>,
    ) -> Result<Self, String> {
        if let Some(d) = difficulty {
            course::validate_difficulty(d)?;
        }
        let search_pattern = match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) if term.len() > MAX_SEARCH_LENGTH => {
                return Err(format!(
                    "Search term exceeds maximum length of {MAX_SEARCH_LENGTH}"
                ))
            }
            Some(term) => Some(format!("%{}%", escape_like(term))),
            None => None,
        };
        Ok(Self {
            subject: subject
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            difficulty: difficulty.map(str::to_string),
            is_premium,
            search_pattern,
        })
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
