//! Repository for the `courses` and `course_prerequisites` tables.

use learnloop_core::catalog::{CourseFilter, PageWindow, SortDirection, SortField};
use learnloop_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{
    Course, CourseListItem, CourseRef, CreateCourse, PrerequisiteProgress,
};

/// Column list for `courses` queries.
const COLUMNS: &str = "id, title, slug, description, subject, difficulty, is_premium, \
                       is_published, published_at, total_xp, created_by, created_at, updated_at";

/// Same columns qualified with the `c` alias for joined queries.
const C_COLUMNS: &str = "c.id, c.title, c.slug, c.description, c.subject, c.difficulty, \
                         c.is_premium, c.is_published, c.published_at, c.total_xp, c.created_by, \
                         c.created_at, c.updated_at";

/// Catalog filter predicate. Every filter is optional; `NULL` disables it.
const CATALOG_WHERE: &str = "c.is_published = TRUE \
     AND ($1::TEXT IS NULL OR c.subject = $1) \
     AND ($2::TEXT IS NULL OR c.difficulty = $2) \
     AND ($3::BOOLEAN IS NULL OR c.is_premium = $3) \
     AND ($4::TEXT IS NULL OR c.title ILIKE $4 OR c.description ILIKE $4)";

/// Provides CRUD and catalog queries for courses.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a draft course and its prerequisite links in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCourse,
        prerequisite_ids: &[DbId],
    ) -> Result<Course, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO courses (title, slug, description, subject, difficulty, is_premium, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let course = sqlx::query_as::<_, Course>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.subject)
            .bind(&input.difficulty)
            .bind(input.is_premium)
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        for prerequisite_id in prerequisite_ids {
            sqlx::query(
                "INSERT INTO course_prerequisites (course_id, prerequisite_id) \
                 VALUES ($1, $2) \
                 ON CONFLICT (course_id, prerequisite_id) DO NOTHING",
            )
            .bind(course.id)
            .bind(prerequisite_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(course)
    }

    /// Find a course by ID regardless of publication state.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a published course by ID.
    pub async fn find_published(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1 AND is_published = TRUE");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a published course by slug.
    pub async fn find_published_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM courses WHERE slug = $1 AND is_published = TRUE");
        sqlx::query_as::<_, Course>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Count published courses matching the filter.
    pub async fn count_catalog(pool: &PgPool, filter: &CourseFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM courses c WHERE {CATALOG_WHERE}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(&filter.subject)
            .bind(&filter.difficulty)
            .bind(filter.is_premium)
            .bind(&filter.search_pattern)
            .fetch_one(pool)
            .await
    }

    /// One catalog page of published courses with their lesson counts.
    ///
    /// The ORDER BY clause is assembled from the fixed strings of
    /// [`SortField`] and [`SortDirection`]; `c.id` breaks ties so paging is
    /// stable.
    pub async fn list_catalog(
        pool: &PgPool,
        filter: &CourseFilter,
        sort: SortField,
        direction: SortDirection,
        window: PageWindow,
    ) -> Result<Vec<CourseListItem>, sqlx::Error> {
        let dir = direction.sql();
        let query = format!(
            "SELECT {C_COLUMNS}, COUNT(l.id) AS lesson_count \
             FROM courses c \
             LEFT JOIN lessons l ON l.course_id = c.id \
             WHERE {CATALOG_WHERE} \
             GROUP BY c.id \
             ORDER BY {} {dir}, c.id {dir} \
             LIMIT $5 OFFSET $6",
            sort.sql_expr()
        );
        sqlx::query_as::<_, CourseListItem>(&query)
            .bind(&filter.subject)
            .bind(&filter.difficulty)
            .bind(filter.is_premium)
            .bind(&filter.search_pattern)
            .bind(window.page_size)
            .bind(window.offset())
            .fetch_all(pool)
            .await
    }

    /// Prerequisite summaries for a course, ordered by title.
    pub async fn prerequisites(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<CourseRef>, sqlx::Error> {
        sqlx::query_as::<_, CourseRef>(
            "SELECT p.id, p.title, p.slug \
             FROM course_prerequisites cp \
             JOIN courses p ON p.id = cp.prerequisite_id \
             WHERE cp.course_id = $1 \
             ORDER BY p.title",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    /// Prerequisites of a course joined with whether `user_id` has completed each.
    pub async fn prerequisite_progress(
        pool: &PgPool,
        course_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<PrerequisiteProgress>, sqlx::Error> {
        sqlx::query_as::<_, PrerequisiteProgress>(
            "SELECT p.id AS course_id, p.title, \
                 EXISTS ( \
                     SELECT 1 FROM enrollments e \
                     WHERE e.user_id = $2 AND e.course_id = p.id AND e.status = 'completed' \
                 ) AS completed \
             FROM course_prerequisites cp \
             JOIN courses p ON p.id = cp.prerequisite_id \
             WHERE cp.course_id = $1 \
             ORDER BY p.title",
        )
        .bind(course_id)
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Count how many of `ids` exist as courses.
    pub async fn count_existing(pool: &PgPool, ids: &[DbId]) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses WHERE id = ANY($1)")
            .bind(ids)
            .fetch_one(pool)
            .await
    }

    /// Publish a draft course. Returns `None` if the course does not exist
    /// or is already published.
    pub async fn publish(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET is_published = TRUE, published_at = NOW() \
             WHERE id = $1 AND is_published = FALSE \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
