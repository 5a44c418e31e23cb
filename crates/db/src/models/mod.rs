//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts where the entity is created through the API
//!
//! Entities serialize with camelCase keys, which is the wire format of the
//! HTTP API.

pub mod achievement;
pub mod certificate;
pub mod course;
pub mod enrollment;
pub mod goal;
pub mod lesson;
pub mod lesson_progress;
pub mod student_link;
pub mod user;
pub mod user_stats;
