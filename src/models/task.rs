use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A task entry as stored in the `tasks` table.
///
/// Read-only in this application: rows are listed in storage order, never
/// created or mutated through the web surface.
#[derive(Debug, Serialize, FromRow)]
pub struct Task {
    pub id: i32,
    /// The title of the task.
    pub title: String,
    /// An optional longer description.
    pub description: Option<String>,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
}
