use serde::Serialize;
use sqlx::FromRow;

/// A study topic as stored in the `topics` table.
#[derive(Debug, Serialize, FromRow)]
pub struct Topic {
    pub id: i32,
    pub title: String,
    pub description: String,
}
