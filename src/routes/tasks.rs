use crate::{error::AppError, models::Task, routes::html};
use actix_web::{get, web, Responder};
use askama::Template;
use sqlx::PgPool;

#[derive(Template)]
#[template(path = "tasks_list.html")]
struct TasksListTemplate {
    tasks: Vec<Task>,
}

/// Lists every stored task in storage (id) order.
///
/// No pagination or filtering: a direct read-all handed to the template.
#[get("/tasks/")]
pub async fn task_list(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let tasks = sqlx::query_as::<_, Task>(
        "SELECT id, title, description, completed, created_at FROM tasks ORDER BY id",
    )
    .fetch_all(pool.get_ref())
    .await?;

    let body = TasksListTemplate { tasks }.render()?;
    Ok(html(body))
}
