use crate::{error::AppError, models::Topic, routes::html};
use actix_web::{get, web, Responder};
use askama::Template;
use sqlx::PgPool;

#[derive(Template)]
#[template(path = "topics_list.html")]
struct TopicsListTemplate {
    topics: Vec<Topic>,
}

/// Lists every stored topic in storage (id) order.
#[get("/topics/")]
pub async fn topic_list(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let topics =
        sqlx::query_as::<_, Topic>("SELECT id, title, description FROM topics ORDER BY id")
            .fetch_all(pool.get_ref())
            .await?;

    let body = TopicsListTemplate { topics }.render()?;
    Ok(html(body))
}
