use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;

use studyhub::{config::Config, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    log::info!("Starting studyhub server at {}", config.server_url());

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.clone(), config.server_port))?
    .run()
    .await
}
