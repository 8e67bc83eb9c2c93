use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use dotenv::dotenv;
use pretty_assertions::assert_eq as assert_eq_pretty;
use sqlx::PgPool;

use studyhub::routes;

// End-to-end flows against a real database. Requires a running PostgreSQL
// reachable via DATABASE_URL (migrations are applied on setup), which is why
// every test here is #[ignore]d; run them with `cargo test -- --ignored`.

async fn test_pool() -> PgPool {
    dotenv().ok();
    std::env::set_var("SESSION_SECRET", "test-session-secret");
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations on test DB");
    pool
}

fn form(username: &str, password: &str) -> Vec<(&'static str, String)> {
    vec![
        ("username", username.to_string()),
        ("password", password.to_string()),
    ]
}

fn session_cookie_from<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "studyhub_session")
        .map(|c| c.into_owned())
}

#[ignore]
#[actix_rt::test]
async fn register_login_home_round_trip() {
    let pool = test_pool().await;

    let username = "flow_alice";
    let _ = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(&pool)
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;

    // Register
    let req = test::TestRequest::post()
        .uri("/register/")
        .set_form(form(username, "s3cret"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "registration failed");
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login/");
    let flash = resp
        .response()
        .cookies()
        .find(|c| c.name() == "studyhub_flash")
        .map(|c| c.into_owned())
        .expect("registration should set a flash cookie");

    // The login page shows the confirmation once
    let req = test::TestRequest::get()
        .uri("/login/")
        .cookie(flash)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body)
        .contains("Account created successfully! You can now log in."));

    // Login with the same credentials
    let req = test::TestRequest::post()
        .uri("/login/")
        .set_form(form(username, "s3cret"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "login failed");
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
    let session = session_cookie_from(&resp).expect("login should bind a session cookie");

    // The guarded home page renders for the bound session
    let req = test::TestRequest::get().uri("/").cookie(session).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("Welcome, flow_alice!"));

    // ... and still redirects without one
    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let _ = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(&pool)
        .await;
}

#[ignore]
#[actix_rt::test]
async fn duplicate_registration_is_a_validation_error() {
    let pool = test_pool().await;

    let username = "flow_duplicate";
    let _ = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(&pool)
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/register/")
        .set_form(form(username, "s3cret"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let (original_hash,): (String,) =
        sqlx::query_as("SELECT password_hash FROM users WHERE username = $1")
            .bind(username)
            .fetch_one(&pool)
            .await
            .unwrap();

    // Second registration with the same username: re-rendered form with a
    // visible message, not a crash
    let req = test::TestRequest::post()
        .uri("/register/")
        .set_form(form(username, "other_password"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("That username is already taken."));

    // The existing account is untouched
    let (count, hash): (i64, String) = sqlx::query_as(
        "SELECT COUNT(*), MIN(password_hash) FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
    assert_eq_pretty!(hash, original_hash);

    let _ = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(&pool)
        .await;
}

#[ignore]
#[actix_rt::test]
async fn failed_logins_share_one_generic_message() {
    let pool = test_pool().await;

    let username = "flow_bob";
    let _ = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(&pool)
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/register/")
        .set_form(form(username, "correct_horse"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    // Wrong password for a real account
    let req = test::TestRequest::post()
        .uri("/login/")
        .set_form(form(username, "wrong"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let wrong_password_body = test::read_body(resp).await;

    // Unknown username entirely
    let req = test::TestRequest::post()
        .uri("/login/")
        .set_form(form("flow_nobody", "whatever"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let unknown_user_body = test::read_body(resp).await;

    let wrong_password_page = String::from_utf8_lossy(&wrong_password_body);
    let unknown_user_page = String::from_utf8_lossy(&unknown_user_body);
    assert!(wrong_password_page.contains("Invalid username or password."));
    // Byte-identical responses: no user enumeration
    assert_eq_pretty!(wrong_password_page, unknown_user_page);

    let _ = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(&pool)
        .await;
}

#[ignore]
#[actix_rt::test]
async fn list_views_return_stored_rows_in_order() {
    let pool = test_pool().await;

    let marker = "flow_listing";
    let _ = sqlx::query("DELETE FROM tasks WHERE title LIKE $1")
        .bind(format!("{}%", marker))
        .execute(&pool)
        .await;
    let _ = sqlx::query("DELETE FROM topics WHERE title LIKE $1")
        .bind(format!("{}%", marker))
        .execute(&pool)
        .await;

    sqlx::query("INSERT INTO tasks (title, description, completed) VALUES ($1, $2, FALSE)")
        .bind(format!("{} first task", marker))
        .bind("read the first chapter")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO tasks (title, description, completed) VALUES ($1, NULL, TRUE)")
        .bind(format!("{} second task", marker))
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO topics (title, description) VALUES ($1, $2)")
        .bind(format!("{} topic", marker))
        .bind("a topic under test")
        .execute(&pool)
        .await
        .unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;

    let req = test::TestRequest::get().uri("/tasks/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let page = String::from_utf8_lossy(&body);
    let first = page
        .find(&format!("{} first task", marker))
        .expect("first task should be listed");
    let second = page
        .find(&format!("{} second task", marker))
        .expect("second task should be listed");
    assert!(first < second, "tasks should appear in storage order");

    let req = test::TestRequest::get().uri("/topics/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains(&format!("{} topic", marker)));

    let _ = sqlx::query("DELETE FROM tasks WHERE title LIKE $1")
        .bind(format!("{}%", marker))
        .execute(&pool)
        .await;
    let _ = sqlx::query("DELETE FROM topics WHERE title LIKE $1")
        .bind(format!("{}%", marker))
        .execute(&pool)
        .await;
}
