// tests/api_tests.rs

use quiz_server::{config::Config, routes, state::AppState};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345") and the pool so
/// tests can seed the question bank.
async fn spawn_app() -> (String, SqlitePool) {
    // 1. Create an in-memory pool; one connection keeps the database alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    // 2. Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    // 3. Create test configuration and state
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        rust_log: "error".to_string(),
        listen_port: 0,
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };

    // 4. Create the router with the app state
    let app = routes::create_router(state);

    // 5. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 6. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

/// Seeds questions 1..=n; the correct option for question `id` is
/// `(id % 4) + 1`.
async fn seed_questions(pool: &SqlitePool, n: i64) {
    for id in 1..=n {
        sqlx::query(
            "INSERT INTO questions (id, correct_index, prompt, option_a, option_b, option_c, option_d)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind((id % 4) + 1)
        .bind(format!("Question {}", id))
        .bind("Option A")
        .bind("Option B")
        .bind("Option C")
        .bind("Option D")
        .execute(pool)
        .await
        .expect("Failed to seed question");
    }
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn start_issues_a_token_and_a_redacted_question() {
    // Arrange
    let (address, pool) = spawn_app().await;
    seed_questions(&pool, 40).await;
    let client = reqwest::Client::new();

    // Act
    let body = client
        .post(&format!("{}/api/quiz/start", address))
        .json(&serde_json::json!({ "token": null }))
        .send()
        .await
        .expect("Failed to execute request")
        .json::<serde_json::Value>()
        .await
        .unwrap();

    // Assert
    assert!(body["token"].as_i64().is_some());
    assert_eq!(body["is_complete"], false);

    let question = &body["question"];
    assert!(question["id"].as_i64().is_some());
    assert!(question["prompt"].as_str().is_some());
    assert_eq!(question["options"].as_array().unwrap().len(), 4);
    // The answer key must never appear in a response.
    assert!(question.get("correct_index").is_none());
}

#[tokio::test]
async fn answering_grades_and_advances() {
    // Arrange
    let (address, pool) = spawn_app().await;
    seed_questions(&pool, 40).await;
    let client = reqwest::Client::new();

    let start = client
        .post(&format!("{}/api/quiz/start", address))
        .json(&serde_json::json!({ "token": null }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    let token = start["token"].as_i64().unwrap();
    let question_id = start["question"]["id"].as_i64().unwrap();
    let correct_option = (question_id % 4) + 1;
    let wrong_option = (correct_option % 4) + 1;

    // Act: answer the first question wrongly
    let outcome = client
        .post(&format!("{}/api/quiz/answer", address))
        .json(&serde_json::json!({
            "token": token,
            "question_id": question_id,
            "selected_option": wrong_option,
        }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    // Assert
    assert_eq!(outcome["was_correct"], false);
    assert_eq!(outcome["is_complete"], false);
    let next_id = outcome["question"]["id"].as_i64().unwrap();
    assert_ne!(next_id, question_id);

    let results = client
        .get(&format!("{}/api/quiz/results?token={}", address, token))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(results["correct"], 0);
    assert_eq!(results["incorrect"], 1);
    assert_eq!(results["total_answered"], 1);
}

#[tokio::test]
async fn answer_for_a_question_outside_the_set_is_rejected() {
    // Arrange
    let (address, pool) = spawn_app().await;
    seed_questions(&pool, 40).await;
    let client = reqwest::Client::new();

    let start = client
        .post(&format!("{}/api/quiz/start", address))
        .json(&serde_json::json!({ "token": null }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    let token = start["token"].as_i64().unwrap();

    // 40 questions, 35 in the set: find one the session was never dealt.
    let set: Vec<i64> = sqlx::query_scalar(
        "SELECT question_id FROM question_sets WHERE session_id = ? ORDER BY row_id",
    )
    .bind(token)
    .fetch_all(&pool)
    .await
    .unwrap();
    let outsider = (1..=40).find(|id| !set.contains(id)).unwrap();

    // Act
    let response = client
        .post(&format!("{}/api/quiz/answer", address))
        .json(&serde_json::json!({
            "token": token,
            "question_id": outsider,
            "selected_option": 1,
        }))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn completing_the_quiz_over_http() {
    // Arrange
    let (address, pool) = spawn_app().await;
    seed_questions(&pool, 40).await;
    let client = reqwest::Client::new();

    let start = client
        .post(&format!("{}/api/quiz/start", address))
        .json(&serde_json::json!({ "token": null }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    let token = start["token"].as_i64().unwrap();
    let mut question_id = start["question"]["id"].as_i64().unwrap();

    // Act: answer all 35 questions correctly
    let mut last = serde_json::Value::Null;
    for _ in 0..35 {
        last = client
            .post(&format!("{}/api/quiz/answer", address))
            .json(&serde_json::json!({
                "token": token,
                "question_id": question_id,
                "selected_option": (question_id % 4) + 1,
            }))
            .send()
            .await
            .unwrap()
            .json::<serde_json::Value>()
            .await
            .unwrap();
        assert_eq!(last["was_correct"], true);
        if let Some(next) = last["question"]["id"].as_i64() {
            question_id = next;
        }
    }

    // Assert: the 35th answer completes the quiz
    assert_eq!(last["is_complete"], true);
    assert!(last["question"].is_null());

    let results = client
        .get(&format!("{}/api/quiz/results?token={}", address, token))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(results["correct"], 35);
    assert_eq!(results["incorrect"], 0);
    assert_eq!(results["total_answered"], 35);

    // Resuming a finished session reports completion, not a 36th question.
    let resumed = client
        .post(&format!("{}/api/quiz/start", address))
        .json(&serde_json::json!({ "token": token }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(resumed["is_complete"], true);
    assert!(resumed["question"].is_null());
}

#[tokio::test]
async fn stale_token_starts_a_fresh_session() {
    // Arrange
    let (address, pool) = spawn_app().await;
    seed_questions(&pool, 40).await;
    let client = reqwest::Client::new();

    // Act: present a token the server has never issued
    let body = client
        .post(&format!("{}/api/quiz/start", address))
        .json(&serde_json::json!({ "token": 987654 }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    // Assert: a new session, not an error
    let token = body["token"].as_i64().unwrap();
    assert_ne!(token, 987654);
    assert!(body["question"].is_object());
    assert_eq!(body["is_complete"], false);
}
