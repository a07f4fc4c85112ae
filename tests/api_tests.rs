// tests/api_tests.rs

use score_analyser::{config::Config, routes, state::AppState, store::MemoryStore};
use serde_json::{Value, json};
use std::sync::Arc;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    // 1. Test configuration; no DATABASE_URL, so the in-memory store is used
    let config = Config {
        database_url: None,
        data_file: String::new(),
        port: 0,
        rust_log: "error".to_string(),
        cors_origins: vec!["http://localhost:3000".to_string()],
    };

    // 2. Fresh, unpersisted store per test
    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        config,
    };

    // 3. Create the router with the app state
    let app = routes::create_router(state);

    // 4. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 5. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// A consistent two-subject submission.
fn submission(date: &str, physics: (i64, i64), chemistry: (i64, i64)) -> Value {
    let (pc, pi) = physics;
    let (cc, ci) = chemistry;
    json!({
        "testDate": date,
        "totalQuestions": 100,
        "correctQuestions": pc + cc,
        "incorrectQuestions": pi + ci,
        "skippedQuestions": 100 - pc - pi - cc - ci,
        "subjects": [
            {
                "subjectName": "Physics",
                "totalQuestions": 50,
                "correctQuestions": pc,
                "incorrectQuestions": pi,
                "skippedQuestions": 50 - pc - pi
            },
            {
                "subjectName": "Chemistry",
                "totalQuestions": 50,
                "correctQuestions": cc,
                "incorrectQuestions": ci,
                "skippedQuestions": 50 - cc - ci
            }
        ]
    })
}

async fn create(client: &reqwest::Client, address: &str, body: &Value) -> Value {
    let response = client
        .post(&format!("{}/api/tests", address))
        .json(body)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);
    response.json().await.expect("Failed to parse test json")
}

async fn get_json(client: &reqwest::Client, url: String) -> Value {
    client
        .get(&url)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse json")
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let address = spawn_app().await;
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
async fn health_reports_local_storage() {
    let address = spawn_app().await;
    let body = get_json(&reqwest::Client::new(), format!("{}/api/health", address)).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "local");
}

#[tokio::test]
async fn create_test_derives_marks() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let test = create(
        &client,
        &address,
        &json!({
            "testDate": "2024-01-10",
            "totalQuestions": 200,
            "correctQuestions": 150,
            "incorrectQuestions": 30,
            "skippedQuestions": 20,
            "subjects": []
        }),
    )
    .await;

    // Assert
    assert_eq!(test["totalMarks"], 800);
    assert_eq!(test["marksObtained"], 570);
    assert_eq!(test["percentage"], 71.25);
    assert!(test["id"].as_str().is_some());

    let fetched = get_json(&client, format!("{}/api/tests/{}", address, test["id"].as_str().unwrap())).await;
    assert_eq!(fetched["marksObtained"], 570);
}

#[tokio::test]
async fn create_test_fails_validation() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let cases = [
        // Counts do not add up
        json!({
            "totalQuestions": 100,
            "correctQuestions": 50,
            "incorrectQuestions": 30,
            "skippedQuestions": 10
        }),
        // No questions at all
        json!({
            "totalQuestions": 0,
            "correctQuestions": 0,
            "incorrectQuestions": 0,
            "skippedQuestions": 0
        }),
        // Negative count
        json!({
            "totalQuestions": 10,
            "correctQuestions": 12,
            "incorrectQuestions": -2,
            "skippedQuestions": 0
        }),
        // Counts too large to score
        json!({
            "totalQuestions": 4_000_000_000_000_000_000i64,
            "correctQuestions": 4_000_000_000_000_000_000i64,
            "incorrectQuestions": 0,
            "skippedQuestions": 0
        }),
        // Missing required field
        json!({ "totalQuestions": 10 }),
    ];

    for body in cases {
        // Act
        let response = client
            .post(&format!("{}/api/tests", address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");

        // Assert
        assert_eq!(response.status().as_u16(), 400, "payload {} should be rejected", body);
        let error: Value = response.json().await.unwrap();
        assert!(error["error"].as_str().is_some());
    }

    let tests = get_json(&client, format!("{}/api/tests", address)).await;
    assert_eq!(tests.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unknown_test_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let id = uuid::Uuid::new_v4();

    let get = client
        .get(&format!("{}/api/tests/{}", address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(get.status().as_u16(), 404);

    let put = client
        .put(&format!("{}/api/tests/{}", address, id))
        .json(&submission("2024-01-01", (10, 0), (10, 0)))
        .send()
        .await
        .unwrap();
    assert_eq!(put.status().as_u16(), 404);

    let delete = client
        .delete(&format!("{}/api/tests/{}", address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(delete.status().as_u16(), 404);
}

#[tokio::test]
async fn empty_analytics_are_zero() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let summary = get_json(&client, format!("{}/api/tests/analytics/summary", address)).await;
    assert_eq!(summary["totalTests"], 0);
    for field in [
        "averageScore",
        "averagePercentage",
        "bestScore",
        "worstScore",
        "scoreVariance",
        "improvement",
        "percentile",
        "latestScore",
        "latestPercentage",
    ] {
        assert_eq!(summary[field].as_f64(), Some(0.0), "{} should be zero", field);
    }

    let subjects = get_json(&client, format!("{}/api/tests/analytics/subjects", address)).await;
    assert_eq!(subjects, json!([]));
}

#[tokio::test]
async fn analytics_flow() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Submitted out of chronological order on purpose.
    // Physics marks: 70 (Jan 5), 110 (Jan 1); Chemistry: 35, 60.
    create(&client, &address, &submission("2024-01-05", (20, 10), (10, 5))).await;
    create(&client, &address, &submission("2024-01-01", (30, 10), (15, 0))).await;

    // Act
    let summary = get_json(&client, format!("{}/api/tests/analytics/summary", address)).await;
    let subjects = get_json(&client, format!("{}/api/tests/analytics/subjects", address)).await;
    let tests = get_json(&client, format!("{}/api/tests", address)).await;

    // Assert: Jan 1 total 170, Jan 5 total 105
    assert_eq!(summary["totalTests"], 2);
    assert_eq!(summary["averageScore"], 137.5);
    assert_eq!(summary["bestScore"], 170);
    assert_eq!(summary["worstScore"], 105);
    assert_eq!(summary["latestScore"], 105);
    assert_eq!(summary["scoreVariance"], 32.5);
    assert_eq!(summary["improvement"], -38.24);
    assert_eq!(summary["percentile"], 50.0);

    let physics = &subjects[0];
    assert_eq!(physics["subjectName"], "Physics");
    assert_eq!(physics["scores"], json!([110, 70]));
    assert_eq!(physics["latestScore"], 70);
    assert_eq!(physics["improvement"], -36.36);
    assert_eq!(physics["weightage"], 50.0);
    assert_eq!(physics["totalContribution"], 180);
    assert_eq!(physics["averageCorrectQuestions"], 25.0);

    let chemistry = &subjects[1];
    assert_eq!(chemistry["scores"], json!([60, 35]));
    assert_eq!(chemistry["totalContribution"], 95);

    // Newest first in the plain listing
    let listed = tests.as_array().unwrap();
    assert_eq!(listed[0]["marksObtained"], 105);
    assert_eq!(listed[1]["marksObtained"], 170);

    let names = get_json(&client, format!("{}/api/subjects", address)).await;
    assert_eq!(names, json!(["Physics", "Chemistry"]));
}

#[tokio::test]
async fn zero_base_improvement_is_null() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // First test scores exactly zero: 5 correct, 20 incorrect.
    create(&client, &address, &submission("2024-01-01", (5, 20), (0, 0))).await;
    create(&client, &address, &submission("2024-01-02", (10, 0), (0, 0))).await;

    let summary = get_json(&client, format!("{}/api/tests/analytics/summary", address)).await;
    assert_eq!(summary["bestScore"], 40);
    assert!(summary["improvement"].is_null());
}

#[tokio::test]
async fn update_and_delete_flow() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let test = create(&client, &address, &submission("2024-02-01", (10, 0), (10, 0))).await;
    let id = test["id"].as_str().unwrap().to_string();

    // Act: update
    let updated: Value = client
        .put(&format!("{}/api/tests/{}", address, id))
        .json(&submission("2024-02-01", (40, 0), (10, 0)))
        .send()
        .await
        .expect("Update failed")
        .json()
        .await
        .unwrap();

    // Assert
    assert_eq!(updated["id"], test["id"]);
    assert_eq!(updated["marksObtained"], 200);
    assert_eq!(updated["subjects"][0]["marksObtained"], 160);
    assert_eq!(updated["createdAt"], test["createdAt"]);

    // Act: delete
    let deleted = client
        .delete(&format!("{}/api/tests/{}", address, id))
        .send()
        .await
        .expect("Delete failed");
    assert_eq!(deleted.status().as_u16(), 200);

    let summary = get_json(&client, format!("{}/api/tests/analytics/summary", address)).await;
    assert_eq!(summary["totalTests"], 0);
}
