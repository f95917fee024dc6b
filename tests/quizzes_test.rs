mod common;

use std::collections::HashSet;

use axum::http::{Method, StatusCode};
use common::{assert_error, create_test_db, seed, send};
use serde_json::{json, Value};
use trivia_api::server::router;

#[tokio::test]
async fn plays_unseen_question_from_category() {
    let db = create_test_db().await;
    seed(&db.pool, 10).await;
    let app = router(db.pool.clone());
    let previous = [1, 2, 5];

    for _ in 0..20 {
        let (status, body) = send(
            &app,
            Method::POST,
            "/quizzes",
            Some(json!({
                "previous_questions": previous,
                "quiz_category": {"type": "Science", "id": "1"},
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let question = &body["question"];
        assert!(question["question"].as_str().is_some_and(|q| !q.is_empty()));
        assert_eq!(question["category"], 1);
        assert!(!previous.contains(&question["id"].as_i64().unwrap()));
    }
}

#[tokio::test]
async fn plays_unseen_question_without_category() {
    let db = create_test_db().await;
    seed(&db.pool, 10).await;
    let app = router(db.pool.clone());
    let previous = [1, 2, 5];

    for _ in 0..20 {
        let (status, body) = send(
            &app,
            Method::POST,
            "/quizzes",
            Some(json!({"previous_questions": previous})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!previous.contains(&body["question"]["id"].as_i64().unwrap()));
    }
}

#[tokio::test]
async fn quiz_serves_every_question_once_then_stops() {
    let db = create_test_db().await;
    let ids = seed(&db.pool, 6).await;
    let app = router(db.pool.clone());
    let mut previous: Vec<i64> = Vec::new();

    loop {
        let (status, body) = send(
            &app,
            Method::POST,
            "/quizzes",
            Some(json!({
                "previous_questions": previous,
                "quiz_category": {"type": "click", "id": 0},
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        match &body["question"] {
            Value::Null => break,
            question => previous.push(question["id"].as_i64().unwrap()),
        }
        assert!(previous.len() <= ids.len(), "quiz repeated a question");
    }

    let served: HashSet<i64> = previous.iter().copied().collect();
    assert_eq!(served.len(), ids.len());
    assert_eq!(served, ids.into_iter().collect::<HashSet<_>>());
}

#[tokio::test]
async fn empty_category_has_no_question() {
    let db = create_test_db().await;
    seed(&db.pool, 4).await;
    let app = router(db.pool.clone());

    let (status, body) = send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({"previous_questions": [], "quiz_category": {"id": 3}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "question": null}));
}

#[tokio::test]
async fn quiz_without_body_is_bad_request() {
    let db = create_test_db().await;
    let app = router(db.pool.clone());

    let (status, body) = send(&app, Method::POST, "/quizzes", None).await;
    assert_error(
        status,
        &body,
        400,
        "Please provide a JSON body with previous question Ids and optional category.",
    );
}

#[tokio::test]
async fn quiz_rejects_get() {
    let db = create_test_db().await;
    let app = router(db.pool.clone());

    let (status, body) = send(&app, Method::GET, "/quizzes", None).await;
    assert_error(status, &body, 405, "method not allowed");
}

#[tokio::test]
async fn served_questions_are_counted() {
    let db = create_test_db().await;
    seed(&db.pool, 2).await;
    let app = router(db.pool.clone());

    let (status, _) = send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({"quiz_category": {"id": 2}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let counter = trivia_api::telemetry::QUIZ_QUESTIONS_CNTR.with_label_values(&["2"]);
    assert!(counter.get() >= 1);
}

#[tokio::test]
async fn long_history_of_previous_questions() {
    let db = create_test_db().await;
    let ids = seed(&db.pool, 3).await;
    let app = router(db.pool.clone());

    // far more ids than sqlite accepts as separate parameters
    let mut previous: Vec<i64> = (1000..41_000).collect();
    previous.extend(&ids[..2]);

    let (status, body) = send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({"previous_questions": previous})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"]["id"], ids[2]);

    previous.push(ids[2]);
    let (status, body) = send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({"previous_questions": previous})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "question": null}));
}
