use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions, Question},
    server::{app::AppState, error::ApiError},
    telemetry::record_quiz_pick,
};

use super::{json_object, ApiResponse};

const MISSING_BODY: &str =
    "Please provide a JSON body with previous question Ids and optional category.";

#[derive(Debug, Deserialize)]
struct QuizRequest {
    #[serde(default)]
    previous_questions: Option<Vec<i64>>,
    #[serde(default)]
    quiz_category: Option<QuizCategory>,
}

#[derive(Debug, Deserialize)]
struct QuizCategory {
    // 0 plays every category
    #[serde(default, deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

impl QuizRequest {
    fn category(&self) -> Option<i64> {
        self.quiz_category
            .as_ref()
            .map(|c| c.id)
            .filter(|id| *id != 0)
    }
}

/// `question` is null once every candidate has been played.
#[derive(Debug, Serialize)]
struct QuizQuestion {
    success: bool,
    question: Option<Question>,
}

fn pick_question<R: Rng + ?Sized>(candidates: &[Question], rng: &mut R) -> Option<Question> {
    candidates.choose(rng).cloned()
}

async fn play_quiz(
    State(pool): State<SqlitePool>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResponse<Json<QuizQuestion>> {
    let body = json_object(body).ok_or_else(|| ApiError::bad_request(MISSING_BODY))?;
    let request: QuizRequest = serde_json::from_value(Value::Object(body)).map_err(|err| {
        tracing::debug!("Malformed quiz request: {err}");
        ApiError::bad_request(MISSING_BODY)
    })?;

    let previous = request.previous_questions.as_deref().unwrap_or_default();
    let candidates = questions::get_quiz_candidates(&pool, request.category(), previous).await?;
    let question = pick_question(&candidates, &mut rand::thread_rng());

    record_quiz_pick(question.as_ref().map(|q| q.category));
    if question.is_none() {
        tracing::info!(
            played = previous.len(),
            category = request.category(),
            "No questions left for quiz"
        );
    }

    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router() -> Router<AppState> {
    Router::new().route("/quizzes", post(play_quiz))
}
