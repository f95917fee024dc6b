use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        Question,
    },
    server::{
        app::AppState,
        deserializers::{is_truthy, value_as_i64},
        error::ApiError,
        pagination::{paginate, PageQuery},
    },
};

use super::{category_map, json_object, ApiResponse, CategoryMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// POST /questions carries one of two requests, told apart by `searchTerm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionsRequest {
    Search { term: String },
    Create(NewQuestion),
}

impl TryFrom<Map<String, Value>> for QuestionsRequest {
    type Error = ApiError;

    fn try_from(body: Map<String, Value>) -> Result<Self, Self::Error> {
        if let Some(term) = body.get("searchTerm").filter(|v| is_truthy(v)) {
            let term = term.as_str().ok_or(ApiError::BadRequest(None))?;
            return Ok(QuestionsRequest::Search {
                term: term.to_owned(),
            });
        }

        let mut fields = Vec::with_capacity(4);
        for (key, label) in [
            ("question", "Question"),
            ("answer", "Answer"),
            ("category", "Category"),
            ("difficulty", "Difficulty"),
        ] {
            match body.get(key) {
                Some(value) if is_truthy(value) => fields.push(value),
                _ => return Err(ApiError::bad_request(format!("{label} is a mandatory field"))),
            }
        }

        // present but impossible to store
        let text = |value: &Value| value.as_str().map(str::to_owned);
        match (
            text(fields[0]),
            text(fields[1]),
            value_as_i64(fields[2]),
            value_as_i64(fields[3]),
        ) {
            (Some(question), Some(answer), Some(category), Some(difficulty)) => {
                Ok(QuestionsRequest::Create(NewQuestion {
                    question,
                    answer,
                    category,
                    difficulty,
                }))
            }
            _ => Err(ApiError::Unprocessable(None)),
        }
    }
}

#[derive(Debug, Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: CategoryMap,
    current_category: Option<i64>,
}

#[derive(Debug, Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: CategoryMap,
}

#[derive(Debug, Serialize)]
struct QuestionCreated {
    success: bool,
    created: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Debug, Serialize)]
struct QuestionDeleted {
    success: bool,
    deleted: i64,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    PageQuery { page }: PageQuery,
) -> ApiResponse<Json<QuestionsPage>> {
    let all_questions = questions::get_all_questions(&pool).await?;
    let page_questions = paginate(page, &all_questions);
    if page_questions.is_empty() {
        return Err(ApiError::NotFound(None));
    }

    Ok(Json(QuestionsPage {
        success: true,
        questions: page_questions,
        total_questions: all_questions.len(),
        categories: category_map(categories::get_all_categories(&pool).await?),
        current_category: None,
    }))
}

async fn create_or_search_questions(
    State(pool): State<SqlitePool>,
    PageQuery { page }: PageQuery,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResponse<Response> {
    let body = json_object(body).ok_or(ApiError::BadRequest(None))?;
    match QuestionsRequest::try_from(body)? {
        QuestionsRequest::Search { term } => {
            search_questions(&pool, &term).await.map(IntoResponse::into_response)
        }
        QuestionsRequest::Create(new_question) => create_question(&pool, page, new_question)
            .await
            .map(IntoResponse::into_response),
    }
}

async fn search_questions(pool: &SqlitePool, term: &str) -> ApiResponse<Json<SearchResults>> {
    let found = questions::search_questions(pool, term).await?;
    if found.is_empty() {
        return Err(ApiError::NotFound(None));
    }

    Ok(Json(SearchResults {
        success: true,
        questions: found,
        total_questions: questions::count_questions(pool).await?,
        current_category: category_map(categories::get_all_categories(pool).await?),
    }))
}

async fn create_question(
    pool: &SqlitePool,
    page: usize,
    new_question: NewQuestion,
) -> ApiResponse<Json<QuestionCreated>> {
    let id = questions::create_question(
        pool,
        &new_question.question,
        &new_question.answer,
        new_question.category,
        new_question.difficulty,
    )
    .await
    .map_err(|err| {
        tracing::warn!("Failed to create question: {err}");
        ApiError::Unprocessable(None)
    })?;
    tracing::info!(id, category = new_question.category, "Created question");

    let all_questions = questions::get_all_questions(pool).await?;
    Ok(Json(QuestionCreated {
        success: true,
        created: id,
        questions: paginate(page, &all_questions),
        total_questions: all_questions.len(),
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    question_id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<QuestionDeleted>> {
    let Path(question_id) = question_id.map_err(|_| ApiError::NotFound(None))?;
    if questions::get_question_by_id(&pool, question_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(None));
    }

    questions::delete_question(&pool, question_id)
        .await
        .map_err(|err| {
            tracing::warn!(question_id, "Failed to delete question: {err}");
            ApiError::Unprocessable(None)
        })?;
    tracing::info!(question_id, "Deleted question");

    Ok(Json(QuestionDeleted {
        success: true,
        deleted: question_id,
    }))
}

pub fn questions_router() -> Router<AppState> {
    Router::new()
        .route(
            "/questions",
            get(list_questions).post(create_or_search_questions),
        )
        .route("/questions/{id}", delete(delete_question))
}
