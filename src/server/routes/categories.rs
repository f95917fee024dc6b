use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        Category, Question,
    },
    server::{
        app::AppState,
        deserializers::is_truthy,
        error::ApiError,
        pagination::{paginate, PageQuery},
    },
};

use super::{category_map, json_object, ApiResponse, CategoryMap};

#[derive(Debug, Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: CategoryMap,
}

#[derive(Debug, Serialize)]
struct CategoryCreated {
    success: bool,
    created: i64,
    category: Category,
    total_categories: i64,
}

#[derive(Debug, Serialize)]
struct CategoryQuestions {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: i64,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesResponse>> {
    let categories = categories::get_all_categories(&pool).await?;
    // kept as 405 for existing clients
    if categories.is_empty() {
        return Err(ApiError::MethodNotAllowed);
    }
    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(categories),
    }))
}

async fn create_category(
    State(pool): State<SqlitePool>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResponse<Json<CategoryCreated>> {
    let body = json_object(body).ok_or(ApiError::BadRequest(None))?;
    let kind = match body.get("type") {
        Some(value) if is_truthy(value) => value,
        _ => return Err(ApiError::bad_request("Type is a mandatory field")),
    };
    let kind = kind.as_str().ok_or(ApiError::Unprocessable(None))?;

    let id = categories::create_category(&pool, kind)
        .await
        .map_err(|err| {
            tracing::warn!("Failed to create category: {err}");
            ApiError::Unprocessable(None)
        })?;
    tracing::info!(id, kind, "Created category");

    Ok(Json(CategoryCreated {
        success: true,
        created: id,
        category: categories::get_category(&pool, id).await?,
        total_categories: categories::count_categories(&pool).await?,
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    category_id: Result<Path<i64>, PathRejection>,
    PageQuery { page }: PageQuery,
) -> ApiResponse<Json<CategoryQuestions>> {
    let Path(category_id) = category_id.map_err(|_| ApiError::NotFound(None))?;
    let selection = match category_id {
        0 => questions::get_all_questions(&pool).await?,
        id => questions::get_questions_for_category(&pool, id).await?,
    };
    if selection.is_empty() {
        return Err(ApiError::BadRequest(None));
    }

    let page_questions = paginate(page, &selection);
    if page_questions.is_empty() {
        return Err(ApiError::not_found("No questions in selected page."));
    }

    Ok(Json(CategoryQuestions {
        success: true,
        questions: page_questions,
        total_questions: selection.len(),
        current_category: category_id,
    }))
}

pub fn category_router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(get_categories).post(create_category))
        .route("/categories/{id}/questions", get(questions_for_category))
}
