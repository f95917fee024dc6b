mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

use axum::{extract::rejection::JsonRejection, Json};
use serde_json::{Map, Value};

use crate::db::Category;
use crate::server::error::ApiError;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

pub type ApiResponse<T> = Result<T, ApiError>;

/// `{category id: category type}`, the shape every client-facing category listing uses.
pub type CategoryMap = BTreeMap<i64, String>;

fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

// an absent, malformed or empty JSON body is no body at all
fn json_object(body: Result<Json<Value>, JsonRejection>) -> Option<Map<String, Value>> {
    match body {
        Ok(Json(Value::Object(map))) if !map.is_empty() => Some(map),
        Ok(_) => None,
        Err(rejection) => {
            tracing::debug!("Rejected request body: {rejection}");
            None
        }
    }
}
