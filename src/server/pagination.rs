use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use super::deserializers::first_value;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// The `page` query parameter. Only its first occurrence counts and anything
/// that is not an unsigned integer means the first page, so extraction never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: usize,
}

impl PageQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let page = first_value(pairs, "page")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(1);
        PageQuery { page }
    }
}

impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();
        Ok(PageQuery::from_pairs(&pairs))
    }
}

/// Returns the `page`-th (1-based) slice of `items`. Page 0 and pages past
/// the end are empty.
pub fn paginate<T: Clone>(page: usize, items: &[T]) -> Vec<T> {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE))
    else {
        return Vec::new();
    };
    items
        .iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .cloned()
        .collect()
}
