pub mod app;
mod deserializers;
pub mod error;
mod pagination;
mod routes;

pub use app::{router, run_server, AppState};
pub use error::ApiError;
pub use pagination::QUESTIONS_PER_PAGE;
