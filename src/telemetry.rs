use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn";

lazy_static! {
    pub static ref QUIZ_QUESTIONS_CNTR: IntCounterVec = register_int_counter_vec!(
        "quiz_questions_served_total",
        "Number of questions served to quiz players",
        &["category"]
    )
    .unwrap();
    pub static ref QUIZ_EXHAUSTED_CNTR: IntCounter = register_int_counter!(
        "quiz_exhausted_total",
        "Number of quiz requests left without an unseen question"
    )
    .unwrap();
}

/// Counts one quiz answer: the category of the served question, or an
/// exhausted quiz when nothing was left to serve.
pub fn record_quiz_pick(category: Option<i64>) {
    match category {
        Some(category) => QUIZ_QUESTIONS_CNTR
            .with_label_values(&[category.to_string().as_str()])
            .inc(),
        None => QUIZ_EXHAUSTED_CNTR.inc(),
    }
}

/// Log filter comes from `LOG_LEVEL`; `INCLUDE_SPAN_EVENTS=true` also logs
/// entering and leaving request spans.
pub fn init_tracing() {
    let span_events = match std::env::var("INCLUDE_SPAN_EVENTS") {
        Ok(value) if value.eq_ignore_ascii_case("true") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::NONE,
    };
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_span_events(span_events))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_picks_are_counted_by_outcome() {
        let served = QUIZ_QUESTIONS_CNTR.with_label_values(&["77"]).get();
        let exhausted = QUIZ_EXHAUSTED_CNTR.get();

        record_quiz_pick(Some(77));
        record_quiz_pick(Some(77));
        record_quiz_pick(None);

        assert_eq!(QUIZ_QUESTIONS_CNTR.with_label_values(&["77"]).get(), served + 2);
        assert!(QUIZ_EXHAUSTED_CNTR.get() > exhausted);
    }
}
