//! Span helpers shared by the lesson store and the services.
//!
//! Spans carry an `outcome` field that is filled in with [`record_success`] or
//! [`record_error`] once the operation finishes, so the JSON log shows the
//! result next to the timing.

use tracing::Span;

/// Create a span for a database query.
///
/// # Example
/// ```ignore
/// let span = db_operation_span!("SELECT", "lesson", selector = %selector);
/// async {
///     // database operation
/// }.instrument(span).await;
/// ```
#[macro_export]
macro_rules! db_operation_span {
    ($operation:expr, $table:expr) => {
        tracing::debug_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = $operation,
            db.sql.table = $table,
            db.rows = tracing::field::Empty,
            outcome = tracing::field::Empty,
            error.message = tracing::field::Empty
        )
    };
    ($operation:expr, $table:expr, $($field:tt)*) => {
        tracing::debug_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = $operation,
            db.sql.table = $table,
            db.rows = tracing::field::Empty,
            outcome = tracing::field::Empty,
            error.message = tracing::field::Empty,
            $($field)*
        )
    };
}

/// Create a span for an engine or service operation.
///
/// # Example
/// ```ignore
/// let span = business_span!("schedule.resolve", selector = %selector);
/// ```
#[macro_export]
macro_rules! business_span {
    ($operation:expr) => {
        tracing::info_span!(
            $operation,
            outcome = tracing::field::Empty,
            error.message = tracing::field::Empty
        )
    };
    ($operation:expr, $($field:tt)*) => {
        tracing::info_span!(
            $operation,
            outcome = tracing::field::Empty,
            error.message = tracing::field::Empty,
            $($field)*
        )
    };
}

/// Record a successful operation on the current span.
pub fn record_success() {
    Span::current().record("outcome", "ok");
}

/// Record a failed operation on the current span.
pub fn record_error(message: &str) {
    let span = Span::current();
    span.record("outcome", "error");
    span.record("error.message", message);
}

/// Record the row count and a successful outcome on a `db_operation_span!`.
pub fn record_rows(span: &Span, rows: usize) {
    span.record("db.rows", rows);
    span.record("outcome", "ok");
}

/// Logs the error of a `Result` without consuming it.
pub trait ErrorExt {
    fn log_error(self, context: &str) -> Self;
}

impl<T, E: std::fmt::Display> ErrorExt for Result<T, E> {
    fn log_error(self, context: &str) -> Self {
        if let Err(ref e) = self {
            tracing::error!(error = %e, context = context, "Operation failed");
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorders_without_span() {
        record_success();
        record_error("test error");
        record_rows(&Span::none(), 3);
    }

    #[test]
    fn test_log_error_passes_result_through() {
        let ok: Result<u8, String> = Ok(1);
        assert_eq!(ok.log_error("ctx"), Ok(1));
        let err: Result<u8, String> = Err("boom".into());
        assert_eq!(err.log_error("ctx"), Err("boom".to_string()));
    }
}
