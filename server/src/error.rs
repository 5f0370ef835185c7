use std::process::{ExitCode, Termination};

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use error_stack::Report;

use kernel::KernelError;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl From<JsonRejection> for ErrorStatus {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        ErrorStatus(
            Report::new(rejection)
                .change_context(KernelError::InvalidArgument)
                .attach_printable(message),
        )
    }
}

impl ErrorStatus {
    pub fn status_code(&self) -> StatusCode {
        match self.0.current_context() {
            KernelError::InvalidArgument => StatusCode::BAD_REQUEST,
            KernelError::InsufficientStock
            | KernelError::DuplicateIdentity
            | KernelError::Concurrency => StatusCode::CONFLICT,
            KernelError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            KernelError::Persistence | KernelError::Transaction | KernelError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::debug!("{:?}", self.0);
        }
        (status, self.0.current_context().to_string()).into_response()
    }
}
