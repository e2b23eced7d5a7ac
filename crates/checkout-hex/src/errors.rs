use axum::response::{IntoResponse, Response};
use checkout_types::ports::cpf_validator::ValidatorError;
use checkout_types::ports::order_repository::RepoError;
use checkout_types::ports::payment_adapter::PaymentError;
use thiserror::Error;

use crate::application::http_response::HttpResponse;

pub const INVALID_CPF: &str = "Invalid param: cpf";
pub const NO_ORDERS_FOUND: &str = "No orders were found";
pub const INVALID_PARAM: &str = "Invalid param";

#[derive(Error, Debug)]
pub enum AppError {
    /// Business rule violation, answered with 400 and `{message}`.
    #[error("{0}")]
    BadRequest(String),

    /// A collaborator failed, answered with 500 and `{error}`.
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        AppError::Internal(e.into())
    }
}

impl From<ValidatorError> for AppError {
    fn from(e: ValidatorError) -> Self {
        AppError::Internal(e.into())
    }
}

impl From<PaymentError> for AppError {
    fn from(e: PaymentError) -> Self {
        AppError::Internal(e.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        HttpResponse::from(self).into_response()
    }
}
