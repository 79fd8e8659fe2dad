use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use bazaar_engine::{traits::CommerceDbError, CheckoutError, PaymentFlowError};
use log::error;
use thiserror::Error;

use crate::data_objects::ApiResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("{0}")]
    Checkout(#[from] CheckoutError),
    #[error("{0}")]
    PaymentFlow(#[from] PaymentFlowError),
    #[error("{0}")]
    Storage(#[from] CommerceDbError),
}

impl ServerError {
    /// The stable machine-readable code carried in the response envelope.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequestBody(_) => "VALIDATION_ERROR",
            Self::Checkout(e) => match e {
                CheckoutError::EmptyCart(_) => "EMPTY_CART",
                CheckoutError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
                CheckoutError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
                CheckoutError::OrderNotFound(_) => "ORDER_NOT_FOUND",
                CheckoutError::InvalidOrderState { .. } => "INVALID_ORDER_STATE",
                CheckoutError::Database(_) => "INTERNAL_ERROR",
            },
            Self::PaymentFlow(e) => match e {
                PaymentFlowError::OrderNotFound(_) => "ORDER_NOT_FOUND",
                PaymentFlowError::InvalidOrderState { .. } => "INVALID_ORDER_STATE",
                PaymentFlowError::SignatureVerificationFailed => "SIGNATURE_VERIFICATION_FAILED",
                PaymentFlowError::PayloadError(_) => "WEBHOOK_PAYLOAD_INVALID",
                PaymentFlowError::Gateway(_) => "GATEWAY_ERROR",
                PaymentFlowError::Database(_) => "INTERNAL_ERROR",
            },
            Self::Storage(e) => match e {
                CommerceDbError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
                CommerceDbError::OrderNotFound(_) => "ORDER_NOT_FOUND",
                CommerceDbError::CartItemNotFound(_) => "CART_ITEM_NOT_FOUND",
                CommerceDbError::PaymentNotFound(_) => "PAYMENT_RECORD_NOT_FOUND",
                CommerceDbError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
                CommerceDbError::ProductUpdateNoOp => "VALIDATION_ERROR",
                CommerceDbError::PaymentAlreadyExists(_) => "PAYMENT_ALREADY_EXISTS",
                _ => "INTERNAL_ERROR",
            },
            _ => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::Checkout(e) => match e {
                CheckoutError::EmptyCart(_) => StatusCode::BAD_REQUEST,
                CheckoutError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
                CheckoutError::InvalidOrderState { .. } => StatusCode::BAD_REQUEST,
                CheckoutError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                CheckoutError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                CheckoutError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::PaymentFlow(e) => match e {
                PaymentFlowError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                PaymentFlowError::InvalidOrderState { .. } => StatusCode::BAD_REQUEST,
                PaymentFlowError::SignatureVerificationFailed => StatusCode::FORBIDDEN,
                PaymentFlowError::PayloadError(_) => StatusCode::BAD_REQUEST,
                PaymentFlowError::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
                PaymentFlowError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Storage(e) => match e {
                CommerceDbError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                CommerceDbError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                CommerceDbError::CartItemNotFound(_) => StatusCode::NOT_FOUND,
                CommerceDbError::PaymentNotFound(_) => StatusCode::NOT_FOUND,
                CommerceDbError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
                CommerceDbError::ProductUpdateNoOp => StatusCode::BAD_REQUEST,
                CommerceDbError::PaymentAlreadyExists(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Internal faults are logged with full context and surfaced as a generic message; store
        // and gateway error text must never reach the caller.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("💻️ Internal failure while handling a request. {self}");
            "Something went wrong on our side. Please try again.".to_string()
        } else {
            self.to_string()
        };
        let body = ApiResponse::<()>::error(message, self.error_code());
        HttpResponse::build(status).insert_header(ContentType::json()).json(body)
    }
}
