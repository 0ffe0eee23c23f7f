use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use crate::models::ApiResponse;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// 抽奖失败的原因，全部可由使用者自行修正
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawError {
    #[error("指定的獎項不存在")]
    PrizeNotFound,

    #[error("該獎項已被抽完")]
    PrizeExhausted,

    #[error("沒有符合資格的參與者可供抽獎")]
    NoEligibleParticipants,
}

impl DrawError {
    pub fn code(&self) -> &'static str {
        match self {
            DrawError::PrizeNotFound => "PRIZE_NOT_FOUND",
            DrawError::PrizeExhausted => "PRIZE_EXHAUSTED",
            DrawError::NoEligibleParticipants => "NO_ELIGIBLE_PARTICIPANTS",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            DrawError::PrizeNotFound => StatusCode::NOT_FOUND,
            DrawError::PrizeExhausted | DrawError::NoEligibleParticipants => StatusCode::CONFLICT,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Tenant error: {0}")]
    TenantError(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Draw(e) => e.status_code(),
            AppError::ValidationError(_) | AppError::TenantError(_) | AppError::CsvError(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            AppError::Draw(e) => {
                log::info!("Draw rejected: {e}");
                (e.code(), e.to_string())
            }
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                ("VALIDATION_ERROR", msg.clone())
            }
            AppError::TenantError(msg) => {
                log::warn!("Tenant error: {msg}");
                ("TENANT_ERROR", msg.clone())
            }
            AppError::CsvError(err) => {
                log::warn!("CSV error: {err}");
                ("CSV_ERROR", format!("Error reading CSV: {err}"))
            }
            _ => {
                log::error!("Internal error: {self}");
                ("INTERNAL_ERROR", "Internal server error".to_string())
            }
        };

        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(error_code, message))
    }
}
