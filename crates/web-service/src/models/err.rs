use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use color_eyre::eyre::Error;
use database::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// 使用 [`thiserror`] 定义错误类型
/// 方便根据类型转换为相应的http错误码
#[derive(Error, Debug)]
pub enum AppError {
    /// 数据验证错误，这种错误通常都是用户参数不正确导致的，所以需要转换为400
    #[error(transparent)]
    ValidationFailed(#[from] ValidationErrors),

    /// 参数格式正确但取值不合法
    #[error("{0}")]
    BadRequest(String),

    /// 仓库层数据库错误
    #[error(transparent)]
    RepositoryError(#[from] DatabaseError),

    /// 其他类型错误
    #[error(transparent)]
    InternalError(#[from] Error),
}

impl AppError {
    pub fn bad_request<T: ToString>(msg: T) -> Self {
        Self::BadRequest(msg.to_string())
    }
}

/// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::ValidationFailed(err) => (StatusCode::BAD_REQUEST, format!("Validate failed: {err}")),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, format!("Bad request: {msg}")),
            AppError::RepositoryError(err) => match err {
                DatabaseError::SqlxError(sqlx::Error::RowNotFound) => {
                    (StatusCode::NOT_FOUND, format!("Record not found: {err}"))
                }
                DatabaseError::NotFound(msg) => (StatusCode::NOT_FOUND, format!("Resource not found: {msg}")),
                DatabaseError::ValidationError(msg) => (StatusCode::BAD_REQUEST, format!("Validation error: {msg}")),
                _ => {
                    error!("❌ 数据库操作失败: {err}");
                    (StatusCode::INTERNAL_SERVER_ERROR, format!("Repository error: {err}"))
                }
            },
            AppError::InternalError(err) => {
                error!("❌ 内部错误: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Something went wrong: {err}"))
            }
        };

        (status, Json(json!({ "status": status.as_u16(), "message": message }))).into_response()
    }
}
