use crate::scrape::FetchError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// 错误响应体 (与原接口兼容: {"detail": ...})
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// 处理流程错误分类
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Esta URL de nota fiscal já foi processada.")]
    DuplicateSubmission,

    #[error("Não foi possível extrair os itens da nota da URL fornecida. Verifique o link ou o layout da página.")]
    ExtractionFailure,

    #[error("Falha ao acessar a URL: {0}")]
    Fetch(#[from] FetchError),

    #[error("Ocorreu um erro interno no servidor: {0}")]
    Database(sqlx::Error),
}

impl ProcessError {
    /// 映射到 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProcessError::DuplicateSubmission => StatusCode::CONFLICT,
            ProcessError::ExtractionFailure => StatusCode::UNPROCESSABLE_ENTITY,
            ProcessError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProcessError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// 唯一约束冲突说明两个请求竞争同一 URL: 事务提交阶段被数据库拒绝,
// 等价于去重预检失败, 统一映射为 DuplicateSubmission
impl From<sqlx::Error> for ProcessError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return ProcessError::DuplicateSubmission;
            }
        }
        ProcessError::Database(e)
    }
}

impl IntoResponse for ProcessError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorDetail {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
