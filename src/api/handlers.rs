use crate::error::{ErrorDetail, ProcessError};
use crate::service::NotaService;
use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use url::Url;

/// 鉴权请求头
pub const API_KEY_HEADER: &str = "x-api-key";

/// 共享状态: 票据处理服务 + API 密钥
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<NotaService>,
    pub api_key: Arc<String>,
}

/// 请求体
#[derive(Debug, Deserialize)]
pub struct ProcessarNotaRequest {
    pub url: String,
    pub nome_estabelecimento: String,
}

/// 成功响应体
#[derive(Debug, Serialize)]
pub struct ProcessarNotaResponse {
    pub status: String,
    pub mensagem: String,
    pub nota_id: i32,
    pub numero_nota: Option<String>,
    pub estabelecimento: String,
}

/// 存活探针, 无需鉴权
pub async fn root() -> Response {
    Json(json!({
        "message": "API de Processamento de Notas Fiscais está no ar."
    }))
    .into_response()
}

/// 处理票据接口: 校验密钥和 URL, 调用处理服务, 映射错误状态码
pub async fn processar_nota(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ProcessarNotaRequest>,
) -> Response {
    if !authorized(&headers, &state.api_key) {
        return error_response(
            StatusCode::FORBIDDEN,
            "Could not validate credentials".to_string(),
        );
    }

    if Url::parse(&req.url).is_err() {
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("URL inválida: {}", req.url),
        );
    }

    match state
        .service
        .process_nota(&req.url, &req.nome_estabelecimento)
        .await
    {
        Ok(resultado) => {
            let response = ProcessarNotaResponse {
                status: "sucesso".to_string(),
                mensagem: format!(
                    "Nota fiscal processada e {} itens salvos.",
                    resultado.itens_salvos
                ),
                nota_id: resultado.nota_id,
                numero_nota: resultado.numero_nota,
                estabelecimento: req.nome_estabelecimento,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to process nota {}: {}", req.url, e);
            e.into_response()
        }
    }
}

/// 校验 API 密钥; 请求头缺失或非 UTF-8 一律拒绝
fn authorized(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|key| key == expected)
        .unwrap_or(false)
}

fn error_response(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorDetail { detail })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn authorized_accepts_matching_key() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("segredo"));
        assert!(authorized(&headers, "segredo"));
    }

    #[test]
    fn authorized_rejects_wrong_or_missing_key() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("errado"));
        assert!(!authorized(&headers, "segredo"));
        assert!(!authorized(&HeaderMap::new(), "segredo"));
    }

    #[test]
    fn request_body_deserializes() {
        let req: ProcessarNotaRequest = serde_json::from_str(
            r#"{"url": "https://example.com/nota?p=1", "nome_estabelecimento": "Mercado X"}"#,
        )
        .unwrap();
        assert_eq!(req.nome_estabelecimento, "Mercado X");
        assert!(Url::parse(&req.url).is_ok());
    }

    #[test]
    fn relative_url_is_rejected() {
        assert!(Url::parse("nota?p=1").is_err());
    }
}
