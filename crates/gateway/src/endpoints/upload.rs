//! # POST /files
//!
//! アップロード準備。クライアントが直接PUTするための署名付きURLを発行する。

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use file_gateway_types::{
    UploadResponse, DEFAULT_CONTENT_TYPE, UPLOAD_EXPIRY_SECS, UPLOAD_METHOD,
};

use super::warn_if_unsafe_key;
use crate::config::GatewayState;
use crate::error::GatewayError;

/// 検証済みのアップロード要求。
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct UploadParams {
    pub object_key: String,
    pub content_type: String,
}

/// POST /files: アップロード用署名付きURL発行。
pub async fn handle_upload(
    State(state): State<Arc<GatewayState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<UploadResponse>, GatewayError> {
    // サイズ超過や読み取り失敗もJSONのエラーボディで返す
    let body = body.map_err(|rejection| {
        tracing::warn!(error = %rejection, "リクエストボディの読み取りに失敗");
        invalid_json()
    })?;
    prepare_upload(&state, &body).await.map(Json)
}

/// ボディを検証し、署名付きPUT URLを生成する。
pub(crate) async fn prepare_upload(
    state: &GatewayState,
    body: &[u8],
) -> Result<UploadResponse, GatewayError> {
    let params = parse_upload_body(body)?;
    warn_if_unsafe_key(&params.object_key);

    let upload_url = state
        .store
        .presign_upload(&params.object_key, &params.content_type, UPLOAD_EXPIRY_SECS)
        .await
        .map_err(|e| {
            tracing::error!(object_key = %params.object_key, error = %e, "署名付きアップロードURL生成失敗");
            GatewayError::Storage("Failed to generate upload URL".to_string())
        })?;

    tracing::info!(
        object_key = %params.object_key,
        content_type = %params.content_type,
        "アップロードURLを発行"
    );

    Ok(UploadResponse {
        object_key: params.object_key,
        upload_url,
        method: UPLOAD_METHOD.to_string(),
        content_type: params.content_type,
        expires_in: UPLOAD_EXPIRY_SECS,
    })
}

/// リクエストボディを検証する。
///
/// - 空ボディは `{}` として扱う（空白のみのボディは不正なJSON）
/// - `filename` は空でない文字列であること
/// - `contentType` は省略またはnullでデフォルト値
pub(crate) fn parse_upload_body(body: &[u8]) -> Result<UploadParams, GatewayError> {
    let value: serde_json::Value = if body.is_empty() {
        serde_json::Value::Object(Default::default())
    } else {
        serde_json::from_slice(body).map_err(|_| invalid_json())?
    };

    let object_key = value
        .get("filename")
        .and_then(serde_json::Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| GatewayError::BadRequest("filename is required".to_string()))?
        .to_string();

    let content_type = match value.get("contentType") {
        None | Some(serde_json::Value::Null) => DEFAULT_CONTENT_TYPE.to_string(),
        Some(serde_json::Value::String(content_type)) => content_type.clone(),
        Some(_) => {
            return Err(GatewayError::BadRequest(
                "contentType must be a string".to_string(),
            ))
        }
    };

    Ok(UploadParams {
        object_key,
        content_type,
    })
}

fn invalid_json() -> GatewayError {
    GatewayError::BadRequest("Invalid JSON in request body".to_string())
}
