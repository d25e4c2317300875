//! # GET /files/{objectKey}
//!
//! ダウンロード。存在確認のうえ署名付きGET URLへ307でリダイレクトする。

use std::sync::Arc;

use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::{RawPathParams, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use file_gateway_types::{DownloadResponse, DOWNLOAD_EXPIRY_SECS, REDIRECT_MESSAGE};

use super::warn_if_unsafe_key;
use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::storage::StoreError;

/// ルート定義上のパスパラメータ名
pub(crate) const OBJECT_KEY_PARAM: &str = "object_key";

/// GET /files/{objectKey}: 署名付きダウンロードURLへのリダイレクト。
pub async fn handle_download(
    State(state): State<Arc<GatewayState>>,
    params: Result<RawPathParams, RawPathParamsRejection>,
) -> Result<Response, GatewayError> {
    // デコード結果がUTF-8でないキーはエクストラクタ段階で拒否される
    let params = params.map_err(|rejection| {
        tracing::warn!(error = %rejection, "オブジェクトキーのデコードに失敗");
        missing_key()
    })?;
    let raw_key = params
        .iter()
        .find(|(name, _)| *name == OBJECT_KEY_PARAM)
        .map(|(_, value)| value)
        .unwrap_or_default();

    download(&state, raw_key).await
}

/// GET /files/: キーが空の場合。
pub async fn handle_download_without_key() -> GatewayError {
    missing_key()
}

/// 生のパスパラメータをデコードし、存在確認と署名付きURL生成を行う。
pub(crate) async fn download(state: &GatewayState, raw_key: &str) -> Result<Response, GatewayError> {
    let object_key = decode_object_key(raw_key)?;
    warn_if_unsafe_key(&object_key);

    match state.store.head_object(&object_key).await {
        Ok(()) => {}
        Err(StoreError::NotFound) => {
            tracing::info!(object_key = %object_key, "オブジェクトが存在しません");
            return Err(GatewayError::NotFound("File not found".to_string()));
        }
        // NotFound以外の存在確認失敗は想定外エラーとして原因をそのまま返す
        Err(StoreError::Operation(msg)) => {
            tracing::error!(object_key = %object_key, error = %msg, "存在確認に失敗");
            return Err(GatewayError::Unexpected(msg));
        }
    }

    let download_url = state
        .store
        .presign_download(&object_key, DOWNLOAD_EXPIRY_SECS)
        .await
        .map_err(|e| {
            tracing::error!(object_key = %object_key, error = %e, "署名付きダウンロードURL生成失敗");
            download_url_failed()
        })?;

    let location = HeaderValue::from_str(&download_url).map_err(|e| {
        tracing::error!(object_key = %object_key, error = %e, "Locationヘッダに使用できないURL");
        download_url_failed()
    })?;

    tracing::info!(object_key = %object_key, "ダウンロードURLへリダイレクト");

    Ok((
        StatusCode::TEMPORARY_REDIRECT,
        [(header::LOCATION, location)],
        Json(DownloadResponse {
            message: REDIRECT_MESSAGE.to_string(),
            expires_in: DOWNLOAD_EXPIRY_SECS,
        }),
    )
        .into_response())
}

/// パスパラメータをパーセントデコードする（一度だけ）。
fn decode_object_key(raw_key: &str) -> Result<String, GatewayError> {
    let decoded = urlencoding::decode(raw_key).map_err(|_| missing_key())?;
    if decoded.is_empty() {
        return Err(missing_key());
    }
    Ok(decoded.into_owned())
}

fn missing_key() -> GatewayError {
    GatewayError::BadRequest("objectKey is required".to_string())
}

fn download_url_failed() -> GatewayError {
    GatewayError::Storage("Failed to generate download URL".to_string())
}
