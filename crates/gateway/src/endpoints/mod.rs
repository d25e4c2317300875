//! # Gatewayエンドポイント
//!
//! - `POST /files`: アップロード用署名付きURL発行
//! - `GET /files/{objectKey}`: ダウンロード用署名付きURLへのリダイレクト
//! - それ以外: 404

pub mod download;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use download::{handle_download, handle_download_without_key};
pub use upload::handle_upload;

use axum::http::{Method, Uri};

use crate::error::GatewayError;

/// 未定義のメソッド・パスに対するフォールバック。
pub async fn handle_not_found(method: Method, uri: Uri) -> GatewayError {
    tracing::info!(%method, path = %uri.path(), "未定義のルート");
    GatewayError::NotFound("Not found".to_string())
}

/// パストラバーサルになり得るキーを警告する。
///
/// キーはクライアント入力をそのまま使い、拒否はしない。
pub(crate) fn warn_if_unsafe_key(object_key: &str) {
    if is_unsafe_key(object_key) {
        tracing::warn!(object_key = %object_key, "パストラバーサルの可能性があるオブジェクトキー");
    }
}

fn is_unsafe_key(object_key: &str) -> bool {
    object_key.starts_with('/')
        || object_key
            .split(['/', '\\'])
            .any(|segment| segment == "..")
}
