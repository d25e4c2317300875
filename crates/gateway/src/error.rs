//! # Gateway エラー型
//!
//! 全エンドポイントで共通のエラー型。
//! どのバリアントも `{"error": <message>}` のJSONボディに変換される。

use axum::http::StatusCode;
use axum::Json;
use file_gateway_types::ErrorBody;

/// Gatewayエラー型。
///
/// メッセージはそのままレスポンスボディに入るため、接頭辞を付けない。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 不正なリクエスト（JSONパース失敗、必須フィールド欠落）
    #[error("{0}")]
    BadRequest(String),
    /// 存在しないオブジェクト、または未定義のルート
    #[error("{0}")]
    NotFound(String),
    /// 署名付きURLの生成に失敗
    #[error("{0}")]
    Storage(String),
    /// 上記以外の想定外エラー。原因のメッセージをそのまま返す。
    #[error("{0}")]
    Unexpected(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Storage(_) | GatewayError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
