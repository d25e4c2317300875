//! # File Gateway 共有型定義
//!
//! Gatewayとクライアントの間でやり取りされるJSONボディをRust構造体として提供する。
//!
//! ## エンコーディング規則
//! - フィールド名はcamelCase（`objectKey`, `contentType`, `expiresIn`）
//! - エラーボディは常に `{"error": <string>}`

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// 定数
// ---------------------------------------------------------------------------

/// アップロード用署名付きURLの有効期限（秒）。15分。
pub const UPLOAD_EXPIRY_SECS: u32 = 900;

/// ダウンロード用署名付きURLの有効期限（秒）。1時間。
pub const DOWNLOAD_EXPIRY_SECS: u32 = 3600;

/// `contentType` 省略時のMIMEタイプ
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// アップロードURLに対してクライアントが使用するHTTPメソッド
pub const UPLOAD_METHOD: &str = "PUT";

/// 307レスポンスのボディに含めるメッセージ
pub const REDIRECT_MESSAGE: &str = "Redirecting to download URL";

// ---------------------------------------------------------------------------
// POST /files
// ---------------------------------------------------------------------------

/// POST /files リクエスト。
///
/// Gateway側ではボディを `serde_json::Value` として受け取り、フィールドごとに検証する。
/// この型はクライアント側でボディを組み立てるために使用する。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// オブジェクトキーとしてそのまま使用されるファイル名
    pub filename: String,
    /// コンテンツのMIMEタイプ（省略時は `application/octet-stream`）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// POST /files レスポンス（Upload Intent）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// バケット内のオブジェクトキー（= filename）
    pub object_key: String,
    /// 署名付きアップロードURL
    pub upload_url: String,
    /// アップロード時のHTTPメソッド（常に "PUT"）
    pub method: String,
    /// アップロード時に送信すべきContent-Type
    pub content_type: String,
    /// URL有効期限（秒）
    pub expires_in: u32,
}

// ---------------------------------------------------------------------------
// GET /files/{objectKey}
// ---------------------------------------------------------------------------

/// GET /files/{objectKey} レスポンス（Download Intent）。
/// 署名付きURL自体は `Location` ヘッダで返す。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    /// 固定メッセージ
    pub message: String,
    /// URL有効期限（秒）
    pub expires_in: u32,
}

// ---------------------------------------------------------------------------
// エラー
// ---------------------------------------------------------------------------

/// 全エラーレスポンス共通のボディ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// エラーメッセージ
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
