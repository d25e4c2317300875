//! # File Gateway
//!
//! オブジェクトストアへの署名付きURLを発行するGateway。
//! ファイル本体はGatewayを経由せず、クライアントとストアの間で直接やり取りされる。
//!
//! ## API エンドポイント
//! - `POST /files`: アップロード用署名付きURL（PUT、15分）発行
//! - `GET /files/{objectKey}`: 存在確認後、ダウンロード用署名付きURL（GET、1時間）へ307リダイレクト
//!
//! それ以外のメソッド・パスは404を返す。
//! すべてのレスポンスは `application/json` で、エラーは `{"error": <string>}`。

mod config;
mod endpoints;
mod error;
mod storage;

use std::any::Any;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::config::{GatewayConfig, GatewayState};
use crate::endpoints::{
    handle_download, handle_download_without_key, handle_not_found, handle_upload,
};
use crate::error::GatewayError;
use crate::storage::ObjectStore;

// ---------------------------------------------------------------------------
// ルーティング
// ---------------------------------------------------------------------------

/// Gatewayのルーターを構築する。
///
/// パスが一致してもメソッドが異なる場合は405ではなく404を返す。
/// `get` は暗黙にHEADも受け付けるため、HEADは明示的に404へ振り分ける。
pub fn router(state: Arc<GatewayState>) -> axum::Router {
    axum::Router::new()
        .route("/files", post(handle_upload).fallback(handle_not_found))
        .route(
            "/files/",
            get(handle_download_without_key)
                .head(handle_not_found)
                .fallback(handle_not_found),
        )
        .route(
            "/files/{*object_key}",
            get(handle_download)
                .head(handle_not_found)
                .fallback(handle_not_found),
        )
        .fallback(handle_not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

/// ハンドラ内のpanicを500の構造化エラーに変換する。
fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal server error".to_string()
    };
    tracing::error!(error = %message, "ハンドラがpanicしました");
    GatewayError::Unexpected(message).into_response()
}

// ---------------------------------------------------------------------------
// エントリポイント
// ---------------------------------------------------------------------------

#[cfg(feature = "vendor-aws")]
fn build_store(config: &GatewayConfig) -> anyhow::Result<Box<dyn ObjectStore>> {
    Ok(Box::new(storage::S3ObjectStore::from_config(&config.storage)?))
}

#[cfg(not(feature = "vendor-aws"))]
fn build_store(_config: &GatewayConfig) -> anyhow::Result<Box<dyn ObjectStore>> {
    anyhow::bail!("Object Store実装が有効化されていません（vendor-aws featureが必要）")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;
    let state = Arc::new(GatewayState {
        store: build_store(&config)?,
    });

    let app = router(state);

    tracing::info!("Gatewayを {} で起動します", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
