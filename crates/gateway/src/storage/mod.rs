//! # Object Store
//!
//! 署名付きURLを発行するオブジェクトストアの抽象インターフェース。
//! S3互換ストレージ実装は `s3` サブモジュールを参照。

#[cfg(feature = "vendor-aws")]
pub mod s3;

#[cfg(feature = "vendor-aws")]
pub use s3::S3ObjectStore;

/// オブジェクトストア操作のエラー。
///
/// `NotFound` はHEAD要求でオブジェクトが存在しなかったことを表す。
/// それ以外の失敗はすべて `Operation` に入る。
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// オブジェクトが存在しない
    #[error("object not found")]
    NotFound,
    /// ストア操作の失敗（署名失敗、通信失敗、権限不足など）
    #[error("{0}")]
    Operation(String),
}

/// オブジェクトストアの抽象インターフェース。
///
/// バケットは実装の構築時に固定される。Gateway運用者はAWS S3, MinIO,
/// Cloudflare R2 等のS3互換ストレージや、その他のバックエンドを実装として選択できる。
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// 指定キー・Content-Typeに対する署名付きアップロードURL（PUT）を生成する。
    async fn presign_upload(
        &self,
        object_key: &str,
        content_type: &str,
        expiry_secs: u32,
    ) -> Result<String, StoreError>;

    /// 指定キーに対する署名付きダウンロードURL（GET）を生成する。
    async fn presign_download(&self, object_key: &str, expiry_secs: u32)
        -> Result<String, StoreError>;

    /// オブジェクトの存在を確認する（HEAD）。本体は取得しない。
    async fn head_object(&self, object_key: &str) -> Result<(), StoreError>;
}
