//! # S3互換 Object Store 実装
//!
//! AWS S3, MinIO, Cloudflare R2 等のS3互換APIを使用するObject Store実装。

use http02::{header, HeaderMap, HeaderValue};

use super::{ObjectStore, StoreError};
use crate::config::StorageConfig;

/// S3互換ストレージによるObject Store実装。
pub struct S3ObjectStore {
    /// 内部通信用バケット（存在確認等）
    bucket_internal: s3::Bucket,
    /// クライアント向けバケット（署名付きURL生成用）。
    /// 内部ホスト名と外部ホスト名が異なる場合に使用。
    /// Noneの場合はbucket_internalを使用する。
    bucket_public: Option<s3::Bucket>,
}

impl S3ObjectStore {
    pub fn new(bucket_internal: s3::Bucket, bucket_public: Option<s3::Bucket>) -> Self {
        Self {
            bucket_internal,
            bucket_public,
        }
    }

    /// 設定値からS3互換バケットを初期化する。
    ///
    /// `endpoint` がNoneの場合はリージョンに対応するAWS標準エンドポイントを使用する。
    fn init_bucket(config: &StorageConfig, endpoint: Option<&str>) -> anyhow::Result<s3::Bucket> {
        let credentials = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => s3::creds::Credentials::new(
                Some(access_key.as_str()),
                Some(secret_key.as_str()),
                None,
                None,
                None,
            )?,
            // 環境変数・プロファイル・インスタンスメタデータの順に探索
            _ => s3::creds::Credentials::default()?,
        };

        let bucket = match endpoint {
            Some(endpoint) => {
                let region = s3::Region::Custom {
                    region: config.region.clone(),
                    endpoint: endpoint.to_string(),
                };
                s3::Bucket::new(&config.bucket_name, region, credentials)?.with_path_style()
            }
            None => {
                let region: s3::Region = config.region.parse()?;
                s3::Bucket::new(&config.bucket_name, region, credentials)?
            }
        };

        Ok(*bucket)
    }

    /// 設定値から構築する。
    pub fn from_config(config: &StorageConfig) -> anyhow::Result<Self> {
        let bucket_internal = Self::init_bucket(config, config.endpoint.as_deref())?;

        let bucket_public = config
            .public_endpoint
            .as_deref()
            .map(|public_ep| {
                tracing::info!(
                    s3_public_endpoint = %public_ep,
                    "クライアント向けS3エンドポイントを設定"
                );
                Self::init_bucket(config, Some(public_ep))
            })
            .transpose()?;

        tracing::info!(
            bucket = %config.bucket_name,
            region = %config.region,
            endpoint = config.endpoint.as_deref().unwrap_or("aws"),
            "Object Storeを初期化"
        );

        Ok(Self::new(bucket_internal, bucket_public))
    }

    fn public_bucket(&self) -> &s3::Bucket {
        self.bucket_public.as_ref().unwrap_or(&self.bucket_internal)
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn presign_upload(
        &self,
        object_key: &str,
        content_type: &str,
        expiry_secs: u32,
    ) -> Result<String, StoreError> {
        // Content-Typeを署名対象に含め、宣言と異なる型でのPUTを拒否させる
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(content_type)
            .map_err(|e| StoreError::Operation(format!("不正なContent-Type: {e}")))?;
        headers.insert(header::CONTENT_TYPE, value);

        self.public_bucket()
            .presign_put(object_key, expiry_secs, Some(headers), None)
            .await
            .map_err(|e| StoreError::Operation(format!("署名付きアップロードURL生成失敗: {e}")))
    }

    async fn presign_download(
        &self,
        object_key: &str,
        expiry_secs: u32,
    ) -> Result<String, StoreError> {
        self.public_bucket()
            .presign_get(object_key, expiry_secs, None)
            .await
            .map_err(|e| StoreError::Operation(format!("署名付きダウンロードURL生成失敗: {e}")))
    }

    async fn head_object(&self, object_key: &str) -> Result<(), StoreError> {
        match self.bucket_internal.head_object(object_key).await {
            Ok((_, status)) => head_status_to_result(status),
            Err(s3::error::S3Error::HttpFailWithBody(404, _)) => Err(StoreError::NotFound),
            Err(s3::error::S3Error::HttpFailWithBody(status, body)) => Err(
                StoreError::Operation(format!("HEAD失敗: HTTP {status} - {body}")),
            ),
            Err(e) => Err(StoreError::Operation(format!("HEAD失敗: {e}"))),
        }
    }
}

/// HEADレスポンスのステータスコードを存在確認の結果に変換する。
fn head_status_to_result(status: u16) -> Result<(), StoreError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(StoreError::NotFound),
        _ => Err(StoreError::Operation(format!("HEAD失敗: HTTP {status}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_status_to_result() {
        assert!(head_status_to_result(200).is_ok());
        assert!(matches!(head_status_to_result(404), Err(StoreError::NotFound)));
        assert!(matches!(
            head_status_to_result(403),
            Err(StoreError::Operation(_))
        ));
    }

    fn test_config(public_endpoint: Option<&str>) -> StorageConfig {
        StorageConfig {
            bucket_name: "test-bucket".to_string(),
            endpoint: Some("http://localhost:9000".to_string()),
            public_endpoint: public_endpoint.map(str::to_string),
            region: "us-east-1".to_string(),
            access_key: Some("minioadmin".to_string()),
            secret_key: Some("minioadmin".to_string()),
        }
    }

    /// 署名付きURLがローカルで生成され、キーとContent-Typeが反映されることを確認
    #[tokio::test]
    async fn test_presign_upload_uses_bucket_and_key() {
        let store = S3ObjectStore::from_config(&test_config(None)).unwrap();

        let url = store
            .presign_upload("report.pdf", "application/pdf", 900)
            .await
            .unwrap();

        assert!(url.starts_with("http://localhost:9000/test-bucket/report.pdf?"));
        assert!(url.contains("X-Amz-Expires=900"));
        assert!(url.contains("X-Amz-SignedHeaders="));
        assert!(url.contains("content-type"));
    }

    /// ヘッダ値として不正なContent-Typeは署名前にOperationエラーになることを確認
    #[tokio::test]
    async fn test_presign_upload_rejects_invalid_content_type() {
        let store = S3ObjectStore::from_config(&test_config(None)).unwrap();

        let result = store.presign_upload("a.txt", "text/plain\r\nx: y", 900).await;

        match result {
            Err(StoreError::Operation(msg)) => assert!(msg.contains("Content-Type")),
            other => panic!("Operationエラーを期待: {other:?}"),
        }
    }

    /// 公開エンドポイント設定時は署名付きURLがそちらを指すことを確認
    #[tokio::test]
    async fn test_presign_download_prefers_public_endpoint() {
        let store =
            S3ObjectStore::from_config(&test_config(Some("https://files.example.com"))).unwrap();

        let url = store.presign_download("a.txt", 3600).await.unwrap();

        assert!(url.starts_with("https://files.example.com/test-bucket/a.txt?"));
        assert!(url.contains("X-Amz-Expires=3600"));
    }
}
