//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。
//! 設定はプロセス起動時に一度だけ読み込み、以降は変更しない。

use crate::storage::ObjectStore;

/// 待ち受けアドレスのデフォルト値
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// リージョンを検出できない場合のフォールバック
const FALLBACK_REGION: &str = "us-east-1";

/// Gatewayの共有状態。
///
/// 起動時に構築し、`Arc` で全ハンドラに共有する。読み取り専用。
pub struct GatewayState {
    /// Object Store（S3互換等、トレイトで抽象化）。バケットは構築時に固定。
    pub store: Box<dyn ObjectStore>,
}

/// Gateway全体の設定。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// 待ち受けアドレス（`LISTEN_ADDR`）
    pub listen_addr: String,
    /// Object Storeの接続設定
    pub storage: StorageConfig,
}

/// S3互換Object Storeの接続設定。
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// 対象バケット名（`BUCKET_NAME`、必須）
    pub bucket_name: String,
    /// S3互換エンドポイント（`S3_ENDPOINT`）。Noneの場合はAWS標準エンドポイント。
    pub endpoint: Option<String>,
    /// クライアント向けエンドポイント（`S3_PUBLIC_ENDPOINT`）
    pub public_endpoint: Option<String>,
    /// リージョン（`S3_REGION`、未設定時はエンドポイントから検出）
    pub region: String,
    /// アクセスキー（`S3_ACCESS_KEY`）。Noneの場合はAWS標準の認証情報チェーン。
    pub access_key: Option<String>,
    /// シークレットキー（`S3_SECRET_KEY`）
    pub secret_key: Option<String>,
}

impl GatewayConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の値取得関数から構築する。空文字列は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bucket_name = get("BUCKET_NAME")
            .or_else(|| get("S3_BUCKET"))
            .ok_or_else(|| anyhow::anyhow!("BUCKET_NAMEが設定されていません"))?;

        let endpoint = get("S3_ENDPOINT");
        let region = get("S3_REGION").unwrap_or_else(|| detect_region(endpoint.as_deref()));

        Ok(Self {
            listen_addr: get("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            storage: StorageConfig {
                bucket_name,
                endpoint,
                public_endpoint: get("S3_PUBLIC_ENDPOINT"),
                region,
                access_key: get("S3_ACCESS_KEY"),
                secret_key: get("S3_SECRET_KEY"),
            },
        })
    }
}

/// AWS S3エンドポイント（s3.REGION.amazonaws.com）からリージョンを検出する。
/// 非AWSエンドポイントおよびエンドポイント未設定時はus-east-1を使用する。
fn detect_region(endpoint: Option<&str>) -> String {
    endpoint
        .and_then(|ep| {
            let start = ep.find("s3.")?;
            let rest = &ep[start + 3..];
            rest.find(".amazonaws.com").map(|end| rest[..end].to_string())
        })
        .filter(|region| !region.is_empty())
        .unwrap_or_else(|| FALLBACK_REGION.to_string())
}
