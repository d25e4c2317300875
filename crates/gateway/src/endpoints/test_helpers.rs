//! # エンドポイントテスト用共通ヘルパー
//!
//! upload, download, ルーティングのテストで共有するモックObject Store。

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::GatewayState;
use crate::storage::{ObjectStore, StoreError};

/// モックObject Storeの呼び出し記録。`(操作名, オブジェクトキー)` の列。
pub type CallLog = Arc<Mutex<Vec<(&'static str, String)>>>;

/// テスト用のモックObject Store。
/// S3への接続なしで署名付きURLのダミーを返す。
#[derive(Default)]
pub struct MockObjectStore {
    /// 存在するオブジェクトのキー
    existing: HashSet<String>,
    /// presign_uploadを失敗させる
    fail_upload: bool,
    /// presign_downloadを失敗させる
    fail_download: bool,
    /// head_objectでNotFound以外のエラーを返す
    head_error: Option<String>,
    /// head_objectでpanicする
    panic_on_head: bool,
    /// 署名の代わりに埋め込む連番
    counter: AtomicUsize,
    calls: CallLog,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, key: &str) -> Self {
        self.existing.insert(key.to_string());
        self
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn failing_download(mut self) -> Self {
        self.fail_download = true;
        self
    }

    pub fn failing_head(mut self, message: &str) -> Self {
        self.head_error = Some(message.to_string());
        self
    }

    pub fn panicking_head(mut self) -> Self {
        self.panic_on_head = true;
        self
    }

    /// 呼び出し記録へのハンドル。`into_state` の前に取得しておく。
    pub fn calls(&self) -> CallLog {
        self.calls.clone()
    }

    pub fn into_state(self) -> Arc<GatewayState> {
        Arc::new(GatewayState {
            store: Box::new(self),
        })
    }

    fn record(&self, op: &'static str, key: &str) {
        self.calls.lock().unwrap().push((op, key.to_string()));
    }

    fn next_signature(&self) -> usize {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ObjectStore for MockObjectStore {
    async fn presign_upload(
        &self,
        object_key: &str,
        content_type: &str,
        expiry_secs: u32,
    ) -> Result<String, StoreError> {
        self.record("presign_upload", object_key);
        if self.fail_upload {
            return Err(StoreError::Operation("AccessDenied".to_string()));
        }
        Ok(format!(
            "http://mock-storage/test-bucket/{object_key}?content-type={content_type}&X-Amz-Expires={expiry_secs}&sig={}",
            self.next_signature()
        ))
    }

    async fn presign_download(
        &self,
        object_key: &str,
        expiry_secs: u32,
    ) -> Result<String, StoreError> {
        self.record("presign_download", object_key);
        if self.fail_download {
            return Err(StoreError::Operation("AccessDenied".to_string()));
        }
        Ok(format!(
            "http://mock-storage/test-bucket/{object_key}?X-Amz-Expires={expiry_secs}&sig={}",
            self.next_signature()
        ))
    }

    async fn head_object(&self, object_key: &str) -> Result<(), StoreError> {
        self.record("head_object", object_key);
        if self.panic_on_head {
            panic!("mock store exploded");
        }
        if let Some(message) = &self.head_error {
            return Err(StoreError::Operation(message.clone()));
        }
        if self.existing.contains(object_key) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}
