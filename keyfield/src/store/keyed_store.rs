use crate::client::KeyValueClient;
use crate::codec::{Codec, JsonCodec};
use crate::error::FieldResult as Result;
use crate::key::field_key;
use crate::store::ListHandle;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::debug;

/// 列表迭代时每次向远端读取的元素个数
pub const DEFAULT_LIST_PAGE_SIZE: usize = 64;

/// 包装外部客户端，按字段类别提供类型化操作。
///
/// 克隆成本低（客户端位于 `Arc` 之后），通常在启动时构建一次并注入各个绑定。
pub struct KeyedStore<K: Codec = JsonCodec> {
    client: Arc<dyn KeyValueClient>,
    codec: K,
    list_page_size: usize,
}

impl<K: Codec> Clone for KeyedStore<K> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            codec: self.codec.clone(),
            list_page_size: self.list_page_size,
        }
    }
}

impl KeyedStore<JsonCodec> {
    /// 使用默认 JSON 编解码器
    pub fn new(client: Arc<dyn KeyValueClient>) -> Self {
        Self::with_codec(client, JsonCodec)
    }
}

impl<K: Codec> KeyedStore<K> {
    pub fn with_codec(client: Arc<dyn KeyValueClient>, codec: K) -> Self {
        Self {
            client,
            codec,
            list_page_size: DEFAULT_LIST_PAGE_SIZE,
        }
    }

    /// 调整列表迭代的分页大小（最小为 1）
    pub fn with_list_page_size(mut self, page_size: usize) -> Self {
        self.list_page_size = page_size.max(1);
        self
    }

    pub fn codec(&self) -> &K {
        &self.codec
    }

    pub fn client(&self) -> &Arc<dyn KeyValueClient> {
        &self.client
    }

    pub fn build_key(&self, entity_key: &str, field_name: &str) -> String {
        field_key(entity_key, field_name)
    }

    // --- 计数器 ---

    /// 键不存在时返回 `None`；存储的 0 返回 `Some(0)`
    pub async fn get_counter(&self, key: &str) -> Result<Option<i64>> {
        debug!(key, "get counter");
        match self.client.get(key).await? {
            None => Ok(None),
            Some(bytes) => Ok(Some(std::str::from_utf8(&bytes)?.parse::<i64>()?)),
        }
    }

    pub async fn increment(&self, key: &str) -> Result<i64> {
        debug!(key, "increment");
        self.client.incr(key).await
    }

    pub async fn decrement(&self, key: &str) -> Result<i64> {
        debug!(key, "decrement");
        self.client.decr(key).await
    }

    // --- 字符串 ---

    pub async fn get_string(&self, key: &str) -> Result<Option<Vec<u8>>> {
        debug!(key, "get string");
        self.client.get(key).await
    }

    /// 追加并返回新长度
    pub async fn append_string(&self, key: &str, value: &[u8]) -> Result<usize> {
        debug!(key, len = value.len(), "append string");
        self.client.append(key, value).await
    }

    pub async fn exists_string(&self, key: &str) -> Result<bool> {
        debug!(key, "exists string");
        self.client.exists(key).await
    }

    // --- 对象 ---

    pub async fn get_object<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        debug!(key, "get object");
        match self.client.get(key).await? {
            None => Ok(None),
            Some(bytes) => Ok(Some(self.codec.decode(&bytes)?)),
        }
    }

    pub async fn set_object<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let bytes = self.codec.encode(value)?;
        debug!(key, len = bytes.len(), "set object");
        self.client.set(key, &bytes).await
    }

    // --- 列表 ---

    /// 获取列表句柄；不产生 I/O
    pub fn get_list<T>(&self, key: &str) -> ListHandle<T, K> {
        ListHandle::new(
            Arc::clone(&self.client),
            self.codec.clone(),
            key.to_owned(),
            self.list_page_size,
        )
    }
}
