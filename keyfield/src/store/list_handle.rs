use crate::client::KeyValueClient;
use crate::codec::{Codec, JsonCodec};
use crate::error::FieldResult as Result;
use futures_core::stream::BoxStream;
use futures_util::TryStreamExt;
use futures_util::stream;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// 远端列表的活句柄
///
/// 句柄本身不持有任何元素。`iter` 每次调用都从表头重新开始，按页向远端读取，
/// 因而看到的是读取时刻的实时状态而不是快照。
pub struct ListHandle<T, K: Codec = JsonCodec> {
    client: Arc<dyn KeyValueClient>,
    codec: K,
    key: String,
    page_size: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T, K: Codec> Clone for ListHandle<T, K> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            codec: self.codec.clone(),
            key: self.key.clone(),
            page_size: self.page_size,
            _marker: PhantomData,
        }
    }
}

impl<T, K: Codec> std::fmt::Debug for ListHandle<T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListHandle")
            .field("key", &self.key)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl<T, K: Codec> ListHandle<T, K> {
    pub(crate) fn new(
        client: Arc<dyn KeyValueClient>,
        codec: K,
        key: String,
        page_size: usize,
    ) -> Self {
        Self {
            client,
            codec,
            key,
            page_size: page_size.max(1),
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn len(&self) -> Result<usize> {
        self.client.list_len(&self.key).await
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

impl<T, K> ListHandle<T, K>
where
    T: Serialize + DeserializeOwned + Send + 'static,
    K: Codec,
{
    /// 头部插入，返回插入后的长度
    pub async fn push_front(&self, value: &T) -> Result<usize> {
        let bytes = self.codec.encode(value)?;
        debug!(key = %self.key, "list push front");
        self.client.push_front(&self.key, &bytes).await
    }

    /// 尾部插入，返回插入后的长度
    pub async fn push_back(&self, value: &T) -> Result<usize> {
        let bytes = self.codec.encode(value)?;
        debug!(key = %self.key, "list push back");
        self.client.push_back(&self.key, &bytes).await
    }

    /// 惰性遍历：元素在被消费时才按页读取并解码
    ///
    /// 分页按偏移读取，页与页之间不加锁：遍历途中若有元素被 `push_front`，
    /// 后续页会整体后移，已读过的元素可能再次出现；`push_back` 的元素会在末尾被读到。
    /// `to_vec` 同样按页读取，也不是快照。
    pub fn iter(&self) -> BoxStream<'static, Result<T>> {
        let cursor = Cursor {
            client: Arc::clone(&self.client),
            codec: self.codec.clone(),
            key: self.key.clone(),
            page_size: self.page_size,
            offset: 0,
            buffer: VecDeque::new(),
            exhausted: false,
        };

        Box::pin(stream::try_unfold(cursor, Cursor::<K>::next_item::<T>))
    }

    /// 读取当前全部元素
    pub async fn to_vec(&self) -> Result<Vec<T>> {
        self.iter().try_collect().await
    }
}

struct Cursor<K> {
    client: Arc<dyn KeyValueClient>,
    codec: K,
    key: String,
    page_size: usize,
    offset: usize,
    buffer: VecDeque<Vec<u8>>,
    exhausted: bool,
}

impl<K: Codec> Cursor<K> {
    async fn next_item<T>(mut self) -> Result<Option<(T, Self)>>
    where
        T: DeserializeOwned,
    {
        loop {
            if let Some(raw) = self.buffer.pop_front() {
                let value = self.codec.decode(&raw)?;
                return Ok(Some((value, self)));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.fetch_page().await?;
        }
    }

    async fn fetch_page(&mut self) -> Result<()> {
        let stop = self.offset + self.page_size - 1;
        let page = self.client.list_range(&self.key, self.offset, stop).await?;
        debug!(key = %self.key, offset = self.offset, fetched = page.len(), "list page");

        if page.len() < self.page_size {
            self.exhausted = true;
        }
        self.offset += page.len();
        self.buffer.extend(page);
        Ok(())
    }
}
