use crate::error::FieldResult as Result;
use async_trait::async_trait;
use std::sync::Arc;

/// 外部键值存储协议
///
/// 语义与 Redis 同名命令保持一致：`incr/decr` 对缺失键从 0 起算，
/// `list_range` 为闭区间且越界部分被截断。
#[async_trait]
pub trait KeyValueClient: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    async fn incr(&self, key: &str) -> Result<i64>;

    async fn decr(&self, key: &str) -> Result<i64>;

    /// 追加字节并返回追加后的总长度
    async fn append(&self, key: &str, value: &[u8]) -> Result<usize>;

    async fn exists(&self, key: &str) -> Result<bool>;

    /// 头部插入，返回插入后的列表长度
    async fn push_front(&self, key: &str, value: &[u8]) -> Result<usize>;

    /// 尾部插入，返回插入后的列表长度
    async fn push_back(&self, key: &str, value: &[u8]) -> Result<usize>;

    async fn list_len(&self, key: &str) -> Result<usize>;

    async fn list_range(&self, key: &str, start: usize, stop: usize) -> Result<Vec<Vec<u8>>>;
}

#[async_trait]
impl<T> KeyValueClient for Arc<T>
where
    T: KeyValueClient + ?Sized,
{
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        (**self).incr(key).await
    }

    async fn decr(&self, key: &str) -> Result<i64> {
        (**self).decr(key).await
    }

    async fn append(&self, key: &str, value: &[u8]) -> Result<usize> {
        (**self).append(key, value).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key).await
    }

    async fn push_front(&self, key: &str, value: &[u8]) -> Result<usize> {
        (**self).push_front(key, value).await
    }

    async fn push_back(&self, key: &str, value: &[u8]) -> Result<usize> {
        (**self).push_back(key, value).await
    }

    async fn list_len(&self, key: &str) -> Result<usize> {
        (**self).list_len(key).await
    }

    async fn list_range(&self, key: &str, start: usize, stop: usize) -> Result<Vec<Vec<u8>>> {
        (**self).list_range(key, start, stop).await
    }
}
