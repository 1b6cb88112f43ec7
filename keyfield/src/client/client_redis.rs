//! Redis 键值客户端（RedisClient）
//!
//! 基于 `redis::aio::ConnectionManager`：连接可廉价克隆、断线自动重连。
//! 连接/传输失败映射为 `StoreUnavailable`，服务端错误回复映射为 `StoreRejected`。

use crate::client::KeyValueClient;
use crate::config::RedisConfig;
use crate::error::FieldResult as Result;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

/// Redis 客户端，克隆后共享同一条多路复用连接
#[derive(Clone)]
pub struct RedisClient {
    conn: ConnectionManager,
}

impl RedisClient {
    /// 按配置建立连接
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url())?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!(
            host = %config.host,
            port = config.port,
            database = config.database,
            "redis client connected"
        );
        Ok(Self { conn })
    }

    /// 复用已有的连接管理器
    pub fn from_manager(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

#[async_trait]
impl KeyValueClient for RedisClient {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value: Option<Vec<u8>> = self.conn().get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let () = self.conn().set(key, value).await?;
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let value: i64 = self.conn().incr(key, 1_i64).await?;
        Ok(value)
    }

    async fn decr(&self, key: &str) -> Result<i64> {
        let value: i64 = self.conn().decr(key, 1_i64).await?;
        Ok(value)
    }

    async fn append(&self, key: &str, value: &[u8]) -> Result<usize> {
        let len: usize = self.conn().append(key, value).await?;
        Ok(len)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let exists: bool = self.conn().exists(key).await?;
        Ok(exists)
    }

    async fn push_front(&self, key: &str, value: &[u8]) -> Result<usize> {
        let len: usize = self.conn().lpush(key, value).await?;
        Ok(len)
    }

    async fn push_back(&self, key: &str, value: &[u8]) -> Result<usize> {
        let len: usize = self.conn().rpush(key, value).await?;
        Ok(len)
    }

    async fn list_len(&self, key: &str) -> Result<usize> {
        let len: usize = self.conn().llen(key).await?;
        Ok(len)
    }

    async fn list_range(&self, key: &str, start: usize, stop: usize) -> Result<Vec<Vec<u8>>> {
        let start = isize::try_from(start).unwrap_or(isize::MAX);
        let stop = isize::try_from(stop).unwrap_or(isize::MAX);
        let items: Vec<Vec<u8>> = self.conn().lrange(key, start, stop).await?;
        Ok(items)
    }
}
