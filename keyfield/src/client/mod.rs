//! 键值存储客户端（client）
//!
//! 以异步 trait 描述本库对外部键值存储的最小需求：标量读写、原子增减、
//! 追加、存在性判断以及列表的头尾插入、长度与区间读取。
//! - `InMemoryClient`：进程内实现，用于测试、示例与本地开发；
//! - `RedisClient`（`redis` 特性）：基于 `redis::aio::ConnectionManager` 的真实实现。
//!
//! 连接管理、重试与线协议均由具体客户端负责，本层不做任何补偿。
//!
mod client_inmemory;
#[cfg(feature = "redis")]
mod client_redis;
mod kv_client;

pub use client_inmemory::InMemoryClient;
#[cfg(feature = "redis")]
pub use client_redis::RedisClient;
pub use kv_client::KeyValueClient;
