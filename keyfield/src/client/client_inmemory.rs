//! 内存版键值客户端（InMemoryClient）
//!
//! 基于 `DashMap` 的进程内实现，按 Redis 语义模拟本库用到的命令：
//! - 对字符串键执行列表命令（或反之）返回 WRONGTYPE 拒绝；
//! - 对非整数值执行 `incr/decr` 返回拒绝；
//! - 典型用途：测试环境、示例与本地开发。
//!
//! 单键操作在分片锁内完成，因此 `incr/decr/append/push_*` 在单键上是原子的。

use crate::client::KeyValueClient;
use crate::error::{FieldError, FieldResult as Result};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

#[derive(Debug, Clone)]
enum Slot {
    Bytes(Vec<u8>),
    List(VecDeque<Vec<u8>>),
}

/// 进程内键值客户端，克隆后共享同一份数据
#[derive(Debug, Clone, Default)]
pub struct InMemoryClient {
    slots: Arc<DashMap<String, Slot>>,
}

impl InMemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前保存的键数量
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn add(&self, key: &str, delta: i64) -> Result<i64> {
        let mut slot = self
            .slots
            .entry(key.to_owned())
            .or_insert_with(|| Slot::Bytes(b"0".to_vec()));

        match &mut *slot {
            Slot::Bytes(bytes) => {
                let current = std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|s| s.parse::<i64>().ok())
                    .ok_or_else(|| {
                        FieldError::rejected("value is not an integer or out of range")
                    })?;
                let next = current
                    .checked_add(delta)
                    .ok_or_else(|| FieldError::rejected("increment or decrement would overflow"))?;
                *bytes = next.to_string().into_bytes();
                Ok(next)
            }
            Slot::List(_) => Err(FieldError::rejected(WRONG_TYPE)),
        }
    }

    fn push(&self, key: &str, value: &[u8], front: bool) -> Result<usize> {
        let mut slot = self
            .slots
            .entry(key.to_owned())
            .or_insert_with(|| Slot::List(VecDeque::new()));

        match &mut *slot {
            Slot::List(items) => {
                if front {
                    items.push_front(value.to_vec());
                } else {
                    items.push_back(value.to_vec());
                }
                Ok(items.len())
            }
            Slot::Bytes(_) => Err(FieldError::rejected(WRONG_TYPE)),
        }
    }
}

#[async_trait]
impl KeyValueClient for InMemoryClient {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.slots.get(key).as_deref() {
            None => Ok(None),
            Some(Slot::Bytes(bytes)) => Ok(Some(bytes.clone())),
            Some(Slot::List(_)) => Err(FieldError::rejected(WRONG_TYPE)),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.slots
            .insert(key.to_owned(), Slot::Bytes(value.to_vec()));
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.add(key, 1)
    }

    async fn decr(&self, key: &str) -> Result<i64> {
        self.add(key, -1)
    }

    async fn append(&self, key: &str, value: &[u8]) -> Result<usize> {
        let mut slot = self
            .slots
            .entry(key.to_owned())
            .or_insert_with(|| Slot::Bytes(Vec::new()));

        match &mut *slot {
            Slot::Bytes(bytes) => {
                bytes.extend_from_slice(value);
                Ok(bytes.len())
            }
            Slot::List(_) => Err(FieldError::rejected(WRONG_TYPE)),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.slots.contains_key(key))
    }

    async fn push_front(&self, key: &str, value: &[u8]) -> Result<usize> {
        self.push(key, value, true)
    }

    async fn push_back(&self, key: &str, value: &[u8]) -> Result<usize> {
        self.push(key, value, false)
    }

    async fn list_len(&self, key: &str) -> Result<usize> {
        match self.slots.get(key).as_deref() {
            None => Ok(0),
            Some(Slot::List(items)) => Ok(items.len()),
            Some(Slot::Bytes(_)) => Err(FieldError::rejected(WRONG_TYPE)),
        }
    }

    async fn list_range(&self, key: &str, start: usize, stop: usize) -> Result<Vec<Vec<u8>>> {
        match self.slots.get(key).as_deref() {
            None => Ok(Vec::new()),
            Some(Slot::List(items)) => {
                if start > stop || start >= items.len() {
                    return Ok(Vec::new());
                }
                let end = stop.min(items.len() - 1);
                Ok(items.range(start..=end).cloned().collect())
            }
            Some(Slot::Bytes(_)) => Err(FieldError::rejected(WRONG_TYPE)),
        }
    }
}
