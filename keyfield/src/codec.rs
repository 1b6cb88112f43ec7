//! 编解码器（Codec）
//!
//! 对象字段与列表元素在写入存储前经由编解码器转为字节。
//! 同一部署内必须使用一致的编解码器；用另一种编解码器写入的数据在解码时
//! 会以 `FieldError::Decode` 显式失败。
//!
use crate::error::{FieldError, FieldResult as Result};
use serde::{Serialize, de::DeserializeOwned};

/// 可插拔的编解码器
pub trait Codec: Clone + Send + Sync + 'static {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized;

    fn decode<T>(&self, bytes: &[u8]) -> Result<T>
    where
        T: DeserializeOwned;
}

/// 基于 serde_json 的默认编解码器
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_vec(value).map_err(|e| FieldError::encode(e.to_string()))
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(bytes).map_err(|e| FieldError::decode(e.to_string()))
    }
}

/// 基于 rmp-serde 的紧凑二进制编解码器
#[cfg(feature = "msgpack")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackCodec;

#[cfg(feature = "msgpack")]
impl Codec for MsgPackCodec {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        rmp_serde::to_vec_named(value).map_err(|e| FieldError::encode(e.to_string()))
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        rmp_serde::from_slice(bytes).map_err(|e| FieldError::decode(e.to_string()))
    }
}
