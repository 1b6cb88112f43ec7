//! 统一错误定义
//!
//! 覆盖存储访问、编解码、字段注册与持久化同步几类失败。
//! 本层不做任何本地恢复：外部存储与编解码器的错误原样向调用方传播。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FieldError {
    // --- 存储 ---
    #[error("store unavailable: {reason}")]
    StoreUnavailable { reason: String },
    #[error("store rejected operation: {reason}")]
    StoreRejected { reason: String },

    // --- 编解码 ---
    #[error("decode error: {reason}")]
    Decode { reason: String },
    #[error("encode error: {reason}")]
    Encode { reason: String },

    // --- 字段注册 ---
    #[error("name collision on {entity}: `{name}` is already taken")]
    NameCollision { entity: String, name: String },
    #[error("invalid field descriptor: {reason}")]
    InvalidDescriptor { reason: String },
    #[error("unknown field on {entity}: `{name}`")]
    UnknownField { entity: String, name: String },
    #[error("kind mismatch for field `{name}`: expected={expected}, found={found}")]
    KindMismatch {
        name: String,
        expected: String,
        found: String,
    },
    #[error("entity {entity} has persisted fields but no repository was supplied")]
    MissingRepository { entity: String },

    // --- 持久化同步 ---
    #[error("persist error: {reason}")]
    Persist { reason: String },

    // --- 配置 ---
    #[error("config error: {reason}")]
    Config { reason: String },
}

/// 统一 Result 类型别名
pub type FieldResult<T> = Result<T, FieldError>;

impl FieldError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            reason: reason.into(),
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::StoreRejected {
            reason: reason.into(),
        }
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    pub fn encode(reason: impl Into<String>) -> Self {
        Self::Encode {
            reason: reason.into(),
        }
    }

    pub fn invalid_descriptor(reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            reason: reason.into(),
        }
    }

    pub fn persist(reason: impl Into<String>) -> Self {
        Self::Persist {
            reason: reason.into(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

// ---- 基础设施错误转换 ----
// 允许在客户端实现中直接使用 `?` 转换为 FieldError

#[cfg(feature = "redis")]
impl From<redis::RedisError> for FieldError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_dropped()
            || err.is_connection_refusal()
            || err.is_timeout()
        {
            FieldError::unavailable(err.to_string())
        } else {
            FieldError::rejected(err.to_string())
        }
    }
}

impl From<std::num::ParseIntError> for FieldError {
    fn from(err: std::num::ParseIntError) -> Self {
        FieldError::decode(err.to_string())
    }
}

impl From<std::str::Utf8Error> for FieldError {
    fn from(err: std::str::Utf8Error) -> Self {
        FieldError::decode(err.to_string())
    }
}
