//! 字段声明（FieldDescriptor）
//!
//! 纯声明数据：字段名、字段类别以及可选的持久化目标属性。
//! 在类型注册时创建一次，此后不可变。与目标类型已有属性的冲突检查由 `FieldBinder` 完成。
//!
use crate::error::{FieldError, FieldResult as Result};
use crate::key::KEY_DELIMITER;
use std::fmt;

/// 字段类别，决定为字段生成哪些操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Counter,
    String,
    Object,
    List,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Counter => "counter",
            FieldKind::String => "string",
            FieldKind::Object => "object",
            FieldKind::List => "list",
        }
    }

    /// 该类别是否支持持久化同步
    pub fn supports_persist(&self) -> bool {
        matches!(self, FieldKind::Counter | FieldKind::String)
    }

    fn base_operations(&self) -> &'static [FieldOperation] {
        use FieldOperation::*;
        match self {
            FieldKind::Counter => &[Get, Incr, Decr],
            FieldKind::String => &[Get, Append, Exists],
            FieldKind::Object => &[Get, Set],
            FieldKind::List => &[Get, LPush, RPush],
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 为字段生成的单个操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldOperation {
    Get,
    Incr,
    Decr,
    Append,
    Exists,
    Set,
    LPush,
    RPush,
    Save,
}

impl FieldOperation {
    /// 操作在实体类型上的名字，例如 `get_views`、`views_incr`
    pub fn method_name(&self, field: &str) -> String {
        match self {
            FieldOperation::Get => format!("get_{field}"),
            FieldOperation::Incr => format!("{field}_incr"),
            FieldOperation::Decr => format!("{field}_decr"),
            FieldOperation::Append => format!("{field}_append"),
            FieldOperation::Exists => format!("{field}_exists"),
            FieldOperation::Set => format!("{field}_set"),
            FieldOperation::LPush => format!("{field}_lpush"),
            FieldOperation::RPush => format!("{field}_rpush"),
            FieldOperation::Save => format!("{field}_save"),
        }
    }
}

/// 字段声明
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    persist_field: Option<String>,
}

impl FieldDescriptor {
    pub fn new(
        name: impl Into<String>,
        kind: FieldKind,
        persist_field: Option<String>,
    ) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;

        if let Some(target) = &persist_field {
            if !kind.supports_persist() {
                return Err(FieldError::invalid_descriptor(format!(
                    "{kind} field `{name}` cannot be persisted"
                )));
            }
            if target.trim().is_empty() {
                return Err(FieldError::invalid_descriptor(format!(
                    "persist field of `{name}` must not be empty"
                )));
            }
        }

        Ok(Self {
            name,
            kind,
            persist_field,
        })
    }

    pub fn counter(name: impl Into<String>) -> Result<Self> {
        Self::new(name, FieldKind::Counter, None)
    }

    pub fn string(name: impl Into<String>) -> Result<Self> {
        Self::new(name, FieldKind::String, None)
    }

    pub fn object(name: impl Into<String>) -> Result<Self> {
        Self::new(name, FieldKind::Object, None)
    }

    pub fn list(name: impl Into<String>) -> Result<Self> {
        Self::new(name, FieldKind::List, None)
    }

    /// 指定持久化目标属性（仅计数器与字符串）
    pub fn persisted_to(self, persist_field: impl Into<String>) -> Result<Self> {
        Self::new(self.name, self.kind, Some(persist_field.into()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn persist_field(&self) -> Option<&str> {
        self.persist_field.as_deref()
    }

    /// 按类别生成的操作；设置了持久化目标时追加 `Save`
    pub fn operations(&self) -> Vec<FieldOperation> {
        let mut ops = self.kind.base_operations().to_vec();
        if self.persist_field.is_some() {
            ops.push(FieldOperation::Save);
        }
        ops
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(FieldError::invalid_descriptor("field name must not be empty"));
    }
    if name.contains(KEY_DELIMITER) {
        return Err(FieldError::invalid_descriptor(format!(
            "field name `{name}` must not contain the key delimiter `{KEY_DELIMITER}`"
        )));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(FieldError::invalid_descriptor(format!(
            "field name `{name}` must not contain whitespace"
        )));
    }
    Ok(())
}
