//! 键名约定
//!
//! 实体标识键：`{namespace}:{kind}:{id}`；字段键：`{标识键}:{字段名}`。
//! 两者都是确定性的字符串拼接，不涉及 I/O。
//!
use std::fmt::Display;

/// 键分隔符
pub const KEY_DELIMITER: &str = ":";

/// 由命名空间、实体类别与实体标识拼出实体标识键
pub fn identity_key(namespace: &str, kind: &str, id: &impl Display) -> String {
    format!("{namespace}{KEY_DELIMITER}{kind}{KEY_DELIMITER}{id}")
}

/// 在实体标识键后追加字段名得到字段键
pub fn field_key(entity_key: &str, field_name: &str) -> String {
    let mut key = String::with_capacity(entity_key.len() + KEY_DELIMITER.len() + field_name.len());
    key.push_str(entity_key);
    key.push_str(KEY_DELIMITER);
    key.push_str(field_name);
    key
}
