//! 字段绑定（binder）
//!
//! 在类型注册时为实体类型生成各字段的访问/修改操作，并登记到显式的注册表中：
//! - `FieldBinder`：注册阶段，校验名字冲突并累积操作表；
//! - `BoundFields`：注册完成后的不可变操作表，按字段名取得绑定到具体实体的句柄；
//! - `CounterField` / `StringField` / `ObjectField` / `ListField`：按字段类别生成的操作。
//!
//! 每个操作都先通过 `KeyedEntity::redis_key` 解析实体标识键，再经
//! `KeyedStore::build_key` 得到字段键，最后委托给 `KeyedStore`。
//!
mod bound_fields;
mod field_binder;
mod handles;

pub use bound_fields::{BoundFields, BoundOperation};
pub use field_binder::FieldBinder;
pub use handles::{CounterField, ListField, ObjectField, StringField};

use crate::entity::KeyedEntity;
use crate::persist::Attributes;

/// 可挂载 Redis 字段的宿主实体
///
/// 需要可寻址（`KeyedEntity`），并能按名字改写属性以支持持久化同步。
pub trait FieldHost: KeyedEntity + Attributes + 'static {}

impl<E> FieldHost for E where E: KeyedEntity + Attributes + 'static {}

/// 错误信息中使用的实体类型名
pub(crate) fn entity_label<E: KeyedEntity>() -> String {
    format!("{}:{}", E::NAMESPACE, E::KIND)
}
