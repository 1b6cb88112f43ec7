//! 宿主实体持久化（persist）
//!
//! 本库只需要宿主实体框架的两项能力：
//! - 保存一个被修改过的实体（`EntityRepository::save`）；
//! - 按名字改写实体的某个属性（`Attributes::set_attribute`，由 `#[entity]` 宏生成）。
//!
//! 具体存储后端（ORM、数据库等）由上层实现 `EntityRepository` 并注入。
//!
mod attribute;
mod entity_repository;

pub use attribute::{Attributes, decode_attribute, unknown_attribute};
pub use serde_json::Value;
pub use entity_repository::{EntityRepository, InMemoryEntityRepository};
