//! 实体（Entity）基础抽象
//!
//! 宿主实体需提供唯一标识；挂载 Redis 字段时还需提供实体标识键（`redis_key`），
//! 默认由命名空间、实体类别与标识拼接，允许按类型覆写。
//!
use crate::key::identity_key;
use std::{fmt::Display, str::FromStr};

/// 具备唯一标识的实体抽象
pub trait Entity: Send + Sync {
    /// 实体标识类型，要求可解析、可显示与可克隆
    type Id: FromStr + Clone + Display;

    /// 使用给定标识创建实体
    fn new(id: Self::Id) -> Self;

    /// 获取实体标识
    fn id(&self) -> &Self::Id;
}

/// 可在键值存储中寻址的实体
///
/// `NAMESPACE` 与 `KIND` 对应标识键的前两段；通常由 `#[entity]` 宏生成。
pub trait KeyedEntity: Entity {
    const NAMESPACE: &'static str;
    const KIND: &'static str;

    /// 实体标识键，在实体生命周期内保持稳定
    fn redis_key(&self) -> String {
        identity_key(Self::NAMESPACE, Self::KIND, self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Post {
        id: u64,
    }

    impl Entity for Post {
        type Id = u64;

        fn new(id: Self::Id) -> Self {
            Self { id }
        }

        fn id(&self) -> &Self::Id {
            &self.id
        }
    }

    impl KeyedEntity for Post {
        const NAMESPACE: &'static str = "blog";
        const KIND: &'static str = "post";
    }

    struct Tenant {
        id: String,
    }

    impl Entity for Tenant {
        type Id = String;

        fn new(id: Self::Id) -> Self {
            Self { id }
        }

        fn id(&self) -> &Self::Id {
            &self.id
        }
    }

    impl KeyedEntity for Tenant {
        const NAMESPACE: &'static str = "accounts";
        const KIND: &'static str = "tenant";

        fn redis_key(&self) -> String {
            format!("unique_space:{}", self.id)
        }
    }

    #[test]
    fn default_key_joins_namespace_kind_and_id() {
        assert_eq!(Post::new(42).redis_key(), "blog:post:42");
    }

    #[test]
    fn redis_key_can_be_overridden() {
        assert_eq!(Tenant::new("acme".into()).redis_key(), "unique_space:acme");
    }
}
