use crate::error::{FieldError, FieldResult as Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// 按名字改写单个属性的能力；通常由 `#[entity]` 宏按字段生成
///
/// `set_attribute` 只写入目标属性，其余属性（包括 `#[serde(skip)]` 的）保持原样。
/// 值与属性类型不兼容时返回 `FieldError::Persist`，实体不变。
pub trait Attributes {
    /// 实体的全部属性名，参与字段名冲突检查
    const ATTRIBUTES: &'static [&'static str];

    /// 可作为持久化目标的属性名
    const WRITABLE_ATTRIBUTES: &'static [&'static str];

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()>;
}

/// 把值解码为属性类型；供生成的 `set_attribute` 使用
pub fn decode_attribute<T>(attribute: &str, value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(value).map_err(|e| {
        tracing::warn!(attribute, error = %e, "persist target rejected value");
        FieldError::persist(format!("attribute `{attribute}`: {e}"))
    })
}

/// 目标属性不存在或不可写
pub fn unknown_attribute<E: ?Sized>(attribute: &str) -> FieldError {
    FieldError::persist(format!(
        "{} has no writable attribute `{attribute}`",
        std::any::type_name::<E>()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Post {
        id: u64,
        view_count: Option<i64>,
        likes: i64,
        rendered: String,
    }

    impl Attributes for Post {
        const ATTRIBUTES: &'static [&'static str] = &["id", "view_count", "likes", "rendered"];
        const WRITABLE_ATTRIBUTES: &'static [&'static str] = &["view_count", "likes"];

        fn set_attribute(&mut self, name: &str, value: Value) -> Result<()> {
            match name {
                "view_count" => self.view_count = decode_attribute(name, value)?,
                "likes" => self.likes = decode_attribute(name, value)?,
                other => return Err(unknown_attribute::<Self>(other)),
            }
            Ok(())
        }
    }

    #[test]
    fn sets_value_and_null_without_touching_others() {
        let mut post = Post {
            id: 1,
            rendered: "<p>cached</p>".into(),
            ..Default::default()
        };
        post.set_attribute("view_count", json!(7)).unwrap();
        assert_eq!(post.view_count, Some(7));

        post.set_attribute("view_count", Value::Null).unwrap();
        assert_eq!(post.view_count, None);
        assert_eq!(post.id, 1);
        assert_eq!(post.rendered, "<p>cached</p>");
    }

    #[test]
    fn incompatible_value_leaves_entity_untouched() {
        let mut post = Post {
            likes: 3,
            ..Default::default()
        };
        let err = post.set_attribute("likes", Value::Null).unwrap_err();
        assert!(matches!(err, FieldError::Persist { .. }));
        assert_eq!(post.likes, 3);

        let err = post.set_attribute("missing", json!(1)).unwrap_err();
        assert!(matches!(err, FieldError::Persist { .. }));
    }
}
