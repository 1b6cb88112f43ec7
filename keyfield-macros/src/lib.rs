//! keyfield 过程宏
//!
//! - `#[entity]`：为宿主实体补齐 `id` 字段与常用派生，
//!   并实现 `::keyfield::entity::Entity` 与 `::keyfield::entity::KeyedEntity`。
//!
use proc_macro::TokenStream;

mod entity;
mod utils;

/// 实体宏
///
/// 参数（均可省略）：
/// - `id = Type`：标识类型，默认 `String`；
/// - `namespace = "..."`：标识键第一段，默认调用方 crate 名；
/// - `kind = "..."`：标识键第二段，默认结构体名的小写形式；
/// - `debug = false`：不派生 `Debug`；
/// - `keyed = false`：不生成 `KeyedEntity` 实现，便于手写 `redis_key`。
///
/// ```ignore
/// #[entity(id = u64, namespace = "blog", kind = "post")]
/// struct Post {
///     title: String,
///     view_count: Option<i64>,
/// }
/// // Post::new(42).redis_key() == "blog:post:42"
/// ```
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}
