//! 带命名空间的键值操作（store）
//!
//! `KeyedStore` 负责拼接字段键并把按字段类别划分的操作分派给外部客户端，
//! 对象与列表元素经由可插拔编解码器转换。`ListHandle` 是远端列表的活句柄。
//!
//! 所有操作都是直通调用：无本地缓存、无重试。
//!
mod keyed_store;
mod list_handle;

pub use keyed_store::{DEFAULT_LIST_PAGE_SIZE, KeyedStore};
pub use list_handle::ListHandle;
