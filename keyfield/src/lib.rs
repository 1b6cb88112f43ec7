//! Redis 辅助字段基础库（keyfield）
//!
//! 为实体实例挂载存放在键值存储中的辅助字段（计数器、字符串、对象、列表）：
//! - 键名约定（`key`）：`{namespace}:{kind}:{id}:{field}`；
//! - 实体能力（`entity`）：标识与可覆写的实体标识键；
//! - 键值客户端（`client`）与编解码器（`codec`）：外部协作方的最小协议；
//! - 类型化操作（`store`）：`KeyedStore` 与列表活句柄 `ListHandle`；
//! - 字段声明与绑定（`descriptor`、`binder`）：按字段类别生成操作并登记到注册表；
//! - 持久化同步（`persist`）：把存储中的值复制到实体属性并保存实体。
//!
//! 典型用法：
//! 1. 启动时构建一个 `KeyedStore`（注入 `RedisClient` 或 `InMemoryClient`）；
//! 2. 用 `FieldBinder` 为实体类型注册字段，`finish` 得到 `BoundFields`；
//! 3. 通过 `fields.counter(&post, "views")?.incr().await?` 等句柄读写字段。
//!
pub mod binder;
pub mod client;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod entity;
pub mod error;
pub mod key;
pub mod persist;
pub mod store;
