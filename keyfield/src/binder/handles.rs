use crate::binder::{BoundFields, FieldHost, entity_label};
use crate::codec::Codec;
use crate::descriptor::{FieldDescriptor, FieldOperation};
use crate::error::{FieldError, FieldResult as Result};
use crate::store::{KeyedStore, ListHandle};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::marker::PhantomData;
use tracing::debug;

/// 计数器字段：`get_<name>`、`<name>_incr`、`<name>_decr`、`<name>_save`
pub struct CounterField<'a, E, K: Codec> {
    fields: &'a BoundFields<E, K>,
    descriptor: &'a FieldDescriptor,
    key: String,
}

impl<'a, E, K> CounterField<'a, E, K>
where
    E: FieldHost,
    K: Codec,
{
    pub(crate) fn new(
        fields: &'a BoundFields<E, K>,
        descriptor: &'a FieldDescriptor,
        key: String,
    ) -> Self {
        Self {
            fields,
            descriptor,
            key,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn get(&self) -> Result<Option<i64>> {
        self.fields.store().get_counter(&self.key).await
    }

    pub async fn incr(&self) -> Result<i64> {
        self.fields.store().increment(&self.key).await
    }

    pub async fn decr(&self) -> Result<i64> {
        self.fields.store().decrement(&self.key).await
    }

    /// 把当前值写入持久化目标属性并保存实体；键不存在时写入 null
    pub async fn save(&self, entity: &mut E) -> Result<()> {
        let value = match self.get().await? {
            Some(n) => Value::from(n),
            None => Value::Null,
        };
        persist_sync(self.fields, self.descriptor, &self.key, entity, value).await
    }
}

/// 字符串字段：`get_<name>`、`<name>_append`、`<name>_exists`、`<name>_save`
pub struct StringField<'a, E, K: Codec> {
    fields: &'a BoundFields<E, K>,
    descriptor: &'a FieldDescriptor,
    key: String,
}

impl<'a, E, K> StringField<'a, E, K>
where
    E: FieldHost,
    K: Codec,
{
    pub(crate) fn new(
        fields: &'a BoundFields<E, K>,
        descriptor: &'a FieldDescriptor,
        key: String,
    ) -> Self {
        Self {
            fields,
            descriptor,
            key,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn get(&self) -> Result<Option<Vec<u8>>> {
        self.fields.store().get_string(&self.key).await
    }

    /// 追加并返回新长度
    pub async fn append(&self, value: impl AsRef<[u8]>) -> Result<usize> {
        self.fields
            .store()
            .append_string(&self.key, value.as_ref())
            .await
    }

    pub async fn exists(&self) -> Result<bool> {
        self.fields.store().exists_string(&self.key).await
    }

    /// 把当前值（UTF-8 文本）写入持久化目标属性并保存实体；键不存在时写入 null
    pub async fn save(&self, entity: &mut E) -> Result<()> {
        let value = match self.get().await? {
            Some(bytes) => Value::String(String::from_utf8(bytes).map_err(|e| {
                FieldError::encode(format!("`{}` is not valid UTF-8: {e}", self.key))
            })?),
            None => Value::Null,
        };
        persist_sync(self.fields, self.descriptor, &self.key, entity, value).await
    }
}

/// 对象字段：`get_<name>`、`<name>_set`
pub struct ObjectField<'a, T, K: Codec> {
    store: &'a KeyedStore<K>,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T, K> ObjectField<'a, T, K>
where
    T: Serialize + DeserializeOwned,
    K: Codec,
{
    pub(crate) fn new(store: &'a KeyedStore<K>, key: String) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn get(&self) -> Result<Option<T>> {
        self.store.get_object(&self.key).await
    }

    pub async fn set(&self, value: &T) -> Result<()> {
        self.store.set_object(&self.key, value).await
    }
}

/// 列表字段：`get_<name>`、`<name>_lpush`、`<name>_rpush`
pub struct ListField<'a, T, K: Codec> {
    store: &'a KeyedStore<K>,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T, K> ListField<'a, T, K>
where
    T: Serialize + DeserializeOwned + Send + 'static,
    K: Codec,
{
    pub(crate) fn new(store: &'a KeyedStore<K>, key: String) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> ListHandle<T, K> {
        self.store.get_list(&self.key)
    }

    /// 头部插入并返回新的列表句柄
    pub async fn lpush(&self, value: &T) -> Result<ListHandle<T, K>> {
        let list = self.get();
        list.push_front(value).await?;
        Ok(list)
    }

    /// 尾部插入并返回新的列表句柄
    pub async fn rpush(&self, value: &T) -> Result<ListHandle<T, K>> {
        let list = self.get();
        list.push_back(value).await?;
        Ok(list)
    }
}

async fn persist_sync<E, K>(
    fields: &BoundFields<E, K>,
    descriptor: &FieldDescriptor,
    key: &str,
    entity: &mut E,
    value: Value,
) -> Result<()>
where
    E: FieldHost,
    K: Codec,
{
    let name = descriptor.name();
    let target = descriptor
        .persist_field()
        .ok_or_else(|| FieldError::UnknownField {
            entity: entity_label::<E>(),
            name: FieldOperation::Save.method_name(name),
        })?;

    // 句柄绑定的实体与传入实体必须一致
    if fields.store().build_key(&entity.redis_key(), name) != key {
        return Err(FieldError::persist(format!(
            "handle for `{key}` used with entity `{}`",
            entity.redis_key()
        )));
    }

    let repository = fields.repository()?;
    entity.set_attribute(target, value)?;
    debug!(key, target, "persist sync");
    repository.save(entity).await
}
