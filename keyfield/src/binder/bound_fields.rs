use crate::binder::{CounterField, FieldHost, ListField, ObjectField, StringField, entity_label};
use crate::codec::{Codec, JsonCodec};
use crate::descriptor::{FieldDescriptor, FieldKind, FieldOperation};
use crate::error::{FieldError, FieldResult as Result};
use crate::persist::EntityRepository;
use crate::store::KeyedStore;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::sync::Arc;

/// 操作表中的一项：操作名指向的字段、字段类别与具体操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundOperation {
    field: String,
    kind: FieldKind,
    operation: FieldOperation,
}

impl BoundOperation {
    pub(crate) fn new(field: String, kind: FieldKind, operation: FieldOperation) -> Self {
        Self {
            field,
            kind,
            operation,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn operation(&self) -> FieldOperation {
        self.operation
    }
}

/// 注册完成后的不可变操作表。
///
/// 可放入 `Arc` 在任务间共享；除字段声明外不持有任何可变状态。
pub struct BoundFields<E, K: Codec = JsonCodec> {
    store: KeyedStore<K>,
    repository: Option<Arc<dyn EntityRepository<E>>>,
    fields: HashMap<String, FieldDescriptor>,
    operations: BTreeMap<String, BoundOperation>,
    _marker: PhantomData<fn() -> E>,
}

impl<E, K> BoundFields<E, K>
where
    E: FieldHost,
    K: Codec,
{
    pub(crate) fn new(
        store: KeyedStore<K>,
        repository: Option<Arc<dyn EntityRepository<E>>>,
        fields: HashMap<String, FieldDescriptor>,
        operations: BTreeMap<String, BoundOperation>,
    ) -> Self {
        Self {
            store,
            repository,
            fields,
            operations,
            _marker: PhantomData,
        }
    }

    pub fn store(&self) -> &KeyedStore<K> {
        &self.store
    }

    pub(crate) fn repository(&self) -> Result<&Arc<dyn EntityRepository<E>>> {
        self.repository
            .as_ref()
            .ok_or_else(|| FieldError::MissingRepository {
                entity: entity_label::<E>(),
            })
    }

    pub fn descriptor(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    /// 按操作名查询，例如 `operation("views_incr")`
    pub fn operation(&self, method_name: &str) -> Option<&BoundOperation> {
        self.operations.get(method_name)
    }

    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// 计数器字段句柄
    pub fn counter(&self, entity: &E, name: &str) -> Result<CounterField<'_, E, K>> {
        let descriptor = self.lookup(name, FieldKind::Counter)?;
        Ok(CounterField::new(self, descriptor, self.field_key(entity, name)))
    }

    /// 字符串字段句柄
    pub fn string(&self, entity: &E, name: &str) -> Result<StringField<'_, E, K>> {
        let descriptor = self.lookup(name, FieldKind::String)?;
        Ok(StringField::new(self, descriptor, self.field_key(entity, name)))
    }

    /// 对象字段句柄，`T` 为经编解码器存取的值类型
    pub fn object<T>(&self, entity: &E, name: &str) -> Result<ObjectField<'_, T, K>>
    where
        T: Serialize + DeserializeOwned,
    {
        self.lookup(name, FieldKind::Object)?;
        Ok(ObjectField::new(&self.store, self.field_key(entity, name)))
    }

    /// 列表字段句柄，`T` 为列表元素类型
    pub fn list<T>(&self, entity: &E, name: &str) -> Result<ListField<'_, T, K>>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        self.lookup(name, FieldKind::List)?;
        Ok(ListField::new(&self.store, self.field_key(entity, name)))
    }

    fn field_key(&self, entity: &E, name: &str) -> String {
        self.store.build_key(&entity.redis_key(), name)
    }

    fn lookup(&self, name: &str, expected: FieldKind) -> Result<&FieldDescriptor> {
        let descriptor = self
            .fields
            .get(name)
            .ok_or_else(|| FieldError::UnknownField {
                entity: entity_label::<E>(),
                name: name.to_owned(),
            })?;

        if descriptor.kind() != expected {
            return Err(FieldError::KindMismatch {
                name: name.to_owned(),
                expected: expected.to_string(),
                found: descriptor.kind().to_string(),
            });
        }
        Ok(descriptor)
    }
}

impl<E, K: Codec> std::fmt::Debug for BoundFields<E, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundFields")
            .field("operations", &self.operations.keys().collect::<Vec<_>>())
            .finish()
    }
}
