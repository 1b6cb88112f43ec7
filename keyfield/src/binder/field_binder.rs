use crate::binder::{BoundFields, BoundOperation, FieldHost, entity_label};
use crate::codec::{Codec, JsonCodec};
use crate::descriptor::FieldDescriptor;
use crate::error::{FieldError, FieldResult as Result};
use crate::persist::EntityRepository;
use crate::store::KeyedStore;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::info;

/// 注册阶段的字段绑定器。
///
/// 已占用的名字包括：实体自身的属性、已注册的字段名以及已生成的操作名。
/// 注册失败时注册表保持原样。
pub struct FieldBinder<E, K: Codec = JsonCodec> {
    store: KeyedStore<K>,
    repository: Option<Arc<dyn EntityRepository<E>>>,
    taken: HashSet<String>,
    fields: HashMap<String, FieldDescriptor>,
    operations: BTreeMap<String, BoundOperation>,
}

impl<E, K> FieldBinder<E, K>
where
    E: FieldHost,
    K: Codec,
{
    pub fn new(store: KeyedStore<K>) -> Self {
        Self {
            store,
            repository: None,
            taken: E::ATTRIBUTES.iter().map(|a| a.to_string()).collect(),
            fields: HashMap::new(),
            operations: BTreeMap::new(),
        }
    }

    /// 持久化同步所用的实体仓储；注册带持久化目标的字段前必须提供
    pub fn with_repository(mut self, repository: Arc<dyn EntityRepository<E>>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn register(&mut self, descriptor: FieldDescriptor) -> Result<&mut Self> {
        let entity = entity_label::<E>();
        let name = descriptor.name().to_owned();

        if self.taken.contains(&name) {
            return Err(FieldError::NameCollision { entity, name });
        }

        let methods: Vec<(String, BoundOperation)> = descriptor
            .operations()
            .into_iter()
            .map(|op| {
                (
                    op.method_name(&name),
                    BoundOperation::new(name.clone(), descriptor.kind(), op),
                )
            })
            .collect();

        if let Some((method, _)) = methods.iter().find(|(m, _)| self.taken.contains(m)) {
            return Err(FieldError::NameCollision {
                entity,
                name: method.clone(),
            });
        }

        if let Some(target) = descriptor.persist_field() {
            if self.repository.is_none() {
                return Err(FieldError::MissingRepository { entity });
            }
            if !E::WRITABLE_ATTRIBUTES.contains(&target) {
                return Err(FieldError::invalid_descriptor(format!(
                    "persist field `{target}` of `{name}` is not a writable attribute of {entity}"
                )));
            }
        }

        info!(
            entity = %entity,
            field = %name,
            kind = %descriptor.kind(),
            persist = descriptor.persist_field().unwrap_or("-"),
            "field bound"
        );

        self.taken.insert(name.clone());
        for (method, op) in methods {
            self.taken.insert(method.clone());
            self.operations.insert(method, op);
        }
        self.fields.insert(name, descriptor);
        Ok(self)
    }

    pub fn counter(&mut self, name: &str) -> Result<&mut Self> {
        self.register(FieldDescriptor::counter(name)?)
    }

    /// 计数器，并生成 `<name>_save` 将当前值同步到 `persist_field`
    pub fn counter_persisted(&mut self, name: &str, persist_field: &str) -> Result<&mut Self> {
        self.register(FieldDescriptor::counter(name)?.persisted_to(persist_field)?)
    }

    pub fn string(&mut self, name: &str) -> Result<&mut Self> {
        self.register(FieldDescriptor::string(name)?)
    }

    pub fn string_persisted(&mut self, name: &str, persist_field: &str) -> Result<&mut Self> {
        self.register(FieldDescriptor::string(name)?.persisted_to(persist_field)?)
    }

    pub fn object(&mut self, name: &str) -> Result<&mut Self> {
        self.register(FieldDescriptor::object(name)?)
    }

    pub fn list(&mut self, name: &str) -> Result<&mut Self> {
        self.register(FieldDescriptor::list(name)?)
    }

    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// 结束注册，得到不可变的操作表
    pub fn finish(self) -> BoundFields<E, K> {
        BoundFields::new(self.store, self.repository, self.fields, self.operations)
    }
}

impl<E, K: Codec> std::fmt::Debug for FieldBinder<E, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinder")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("has_repository", &self.repository.is_some())
            .finish()
    }
}
