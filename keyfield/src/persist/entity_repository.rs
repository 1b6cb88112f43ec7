use crate::entity::Entity;
use crate::error::FieldResult as Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 宿主实体的保存能力
#[async_trait]
pub trait EntityRepository<E>: Send + Sync
where
    E: Entity,
{
    async fn save(&self, entity: &E) -> Result<()>;
}

#[async_trait]
impl<E, T> EntityRepository<E> for Arc<T>
where
    E: Entity,
    T: EntityRepository<E> + ?Sized,
{
    async fn save(&self, entity: &E) -> Result<()> {
        (**self).save(entity).await
    }
}

/// 内存版实体仓储，按标识保存实体的克隆；用于测试与示例
pub struct InMemoryEntityRepository<E> {
    rows: DashMap<String, E>,
    saves: AtomicUsize,
}

impl<E> Default for InMemoryEntityRepository<E> {
    fn default() -> Self {
        Self {
            rows: DashMap::new(),
            saves: AtomicUsize::new(0),
        }
    }
}

impl<E> InMemoryEntityRepository<E>
where
    E: Entity + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, id: &E::Id) -> Option<E> {
        self.rows.get(&id.to_string()).map(|row| row.value().clone())
    }

    /// 累计保存次数
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<E> EntityRepository<E> for InMemoryEntityRepository<E>
where
    E: Entity + Clone,
{
    async fn save(&self, entity: &E) -> Result<()> {
        self.rows.insert(entity.id().to_string(), entity.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
