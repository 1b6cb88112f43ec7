use anyhow::Result;
use keyfield::binder::FieldBinder;
use keyfield::client::{InMemoryClient, KeyValueClient, RedisClient};
use keyfield::config::{ENV_HOST, ENV_URL, RedisConfig};
use keyfield::entity::{Entity, KeyedEntity};
use keyfield::persist::{EntityRepository, InMemoryEntityRepository};
use keyfield::store::KeyedStore;
use keyfield_macros::entity;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[entity(id = u64, namespace = "blog", kind = "post")]
#[derive(Clone)]
struct Post {
    title: String,
    view_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Comment {
    author: String,
    text: String,
}

// 设置了连接环境变量时使用真实 Redis，否则退回内存客户端
async fn client() -> Result<Arc<dyn KeyValueClient>> {
    if std::env::var_os(ENV_URL).is_some() || std::env::var_os(ENV_HOST).is_some() {
        let config = RedisConfig::from_env()?;
        Ok(Arc::new(RedisClient::connect(&config).await?))
    } else {
        tracing::info!("no redis configured, using in-memory client");
        Ok(Arc::new(InMemoryClient::new()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let store = KeyedStore::new(client().await?);
    let repo = Arc::new(InMemoryEntityRepository::<Post>::new());

    let mut binder = FieldBinder::<Post>::new(store)
        .with_repository(repo.clone() as Arc<dyn EntityRepository<Post>>);
    binder
        .counter_persisted("views", "view_count")?
        .list("comments")?;
    let fields = binder.finish();

    let mut post = Post::new(42);
    post.title = "hello keyfield".into();
    println!("identity key: {}", post.redis_key());

    let views = fields.counter(&post, "views")?;
    views.incr().await?;
    views.incr().await?;
    println!("{} = {:?}", views.key(), views.get().await?);

    let comments = fields.list::<Comment>(&post, "comments")?;
    comments
        .rpush(&Comment {
            author: "ada".into(),
            text: "first".into(),
        })
        .await?;
    let all = comments
        .lpush(&Comment {
            author: "bob".into(),
            text: "zeroth".into(),
        })
        .await?
        .to_vec()
        .await?;
    println!("comments: {:?}", all);

    views.save(&mut post).await?;
    println!(
        "persisted view_count={:?} (saves: {})",
        repo.load(post.id()).and_then(|p| p.view_count),
        repo.save_count()
    );

    println!("generated operations:");
    for name in fields.operation_names() {
        println!("  {name}");
    }

    Ok(())
}
