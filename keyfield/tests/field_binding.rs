use anyhow::Result as AnyResult;
use keyfield::binder::{BoundFields, FieldBinder};
use keyfield::client::{InMemoryClient, KeyValueClient};
use keyfield::descriptor::{FieldKind, FieldOperation};
use keyfield::entity::{Entity, KeyedEntity};
use keyfield::error::FieldError;
use keyfield::persist::{EntityRepository, InMemoryEntityRepository};
use keyfield::store::KeyedStore;
use keyfield_macros::entity;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[entity(id = u64, namespace = "blog", kind = "post")]
#[derive(Clone, PartialEq)]
struct Post {
    title: String,
    view_count: Option<i64>,
    summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Draft {
    body: String,
    revision: u32,
}

#[entity(id = u64, namespace = "blog", kind = "page")]
#[derive(Clone)]
struct Page {
    view_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip)]
    cached_html: String,
}

struct Fixture {
    client: Arc<InMemoryClient>,
    repo: Arc<InMemoryEntityRepository<Post>>,
    fields: BoundFields<Post>,
}

fn fixture() -> AnyResult<Fixture> {
    let client = Arc::new(InMemoryClient::new());
    let repo = Arc::new(InMemoryEntityRepository::<Post>::new());
    let store = KeyedStore::new(client.clone());

    let mut binder = FieldBinder::<Post>::new(store)
        .with_repository(repo.clone() as Arc<dyn EntityRepository<Post>>);
    binder
        .counter_persisted("views", "view_count")?
        .counter("likes")?
        .string_persisted("bio", "summary")?
        .string("notes")?
        .object("draft")?
        .list("tags")?;

    Ok(Fixture {
        client,
        repo,
        fields: binder.finish(),
    })
}

#[tokio::test]
async fn post_scenario() -> AnyResult<()> {
    let fx = fixture()?;
    let post = Post::new(42);
    assert_eq!(post.redis_key(), "blog:post:42");

    let views = fx.fields.counter(&post, "views")?;
    assert_eq!(views.key(), "blog:post:42:views");

    views.incr().await?;
    views.incr().await?;
    assert_eq!(views.get().await?, Some(2));
    assert_eq!(fx.client.get("blog:post:42:views").await?, Some(b"2".to_vec()));
    Ok(())
}

#[tokio::test]
async fn counter_absent_then_incr_then_decr() -> AnyResult<()> {
    let fx = fixture()?;
    let likes = fx.fields.counter(&Post::new(1), "likes")?;

    assert_eq!(likes.get().await?, None);
    assert_eq!(likes.incr().await?, 1);
    assert_eq!(likes.get().await?, Some(1));
    assert_eq!(likes.decr().await?, 0);
    assert_eq!(likes.get().await?, Some(0));
    Ok(())
}

#[tokio::test]
async fn string_exists_and_append() -> AnyResult<()> {
    let fx = fixture()?;
    let notes = fx.fields.string(&Post::new(1), "notes")?;

    assert!(!notes.exists().await?);
    assert_eq!(notes.append("a").await?, 1);
    assert!(notes.exists().await?);
    assert_eq!(notes.append(b"b").await?, 2);
    assert_eq!(notes.get().await?, Some(b"ab".to_vec()));
    Ok(())
}

#[tokio::test]
async fn object_round_trip() -> AnyResult<()> {
    let fx = fixture()?;
    let draft = fx.fields.object::<Draft>(&Post::new(1), "draft")?;
    let value = Draft {
        body: "lorem".into(),
        revision: 3,
    };

    assert_eq!(draft.get().await?, None);
    draft.set(&value).await?;
    assert_eq!(draft.get().await?, Some(value));
    Ok(())
}

#[tokio::test]
async fn list_lpush_then_rpush() -> AnyResult<()> {
    let fx = fixture()?;
    let tags = fx.fields.list::<String>(&Post::new(1), "tags")?;

    tags.lpush(&"v1".to_string()).await?;
    let handle = tags.rpush(&"v2".to_string()).await?;
    assert_eq!(handle.to_vec().await?, vec!["v1", "v2"]);
    assert_eq!(tags.get().len().await?, 2);
    Ok(())
}

#[tokio::test]
async fn entities_do_not_share_fields() -> AnyResult<()> {
    let fx = fixture()?;
    let a = Post::new(4);
    let b = Post::new(42);

    fx.fields.counter(&a, "likes")?.incr().await?;
    assert_eq!(fx.fields.counter(&b, "likes")?.get().await?, None);
    assert_ne!(
        fx.fields.counter(&a, "likes")?.key(),
        fx.fields.counter(&b, "likes")?.key()
    );
    Ok(())
}

#[tokio::test]
async fn counter_save_copies_value_and_persists() -> AnyResult<()> {
    let fx = fixture()?;
    let mut post = Post::new(7);
    let views = fx.fields.counter(&post, "views")?;

    // 键不存在时写入 null
    views.save(&mut post).await?;
    assert_eq!(post.view_count, None);
    assert_eq!(fx.repo.save_count(), 1);

    views.incr().await?;
    views.incr().await?;
    views.incr().await?;
    views.save(&mut post).await?;
    assert_eq!(post.view_count, Some(3));

    let stored = fx.repo.load(&7).expect("saved");
    assert_eq!(stored, post);
    assert_eq!(fx.repo.save_count(), 2);
    Ok(())
}

#[tokio::test]
async fn string_save_copies_text() -> AnyResult<()> {
    let fx = fixture()?;
    let mut post = Post::new(8);
    let bio = fx.fields.string(&post, "bio")?;

    bio.append("hello ").await?;
    bio.append("world").await?;
    bio.save(&mut post).await?;

    assert_eq!(post.summary.as_deref(), Some("hello world"));
    assert_eq!(fx.repo.load(&8).and_then(|p| p.summary).as_deref(), Some("hello world"));
    Ok(())
}

#[tokio::test]
async fn string_save_rejects_binary_payload() -> AnyResult<()> {
    let fx = fixture()?;
    let mut post = Post::new(9);
    let bio = fx.fields.string(&post, "bio")?;
    bio.append([0xff_u8, 0xfe]).await?;

    let err = bio.save(&mut post).await.unwrap_err();
    assert!(matches!(err, FieldError::Encode { .. }));
    assert_eq!(post.summary, None);
    assert_eq!(fx.repo.save_count(), 0);
    Ok(())
}

#[tokio::test]
async fn save_writes_only_the_target_attribute() -> AnyResult<()> {
    let client = Arc::new(InMemoryClient::new());
    let repo = Arc::new(InMemoryEntityRepository::<Page>::new());
    let mut binder = FieldBinder::<Page>::new(KeyedStore::new(client))
        .with_repository(repo.clone() as Arc<dyn EntityRepository<Page>>);
    binder
        .counter_persisted("views", "view_count")?
        .string_persisted("abstract", "summary")?;
    let fields = binder.finish();

    let mut page = Page::new(3);
    page.cached_html = "<p>rendered</p>".into();

    fields.counter(&page, "views")?.incr().await?;
    fields.counter(&page, "views")?.save(&mut page).await?;
    fields.string(&page, "abstract")?.append("short").await?;
    fields.string(&page, "abstract")?.save(&mut page).await?;

    assert_eq!(page.view_count, Some(1));
    assert_eq!(page.summary.as_deref(), Some("short"));
    assert_eq!(page.cached_html, "<p>rendered</p>");
    assert_eq!(
        repo.load(&3).map(|p| p.cached_html).as_deref(),
        Some("<p>rendered</p>")
    );

    // 被 serde 跳过的属性仍占用名字，但不能作为持久化目标
    let mut binder = FieldBinder::<Page>::new(KeyedStore::new(Arc::new(InMemoryClient::new())))
        .with_repository(repo.clone() as Arc<dyn EntityRepository<Page>>);
    assert!(matches!(
        binder.counter("cached_html").unwrap_err(),
        FieldError::NameCollision { .. }
    ));
    assert!(matches!(
        binder.string_persisted("html", "cached_html").unwrap_err(),
        FieldError::InvalidDescriptor { .. }
    ));
    Ok(())
}

#[tokio::test]
async fn save_without_persist_target_is_not_generated() -> AnyResult<()> {
    let fx = fixture()?;
    let mut post = Post::new(10);
    assert!(fx.fields.operation("likes_save").is_none());

    let err = fx
        .fields
        .counter(&post, "likes")?
        .save(&mut post)
        .await
        .unwrap_err();
    assert!(matches!(err, FieldError::UnknownField { ref name, .. } if name == "likes_save"));
    Ok(())
}

#[tokio::test]
async fn save_with_another_entity_is_refused() -> AnyResult<()> {
    let fx = fixture()?;
    let post = Post::new(11);
    let mut other = Post::new(12);

    let err = fx
        .fields
        .counter(&post, "views")?
        .save(&mut other)
        .await
        .unwrap_err();
    assert!(matches!(err, FieldError::Persist { .. }));
    assert_eq!(fx.repo.save_count(), 0);
    Ok(())
}

#[test]
fn lookups_check_name_and_kind() -> AnyResult<()> {
    let fx = fixture()?;
    let post = Post::new(1);

    let err = fx.fields.counter(&post, "missing").err().expect("unknown");
    assert!(matches!(err, FieldError::UnknownField { .. }));

    let err = fx.fields.string(&post, "views").err().expect("mismatch");
    match err {
        FieldError::KindMismatch {
            expected, found, ..
        } => {
            assert_eq!(expected, "string");
            assert_eq!(found, "counter");
        }
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

#[test]
fn operation_table_describes_generated_methods() -> AnyResult<()> {
    let fx = fixture()?;

    let op = fx.fields.operation("views_save").expect("generated");
    assert_eq!(op.field(), "views");
    assert_eq!(op.kind(), FieldKind::Counter);
    assert_eq!(op.operation(), FieldOperation::Save);

    let op = fx.fields.operation("tags_lpush").expect("generated");
    assert_eq!(op.operation(), FieldOperation::LPush);

    assert_eq!(fx.fields.operation_names().count(), 19);
    assert_eq!(fx.fields.descriptors().count(), 6);
    assert_eq!(
        fx.fields.descriptor("bio").and_then(|d| d.persist_field()),
        Some("summary")
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_increments_are_atomic() -> AnyResult<()> {
    let fx = fixture()?;
    let fields = Arc::new(fx.fields);

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let fields = Arc::clone(&fields);
        tasks.push(tokio::spawn(async move {
            let post = Post::new(99);
            for _ in 0..25 {
                fields.counter(&post, "likes")?.incr().await?;
            }
            Ok::<_, FieldError>(())
        }));
    }
    for task in tasks {
        task.await??;
    }

    assert_eq!(fields.counter(&Post::new(99), "likes")?.get().await?, Some(200));
    Ok(())
}
