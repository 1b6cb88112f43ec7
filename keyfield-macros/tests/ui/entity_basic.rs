use keyfield::entity::{Entity, KeyedEntity};
use keyfield::persist::{Attributes, Value};
use keyfield_macros::entity;

#[entity(id = u64, namespace = "blog", kind = "post")]
#[derive(Clone)]
struct Post {
    title: String,
    view_count: Option<i64>,
}

fn main() {
    let post = Post::new(42);
    assert_eq!(*post.id(), 42);
    assert_eq!(post.redis_key(), "blog:post:42");
    assert_eq!(post.clone().title, "");
    assert_eq!(post.view_count, None);
    let _ = format!("{:?}", post); // 默认派生 Debug

    assert_eq!(Post::ATTRIBUTES, ["id", "title", "view_count"]);
    assert_eq!(Post::WRITABLE_ATTRIBUTES, ["title", "view_count"]);
    let mut post = post;
    post.set_attribute("view_count", Value::from(5_i64)).unwrap();
    assert_eq!(post.view_count, Some(5));
    assert!(post.set_attribute("id", Value::from(1_i64)).is_err());
}
