use keyfield::entity::{Entity, KeyedEntity};
use keyfield_macros::entity;

// 已有的 id 字段被移到最前并沿用原定义
#[entity]
struct UserProfile {
    nickname: String,
    id: String,
}

fn main() {
    assert_eq!(UserProfile::KIND, "userprofile");
    assert!(!UserProfile::NAMESPACE.is_empty());

    let profile = UserProfile::new("u-1".to_string());
    let expected = format!("{}:userprofile:u-1", UserProfile::NAMESPACE);
    assert_eq!(profile.redis_key(), expected);
    assert!(profile.nickname.is_empty());
}
