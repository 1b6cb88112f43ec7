use keyfield::entity::{Entity, KeyedEntity};
use keyfield_macros::entity;

#[entity(id = u32, keyed = false, debug = false)]
struct Tenant {
    name: String,
}

impl std::fmt::Debug for Tenant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tenant({})", self.id)
    }
}

impl KeyedEntity for Tenant {
    const NAMESPACE: &'static str = "accounts";
    const KIND: &'static str = "tenant";

    fn redis_key(&self) -> String {
        format!("unique_space:{}", self.id)
    }
}

fn main() {
    let tenant = Tenant::new(7);
    assert_eq!(tenant.redis_key(), "unique_space:7");
    assert_eq!(format!("{:?}", tenant), "Tenant(7)");
    assert!(tenant.name.is_empty());
}
