use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::library::LibraryResult;
use crate::identity::IdentityVia;

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // inserts the entity when it has no id yet, otherwise replaces the stored row in place
    async fn save(&self, entity: &Entity) -> LibraryResult<Entity>;

    // get an entity, None when absent
    async fn find_by_id(&self, id: i64) -> LibraryResult<Option<Entity>>;

    // every stored entity
    async fn find_all(&self) -> LibraryResult<Vec<Entity>>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub(crate) enum RepositoryStore {
    DynamoDB,
    LocalDynamoDB,
    InMemory,
}

impl RepositoryStore {
    pub fn identity_via(&self) -> IdentityVia {
        match self {
            RepositoryStore::DynamoDB => { IdentityVia::Http }
            RepositoryStore::LocalDynamoDB => { IdentityVia::Fixed }
            RepositoryStore::InMemory => { IdentityVia::Fixed }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::repository::RepositoryStore;
    use crate::identity::IdentityVia;

    #[tokio::test]
    async fn test_should_pick_identity_via() {
        assert_eq!(IdentityVia::Http, RepositoryStore::DynamoDB.identity_via());
        assert_eq!(IdentityVia::Fixed, RepositoryStore::LocalDynamoDB.identity_via());
        assert_eq!(IdentityVia::Fixed, RepositoryStore::InMemory.identity_via());
    }
}
