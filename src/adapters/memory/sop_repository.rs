//! In-memory SOP repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, SopId};
use crate::domain::sop::Sop;
use crate::ports::SopRepository;

#[derive(Default)]
pub struct InMemorySopRepository {
    sops: RwLock<HashMap<SopId, Sop>>,
}

impl InMemorySopRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-loaded with SOPs.
    pub fn with_sops(sops: impl IntoIterator<Item = Sop>) -> Self {
        Self {
            sops: RwLock::new(sops.into_iter().map(|s| (*s.id(), s)).collect()),
        }
    }
}

#[async_trait]
impl SopRepository for InMemorySopRepository {
    async fn save(&self, sop: &Sop) -> Result<(), DomainError> {
        self.sops.write().await.insert(*sop.id(), sop.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &SopId) -> Result<Option<Sop>, DomainError> {
        Ok(self.sops.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    #[tokio::test]
    async fn returns_soft_deleted_sops() {
        let mut sop = Sop::new("Crane lift", UserId::new("author").unwrap()).unwrap();
        sop.mark_deleted();
        let repo = InMemorySopRepository::with_sops([sop.clone()]);

        let loaded = repo.get_by_id(sop.id()).await.unwrap().unwrap();
        assert!(loaded.is_deleted());
        assert!(repo.get_by_id(&SopId::new()).await.unwrap().is_none());
    }
}
