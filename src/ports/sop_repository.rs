//! SOP repository port.
//!
//! Work sessions only read SOPs. Authoring lives elsewhere; `save` exists so
//! adapters can be seeded.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SopId};
use crate::domain::sop::Sop;

/// Repository port for SOP lookup.
#[async_trait]
pub trait SopRepository: Send + Sync {
    /// Insert or replace an SOP.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, sop: &Sop) -> Result<(), DomainError>;

    /// Find an SOP by ID, including soft-deleted ones.
    ///
    /// Callers decide whether a deleted SOP is usable.
    async fn get_by_id(&self, id: &SopId) -> Result<Option<Sop>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sop_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SopRepository) {}
    }
}
