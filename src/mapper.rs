use async_trait::async_trait;

use crate::error::MapperError;

/// Capability set shared by every concrete data mapper.
///
/// Paged scans are deliberately absent from the trait: they need exclusive
/// access to the mapper's cursor state, so each concrete mapper exposes its
/// own `find_all`/`next_page` pair alongside this interface.
#[async_trait]
pub trait DataMapper {
    /// Entity type the mapper persists.
    type Model: Send + Sync;
    /// Key type used for point lookups.
    type Id: ?Sized + Sync;

    async fn find_by_id(&self, id: &Self::Id) -> Result<Self::Model, MapperError>;
    async fn insert(&self, model: &Self::Model) -> Result<(), MapperError>;
    async fn update(&self, model: &Self::Model) -> Result<(), MapperError>;
    async fn delete(&self, model: &Self::Model) -> Result<(), MapperError>;
}
