use async_trait::async_trait;
use thiserror::Error;

use pomade_core::domain::customer::CustomerId;
use pomade_core::domain::menu::MenuItem;
use pomade_core::domain::recommendation::Recommendation;
use pomade_core::domain::visit::{CustomerHistory, VisitRecord};
use pomade_core::domain::TenantId;

pub mod customer;
pub mod menu_item;
pub mod recommendation;
pub mod visit;

pub use customer::SqlCustomerRepository;
pub use menu_item::SqlMenuItemRepository;
pub use recommendation::SqlRecommendationRepository;
pub use visit::SqlVisitRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("integrity violation: {0}")]
    Integrity(String),
}

/// The `getCustomerWithHistory` collaborator contract; `Ok(None)` means
/// the customer does not exist in the tenant.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_with_history(
        &self,
        tenant_id: &TenantId,
        customer_id: &CustomerId,
    ) -> Result<Option<CustomerHistory>, RepositoryError>;
}

#[async_trait]
pub trait MenuItemRepository: Send + Sync {
    /// Currently active candidates only.
    async fn list_active(&self, tenant_id: &TenantId) -> Result<Vec<MenuItem>, RepositoryError>;
}

/// The booking-side `recordVisit` contract: appends the visit row and bumps
/// the item's popularity counter in one transaction. The customer and item
/// must both exist in the visit's tenant.
#[async_trait]
pub trait VisitRepository: Send + Sync {
    async fn record(&self, visit: &VisitRecord) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait RecommendationRepository: Send + Sync {
    /// Atomically swaps the customer's recommendation set for `batch`.
    /// On failure the prior set stays fully intact.
    async fn replace_batch(
        &self,
        tenant_id: &TenantId,
        customer_id: &CustomerId,
        batch: &[Recommendation],
    ) -> Result<(), RepositoryError>;

    /// The current (possibly stale) set, ordered by position.
    async fn current_batch(
        &self,
        tenant_id: &TenantId,
        customer_id: &CustomerId,
    ) -> Result<Vec<Recommendation>, RepositoryError>;
}
