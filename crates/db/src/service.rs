use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use pomade_core::config::RecommendationConfig;
use pomade_core::domain::customer::CustomerId;
use pomade_core::domain::recommendation::Recommendation;
use pomade_core::domain::visit::VisitRecord;
use pomade_core::domain::TenantId;
use pomade_core::engine::RecommendationEngine;
use pomade_core::errors::ApplicationError;

use crate::repositories::{
    CustomerRepository, MenuItemRepository, RecommendationRepository, RepositoryError,
    SqlCustomerRepository, SqlMenuItemRepository, SqlRecommendationRepository,
    SqlVisitRepository, VisitRepository,
};
use crate::DbPool;

/// Application service over the recommendation pipeline: loads a customer's
/// history and the active catalog, runs the engine, and swaps the stored
/// batch. Reads serve the stored batch and recompute lazily when it is
/// missing or expired.
pub struct RecommendationService {
    customers: Arc<dyn CustomerRepository>,
    menu_items: Arc<dyn MenuItemRepository>,
    visits: Arc<dyn VisitRepository>,
    recommendations: Arc<dyn RecommendationRepository>,
    engine: RecommendationEngine,
    config: RecommendationConfig,
}

impl RecommendationService {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        menu_items: Arc<dyn MenuItemRepository>,
        visits: Arc<dyn VisitRepository>,
        recommendations: Arc<dyn RecommendationRepository>,
        config: RecommendationConfig,
    ) -> Result<Self, ApplicationError> {
        let engine = RecommendationEngine::from_config(&config)?;
        Ok(Self { customers, menu_items, visits, recommendations, engine, config })
    }

    /// Wires the SQL repositories over one shared pool.
    pub fn from_pool(pool: DbPool, config: RecommendationConfig) -> Result<Self, ApplicationError> {
        Self::new(
            Arc::new(SqlCustomerRepository::new(pool.clone())),
            Arc::new(SqlMenuItemRepository::new(pool.clone())),
            Arc::new(SqlVisitRepository::new(pool.clone())),
            Arc::new(SqlRecommendationRepository::new(pool)),
            config,
        )
    }

    /// Runs the full pipeline for one customer and atomically replaces the
    /// stored batch with the top `k` results. An empty candidate catalog
    /// still swaps, clearing any stale rows.
    pub async fn compute_and_replace(
        &self,
        tenant_id: &TenantId,
        customer_id: &CustomerId,
        k: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<Recommendation>, ApplicationError> {
        let history = self
            .customers
            .find_with_history(tenant_id, customer_id)
            .await
            .map_err(persistence)?
            .ok_or_else(|| {
                ApplicationError::not_found("customer", customer_id.as_str(), tenant_id.as_str())
            })?;

        let catalog = self.menu_items.list_active(tenant_id).await.map_err(persistence)?;

        let scored = self.engine.recommend(&history.customer, history.visits, &catalog, now)?;

        let batch_id = Uuid::new_v4();
        let expires_at = now + Duration::days(self.config.ttl_days);
        let batch = scored
            .into_iter()
            .take(k)
            .enumerate()
            .map(|(position, entry)| Recommendation {
                tenant_id: tenant_id.clone(),
                customer_id: customer_id.clone(),
                menu_item_id: entry.item.id,
                batch_id,
                position: position as u32,
                score: entry.score,
                reasoning: entry.reasoning,
                factors: entry.factors,
                expires_at,
            })
            .collect::<Vec<_>>();

        self.recommendations
            .replace_batch(tenant_id, customer_id, &batch)
            .await
            .map_err(persistence)?;

        tracing::info!(
            tenant = tenant_id.as_str(),
            customer = customer_id.as_str(),
            batch = %batch_id,
            rows = batch.len(),
            candidates = catalog.len(),
            "recommendation batch replaced"
        );

        Ok(batch)
    }

    /// Serves the stored batch, recomputing first when it is empty or past
    /// its expiry. `limit` truncates the returned rows, not the stored set.
    pub async fn get_recommendations(
        &self,
        tenant_id: &TenantId,
        customer_id: &CustomerId,
        limit: Option<usize>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Recommendation>, ApplicationError> {
        let stored = self
            .recommendations
            .current_batch(tenant_id, customer_id)
            .await
            .map_err(persistence)?;

        let fresh = match stored.first() {
            Some(first) if !first.is_expired(now) => stored,
            Some(_) => {
                tracing::info!(
                    tenant = tenant_id.as_str(),
                    customer = customer_id.as_str(),
                    "stored batch expired, recomputing"
                );
                self.compute_and_replace(tenant_id, customer_id, self.config.top_k, now).await?
            }
            None => {
                self.compute_and_replace(tenant_id, customer_id, self.config.top_k, now).await?
            }
        };

        let mut result = fresh;
        if let Some(limit) = limit {
            result.truncate(limit);
        }
        Ok(result)
    }

    /// Appends a visit and bumps the visited item's popularity. The stored
    /// batch is left alone; it refreshes on its own expiry.
    pub async fn record_visit(&self, visit: &VisitRecord) -> Result<(), ApplicationError> {
        self.visits.record(visit).await.map_err(persistence)?;
        tracing::info!(
            tenant = visit.tenant_id.as_str(),
            customer = visit.customer_id.as_str(),
            item = visit.menu_item_id.as_str(),
            "visit recorded"
        );
        Ok(())
    }
}

fn persistence(error: RepositoryError) -> ApplicationError {
    ApplicationError::Persistence(error.to_string())
}
