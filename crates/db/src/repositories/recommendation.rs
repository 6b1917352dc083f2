use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use pomade_core::domain::customer::CustomerId;
use pomade_core::domain::menu::MenuItemId;
use pomade_core::domain::recommendation::{FactorVector, Recommendation};
use pomade_core::domain::TenantId;

use super::{RecommendationRepository, RepositoryError};
use crate::DbPool;

pub struct SqlRecommendationRepository {
    pool: DbPool,
}

impl SqlRecommendationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_recommendation(row: &sqlx::sqlite::SqliteRow) -> Result<Recommendation, RepositoryError> {
    let tenant_id: String =
        row.try_get("tenant_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let customer_id: String =
        row.try_get("customer_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let menu_item_id: String =
        row.try_get("menu_item_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let batch_id_str: String =
        row.try_get("batch_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let position: i64 =
        row.try_get("position").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let score: f64 = row.try_get("score").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let reasoning: String =
        row.try_get("reasoning").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let factors_str: String =
        row.try_get("factors").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let expires_at_str: String =
        row.try_get("expires_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let batch_id = Uuid::parse_str(&batch_id_str)
        .map_err(|e| RepositoryError::Decode(format!("batch_id `{batch_id_str}`: {e}")))?;
    let factors: FactorVector = serde_json::from_str(&factors_str)
        .map_err(|e| RepositoryError::Decode(format!("factors json: {e}")))?;
    let expires_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&expires_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("expires_at `{expires_at_str}`: {e}")))?;

    Ok(Recommendation {
        tenant_id: TenantId(tenant_id),
        customer_id: CustomerId(customer_id),
        menu_item_id: MenuItemId(menu_item_id),
        batch_id,
        position: position as u32,
        score,
        reasoning,
        factors,
        expires_at,
    })
}

#[async_trait::async_trait]
impl RecommendationRepository for SqlRecommendationRepository {
    async fn replace_batch(
        &self,
        tenant_id: &TenantId,
        customer_id: &CustomerId,
        batch: &[Recommendation],
    ) -> Result<(), RepositoryError> {
        // Delete-then-insert inside one transaction: a reader either sees the
        // prior batch or the new one, never a mix.
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM recommendations WHERE tenant_id = ? AND customer_id = ?")
            .bind(tenant_id.as_str())
            .bind(customer_id.as_str())
            .execute(&mut *tx)
            .await?;

        for entry in batch {
            let factors_json = serde_json::to_string(&entry.factors)
                .map_err(|e| RepositoryError::Decode(format!("factors json: {e}")))?;

            sqlx::query(
                "INSERT INTO recommendations
                    (tenant_id, customer_id, menu_item_id, batch_id, position,
                     score, reasoning, factors, expires_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(entry.tenant_id.as_str())
            .bind(entry.customer_id.as_str())
            .bind(entry.menu_item_id.as_str())
            .bind(entry.batch_id.to_string())
            .bind(entry.position as i64)
            .bind(entry.score)
            .bind(&entry.reasoning)
            .bind(&factors_json)
            .bind(entry.expires_at.to_rfc3339())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn current_batch(
        &self,
        tenant_id: &TenantId,
        customer_id: &CustomerId,
    ) -> Result<Vec<Recommendation>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT tenant_id, customer_id, menu_item_id, batch_id, position,
                    score, reasoning, factors, expires_at
             FROM recommendations
             WHERE tenant_id = ? AND customer_id = ?
             ORDER BY position ASC",
        )
        .bind(tenant_id.as_str())
        .bind(customer_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_recommendation).collect()
    }
}
