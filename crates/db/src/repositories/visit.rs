use pomade_core::domain::visit::VisitRecord;

use super::{RepositoryError, VisitRepository};
use crate::DbPool;

pub struct SqlVisitRepository {
    pool: DbPool,
}

impl SqlVisitRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl VisitRepository for SqlVisitRepository {
    async fn record(&self, visit: &VisitRecord) -> Result<(), RepositoryError> {
        // Insert and popularity bump commit together or not at all.
        let mut tx = self.pool.begin().await?;

        // The foreign keys only check row existence, not tenant membership,
        // so the (tenant, customer) pair is verified explicitly.
        let customer_in_tenant: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM customers WHERE tenant_id = ? AND id = ?")
                .bind(visit.tenant_id.as_str())
                .bind(visit.customer_id.as_str())
                .fetch_optional(&mut *tx)
                .await?;
        if customer_in_tenant.is_none() {
            return Err(RepositoryError::Integrity(format!(
                "customer `{}` does not belong to tenant `{}`",
                visit.customer_id.as_str(),
                visit.tenant_id.as_str()
            )));
        }

        sqlx::query(
            "INSERT INTO visit_records
                (id, tenant_id, customer_id, menu_item_id, visit_date, satisfaction, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&visit.id)
        .bind(visit.tenant_id.as_str())
        .bind(visit.customer_id.as_str())
        .bind(visit.menu_item_id.as_str())
        .bind(visit.visit_date.to_rfc3339())
        .bind(visit.satisfaction.map(i64::from))
        .bind(&visit.notes)
        .execute(&mut *tx)
        .await?;

        // Tenant-scoped update doubles as the (tenant, item) membership
        // check: zero affected rows means the item is not in this tenant,
        // and the insert above must roll back with it.
        let updated = sqlx::query(
            "UPDATE menu_items SET popularity = popularity + 1
             WHERE tenant_id = ? AND id = ?",
        )
        .bind(visit.tenant_id.as_str())
        .bind(visit.menu_item_id.as_str())
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(RepositoryError::Integrity(format!(
                "menu item `{}` does not belong to tenant `{}`",
                visit.menu_item_id.as_str(),
                visit.tenant_id.as_str()
            )));
        }

        tx.commit().await?;
        Ok(())
    }
}
