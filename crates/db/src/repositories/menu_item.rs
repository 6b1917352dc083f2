use sqlx::Row;

use pomade_core::domain::menu::{
    AgeGroup, CategoryId, GenderTarget, MenuItem, MenuItemId, Seasonality,
};
use pomade_core::domain::TenantId;

use super::{MenuItemRepository, RepositoryError};
use crate::DbPool;

pub struct SqlMenuItemRepository {
    pool: DbPool,
}

impl SqlMenuItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn row_to_menu_item(row: &sqlx::sqlite::SqliteRow) -> Result<MenuItem, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let tenant_id: String =
        row.try_get("tenant_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let category_id: String =
        row.try_get("category_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price: i64 = row.try_get("price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let duration_minutes: i64 =
        row.try_get("duration_minutes").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let seasonality_str: String =
        row.try_get("seasonality").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let age_group_str: String =
        row.try_get("age_group").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let gender_target_str: String =
        row.try_get("gender_target").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let popularity: i64 =
        row.try_get("popularity").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let active: bool = row.try_get("active").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let seasonality = Seasonality::parse(&seasonality_str).ok_or_else(|| {
        RepositoryError::Decode(format!("unknown seasonality `{seasonality_str}`"))
    })?;
    let age_group = AgeGroup::parse(&age_group_str)
        .ok_or_else(|| RepositoryError::Decode(format!("unknown age group `{age_group_str}`")))?;
    let gender_target = GenderTarget::parse(&gender_target_str).ok_or_else(|| {
        RepositoryError::Decode(format!("unknown gender target `{gender_target_str}`"))
    })?;

    Ok(MenuItem {
        id: MenuItemId(id),
        tenant_id: TenantId(tenant_id),
        category_id: CategoryId(category_id),
        name,
        price,
        duration_minutes: duration_minutes as u32,
        seasonality,
        age_group,
        gender_target,
        popularity,
        active,
    })
}

#[async_trait::async_trait]
impl MenuItemRepository for SqlMenuItemRepository {
    async fn list_active(&self, tenant_id: &TenantId) -> Result<Vec<MenuItem>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, tenant_id, category_id, name, price, duration_minutes,
                    seasonality, age_group, gender_target, popularity, active
             FROM menu_items
             WHERE tenant_id = ? AND active = 1
             ORDER BY id",
        )
        .bind(tenant_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_menu_item).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MenuItemRepository;
    use crate::{connect_with_settings, fixtures, migrations};

    async fn setup() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        fixtures::seed_all(&pool).await.expect("seed");
        pool
    }

    #[tokio::test]
    async fn list_active_excludes_inactive_items() {
        let pool = setup().await;
        let repo = SqlMenuItemRepository::new(pool);

        let items = repo.list_active(&fixtures::tenant()).await.expect("list");

        assert!(!items.is_empty());
        assert!(items.iter().all(|item| item.active));
        assert!(items.iter().all(|item| item.id.as_str() != fixtures::INACTIVE_ITEM_ID));
    }

    #[tokio::test]
    async fn list_active_is_tenant_scoped() {
        let pool = setup().await;
        let repo = SqlMenuItemRepository::new(pool);

        let items =
            repo.list_active(&TenantId("tenant-unknown".into())).await.expect("list");
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn rows_decode_into_typed_enums() {
        let pool = setup().await;
        let repo = SqlMenuItemRepository::new(pool);

        let items = repo.list_active(&fixtures::tenant()).await.expect("list");
        let spa = items
            .iter()
            .find(|item| item.id.as_str() == "item-head-spa")
            .expect("seeded head spa");

        assert_eq!(spa.seasonality, Seasonality::Winter);
        assert_eq!(spa.gender_target, GenderTarget::All);
    }
}
