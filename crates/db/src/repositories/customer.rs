use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;

use pomade_core::domain::customer::{Customer, CustomerId, Gender};
use pomade_core::domain::menu::MenuItemId;
use pomade_core::domain::visit::{CustomerHistory, VisitRecord, VisitWithItem};
use pomade_core::domain::TenantId;

use super::menu_item::row_to_menu_item;
use super::{CustomerRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_customer(row: &sqlx::sqlite::SqliteRow) -> Result<Customer, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let tenant_id: String =
        row.try_get("tenant_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let birth_date_str: Option<String> =
        row.try_get("birth_date").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let gender_str: Option<String> =
        row.try_get("gender").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let birth_date = birth_date_str
        .map(|value| {
            NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                .map_err(|e| RepositoryError::Decode(format!("birth_date `{value}`: {e}")))
        })
        .transpose()?;

    let gender = gender_str
        .map(|value| {
            Gender::parse(&value)
                .ok_or_else(|| RepositoryError::Decode(format!("unknown gender `{value}`")))
        })
        .transpose()?;

    Ok(Customer { id: CustomerId(id), tenant_id: TenantId(tenant_id), name, birth_date, gender })
}

fn parse_visit_date(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("visit_date `{value}`: {e}")))
}

#[async_trait::async_trait]
impl CustomerRepository for SqlCustomerRepository {
    async fn find_with_history(
        &self,
        tenant_id: &TenantId,
        customer_id: &CustomerId,
    ) -> Result<Option<CustomerHistory>, RepositoryError> {
        let customer_row = sqlx::query(
            "SELECT id, tenant_id, name, birth_date, gender
             FROM customers
             WHERE tenant_id = ? AND id = ?",
        )
        .bind(tenant_id.as_str())
        .bind(customer_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(customer_row) = customer_row else {
            return Ok(None);
        };
        let customer = row_to_customer(&customer_row)?;

        // Each visit is joined with its menu item so the profile analyzer
        // sees prices and categories without another round trip.
        let visit_rows = sqlx::query(
            "SELECT v.id AS visit_id, v.visit_date, v.satisfaction, v.notes,
                    m.id, m.tenant_id, m.category_id, m.name, m.price, m.duration_minutes,
                    m.seasonality, m.age_group, m.gender_target, m.popularity, m.active
             FROM visit_records v
             JOIN menu_items m ON m.id = v.menu_item_id
             WHERE v.tenant_id = ? AND v.customer_id = ?
             ORDER BY v.visit_date ASC, v.id ASC",
        )
        .bind(tenant_id.as_str())
        .bind(customer_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut visits = Vec::with_capacity(visit_rows.len());
        for row in &visit_rows {
            let item = row_to_menu_item(row)?;
            let visit_id: String =
                row.try_get("visit_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
            let visit_date_str: String =
                row.try_get("visit_date").map_err(|e| RepositoryError::Decode(e.to_string()))?;
            let satisfaction: Option<i64> =
                row.try_get("satisfaction").map_err(|e| RepositoryError::Decode(e.to_string()))?;
            let notes: Option<String> =
                row.try_get("notes").map_err(|e| RepositoryError::Decode(e.to_string()))?;

            visits.push(VisitWithItem {
                visit: VisitRecord {
                    id: visit_id,
                    tenant_id: tenant_id.clone(),
                    customer_id: customer_id.clone(),
                    menu_item_id: MenuItemId(item.id.as_str().to_owned()),
                    visit_date: parse_visit_date(&visit_date_str)?,
                    satisfaction: satisfaction.map(|value| value as u8),
                    notes,
                },
                item,
            });
        }

        Ok(Some(CustomerHistory { customer, visits }))
    }
}
