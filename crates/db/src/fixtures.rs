use pomade_core::domain::customer::CustomerId;
use pomade_core::domain::TenantId;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Deterministic seed dataset for repository and service tests: one tenant,
/// one regular with visit history, one first-time customer, and a small menu
/// covering every seasonality and targeting combination the scorer branches
/// on.
const SEED_TENANT: &str = "tenant-montrose";

const REGULAR_CUSTOMER_ID: &str = "cust-ayla";
const NEW_CUSTOMER_ID: &str = "cust-riko";

pub const INACTIVE_ITEM_ID: &str = "item-perm-legacy";

struct SeedCustomer {
    id: &'static str,
    name: &'static str,
    birth_date: Option<&'static str>,
    gender: Option<&'static str>,
}

struct SeedMenuItem {
    id: &'static str,
    category_id: &'static str,
    name: &'static str,
    price: i64,
    duration_minutes: i64,
    seasonality: &'static str,
    age_group: &'static str,
    gender_target: &'static str,
    popularity: i64,
    active: bool,
}

struct SeedVisit {
    id: &'static str,
    customer_id: &'static str,
    menu_item_id: &'static str,
    visit_date: &'static str,
    satisfaction: Option<i64>,
    notes: Option<&'static str>,
}

const SEED_CUSTOMERS: &[SeedCustomer] = &[
    SeedCustomer {
        id: REGULAR_CUSTOMER_ID,
        name: "Ayla Demir",
        birth_date: Some("1994-03-12"),
        gender: Some("female"),
    },
    SeedCustomer { id: NEW_CUSTOMER_ID, name: "Riko Sato", birth_date: None, gender: None },
];

const SEED_MENU_ITEMS: &[SeedMenuItem] = &[
    SeedMenuItem {
        id: "item-cut",
        category_id: "cat-hair",
        name: "Cut & Style",
        price: 4800,
        duration_minutes: 45,
        seasonality: "all",
        age_group: "all",
        gender_target: "all",
        popularity: 42,
        active: true,
    },
    SeedMenuItem {
        id: "item-color",
        category_id: "cat-color",
        name: "Full Color",
        price: 8500,
        duration_minutes: 90,
        seasonality: "all",
        age_group: "twenties",
        gender_target: "all",
        popularity: 28,
        active: true,
    },
    SeedMenuItem {
        id: "item-treatment",
        category_id: "cat-care",
        name: "Repair Treatment",
        price: 6000,
        duration_minutes: 30,
        seasonality: "summer",
        age_group: "all",
        gender_target: "female",
        popularity: 15,
        active: true,
    },
    SeedMenuItem {
        id: "item-head-spa",
        category_id: "cat-care",
        name: "Head Spa",
        price: 5500,
        duration_minutes: 40,
        seasonality: "winter",
        age_group: "all",
        gender_target: "all",
        popularity: 9,
        active: true,
    },
    SeedMenuItem {
        id: INACTIVE_ITEM_ID,
        category_id: "cat-hair",
        name: "Classic Perm",
        price: 7200,
        duration_minutes: 120,
        seasonality: "all",
        age_group: "forties_plus",
        gender_target: "all",
        popularity: 3,
        active: false,
    },
];

const SEED_VISITS: &[SeedVisit] = &[
    SeedVisit {
        id: "visit-seed-1",
        customer_id: REGULAR_CUSTOMER_ID,
        menu_item_id: "item-cut",
        visit_date: "2026-05-02T10:00:00+00:00",
        satisfaction: Some(5),
        notes: Some("regular trim"),
    },
    SeedVisit {
        id: "visit-seed-2",
        customer_id: REGULAR_CUSTOMER_ID,
        menu_item_id: "item-color",
        visit_date: "2026-06-14T14:30:00+00:00",
        satisfaction: Some(4),
        notes: None,
    },
    SeedVisit {
        id: "visit-seed-3",
        customer_id: REGULAR_CUSTOMER_ID,
        menu_item_id: "item-cut",
        visit_date: "2026-07-20T11:15:00+00:00",
        satisfaction: None,
        notes: Some("walk-in"),
    },
];

pub fn tenant() -> TenantId {
    TenantId(SEED_TENANT.into())
}

/// Customer with a birth date, a gender, and three seeded visits.
pub fn regular_customer() -> CustomerId {
    CustomerId(REGULAR_CUSTOMER_ID.into())
}

/// Customer with no demographic data and no visit history.
pub fn new_customer() -> CustomerId {
    CustomerId(NEW_CUSTOMER_ID.into())
}

/// Loads the full seed dataset in one transaction. Idempotent: rows are
/// replaced on re-run, so a test may call it after partial writes.
pub async fn seed_all(pool: &DbPool) -> Result<(), RepositoryError> {
    let mut tx = pool.begin().await?;

    for customer in SEED_CUSTOMERS {
        sqlx::query(
            "INSERT OR REPLACE INTO customers (id, tenant_id, name, birth_date, gender)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(customer.id)
        .bind(SEED_TENANT)
        .bind(customer.name)
        .bind(customer.birth_date)
        .bind(customer.gender)
        .execute(&mut *tx)
        .await?;
    }

    for item in SEED_MENU_ITEMS {
        sqlx::query(
            "INSERT OR REPLACE INTO menu_items
                (id, tenant_id, category_id, name, price, duration_minutes,
                 seasonality, age_group, gender_target, popularity, active)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(item.id)
        .bind(SEED_TENANT)
        .bind(item.category_id)
        .bind(item.name)
        .bind(item.price)
        .bind(item.duration_minutes)
        .bind(item.seasonality)
        .bind(item.age_group)
        .bind(item.gender_target)
        .bind(item.popularity)
        .bind(item.active)
        .execute(&mut *tx)
        .await?;
    }

    for visit in SEED_VISITS {
        sqlx::query(
            "INSERT OR REPLACE INTO visit_records
                (id, tenant_id, customer_id, menu_item_id, visit_date, satisfaction, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(visit.id)
        .bind(SEED_TENANT)
        .bind(visit.customer_id)
        .bind(visit.menu_item_id)
        .bind(visit.visit_date)
        .bind(visit.satisfaction)
        .bind(visit.notes)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}
