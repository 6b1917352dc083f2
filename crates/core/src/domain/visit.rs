use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::customer::{Customer, CustomerId};
use super::menu::{MenuItem, MenuItemId};
use super::TenantId;

/// One historical visit. Append-only: created by the booking flow when a
/// visit is recorded, never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub id: String,
    pub tenant_id: TenantId,
    pub customer_id: CustomerId,
    pub menu_item_id: MenuItemId,
    pub visit_date: DateTime<Utc>,
    /// 1-5 when the customer left a rating.
    pub satisfaction: Option<u8>,
    pub notes: Option<String>,
}

/// A visit joined with the menu item it was for, which carries the price and
/// category the profile analyzer needs.
#[derive(Clone, Debug, PartialEq)]
pub struct VisitWithItem {
    pub visit: VisitRecord,
    pub item: MenuItem,
}

/// The `getCustomerWithHistory` collaborator contract: a customer plus their
/// ordered visit history.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomerHistory {
    pub customer: Customer,
    pub visits: Vec<VisitWithItem>,
}
