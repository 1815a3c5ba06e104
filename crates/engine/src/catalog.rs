//! Catalog items.
//!
//! Prices follow the ledger sign convention: `price` is what one unit
//! changes an account balance by, so goods carry a negative price.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub jan: String,
    pub name: String,
    /// Signed unit price; negative values debit the buying account.
    pub price: i64,
    /// Acquisition cost per restock unit.
    pub cost: i64,
    /// Consumable units yielded by one restock unit.
    pub divide: i64,
    pub category_id: String,
    pub display_order: i32,
    /// Cached stock level, see `Engine::recompute_stock`.
    pub stock: i64,
}

impl CatalogItem {
    /// Positive shelf price, as printed on the label.
    #[must_use]
    pub fn shelf_price(&self) -> i64 {
        -self.price
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "catalog_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub jan: String,
    pub name: String,
    pub price: i64,
    pub cost: i64,
    pub divide: i64,
    pub category_id: String,
    pub display_order: i32,
    pub stock: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CatalogItem> for ActiveModel {
    fn from(item: &CatalogItem) -> Self {
        Self {
            jan: ActiveValue::Set(item.jan.clone()),
            name: ActiveValue::Set(item.name.clone()),
            price: ActiveValue::Set(item.price),
            cost: ActiveValue::Set(item.cost),
            divide: ActiveValue::Set(item.divide),
            category_id: ActiveValue::Set(item.category_id.clone()),
            display_order: ActiveValue::Set(item.display_order),
            stock: ActiveValue::Set(item.stock),
        }
    }
}

impl From<Model> for CatalogItem {
    fn from(model: Model) -> Self {
        Self {
            jan: model.jan,
            name: model.name,
            price: model.price,
            cost: model.cost,
            divide: model.divide,
            category_id: model.category_id,
            display_order: model.display_order,
            stock: model.stock,
        }
    }
}
