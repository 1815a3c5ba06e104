use std::collections::HashMap;

use sea_orm::{ConnectionTrait, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    CatalogItem, Category, EngineError, FeedCategory, ResultEngine, catalog, categories,
    feed::CatalogImport,
};

use super::{Engine, invalidation::Invalidation, with_tx};

/// Catalog rows in shelf order: category feed position, then position
/// within the category.
pub(super) async fn ordered_items<C: ConnectionTrait>(db: &C) -> ResultEngine<Vec<catalog::Model>> {
    let positions: HashMap<String, i32> = categories::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|category| (category.id, category.position))
        .collect();

    let mut items = catalog::Entity::find()
        .order_by_asc(catalog::Column::DisplayOrder)
        .all(db)
        .await?;
    items.sort_by_key(|item| {
        (
            positions.get(&item.category_id).copied().unwrap_or(i32::MAX),
            item.display_order,
        )
    });
    Ok(items)
}

impl Engine {
    /// Replaces the whole catalog and category set with the feed.
    ///
    /// The feed is validated before anything is written. The old rows are
    /// dropped and the new ones installed in one transaction, and every
    /// stock level is recomputed from the ledger before commit, so
    /// receipts and entries recorded under a jan carry over to the new
    /// catalog. Returns the number of installed items.
    pub async fn import_catalog(&self, feed: &[FeedCategory]) -> ResultEngine<usize> {
        let import = CatalogImport::try_from(feed)?;

        with_tx!(self, |db_tx| {
            catalog::Entity::delete_many().exec(&db_tx).await?;
            categories::Entity::delete_many().exec(&db_tx).await?;

            for (position, category) in import.categories.iter().enumerate() {
                let position = i32::try_from(position)
                    .map_err(|_| EngineError::InvalidFeed("too many categories".to_string()))?;
                categories::new_active_model(category, position)
                    .insert(&db_tx)
                    .await?;
            }

            let mut dirty = Invalidation::default();
            for item in &import.items {
                catalog::ActiveModel::from(item).insert(&db_tx).await?;
                dirty.item(&item.jan);
            }
            dirty.flush(&db_tx).await?;

            tracing::info!(
                categories = import.categories.len(),
                items = import.items.len(),
                "catalog imported"
            );
            Ok(import.items.len())
        })
    }

    /// Every catalog item, in shelf order.
    pub async fn catalog(&self) -> ResultEngine<Vec<CatalogItem>> {
        let items = ordered_items(&self.database).await?;
        Ok(items.into_iter().map(CatalogItem::from).collect())
    }

    /// Every category, in feed order.
    pub async fn categories(&self) -> ResultEngine<Vec<Category>> {
        let rows = categories::Entity::find()
            .order_by_asc(categories::Column::Position)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    pub async fn item(&self, jan: &str) -> ResultEngine<CatalogItem> {
        catalog::Entity::find_by_id(jan.to_string())
            .one(&self.database)
            .await?
            .map(CatalogItem::from)
            .ok_or_else(|| EngineError::KeyNotFound(jan.to_string()))
    }
}
