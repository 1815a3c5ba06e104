//! Catalog import feed.
//!
//! The feed is an ordered list of categories, each with an ordered list of
//! goods. It comes from a hand-edited file, so scalar fields may arrive as
//! numbers or strings. Everything is checked here, before the catalog swap
//! starts; nothing loosely typed reaches the tables.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{CatalogItem, Category, EngineError, ResultEngine};

/// A scalar as written in the feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedScalar {
    Integer(i64),
    Text(String),
}

impl FeedScalar {
    fn text(&self) -> String {
        match self {
            Self::Integer(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }

    fn integer(&self, field: &str, jan: &str) -> ResultEngine<i64> {
        match self {
            Self::Integer(value) => Ok(*value),
            Self::Text(value) => value.trim().parse().map_err(|_| {
                EngineError::InvalidFeed(format!(
                    "{field} of '{jan}' is not an integer: {value:?}"
                ))
            }),
        }
    }
}

impl From<i64> for FeedScalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for FeedScalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedGood {
    pub jan: FeedScalar,
    pub name: FeedScalar,
    /// Positive shelf price.
    pub price: FeedScalar,
    pub cost: FeedScalar,
    pub divide: FeedScalar,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCategory {
    pub id: FeedScalar,
    pub title: FeedScalar,
    #[serde(default)]
    pub goods: Vec<FeedGood>,
}

/// Parse a JSON feed document.
pub fn parse_feed(json: &str) -> ResultEngine<Vec<FeedCategory>> {
    serde_json::from_str(json).map_err(|err| EngineError::InvalidFeed(err.to_string()))
}

/// Validated feed, ready to be installed.
#[derive(Debug)]
pub(crate) struct CatalogImport {
    pub(crate) categories: Vec<Category>,
    pub(crate) items: Vec<CatalogItem>,
}

impl TryFrom<&[FeedCategory]> for CatalogImport {
    type Error = EngineError;

    fn try_from(feed: &[FeedCategory]) -> ResultEngine<Self> {
        let mut categories = Vec::with_capacity(feed.len());
        let mut items = Vec::new();
        let mut seen_categories = HashSet::new();
        let mut seen_jans = HashSet::new();

        for category in feed {
            let category_id = category.id.text();
            if !seen_categories.insert(category_id.clone()) {
                return Err(EngineError::InvalidFeed(format!(
                    "duplicate category id: {category_id}"
                )));
            }

            for (order, good) in category.goods.iter().enumerate() {
                let jan = good.jan.text();
                if jan.trim().is_empty() {
                    return Err(EngineError::InvalidFeed(format!(
                        "empty jan in category {category_id}"
                    )));
                }
                if !seen_jans.insert(jan.clone()) {
                    return Err(EngineError::InvalidFeed(format!("duplicate jan: {jan}")));
                }
                let display_order = i32::try_from(order).map_err(|_| {
                    EngineError::InvalidFeed(format!("too many goods in category {category_id}"))
                })?;

                let price = good
                    .price
                    .integer("price", &jan)?
                    .checked_neg()
                    .ok_or_else(|| {
                        EngineError::InvalidFeed(format!("price of '{jan}' is out of range"))
                    })?;

                items.push(CatalogItem {
                    price,
                    cost: good.cost.integer("cost", &jan)?,
                    divide: good.divide.integer("divide", &jan)?,
                    name: good.name.text(),
                    category_id: category_id.clone(),
                    display_order,
                    stock: 0,
                    jan,
                });
            }

            categories.push(Category {
                id: category_id,
                title: category.title.text(),
            });
        }

        Ok(Self { categories, items })
    }
}
