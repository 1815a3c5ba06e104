//! Shop accounts.
//!
//! An account is created once at registration and never deleted. Its
//! `balance` is a cache of the sum of the account's active ledger entries
//! and is only written by the derivation routines.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Access group of an account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountGroup {
    Guest,
    #[default]
    User,
    /// Shop operators: restock, withdraw cash, import the catalog.
    Labshop,
}

impl AccountGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::User => "user",
            Self::Labshop => "labshop",
        }
    }
}

impl TryFrom<&str> for AccountGroup {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "guest" => Ok(Self::Guest),
            "user" => Ok(Self::User),
            "labshop" => Ok(Self::Labshop),
            other => Err(EngineError::InvalidData(format!(
                "invalid account group: {other}"
            ))),
        }
    }
}

/// A shop account as seen by callers.
///
/// Credential hash and salt never leave the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub uid: String,
    pub group: AccountGroup,
    pub name: String,
    /// Signed point balance, in currency units. Negative means the account
    /// owes the shop.
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uid: String,
    pub password_hash: String,
    pub password_salt: String,
    pub group_name: String,
    pub name: String,
    pub balance: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            uid: model.uid,
            group: AccountGroup::try_from(model.group_name.as_str())?,
            name: model.name,
            balance: model.balance,
            created_at: model.created_at,
        })
    }
}

pub(crate) fn new_active_model(
    uid: &str,
    password_hash: String,
    password_salt: String,
    group: AccountGroup,
    name: &str,
) -> ActiveModel {
    ActiveModel {
        uid: ActiveValue::Set(uid.to_string()),
        password_hash: ActiveValue::Set(password_hash),
        password_salt: ActiveValue::Set(password_salt),
        group_name: ActiveValue::Set(group.as_str().to_string()),
        name: ActiveValue::Set(name.to_string()),
        balance: ActiveValue::Set(0),
        created_at: ActiveValue::Set(Utc::now()),
    }
}
