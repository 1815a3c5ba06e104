use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{
    Account, AccountGroup, EngineError, ResultEngine, accounts,
    credentials::{hash_with_salt, new_salt},
};

use super::{Engine, with_tx};

impl Engine {
    /// Registers a new account with a zero balance.
    ///
    /// Fails with [`EngineError::ExistingKey`] when `uid` is taken.
    pub async fn register_account(
        &self,
        uid: &str,
        credential: &str,
        group: AccountGroup,
        name: &str,
    ) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            if accounts::Entity::find_by_id(uid.to_string())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(uid.to_string()));
            }

            let salt = new_salt();
            let hash = hash_with_salt(credential, &salt);
            let model = accounts::new_active_model(uid, hash, salt, group, name)
                .insert(&db_tx)
                .await?;

            tracing::info!(uid, group = group.as_str(), "account registered");
            Account::try_from(model)
        })
    }

    /// Checks a credential and returns the matching account.
    pub async fn authenticate(&self, uid: &str, credential: &str) -> ResultEngine<Account> {
        let model = accounts::Entity::find_by_id(uid.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(uid.to_string()))?;

        if model.password_hash != hash_with_salt(credential, &model.password_salt) {
            tracing::warn!(uid, "authentication failed");
            return Err(EngineError::Unauthorized(format!("bad credential for {uid}")));
        }

        Account::try_from(model)
    }

    /// Replaces the credential of an account.
    ///
    /// Hash and salt are rewritten together, and only when the old
    /// credential still matches at write time.
    pub async fn change_credential(
        &self,
        uid: &str,
        old_credential: &str,
        new_credential: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = accounts::Entity::find_by_id(uid.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(uid.to_string()))?;

            let new_salt = new_salt();
            let updated = accounts::Entity::update_many()
                .col_expr(
                    accounts::Column::PasswordHash,
                    Expr::value(hash_with_salt(new_credential, &new_salt)),
                )
                .col_expr(accounts::Column::PasswordSalt, Expr::value(new_salt))
                .filter(accounts::Column::Uid.eq(uid))
                .filter(
                    accounts::Column::PasswordHash
                        .eq(hash_with_salt(old_credential, &model.password_salt)),
                )
                .exec(&db_tx)
                .await?;

            if updated.rows_affected != 1 {
                tracing::warn!(uid, "credential change refused");
                return Err(EngineError::Unauthorized(format!("bad credential for {uid}")));
            }

            tracing::info!(uid, "credential changed");
            Ok(())
        })
    }

    pub async fn account(&self, uid: &str) -> ResultEngine<Account> {
        accounts::Entity::find_by_id(uid.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(uid.to_string()))
            .and_then(Account::try_from)
    }

    pub async fn accounts(&self) -> ResultEngine<Vec<Account>> {
        accounts::Entity::find()
            .order_by_asc(accounts::Column::Uid)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }
}
