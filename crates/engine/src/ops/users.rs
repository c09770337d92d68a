use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{ResultEngine, User, UserId, users};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    pub async fn create_user(&self, name: &str) -> ResultEngine<User> {
        let name = normalize_required_name(name, "user name")?;
        with_tx!(self, |db_tx| {
            let model = users::ActiveModel {
                name: ActiveValue::Set(name),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            Ok(User::from(model))
        })
    }

    pub async fn user(&self, user_id: UserId) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            Ok(User::from(model))
        })
    }

    pub async fn rename_user(&self, user_id: UserId, name: &str) -> ResultEngine<User> {
        let name = normalize_required_name(name, "user name")?;
        with_tx!(self, |db_tx| {
            let mut active: users::ActiveModel = self.require_user(&db_tx, user_id).await?.into();
            active.name = ActiveValue::Set(name);
            let model = active.update(&db_tx).await?;
            Ok(User::from(model))
        })
    }
}
