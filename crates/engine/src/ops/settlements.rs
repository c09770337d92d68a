use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{EngineError, GroupId, ResultEngine, Settlement, UserId, settlements};

use super::{Engine, ensure_positive_amount, with_tx};

impl Engine {
    /// Records a payment from `from_user` to `to_user`.
    ///
    /// Both users must currently belong to the group. The amount is not
    /// checked against what `from_user` actually owes.
    pub async fn create_settlement(
        &self,
        group_id: GroupId,
        from_user: UserId,
        to_user: UserId,
        amount: f64,
    ) -> ResultEngine<Settlement> {
        ensure_positive_amount(amount)?;

        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            let members = self.group_members(&db_tx, group_id).await?;
            if !members.contains(&from_user) || !members.contains(&to_user) {
                return Err(EngineError::Validation(
                    "both from_user and to_user must be current group members".to_string(),
                ));
            }

            let model = settlements::ActiveModel {
                group_id: ActiveValue::Set(group_id),
                from_user: ActiveValue::Set(from_user),
                to_user: ActiveValue::Set(to_user),
                amount: ActiveValue::Set(amount),
                paid_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            Ok(Settlement::from(model))
        })
    }

    pub async fn list_settlements(&self, group_id: GroupId) -> ResultEngine<Vec<Settlement>> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            let models = self.load_settlements(&db_tx, group_id).await?;
            Ok(models.into_iter().map(Settlement::from).collect())
        })
    }
}
