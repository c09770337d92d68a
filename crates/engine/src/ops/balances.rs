use sea_orm::{QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Balances, GroupId, ResultEngine, UserId,
    balance::{self, BalancesByGroup},
    groups,
};

use super::{Engine, with_tx};

impl Engine {
    /// Net balance of every current member of a group.
    ///
    /// The whole history is replayed, users that left the group are then
    /// dropped from the result. Members without any activity are absent.
    pub async fn group_balances(&self, group_id: GroupId) -> ResultEngine<Balances> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            let members = self.group_members(&db_tx, group_id).await?;
            let ledger = self.load_ledger(&db_tx, group_id).await?;
            Ok(balance::group_balances(&ledger, &members))
        })
    }

    /// Net balance of one user in every group that still has members.
    ///
    /// A group is reported even when the user is no longer one of its
    /// members, with `0.0` when the user never took part in it.
    pub async fn user_balances(&self, user_id: UserId) -> ResultEngine<BalancesByGroup> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let groups = groups::Entity::find()
                .order_by_asc(groups::Column::Id)
                .all(&db_tx)
                .await?;

            let mut balances = BalancesByGroup::new();
            for group in groups {
                if self.group_members(&db_tx, group.id).await?.is_empty() {
                    continue;
                }
                let ledger = self.load_ledger(&db_tx, group.id).await?;
                balances.insert(group.id, ledger.balance_of(user_id));
            }
            Ok(balances)
        })
    }
}
