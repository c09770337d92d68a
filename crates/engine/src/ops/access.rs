use std::collections::BTreeSet;

use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, prelude::*,
};

use crate::{
    EngineError, Expense, Group, GroupId, Ledger, ResultEngine, Share, User, UserId, expenses,
    group_members, groups, settlements, splits, users,
};

use super::Engine;

impl Engine {
    pub(super) async fn require_group(
        &self,
        db: &DatabaseTransaction,
        group_id: GroupId,
    ) -> ResultEngine<groups::Model> {
        groups::Entity::find_by_id(group_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("group {group_id} not found")))
    }

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: UserId,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("user {user_id} not found")))
    }

    /// Case-insensitive exact match on the group name, lowest id first.
    pub(super) async fn require_group_by_name(
        &self,
        db: &DatabaseTransaction,
        name: &str,
    ) -> ResultEngine<groups::Model> {
        let wanted = name.to_lowercase();
        groups::Entity::find()
            .order_by_asc(groups::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .find(|group| group.name.to_lowercase() == wanted)
            .ok_or_else(|| EngineError::NotFound(format!("group \"{name}\" not found")))
    }

    /// Current members of a group.
    pub(super) async fn group_members(
        &self,
        db: &DatabaseTransaction,
        group_id: GroupId,
    ) -> ResultEngine<BTreeSet<UserId>> {
        Ok(group_members::Entity::find()
            .filter(group_members::Column::GroupId.eq(group_id))
            .all(db)
            .await?
            .into_iter()
            .map(|m| m.user_id)
            .collect())
    }

    pub(super) async fn insert_members(
        &self,
        db: &DatabaseTransaction,
        group_id: GroupId,
        user_ids: &BTreeSet<UserId>,
    ) -> ResultEngine<()> {
        if user_ids.is_empty() {
            return Ok(());
        }
        let rows = user_ids.iter().map(|&user_id| group_members::ActiveModel {
            group_id: ActiveValue::Set(group_id),
            user_id: ActiveValue::Set(user_id),
        });
        group_members::Entity::insert_many(rows)
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    /// Creates every unknown user of `user_ids` with its default name.
    pub(super) async fn ensure_users_exist(
        &self,
        db: &DatabaseTransaction,
        user_ids: &BTreeSet<UserId>,
    ) -> ResultEngine<()> {
        if user_ids.is_empty() {
            return Ok(());
        }
        let existing: BTreeSet<UserId> = users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids.iter().copied()))
            .all(db)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();

        for &user_id in user_ids.difference(&existing) {
            users::ActiveModel {
                id: ActiveValue::Set(user_id),
                name: ActiveValue::Set(User::default_name(user_id)),
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    /// Deletes a user that belongs to no group and never paid an expense.
    ///
    /// Users only referenced by splits or settlements are deleted too; those
    /// rows keep the dangling id.
    pub(super) async fn delete_if_orphan(
        &self,
        db: &DatabaseTransaction,
        user_id: UserId,
    ) -> ResultEngine<bool> {
        let memberships = group_members::Entity::find()
            .filter(group_members::Column::UserId.eq(user_id))
            .count(db)
            .await?;
        if memberships > 0 {
            return Ok(false);
        }

        let paid = expenses::Entity::find()
            .filter(expenses::Column::PaidBy.eq(user_id))
            .count(db)
            .await?;
        if paid > 0 {
            return Ok(false);
        }

        let res = users::Entity::delete_by_id(user_id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    /// All expenses of a group with their splits, oldest first.
    pub(super) async fn load_expenses(
        &self,
        db: &DatabaseTransaction,
        group_id: GroupId,
    ) -> ResultEngine<Vec<Expense>> {
        let rows = expenses::Entity::find()
            .filter(expenses::Column::GroupId.eq(group_id))
            .order_by_asc(expenses::Column::Id)
            .find_with_related(splits::Entity)
            .all(db)
            .await?;

        rows.into_iter()
            .map(|(model, mut split_models)| {
                split_models.sort_by_key(|s| s.id);
                let shares = split_models.iter().map(Share::from).collect();
                Expense::try_from((model, shares))
            })
            .collect()
    }

    pub(super) async fn load_settlements(
        &self,
        db: &DatabaseTransaction,
        group_id: GroupId,
    ) -> ResultEngine<Vec<settlements::Model>> {
        Ok(settlements::Entity::find()
            .filter(settlements::Column::GroupId.eq(group_id))
            .order_by_asc(settlements::Column::Id)
            .all(db)
            .await?)
    }

    /// Full expense and settlement history of a group.
    pub(super) async fn load_ledger(
        &self,
        db: &DatabaseTransaction,
        group_id: GroupId,
    ) -> ResultEngine<Ledger> {
        let expenses = self.load_expenses(db, group_id).await?;
        let settlements = self.load_settlements(db, group_id).await?;
        Ok(Ledger {
            expenses: expenses.iter().map(Into::into).collect(),
            settlements: settlements.iter().map(Into::into).collect(),
        })
    }

    pub(super) async fn group_view(
        &self,
        db: &DatabaseTransaction,
        group: groups::Model,
    ) -> ResultEngine<Group> {
        let members = self.group_members(db, group.id).await?;
        let total_expenses: f64 = expenses::Entity::find()
            .filter(expenses::Column::GroupId.eq(group.id))
            .all(db)
            .await?
            .iter()
            .fold(0.0, |acc, e| acc + e.amount);
        Ok(Group {
            id: group.id,
            name: group.name,
            user_ids: members.into_iter().collect(),
            total_expenses,
        })
    }
}
