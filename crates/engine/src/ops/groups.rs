use std::collections::BTreeSet;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Group, GroupId, ResultEngine, UserId, expenses, group_members, groups, settlements, splits,
};

use super::{Engine, normalize_required_name, with_tx};

/// Changes applied by [`Engine::update_group`]. `None` leaves a field as is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupUpdate {
    pub name: Option<String>,
    /// The complete new member list.
    pub user_ids: Option<Vec<UserId>>,
}

impl Engine {
    /// Creates a group. Unknown user ids are created as `User {id}`.
    pub async fn create_group(&self, name: &str, user_ids: &[UserId]) -> ResultEngine<Group> {
        let name = normalize_required_name(name, "group name")?;
        let members: BTreeSet<UserId> = user_ids.iter().copied().collect();

        with_tx!(self, |db_tx| {
            self.ensure_users_exist(&db_tx, &members).await?;
            let group = groups::ActiveModel {
                name: ActiveValue::Set(name),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            self.insert_members(&db_tx, group.id, &members).await?;
            self.group_view(&db_tx, group).await
        })
    }

    pub async fn group(&self, group_id: GroupId) -> ResultEngine<Group> {
        with_tx!(self, |db_tx| {
            let group = self.require_group(&db_tx, group_id).await?;
            self.group_view(&db_tx, group).await
        })
    }

    pub async fn list_groups(&self) -> ResultEngine<Vec<Group>> {
        with_tx!(self, |db_tx| {
            let models = groups::Entity::find()
                .order_by_asc(groups::Column::Id)
                .all(&db_tx)
                .await?;
            let mut groups = Vec::with_capacity(models.len());
            for model in models {
                groups.push(self.group_view(&db_tx, model).await?);
            }
            Ok(groups)
        })
    }

    /// Renames a group and/or replaces its members.
    ///
    /// Existing splits and settlements are never touched: a removed member
    /// keeps their history but disappears from the group balances. Removed
    /// users that end up in no group and never paid an expense are deleted.
    pub async fn update_group(&self, group_id: GroupId, update: GroupUpdate) -> ResultEngine<Group> {
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "group name"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let mut group = self.require_group(&db_tx, group_id).await?;

            if let Some(name) = name {
                let mut active: groups::ActiveModel = group.into();
                active.name = ActiveValue::Set(name);
                group = active.update(&db_tx).await?;
            }

            if let Some(user_ids) = update.user_ids.as_deref() {
                let wanted: BTreeSet<UserId> = user_ids.iter().copied().collect();
                let current = self.group_members(&db_tx, group_id).await?;
                let added: BTreeSet<UserId> = wanted.difference(&current).copied().collect();
                let removed: Vec<UserId> = current.difference(&wanted).copied().collect();

                self.ensure_users_exist(&db_tx, &added).await?;
                self.insert_members(&db_tx, group_id, &added).await?;

                if !removed.is_empty() {
                    group_members::Entity::delete_many()
                        .filter(group_members::Column::GroupId.eq(group_id))
                        .filter(group_members::Column::UserId.is_in(removed.iter().copied()))
                        .exec(&db_tx)
                        .await?;
                }
                for user_id in removed {
                    self.delete_if_orphan(&db_tx, user_id).await?;
                }
            }

            self.group_view(&db_tx, group).await
        })
    }

    /// Deletes a group with its whole history.
    pub async fn delete_group(&self, group_id: GroupId) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            let members = self.group_members(&db_tx, group_id).await?;

            let expense_ids: Vec<i32> = expenses::Entity::find()
                .filter(expenses::Column::GroupId.eq(group_id))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|e| e.id)
                .collect();

            splits::Entity::delete_many()
                .filter(splits::Column::ExpenseId.is_in(expense_ids))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_many()
                .filter(expenses::Column::GroupId.eq(group_id))
                .exec(&db_tx)
                .await?;
            settlements::Entity::delete_many()
                .filter(settlements::Column::GroupId.eq(group_id))
                .exec(&db_tx)
                .await?;
            group_members::Entity::delete_many()
                .filter(group_members::Column::GroupId.eq(group_id))
                .exec(&db_tx)
                .await?;
            groups::Entity::delete_by_id(group_id).exec(&db_tx).await?;

            for user_id in members {
                self.delete_if_orphan(&db_tx, user_id).await?;
            }
            Ok(())
        })
    }
}
