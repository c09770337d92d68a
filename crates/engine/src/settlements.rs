//! Settlements: payments between two members of a group.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{GroupId, SettlementId, UserId, balance::LedgerSettlement};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: SettlementId,
    pub group_id: GroupId,
    pub from_user: UserId,
    pub to_user: UserId,
    pub amount: f64,
    pub paid_at: DateTime<Utc>,
}

impl From<Model> for Settlement {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            group_id: model.group_id,
            from_user: model.from_user,
            to_user: model.to_user,
            amount: model.amount,
            paid_at: model.paid_at,
        }
    }
}

impl From<&Model> for LedgerSettlement {
    fn from(model: &Model) -> Self {
        Self {
            from_user: model.from_user,
            to_user: model.to_user,
            amount: model.amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "settlements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub group_id: i32,
    pub from_user: i32,
    pub to_user: i32,
    pub amount: f64,
    pub paid_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Groups,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
