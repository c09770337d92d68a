//! Expenses and their drafts.
//!
//! An `Expense` is always stored together with its splits: the shares are
//! absolute amounts that add up to the expense amount.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ExpenseId, GroupId, UserId,
    balance::LedgerExpense,
    split::{PercentShare, Share, SplitPolicy},
};

/// Input for a new expense.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: f64,
    pub paid_by: UserId,
    pub policy: SplitPolicy,
    /// Required for [`SplitPolicy::Percentage`], ignored otherwise.
    pub splits: Option<Vec<PercentShare>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub group_id: GroupId,
    pub description: String,
    pub amount: f64,
    pub paid_by: UserId,
    pub policy: SplitPolicy,
    pub splits: Vec<Share>,
}

impl TryFrom<(Model, Vec<Share>)> for Expense {
    type Error = EngineError;

    fn try_from((model, splits): (Model, Vec<Share>)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            group_id: model.group_id,
            description: model.description,
            amount: model.amount,
            paid_by: model.paid_by,
            policy: SplitPolicy::try_from(model.split_type.as_str())?,
            splits,
        })
    }
}

impl From<&Expense> for LedgerExpense {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            amount: expense.amount,
            paid_by: expense.paid_by,
            splits: expense.splits.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub group_id: i32,
    pub description: String,
    pub amount: f64,
    pub paid_by: i32,
    pub split_type: String,
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
    #[sea_orm(has_many = "super::splits::Entity")]
    Splits,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Splits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
