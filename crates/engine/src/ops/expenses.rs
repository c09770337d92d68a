use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{EngineError, Expense, ExpenseDraft, GroupId, ResultEngine, expenses, splits};

use super::{Engine, ensure_positive_amount, normalize_required_name, with_tx};

impl Engine {
    /// Adds an expense to a group and stores its splits.
    ///
    /// The payer must be a current member. The expense row and its splits are
    /// written in the same transaction, so a failed allocation leaves nothing
    /// behind.
    pub async fn add_expense(&self, group_id: GroupId, draft: ExpenseDraft) -> ResultEngine<Expense> {
        let description = normalize_required_name(&draft.description, "description")?;
        ensure_positive_amount(draft.amount)?;

        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            let members = self.group_members(&db_tx, group_id).await?;
            if !members.contains(&draft.paid_by) {
                return Err(EngineError::Validation(format!(
                    "payer {} is not a member of the group",
                    draft.paid_by
                )));
            }

            let shares = self.allocator.allocate(
                draft.amount,
                draft.policy,
                &members,
                draft.splits.as_deref(),
            )?;

            let model = expenses::ActiveModel {
                group_id: ActiveValue::Set(group_id),
                description: ActiveValue::Set(description),
                amount: ActiveValue::Set(draft.amount),
                paid_by: ActiveValue::Set(draft.paid_by),
                split_type: ActiveValue::Set(draft.policy.as_str().to_string()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            let rows = shares.iter().map(|share| splits::ActiveModel {
                expense_id: ActiveValue::Set(model.id),
                user_id: ActiveValue::Set(share.user_id),
                share: ActiveValue::Set(share.share),
                ..Default::default()
            });
            splits::Entity::insert_many(rows)
                .exec_without_returning(&db_tx)
                .await?;

            Expense::try_from((model, shares))
        })
    }

    /// Expenses of a group, newest first.
    pub async fn list_expenses(&self, group_id: GroupId) -> ResultEngine<Vec<Expense>> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            let mut expenses = self.load_expenses(&db_tx, group_id).await?;
            expenses.reverse();
            Ok(expenses)
        })
    }
}
