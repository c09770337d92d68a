use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Balances, EngineError, ResultEngine, UserId,
    chat::{ChatQuery, HELP_TEXT},
    group_members, groups,
};

use super::{Engine, with_tx};

const CURRENCY_SYMBOL: &str = "\u{20b9}";

/// Highest payer, the lowest user id wins ties.
fn top_payer(totals: &Balances) -> Option<(UserId, f64)> {
    totals
        .iter()
        .fold(None, |best: Option<(UserId, f64)>, (&user_id, &amount)| match best {
            Some((_, top)) if top >= amount => best,
            _ => Some((user_id, amount)),
        })
}

impl Engine {
    /// Answers a free-text question asked by `user_id`.
    ///
    /// Unrecognized questions get the help text, unknown group names fail
    /// with [`EngineError::NotFound`].
    pub async fn chat(&self, text: &str, user_id: UserId) -> ResultEngine<String> {
        let Some(query) = ChatQuery::parse(text) else {
            return Ok(HELP_TEXT.to_string());
        };

        with_tx!(self, |db_tx| {
            let answer = match query {
                ChatQuery::UserOwes { user, group } => {
                    let group = self.require_group_by_name(&db_tx, &group).await?;
                    let ledger = self.load_ledger(&db_tx, group.id).await?;
                    // Ids that do not fit a UserId cannot have splits.
                    let owed = user
                        .parse::<UserId>()
                        .map_or(0.0, |debtor| ledger.owed_by(debtor));
                    format!(
                        "User {user} owes {CURRENCY_SYMBOL}{owed:.2} in {}",
                        group.name
                    )
                }
                ChatQuery::TopPayer { group } => {
                    let group = self.require_group_by_name(&db_tx, &group).await?;
                    let ledger = self.load_ledger(&db_tx, group.id).await?;
                    match top_payer(&ledger.paid_totals()) {
                        Some((payer, amount)) => format!(
                            "User {payer} paid the most in {} ({CURRENCY_SYMBOL}{amount:.2})",
                            group.name
                        ),
                        None => format!("No expenses in {}", group.name),
                    }
                }
                ChatQuery::Latest { count, group } => {
                    let group = match group {
                        Some(name) => self.require_group_by_name(&db_tx, &name).await?,
                        None => self.first_group_of(&db_tx, user_id).await?,
                    };
                    let mut expenses = self.load_expenses(&db_tx, group.id).await?;
                    expenses.sort_by(|a, b| b.id.cmp(&a.id));
                    expenses.truncate(count);

                    if expenses.is_empty() {
                        format!("No expenses in {}", group.name)
                    } else {
                        let lines: Vec<String> = expenses
                            .iter()
                            .map(|e| {
                                format!(
                                    "#{} {}: {CURRENCY_SYMBOL}{:.2} paid by User {}",
                                    e.id, e.description, e.amount, e.paid_by
                                )
                            })
                            .collect();
                        format!(
                            "Latest {count} expenses in {}:\n{}",
                            group.name,
                            lines.join("\n")
                        )
                    }
                }
            };
            Ok(answer)
        })
    }

    /// The group with the lowest id among those `user_id` belongs to.
    async fn first_group_of(
        &self,
        db: &sea_orm::DatabaseTransaction,
        user_id: UserId,
    ) -> ResultEngine<groups::Model> {
        let membership = group_members::Entity::find()
            .filter(group_members::Column::UserId.eq(user_id))
            .order_by_asc(group_members::Column::GroupId)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("you don't belong to any groups".to_string()))?;
        self.require_group(db, membership.group_id).await
    }
}
