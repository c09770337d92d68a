//! Balance computation over a group ledger.
//!
//! Balances are computed in two stages: [`Ledger::accumulate`] replays the
//! full history (every user ever referenced), then [`filter_members`] keeps
//! only the current members. The raw stage always sums to zero.
//!
//! Sign convention: positive means the group owes the user, negative means
//! the user owes the group.

use std::collections::{BTreeMap, BTreeSet};

use crate::{ExpenseId, GroupId, UserId, split::Share};

/// Signed balance per user.
pub type Balances = BTreeMap<UserId, f64>;

/// Signed balance of one user per group.
pub type BalancesByGroup = BTreeMap<GroupId, f64>;

/// An expense as seen by the balance computation.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerExpense {
    pub id: ExpenseId,
    pub amount: f64,
    pub paid_by: UserId,
    pub splits: Vec<Share>,
}

/// A payment from `from_user` to `to_user`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LedgerSettlement {
    pub from_user: UserId,
    pub to_user: UserId,
    pub amount: f64,
}

/// The full expense and settlement history of one group.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ledger {
    pub expenses: Vec<LedgerExpense>,
    pub settlements: Vec<LedgerSettlement>,
}

impl Ledger {
    /// Every signed balance change implied by the history, in replay order.
    ///
    /// For each expense: `-share` per split user, then `+amount` to the payer.
    /// For each settlement: `+amount` to `from_user`, `-amount` to `to_user`.
    fn postings(&self) -> impl Iterator<Item = (UserId, f64)> + '_ {
        let expenses = self.expenses.iter().flat_map(|expense| {
            expense
                .splits
                .iter()
                .map(|split| (split.user_id, -split.share))
                .chain(std::iter::once((expense.paid_by, expense.amount)))
        });
        let settlements = self.settlements.iter().flat_map(|settlement| {
            [
                (settlement.from_user, settlement.amount),
                (settlement.to_user, -settlement.amount),
            ]
        });
        expenses.chain(settlements)
    }

    /// Raw balances of every user referenced by the history.
    pub fn accumulate(&self) -> Balances {
        let mut balances = Balances::new();
        for (user_id, delta) in self.postings() {
            *balances.entry(user_id).or_insert(0.0) += delta;
        }
        balances
    }

    /// Balance of a single user, regardless of membership.
    pub fn balance_of(&self, user_id: UserId) -> f64 {
        self.postings()
            .filter(|(id, _)| *id == user_id)
            .fold(0.0, |acc, (_, delta)| acc + delta)
    }

    /// Sum of the split shares assigned to `user_id`, settlements excluded.
    pub fn owed_by(&self, user_id: UserId) -> f64 {
        self.expenses
            .iter()
            .flat_map(|e| e.splits.iter())
            .filter(|s| s.user_id == user_id)
            .fold(0.0, |acc, s| acc + s.share)
    }

    /// Total amount fronted by each payer.
    pub fn paid_totals(&self) -> Balances {
        let mut totals = Balances::new();
        for expense in &self.expenses {
            *totals.entry(expense.paid_by).or_insert(0.0) += expense.amount;
        }
        totals
    }

    pub fn total_expenses(&self) -> f64 {
        self.expenses.iter().fold(0.0, |acc, e| acc + e.amount)
    }
}

/// Drops every user that is not a current member.
pub fn filter_members(raw: Balances, members: &BTreeSet<UserId>) -> Balances {
    raw.into_iter()
        .filter(|(user_id, _)| members.contains(user_id))
        .collect()
}

/// Balances of the current members of a group.
pub fn group_balances(ledger: &Ledger, members: &BTreeSet<UserId>) -> Balances {
    filter_members(ledger.accumulate(), members)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(user_id: UserId, share: f64) -> Share {
        Share { user_id, share }
    }

    fn expense(id: ExpenseId, amount: f64, paid_by: UserId, splits: Vec<Share>) -> LedgerExpense {
        LedgerExpense {
            id,
            amount,
            paid_by,
            splits,
        }
    }

    fn settlement(from_user: UserId, to_user: UserId, amount: f64) -> LedgerSettlement {
        LedgerSettlement {
            from_user,
            to_user,
            amount,
        }
    }

    fn members(ids: &[UserId]) -> BTreeSet<UserId> {
        ids.iter().copied().collect()
    }

    fn trip() -> Ledger {
        Ledger {
            expenses: vec![expense(
                1,
                90.0,
                1,
                vec![share(1, 30.0), share(2, 30.0), share(3, 30.0)],
            )],
            settlements: Vec::new(),
        }
    }

    #[test]
    fn equal_expense_balances() {
        let balances = group_balances(&trip(), &members(&[1, 2, 3]));
        assert_eq!(
            balances,
            Balances::from([(1, 60.0), (2, -30.0), (3, -30.0)])
        );
    }

    #[test]
    fn settlement_nets_against_debt() {
        let mut ledger = trip();
        ledger.settlements.push(settlement(2, 1, 30.0));
        let balances = group_balances(&ledger, &members(&[1, 2, 3]));
        assert_eq!(
            balances,
            Balances::from([(1, 30.0), (2, 0.0), (3, -30.0)])
        );
    }

    #[test]
    fn partial_settlement() {
        // A (1) owes B (2) 100.
        let ledger = Ledger {
            expenses: vec![expense(1, 100.0, 2, vec![share(1, 100.0)])],
            settlements: vec![settlement(1, 2, 60.0)],
        };
        let balances = group_balances(&ledger, &members(&[1, 2]));
        assert!((balances[&1] + 40.0).abs() < 1e-9);
        assert!((balances[&2] - 40.0).abs() < 1e-9);
    }

    #[test]
    fn raw_balances_are_conserved() {
        let ledger = Ledger {
            expenses: vec![
                expense(1, 100.0, 1, vec![share(1, 33.0), share(2, 33.0), share(4, 34.0)]),
                expense(2, 10.0 / 3.0, 4, vec![share(2, 10.0 / 9.0), share(3, 20.0 / 9.0)]),
                expense(3, 0.3, 2, vec![share(1, 0.1), share(2, 0.1), share(3, 0.1)]),
            ],
            settlements: vec![settlement(2, 1, 12.5), settlement(3, 4, 0.7)],
        };
        let total: f64 = ledger.accumulate().values().sum();
        assert!(total.abs() < 1e-9);
    }

    #[test]
    fn removed_member_is_filtered_out() {
        let ledger = trip();
        let raw = ledger.accumulate();
        assert!(raw.contains_key(&3));

        let balances = filter_members(raw, &members(&[1, 2]));
        assert_eq!(balances, Balances::from([(1, 60.0), (2, -30.0)]));
    }

    #[test]
    fn members_without_activity_are_absent() {
        let balances = group_balances(&trip(), &members(&[1, 2, 3, 7]));
        assert!(!balances.contains_key(&7));
        assert!(group_balances(&Ledger::default(), &members(&[1])).is_empty());
        assert!(group_balances(&trip(), &BTreeSet::new()).is_empty());
    }

    #[test]
    fn single_user_balance_matches_accumulation() {
        let mut ledger = trip();
        ledger.settlements.push(settlement(2, 1, 30.0));
        ledger.settlements.push(settlement(3, 2, 5.0));
        let raw = ledger.accumulate();
        for (user_id, balance) in &raw {
            assert!((ledger.balance_of(*user_id) - balance).abs() < 1e-9);
        }
        assert_eq!(ledger.balance_of(42), 0.0);
    }

    #[test]
    fn query_primitives() {
        let mut ledger = trip();
        ledger
            .expenses
            .push(expense(2, 30.0, 2, vec![share(1, 15.0), share(2, 15.0)]));
        assert_eq!(ledger.owed_by(1), 45.0);
        assert_eq!(ledger.paid_totals(), Balances::from([(1, 90.0), (2, 30.0)]));
        assert_eq!(ledger.total_expenses(), 120.0);
    }
}
