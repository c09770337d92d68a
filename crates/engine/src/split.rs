//! Split allocation.
//!
//! An [`Allocator`] turns the amount of an expense into the absolute share
//! owed by every member of the group. Shares are always stored as amounts,
//! percentages only exist as allocation input.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, UserId};

/// Maximum distance from 100 accepted by a strict allocator.
pub const PERCENTAGE_TOLERANCE: f64 = 1e-6;

/// How an expense amount is divided among the group members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    Equal,
    Percentage,
}

impl SplitPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Percentage => "percentage",
        }
    }
}

impl TryFrom<&str> for SplitPolicy {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "equal" => Ok(Self::Equal),
            "percentage" => Ok(Self::Percentage),
            other => Err(EngineError::InvalidPolicy(format!(
                "unknown split policy: {other}"
            ))),
        }
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested percentage of an expense for one member.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PercentShare {
    pub user_id: UserId,
    pub percentage: f64,
}

/// Absolute amount owed by one member for one expense.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub user_id: UserId,
    pub share: f64,
}

/// Pure split allocator.
///
/// By default percentages are not required to add up to 100. A strict
/// allocator rejects totals farther than [`PERCENTAGE_TOLERANCE`] from 100.
#[derive(Clone, Copy, Debug, Default)]
pub struct Allocator {
    strict_percentages: bool,
}

impl Allocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the 100% check for percentage splits.
    #[must_use]
    pub fn strict_percentages(mut self, strict: bool) -> Self {
        self.strict_percentages = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict_percentages
    }

    /// Computes the share of every member.
    ///
    /// - `Equal`: each member owes `amount / members.len()`, no remainder is
    ///   redistributed.
    /// - `Percentage`: `explicit_splits` must name every member exactly once;
    ///   each share is `amount * percentage / 100`.
    pub fn allocate(
        &self,
        amount: f64,
        policy: SplitPolicy,
        members: &BTreeSet<UserId>,
        explicit_splits: Option<&[PercentShare]>,
    ) -> ResultEngine<Vec<Share>> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(EngineError::Validation("amount must be > 0".to_string()));
        }
        match policy {
            SplitPolicy::Equal => allocate_equal(amount, members),
            SplitPolicy::Percentage => self.allocate_percentage(amount, members, explicit_splits),
        }
    }

    fn allocate_percentage(
        &self,
        amount: f64,
        members: &BTreeSet<UserId>,
        explicit_splits: Option<&[PercentShare]>,
    ) -> ResultEngine<Vec<Share>> {
        let splits = explicit_splits
            .filter(|splits| !splits.is_empty())
            .ok_or_else(|| {
                EngineError::Validation("provide splits for each member".to_string())
            })?;
        ensure_split_members(members, splits)?;

        for split in splits {
            if !split.percentage.is_finite() || split.percentage < 0.0 {
                return Err(EngineError::Validation(format!(
                    "invalid percentage for user {}",
                    split.user_id
                )));
            }
        }

        if self.strict_percentages {
            let total: f64 = splits.iter().map(|s| s.percentage).sum();
            if (total - 100.0).abs() > PERCENTAGE_TOLERANCE {
                return Err(EngineError::Validation(format!(
                    "percentages must sum to 100, got {total}"
                )));
            }
        }

        Ok(splits
            .iter()
            .map(|split| Share {
                user_id: split.user_id,
                share: amount * (split.percentage / 100.0),
            })
            .collect())
    }
}

fn allocate_equal(amount: f64, members: &BTreeSet<UserId>) -> ResultEngine<Vec<Share>> {
    if members.is_empty() {
        return Err(EngineError::InvalidPolicy(
            "equal split requires at least one member".to_string(),
        ));
    }
    let share = amount / members.len() as f64;
    Ok(members
        .iter()
        .map(|&user_id| Share { user_id, share })
        .collect())
}

/// The requested ids must be exactly the member set, each named once.
fn ensure_split_members(members: &BTreeSet<UserId>, splits: &[PercentShare]) -> ResultEngine<()> {
    let requested: BTreeSet<UserId> = splits.iter().map(|s| s.user_id).collect();
    let missing: Vec<UserId> = members.difference(&requested).copied().collect();
    let unexpected: Vec<UserId> = requested.difference(members).copied().collect();
    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(EngineError::SplitMembers {
            missing,
            unexpected,
        });
    }
    if splits.len() != members.len() {
        return Err(EngineError::Validation(format!(
            "expected {} splits, got {}",
            members.len(),
            splits.len()
        )));
    }
    Ok(())
}
