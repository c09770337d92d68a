//! Group expense splitting engine.
//!
//! The pure parts ([`split`], [`balance`], [`chat`]) never touch storage. The
//! [`Engine`] loads group history through sea-orm, runs them, and persists the
//! results inside a single database transaction per operation.

pub use balance::{Balances, BalancesByGroup, Ledger, LedgerExpense, LedgerSettlement};
pub use chat::ChatQuery;
pub use error::EngineError;
pub use expenses::{Expense, ExpenseDraft};
pub use groups::Group;
pub use ops::{Engine, EngineBuilder, GroupUpdate};
pub use settlements::Settlement;
pub use split::{Allocator, PercentShare, Share, SplitPolicy};
pub use users::User;

pub mod balance;
pub mod chat;
mod error;
mod expenses;
mod group_members;
mod groups;
mod ops;
mod settlements;
pub mod split;
mod splits;
mod users;

pub type UserId = i32;
pub type GroupId = i32;
pub type ExpenseId = i32;
pub type SettlementId = i32;

type ResultEngine<T> = Result<T, EngineError>;
