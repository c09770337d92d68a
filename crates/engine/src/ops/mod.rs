use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine, split::Allocator};

/// Run a block inside a DB transaction, committing on success.
///
/// An early return (or `?`) drops the transaction, which rolls it back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

mod access;
mod balances;
mod chat;
mod expenses;
mod groups;
mod settlements;
mod users;

pub use groups::GroupUpdate;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    allocator: Allocator,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The allocator used for new expenses.
    pub fn allocator(&self) -> Allocator {
        self.allocator
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn ensure_positive_amount(amount: f64) -> ResultEngine<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::Validation("amount must be > 0".to_string()));
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    strict_percentages: bool,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Require percentage splits to add up to 100.
    pub fn strict_percentages(mut self, strict: bool) -> EngineBuilder {
        self.strict_percentages = strict;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            allocator: Allocator::new().strict_percentages(self.strict_percentages),
        })
    }
}
