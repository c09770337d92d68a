#![allow(dead_code)]

use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, ExpenseDraft, PercentShare, SplitPolicy, UserId};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    engine_with_options(false).await
}

pub async fn engine_with_options(strict_percentages: bool) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .strict_percentages(strict_percentages)
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub fn equal(description: &str, amount: f64, paid_by: UserId) -> ExpenseDraft {
    ExpenseDraft {
        description: description.to_string(),
        amount,
        paid_by,
        policy: SplitPolicy::Equal,
        splits: None,
    }
}

pub fn percentage(
    description: &str,
    amount: f64,
    paid_by: UserId,
    splits: &[(UserId, f64)],
) -> ExpenseDraft {
    ExpenseDraft {
        description: description.to_string(),
        amount,
        paid_by,
        policy: SplitPolicy::Percentage,
        splits: Some(
            splits
                .iter()
                .map(|&(user_id, percentage)| PercentShare {
                    user_id,
                    percentage,
                })
                .collect(),
        ),
    }
}
