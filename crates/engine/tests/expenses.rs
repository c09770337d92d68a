mod common;

use common::{engine_with_db, engine_with_options, equal, percentage};
use engine::{EngineError, Share, SplitPolicy};

fn share(user_id: i32, share: f64) -> Share {
    Share { user_id, share }
}

#[tokio::test]
async fn equal_expense_splits_between_members() {
    let (engine, _db) = engine_with_db().await;
    let group = engine.create_group("Trip", &[1, 2, 3]).await.unwrap();

    let expense = engine
        .add_expense(group.id, equal("Dinner", 90.0, 1))
        .await
        .unwrap();
    assert_eq!(expense.group_id, group.id);
    assert_eq!(expense.policy, SplitPolicy::Equal);
    assert_eq!(
        expense.splits,
        vec![share(1, 30.0), share(2, 30.0), share(3, 30.0)]
    );

    let group = engine.group(group.id).await.unwrap();
    assert_eq!(group.total_expenses, 90.0);
}

#[tokio::test]
async fn percentage_expense_stores_absolute_shares() {
    let (engine, _db) = engine_with_db().await;
    let group = engine.create_group("Flat", &[1, 2]).await.unwrap();

    let expense = engine
        .add_expense(
            group.id,
            percentage("Rent", 100.0, 2, &[(1, 70.0), (2, 30.0)]),
        )
        .await
        .unwrap();
    assert_eq!(expense.policy, SplitPolicy::Percentage);
    assert_eq!(expense.splits, vec![share(1, 70.0), share(2, 30.0)]);

    let listed = engine.list_expenses(group.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].splits, expense.splits);
}

#[tokio::test]
async fn percentage_mismatch_names_ids_and_writes_nothing() {
    let (engine, _db) = engine_with_db().await;
    let group = engine.create_group("Flat", &[1, 2]).await.unwrap();

    let err = engine
        .add_expense(
            group.id,
            percentage("Rent", 100.0, 1, &[(1, 70.0), (3, 30.0)]),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::SplitMembers {
            missing: vec![2],
            unexpected: vec![3],
        }
    );
    assert!(err.is_validation());
    assert!(engine.list_expenses(group.id).await.unwrap().is_empty());
    assert_eq!(engine.group(group.id).await.unwrap().total_expenses, 0.0);
}

#[tokio::test]
async fn percentage_without_splits_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let group = engine.create_group("Flat", &[1, 2]).await.unwrap();

    let mut draft = equal("Rent", 100.0, 1);
    draft.policy = SplitPolicy::Percentage;
    let err = engine.add_expense(group.id, draft).await.unwrap_err();
    assert!(err.is_validation());
    assert!(engine.list_expenses(group.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn strict_engine_rejects_percentages_not_adding_up() {
    let (lenient, _db) = engine_with_db().await;
    let group = lenient.create_group("Flat", &[1, 2]).await.unwrap();
    let expense = lenient
        .add_expense(group.id, percentage("Rent", 100.0, 1, &[(1, 50.0), (2, 30.0)]))
        .await
        .unwrap();
    assert_eq!(expense.splits, vec![share(1, 50.0), share(2, 30.0)]);

    let (strict, _db) = engine_with_options(true).await;
    assert!(strict.allocator().is_strict());
    let group = strict.create_group("Flat", &[1, 2]).await.unwrap();
    let err = strict
        .add_expense(group.id, percentage("Rent", 100.0, 1, &[(1, 50.0), (2, 30.0)]))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn payer_must_be_a_member() {
    let (engine, _db) = engine_with_db().await;
    let group = engine.create_group("Trip", &[1, 2]).await.unwrap();

    let err = engine
        .add_expense(group.id, equal("Dinner", 50.0, 7))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(engine.list_expenses(group.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn amount_and_description_are_validated() {
    let (engine, _db) = engine_with_db().await;
    let group = engine.create_group("Trip", &[1, 2]).await.unwrap();

    for amount in [0.0, -5.0, f64::NAN] {
        let err = engine
            .add_expense(group.id, equal("Dinner", amount, 1))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
    let err = engine
        .add_expense(group.id, equal(" ", 10.0, 1))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn expense_in_missing_group_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine.add_expense(5, equal("Dinner", 10.0, 1)).await,
        Err(EngineError::NotFound(_))
    ));
}

#[tokio::test]
async fn expenses_are_listed_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let group = engine.create_group("Trip", &[1, 2]).await.unwrap();
    for description in ["Taxi", "Hotel", "Dinner"] {
        engine
            .add_expense(group.id, equal(description, 10.0, 1))
            .await
            .unwrap();
    }

    let listed: Vec<String> = engine
        .list_expenses(group.id)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.description)
        .collect();
    assert_eq!(listed, vec!["Dinner", "Hotel", "Taxi"]);
}
