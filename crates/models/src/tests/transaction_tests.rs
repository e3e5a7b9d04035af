use crate::book::{self, BookInput};
use anyhow::Result;
use sea_orm::TransactionTrait;

use super::setup_test_db;

#[tokio::test]
async fn test_transaction_commit() -> Result<()> {
    let db = setup_test_db().await?;

    let txn = db.begin().await?;
    let created = book::insert(&txn, &BookInput::new("commit", "코스")).await?;
    txn.commit().await?;

    let found = book::find_by_id(&db, created.id).await?;
    assert_eq!(found.map(|b| b.title), Some("commit".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_transaction_rollback() -> Result<()> {
    let db = setup_test_db().await?;

    let txn = db.begin().await?;
    let created = book::insert(&txn, &BookInput::new("rollback", "코스")).await?;
    txn.rollback().await?;

    assert!(book::find_by_id(&db, created.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_dropped_transaction_rolls_back() -> Result<()> {
    let db = setup_test_db().await?;

    {
        let txn = db.begin().await?;
        book::insert(&txn, &BookInput::new("dropped", "코스")).await?;
    }

    assert!(book::find_all(&db).await?.is_empty());
    Ok(())
}
