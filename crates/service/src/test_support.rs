#![cfg(test)]
use std::{future::Future, pin::Pin};

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use migration::MigratorTrait;
use models::db::connect_in_memory;

pub type TxnFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, anyhow::Error>> + Send + 'a>>;

/// Fresh in-memory database with migrations applied.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Run `body` inside a transaction that is always rolled back.
/// If `body` panics the transaction is dropped, which also rolls it back.
pub async fn with_rollback<T, F>(db: &DatabaseConnection, body: F) -> Result<T, anyhow::Error>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxnFuture<'a, T>,
{
    let txn = db.begin().await?;
    let out = body(&txn).await;
    txn.rollback().await?;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::book::{self, BookInput};

    #[tokio::test]
    async fn rollback_discards_writes_on_success() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let seen = with_rollback(&db, |txn| {
            Box::pin(async move {
                book::insert(txn, &BookInput::new("스프링 따라하기", "코스")).await?;
                Ok(book::find_all(txn).await?.len())
            })
        })
        .await?;
        assert_eq!(seen, 1);
        assert!(book::find_all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn rollback_discards_writes_on_error() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let res: Result<(), _> = with_rollback(&db, |txn| {
            Box::pin(async move {
                book::insert(txn, &BookInput::new("스프링 따라하기", "코스")).await?;
                Err(anyhow::anyhow!("boom"))
            })
        })
        .await;
        assert!(res.is_err());
        assert!(book::find_all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn each_scope_starts_from_an_empty_table() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        for _ in 0..2 {
            let id = with_rollback(&db, |txn| {
                Box::pin(async move { Ok(book::insert(txn, &BookInput::new("a", "b")).await?.id) })
            })
            .await?;
            assert!(book::find_by_id(&db, id).await?.is_none());
        }
        Ok(())
    }
}
