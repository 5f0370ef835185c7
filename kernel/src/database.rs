use std::future::Future;
use std::panic::AssertUnwindSafe;

use error_stack::Report;
use futures::FutureExt;

use crate::KernelError;

#[async_trait::async_trait]
pub trait DatabaseConnection: 'static + Sync + Send {
    /// Connection outside any transaction; every statement commits on its own.
    type Connection: 'static + Send;
    type Transaction: Transaction;
    async fn connect(&self) -> error_stack::Result<Self::Connection, KernelError>;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError>;
}

pub trait DependOnDatabaseConnection: 'static + Sync + Send {
    type DatabaseConnection: DatabaseConnection;
    fn database_connection(&self) -> &Self::DatabaseConnection;
}

/// Dropping a transaction without committing must discard its work.
#[async_trait::async_trait]
pub trait Transaction: 'static + Send {
    async fn commit(self) -> error_stack::Result<(), KernelError>;
    async fn roll_back(self) -> error_stack::Result<(), KernelError>;
}

#[async_trait::async_trait]
pub trait TransactionManager: DatabaseConnection {
    /// Runs `block` as one unit of work.
    ///
    /// The block receives the open transaction and hands it back together with its
    /// outcome. `Ok` commits, `Err` rolls back and returns the block's report. If the
    /// rollback fails too, both reports are returned under [`KernelError::Transaction`].
    /// A panicking block drops the transaction (discarding its work) and the panic
    /// continues.
    async fn begin<T, F, Fut>(&self, block: F) -> error_stack::Result<T, KernelError>
    where
        T: Send,
        F: FnOnce(Self::Transaction) -> Fut + Send,
        Fut: Future<Output = (Self::Transaction, error_stack::Result<T, KernelError>)> + Send,
    {
        let transaction = self.transact().await?;

        let (transaction, result) = match AssertUnwindSafe(block(transaction))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(panic) => {
                tracing::error!("unit of work panicked, dropping its transaction");
                std::panic::resume_unwind(panic)
            }
        };

        match result {
            Ok(value) => {
                transaction.commit().await?;
                Ok(value)
            }
            Err(report) => match transaction.roll_back().await {
                Ok(()) => {
                    tracing::warn!("unit of work rolled back: {:?}", report.current_context());
                    Err(report)
                }
                Err(rollback) => {
                    tracing::error!("roll back failed: {:?}", rollback.current_context());
                    let mut composite = Report::new(KernelError::Transaction)
                        .attach_printable("Rollback failed after the unit of work was aborted");
                    composite.extend_one(report);
                    composite.extend_one(rollback);
                    Err(composite)
                }
            },
        }
    }
}

impl<T> TransactionManager for T where T: DatabaseConnection {}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use error_stack::Report;

    use crate::database::{DatabaseConnection, Transaction, TransactionManager};
    use crate::KernelError;

    #[derive(Default)]
    struct Counters {
        committed: AtomicUsize,
        rolled_back: AtomicUsize,
        dropped: AtomicUsize,
    }

    struct RecordingDatabase {
        counters: Arc<Counters>,
        fail_roll_back: bool,
    }

    struct RecordingTransaction {
        counters: Arc<Counters>,
        fail_roll_back: bool,
        finished: bool,
    }

    impl Drop for RecordingTransaction {
        fn drop(&mut self) {
            if !self.finished {
                self.counters.dropped.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[async_trait::async_trait]
    impl Transaction for RecordingTransaction {
        async fn commit(mut self) -> error_stack::Result<(), KernelError> {
            self.finished = true;
            self.counters.committed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn roll_back(mut self) -> error_stack::Result<(), KernelError> {
            self.finished = true;
            if self.fail_roll_back {
                return Err(
                    Report::new(KernelError::Persistence).attach_printable("lost connection")
                );
            }
            self.counters.rolled_back.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl DatabaseConnection for RecordingDatabase {
        type Connection = ();
        type Transaction = RecordingTransaction;

        async fn connect(&self) -> error_stack::Result<(), KernelError> {
            Ok(())
        }

        async fn transact(&self) -> error_stack::Result<RecordingTransaction, KernelError> {
            Ok(RecordingTransaction {
                counters: Arc::clone(&self.counters),
                fail_roll_back: self.fail_roll_back,
                finished: false,
            })
        }
    }

    fn database(fail_roll_back: bool) -> (RecordingDatabase, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let db = RecordingDatabase {
            counters: Arc::clone(&counters),
            fail_roll_back,
        };
        (db, counters)
    }

    #[tokio::test]
    async fn ok_commits() {
        let (db, counters) = database(false);
        let value = db.begin(|con| async move { (con, Ok(42)) }).await.unwrap();
        assert_eq!(value, 42);
        assert_eq!(counters.committed.load(Ordering::SeqCst), 1);
        assert_eq!(counters.rolled_back.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn err_rolls_back_and_keeps_the_report() {
        let (db, counters) = database(false);
        let report = db
            .begin(|con| async move {
                let result: error_stack::Result<(), KernelError> =
                    Err(Report::new(KernelError::DuplicateIdentity));
                (con, result)
            })
            .await
            .unwrap_err();
        assert_eq!(*report.current_context(), KernelError::DuplicateIdentity);
        assert_eq!(counters.committed.load(Ordering::SeqCst), 0);
        assert_eq!(counters.rolled_back.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_roll_back_is_composed() {
        let (db, _) = database(true);
        let report = db
            .begin(|con| async move {
                let result: error_stack::Result<(), KernelError> =
                    Err(Report::new(KernelError::DuplicateIdentity));
                (con, result)
            })
            .await
            .unwrap_err();
        assert_eq!(*report.current_context(), KernelError::Transaction);
        let contexts = report
            .frames()
            .filter_map(|frame| frame.downcast_ref::<KernelError>())
            .copied()
            .collect::<Vec<_>>();
        assert!(contexts.contains(&KernelError::DuplicateIdentity));
        assert!(contexts.contains(&KernelError::Persistence));
    }

    #[tokio::test]
    async fn panic_drops_the_transaction_and_resumes() {
        let (db, counters) = database(false);
        let outcome = tokio::spawn(async move {
            db.begin(|con| async move {
                let result: error_stack::Result<(), KernelError> = Ok(());
                if result.is_ok() {
                    panic!("boom");
                }
                (con, result)
            })
            .await
        })
        .await;
        assert!(outcome.unwrap_err().is_panic());
        assert_eq!(counters.dropped.load(Ordering::SeqCst), 1);
        assert_eq!(counters.committed.load(Ordering::SeqCst), 0);
    }
}
