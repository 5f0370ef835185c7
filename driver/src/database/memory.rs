use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::prelude::entity::{Book, BookId};
use kernel::KernelError;

pub use self::book::*;

mod book;

#[derive(Debug, Default, Clone)]
pub(in crate::database) struct MemoryStore {
    books: HashMap<BookId, Book>,
}

/// Process-local storage. A transaction holds the store lock until it finishes, so
/// units of work run one at a time.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    store: Arc<Mutex<MemoryStore>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for MemoryDatabase {
    type Connection = MemoryConnection;
    type Transaction = MemoryTransaction;

    async fn connect(&self) -> error_stack::Result<Self::Connection, KernelError> {
        Ok(MemoryConnection(Arc::clone(&self.store)))
    }

    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = Arc::clone(&self.store).lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTransaction { guard, working })
    }
}

pub struct MemoryConnection(Arc<Mutex<MemoryStore>>);

impl MemoryConnection {
    pub(in crate::database) async fn lock(&self) -> MutexGuard<'_, MemoryStore> {
        self.0.lock().await
    }
}

/// Works on a private copy of the store that replaces the shared one on commit.
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryStore>,
    working: MemoryStore,
}

impl MemoryTransaction {
    pub(in crate::database) fn store_mut(&mut self) -> &mut MemoryStore {
        &mut self.working
    }
}

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let MemoryTransaction { mut guard, working } = self;
        *guard = working;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}
