use kernel::interface::repository::BookRepository;
use kernel::prelude::entity::{Book, BookId};
use kernel::KernelError;

use crate::database::memory::{MemoryConnection, MemoryStore, MemoryTransaction};

pub struct MemoryBookRepository;

#[async_trait::async_trait]
impl BookRepository<MemoryConnection> for MemoryBookRepository {
    async fn save(
        &self,
        con: &mut MemoryConnection,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        MemBookInternal::save(&mut con.lock().await, book);
        Ok(())
    }

    async fn find(
        &self,
        con: &mut MemoryConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(MemBookInternal::find(&con.lock().await, id))
    }

    async fn delete(
        &self,
        con: &mut MemoryConnection,
        id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        MemBookInternal::delete(&mut con.lock().await, id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl BookRepository<MemoryTransaction> for MemoryBookRepository {
    async fn save(
        &self,
        con: &mut MemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        MemBookInternal::save(con.store_mut(), book);
        Ok(())
    }

    async fn find(
        &self,
        con: &mut MemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(MemBookInternal::find(con.store_mut(), id))
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        MemBookInternal::delete(con.store_mut(), id);
        Ok(())
    }
}

pub(in crate::database) struct MemBookInternal;

impl MemBookInternal {
    fn save(store: &mut MemoryStore, book: &Book) {
        // stored without pending events, the same way a row would be
        let stored = Book::restore(
            book.id().clone(),
            book.title().clone(),
            book.price().clone(),
            book.stock().clone(),
        );
        store.books.insert(book.id().clone(), stored);
        tracing::debug!("saved book {}", book.id().as_ref());
    }

    fn find(store: &MemoryStore, id: &BookId) -> Option<Book> {
        store.books.get(id).cloned()
    }

    fn delete(store: &mut MemoryStore, id: &BookId) {
        store.books.remove(id);
        tracing::debug!("deleted book {}", id.as_ref());
    }
}
