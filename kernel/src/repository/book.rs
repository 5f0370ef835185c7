use crate::database::{DatabaseConnection, DependOnDatabaseConnection};
use crate::entity::{Book, BookId};
use crate::KernelError;

/// Persistence of the [`Book`] aggregate.
///
/// `Connection` is either a plain connection or an open transaction, so the same
/// repository serves reads outside a unit of work and writes inside one.
#[async_trait::async_trait]
pub trait BookRepository<Connection: Send>: 'static + Sync + Send {
    /// Inserts or updates the book and its stock.
    async fn save(&self, con: &mut Connection, book: &Book)
        -> error_stack::Result<(), KernelError>;
    async fn find(
        &self,
        con: &mut Connection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError>;
    async fn delete(&self, con: &mut Connection, id: &BookId)
        -> error_stack::Result<(), KernelError>;
}

pub trait DependOnBookRepository: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookRepository: BookRepository<
            <Self::DatabaseConnection as DatabaseConnection>::Connection,
        > + BookRepository<<Self::DatabaseConnection as DatabaseConnection>::Transaction>;
    fn book_repository(&self) -> &Self::BookRepository;
}
