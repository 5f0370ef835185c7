use std::ops::Deref;
use std::sync::Arc;

use driver::database::{PostgresBookRepository, PostgresDatabase};
use driver::event::{subscribe_book_logger, EventEmitter};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::event::{BookEvent, DependOnBookEventPublisher};
use kernel::interface::repository::{BookRepository, DependOnBookRepository};
use kernel::KernelError;

pub struct AppModule<Database = PostgresDatabase, Repository = PostgresBookRepository>(
    Arc<Handler<Database, Repository>>,
);

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self::from(Handler::init().await?))
    }
}

impl<Database, Repository> From<Handler<Database, Repository>> for AppModule<Database, Repository> {
    fn from(handler: Handler<Database, Repository>) -> Self {
        Self(Arc::new(handler))
    }
}

impl<Database, Repository> Clone for AppModule<Database, Repository> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<Database, Repository> Deref for AppModule<Database, Repository> {
    type Target = Handler<Database, Repository>;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

pub struct Handler<Database, Repository> {
    database: Database,
    book_repository: Repository,
    book_event_publisher: EventEmitter<BookEvent>,
}

impl Handler<PostgresDatabase, PostgresBookRepository> {
    pub async fn init() -> error_stack::Result<Self, KernelError> {
        let database = PostgresDatabase::new().await?;
        Ok(Self::new(database, PostgresBookRepository))
    }
}

impl<Database, Repository> Handler<Database, Repository> {
    pub fn new(database: Database, book_repository: Repository) -> Self {
        let book_event_publisher = EventEmitter::new();
        subscribe_book_logger(&book_event_publisher);
        Self {
            database,
            book_repository,
            book_event_publisher,
        }
    }
}

impl<Database, Repository> DependOnDatabaseConnection for Handler<Database, Repository>
where
    Database: DatabaseConnection,
    Repository: 'static + Sync + Send,
{
    type DatabaseConnection = Database;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.database
    }
}

impl<Database, Repository> DependOnBookRepository for Handler<Database, Repository>
where
    Database: DatabaseConnection,
    Repository: BookRepository<Database::Connection> + BookRepository<Database::Transaction>,
{
    type BookRepository = Repository;
    fn book_repository(&self) -> &Self::BookRepository {
        &self.book_repository
    }
}

impl<Database, Repository> DependOnBookEventPublisher for Handler<Database, Repository>
where
    Database: 'static + Sync + Send,
    Repository: 'static + Sync + Send,
{
    type BookEventPublisher = EventEmitter<BookEvent>;
    fn book_event_publisher(&self) -> &Self::BookEventPublisher {
        &self.book_event_publisher
    }
}
