use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, TransactionManager};
use kernel::interface::event::{BookEvent, DependOnBookEventPublisher, EventPublisher};
use kernel::interface::repository::{BookRepository, DependOnBookRepository};
use kernel::interface::service::BookDuplicationCheck;
use kernel::prelude::entity::{Book, BookId, BookTitle, Currency, Price};
use kernel::KernelError;

use crate::transfer::{
    BookDto, ChangeStockDto, DeleteBookDto, GetBookDto, RegisterBookDto, UpdateBookDto,
};

fn publish_all<P: EventPublisher<BookEvent>>(publisher: &P, events: Vec<BookEvent>) {
    for event in events {
        publisher.publish(event);
    }
}

#[async_trait::async_trait]
pub trait RegisterBookService:
    'static + Sync + Send + BookDuplicationCheck + DependOnBookEventPublisher
{
    async fn register_book(
        &self,
        dto: RegisterBookDto,
    ) -> error_stack::Result<BookId, KernelError> {
        let RegisterBookDto { isbn, title, price } = dto;
        let (id, events) = self
            .database_connection()
            .begin(move |mut con| async move {
                let result = async {
                    let id = BookId::new(isbn)?;
                    let title = BookTitle::new(title)?;
                    let price = Price::new(price, Currency::Jpy)?;

                    if self.is_duplicated(&mut con, &id).await? {
                        return Err(Report::new(KernelError::DuplicateIdentity).attach_printable(
                            format!("Book `{}` is already registered", id.as_ref()),
                        ));
                    }

                    let mut book = Book::new(id.clone(), title, price);
                    self.book_repository().save(&mut con, &book).await?;
                    let events = book.pull_events();
                    Ok::<_, Report<KernelError>>((id, events))
                }
                .await;
                (con, result)
            })
            .await?;

        tracing::info!("registered book {}", id.as_ref());
        publish_all(self.book_event_publisher(), events);
        Ok(id)
    }
}

impl<T> RegisterBookService for T where T: DependOnBookRepository + DependOnBookEventPublisher {}

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookRepository {
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<Option<BookDto>, KernelError> {
        let id = BookId::new(dto.isbn)?;
        let mut con = self.database_connection().connect().await?;
        let book = self.book_repository().find(&mut con, &id).await?;
        Ok(book.map(BookDto::from))
    }
}

impl<T> GetBookService for T where T: DependOnBookRepository {}

#[async_trait::async_trait]
pub trait UpdateBookService:
    'static + Sync + Send + DependOnBookRepository + DependOnBookEventPublisher
{
    async fn update_book(
        &self,
        dto: UpdateBookDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        let UpdateBookDto { isbn, title, price } = dto;
        let updated = self
            .database_connection()
            .begin(move |mut con| async move {
                let result = async {
                    let id = BookId::new(isbn)?;
                    let title = title.map(BookTitle::new).transpose()?;
                    let price = price
                        .map(|amount| Price::new(amount, Currency::Jpy))
                        .transpose()?;

                    let Some(mut book) = self.book_repository().find(&mut con, &id).await? else {
                        return Ok(None);
                    };
                    if let Some(title) = title {
                        book.change_title(title);
                    }
                    if let Some(price) = price {
                        book.change_price(price);
                    }
                    self.book_repository().save(&mut con, &book).await?;
                    let events = book.pull_events();
                    Ok::<_, Report<KernelError>>(Some((book, events)))
                }
                .await;
                (con, result)
            })
            .await?;

        Ok(updated.map(|(book, events)| {
            publish_all(self.book_event_publisher(), events);
            BookDto::from(book)
        }))
    }
}

impl<T> UpdateBookService for T where T: DependOnBookRepository + DependOnBookEventPublisher {}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Adjustment {
    Increase,
    Decrease,
}

async fn adjust_stock<T: ?Sized>(
    module: &T,
    dto: ChangeStockDto,
    adjustment: Adjustment,
) -> error_stack::Result<Option<BookDto>, KernelError>
where
    T: DependOnBookRepository + DependOnBookEventPublisher,
{
    let ChangeStockDto { isbn, amount } = dto;
    let adjusted = module
        .database_connection()
        .begin(move |mut con| async move {
            let result = async {
                let id = BookId::new(isbn)?;
                let Some(mut book) = module.book_repository().find(&mut con, &id).await? else {
                    return Ok(None);
                };
                match adjustment {
                    Adjustment::Increase => book.increase_stock(amount)?,
                    Adjustment::Decrease => book.decrease_stock(amount)?,
                }
                module.book_repository().save(&mut con, &book).await?;
                let events = book.pull_events();
                Ok::<_, Report<KernelError>>(Some((book, events)))
            }
            .await;
            (con, result)
        })
        .await?;

    Ok(adjusted.map(|(book, events)| {
        tracing::debug!(
            "{:?} stock of {} by {}",
            adjustment,
            book.id().as_ref(),
            amount
        );
        publish_all(module.book_event_publisher(), events);
        BookDto::from(book)
    }))
}

#[async_trait::async_trait]
pub trait AdjustStockService:
    'static + Sync + Send + DependOnBookRepository + DependOnBookEventPublisher
{
    async fn increase_stock(
        &self,
        dto: ChangeStockDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        adjust_stock(self, dto, Adjustment::Increase).await
    }

    async fn decrease_stock(
        &self,
        dto: ChangeStockDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        adjust_stock(self, dto, Adjustment::Decrease).await
    }
}

impl<T> AdjustStockService for T where T: DependOnBookRepository + DependOnBookEventPublisher {}

#[async_trait::async_trait]
pub trait DeleteBookService: 'static + Sync + Send + DependOnBookRepository {
    async fn delete_book(
        &self,
        dto: DeleteBookDto,
    ) -> error_stack::Result<Option<()>, KernelError> {
        let DeleteBookDto { isbn } = dto;
        let deleted = self
            .database_connection()
            .begin(move |mut con| async move {
                let result = async {
                    let id = BookId::new(isbn)?;
                    if self.book_repository().find(&mut con, &id).await?.is_none() {
                        return Ok(None);
                    }
                    self.book_repository().delete(&mut con, &id).await?;
                    Ok::<_, Report<KernelError>>(Some(id))
                }
                .await;
                (con, result)
            })
            .await?;

        Ok(deleted.map(|id| tracing::info!("deleted book {}", id.as_ref())))
    }
}

impl<T> DeleteBookService for T where T: DependOnBookRepository {}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use error_stack::Report;

    use driver::database::{
        MemoryBookRepository, MemoryConnection, MemoryDatabase, MemoryTransaction,
    };
    use driver::event::EventEmitter;
    use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
    use kernel::interface::event::{BookEvent, DependOnBookEventPublisher, BOOK_CREATED};
    use kernel::interface::repository::{BookRepository, DependOnBookRepository};
    use kernel::prelude::entity::{Book, BookId};
    use kernel::KernelError;

    use crate::service::{
        AdjustStockService, DeleteBookService, GetBookService, RegisterBookService,
        UpdateBookService,
    };
    use crate::transfer::{
        ChangeStockDto, DeleteBookDto, GetBookDto, RegisterBookDto, UpdateBookDto,
    };

    struct TestModule<Repository> {
        database: MemoryDatabase,
        repository: Repository,
        publisher: EventEmitter<BookEvent>,
    }

    impl<Repository> TestModule<Repository> {
        fn new(repository: Repository) -> Self {
            Self {
                database: MemoryDatabase::new(),
                repository,
                publisher: EventEmitter::new(),
            }
        }

        fn count_created(&self) -> Arc<AtomicUsize> {
            let count = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&count);
            self.publisher.subscribe(BOOK_CREATED, move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            count
        }
    }

    impl<Repository: 'static + Sync + Send> DependOnDatabaseConnection for TestModule<Repository> {
        type DatabaseConnection = MemoryDatabase;
        fn database_connection(&self) -> &Self::DatabaseConnection {
            &self.database
        }
    }

    impl<Repository> DependOnBookRepository for TestModule<Repository>
    where
        Repository: BookRepository<MemoryConnection> + BookRepository<MemoryTransaction>,
    {
        type BookRepository = Repository;
        fn book_repository(&self) -> &Self::BookRepository {
            &self.repository
        }
    }

    impl<Repository: 'static + Sync + Send> DependOnBookEventPublisher for TestModule<Repository> {
        type BookEventPublisher = EventEmitter<BookEvent>;
        fn book_event_publisher(&self) -> &Self::BookEventPublisher {
            &self.publisher
        }
    }

    /// Writes like the in-memory repository, then reports a failure.
    struct FailingSaveRepository;

    #[async_trait::async_trait]
    impl<Connection: 'static + Send> BookRepository<Connection> for FailingSaveRepository
    where
        MemoryBookRepository: BookRepository<Connection>,
    {
        async fn save(
            &self,
            con: &mut Connection,
            book: &Book,
        ) -> error_stack::Result<(), KernelError> {
            MemoryBookRepository.save(con, book).await?;
            Err(Report::new(KernelError::Persistence).attach_printable("disk on fire"))
        }

        async fn find(
            &self,
            con: &mut Connection,
            id: &BookId,
        ) -> error_stack::Result<Option<Book>, KernelError> {
            MemoryBookRepository.find(con, id).await
        }

        async fn delete(
            &self,
            con: &mut Connection,
            id: &BookId,
        ) -> error_stack::Result<(), KernelError> {
            MemoryBookRepository.delete(con, id).await
        }
    }

    /// Cannot read anything back; writes go through.
    struct FailingFindRepository;

    #[async_trait::async_trait]
    impl<Connection: 'static + Send> BookRepository<Connection> for FailingFindRepository
    where
        MemoryBookRepository: BookRepository<Connection>,
    {
        async fn save(
            &self,
            con: &mut Connection,
            book: &Book,
        ) -> error_stack::Result<(), KernelError> {
            MemoryBookRepository.save(con, book).await
        }

        async fn find(
            &self,
            _con: &mut Connection,
            id: &BookId,
        ) -> error_stack::Result<Option<Book>, KernelError> {
            Err(Report::new(KernelError::Persistence)
                .attach_printable(format!("cannot read `{}`", id.as_ref())))
        }

        async fn delete(
            &self,
            con: &mut Connection,
            id: &BookId,
        ) -> error_stack::Result<(), KernelError> {
            MemoryBookRepository.delete(con, id).await
        }
    }

    fn register(isbn: &str, title: &str, price: i64) -> RegisterBookDto {
        RegisterBookDto {
            isbn: isbn.to_string(),
            title: title.to_string(),
            price,
        }
    }

    fn get(isbn: &str) -> GetBookDto {
        GetBookDto {
            isbn: isbn.to_string(),
        }
    }

    fn stock(isbn: &str, amount: i32) -> ChangeStockDto {
        ChangeStockDto {
            isbn: isbn.to_string(),
            amount,
        }
    }

    #[tokio::test]
    async fn duplicate_registration_keeps_the_first() -> error_stack::Result<(), KernelError> {
        let module = TestModule::new(MemoryBookRepository);
        let created = module.count_created();

        let id = module
            .register_book(register("978-4-00-111111-1", "Test Book", 1500))
            .await?;
        assert_eq!(id, BookId::new("978-4-00-111111-1")?);

        let duplicated = module
            .register_book(register("978-4-00-111111-1", "Another Book", 1500))
            .await;
        let report = duplicated.expect_err("second registration must fail");
        assert_eq!(report.current_context(), &KernelError::DuplicateIdentity);

        let found = module
            .get_book(get("978-4-00-111111-1"))
            .await?
            .expect("registered book must be found");
        assert_eq!(found.title, "Test Book");
        assert_eq!(found.price_amount, 1500);
        assert_eq!(found.quantity_available, 0);
        assert_eq!(found.status, "OUT_OF_STOCK");
        assert_eq!(created.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn failed_save_leaves_nothing_behind() -> error_stack::Result<(), KernelError> {
        let module = TestModule::new(FailingSaveRepository);
        let created = module.count_created();

        let result = module.register_book(register("978-1", "Test Book", 1500)).await;
        let report = result.expect_err("save must fail");
        assert_eq!(report.current_context(), &KernelError::Persistence);

        assert_eq!(module.get_book(get("978-1")).await?, None);
        assert_eq!(created.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn failed_duplicate_lookup_stores_nothing() -> error_stack::Result<(), KernelError> {
        let module = TestModule::new(FailingFindRepository);
        let created = module.count_created();

        let result = module.register_book(register("978-1", "Test Book", 1500)).await;
        let report = result.expect_err("lookup must fail");
        assert_eq!(report.current_context(), &KernelError::Persistence);

        let mut con = module.database.connect().await?;
        let stored = MemoryBookRepository.find(&mut con, &BookId::new("978-1")?).await?;
        assert_eq!(stored, None);
        assert_eq!(created.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_admit_exactly_one() {
        let module = Arc::new(TestModule::new(MemoryBookRepository));
        let created = module.count_created();

        let handles = (0..32)
            .map(|n| {
                let module = Arc::clone(&module);
                tokio::spawn(async move {
                    let title = format!("Test Book {n}");
                    module.register_book(register("978-1", &title, 1500)).await
                })
            })
            .collect::<Vec<_>>();

        let mut registered = 0;
        for handle in handles {
            match handle.await.expect("registration task panicked") {
                Ok(id) => {
                    assert_eq!(id, BookId::new("978-1").unwrap());
                    registered += 1;
                }
                Err(report) => {
                    assert_eq!(report.current_context(), &KernelError::DuplicateIdentity);
                }
            }
        }
        assert_eq!(registered, 1);
        assert_eq!(created.load(Ordering::SeqCst), 1);

        let found = module.get_book(get("978-1")).await.unwrap().expect("one book stored");
        assert!(found.title.starts_with("Test Book "));
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_storage() {
        let module = TestModule::new(MemoryBookRepository);
        let created = module.count_created();

        for dto in [
            register("", "Test Book", 1500),
            register("978-1", "", 1500),
            register("978-1", "Test Book", -1),
        ] {
            let report = module.register_book(dto).await.expect_err("must be rejected");
            assert_eq!(report.current_context(), &KernelError::InvalidArgument);
        }
        assert_eq!(created.load(Ordering::SeqCst), 0);

        let report = module.get_book(get("")).await.expect_err("empty isbn");
        assert_eq!(report.current_context(), &KernelError::InvalidArgument);
    }

    #[tokio::test]
    async fn unknown_book_is_absent() -> error_stack::Result<(), KernelError> {
        let module = TestModule::new(MemoryBookRepository);
        assert_eq!(module.get_book(get("978-0")).await?, None);
        assert_eq!(module.increase_stock(stock("978-0", 1)).await?, None);
        let update = UpdateBookDto {
            isbn: "978-0".to_string(),
            title: Some("Renamed".to_string()),
            price: None,
        };
        assert_eq!(module.update_book(update).await?, None);
        let delete = DeleteBookDto {
            isbn: "978-0".to_string(),
        };
        assert_eq!(module.delete_book(delete).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn stock_round_trip() -> error_stack::Result<(), KernelError> {
        let module = TestModule::new(MemoryBookRepository);
        module.register_book(register("978-1", "Test Book", 1500)).await?;

        let book = module.increase_stock(stock("978-1", 10)).await?;
        let book = book.expect("book exists");
        assert_eq!(book.quantity_available, 10);
        assert_eq!(book.status, "IN_STOCK");

        let report = module
            .decrease_stock(stock("978-1", 11))
            .await
            .expect_err("cannot sell more than stocked");
        assert_eq!(report.current_context(), &KernelError::InsufficientStock);

        let book = module.get_book(get("978-1")).await?.expect("book exists");
        assert_eq!(book.quantity_available, 10);

        let book = module.decrease_stock(stock("978-1", 10)).await?;
        let book = book.expect("book exists");
        assert_eq!(book.quantity_available, 0);
        assert_eq!(book.status, "OUT_OF_STOCK");
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete() -> error_stack::Result<(), KernelError> {
        let module = TestModule::new(MemoryBookRepository);
        module.register_book(register("978-1", "Test Book", 1500)).await?;

        let update = UpdateBookDto {
            isbn: "978-1".to_string(),
            title: Some("Renamed".to_string()),
            price: Some(2000),
        };
        let book = module.update_book(update).await?.expect("book exists");
        assert_eq!(book.title, "Renamed");
        assert_eq!(book.price_amount, 2000);

        let delete = || DeleteBookDto {
            isbn: "978-1".to_string(),
        };
        assert_eq!(module.delete_book(delete()).await?, Some(()));
        assert_eq!(module.get_book(get("978-1")).await?, None);
        assert_eq!(module.delete_book(delete()).await?, None);
        Ok(())
    }
}
