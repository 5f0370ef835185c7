use error_stack::ResultExt;
use sqlx::PgConnection;

use kernel::interface::repository::BookRepository;
use kernel::prelude::entity::{
    Book, BookId, BookTitle, Currency, Price, QuantityAvailable, Stock, StockId, StockStatus,
};
use kernel::KernelError;

use crate::database::postgres::{PostgresConnection, PostgresTransaction};
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookRepository<PostgresConnection> for PostgresBookRepository {
    async fn save(
        &self,
        con: &mut PostgresConnection,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::save(con, book).await
    }

    async fn find(
        &self,
        con: &mut PostgresConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find(con, id).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, id).await
    }
}

#[async_trait::async_trait]
impl BookRepository<PostgresTransaction> for PostgresBookRepository {
    async fn save(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::save(con, book).await
    }

    async fn find(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find(con, id).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, id).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: String,
    title: String,
    price_amount: i64,
    price_currency: String,
    stock_id: Option<String>,
    quantity_available: Option<i32>,
    status: Option<String>,
}

impl TryFrom<BookRow> for Book {
    type Error = error_stack::Report<KernelError>;
    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let id = BookId::new(row.id)?;
        let title = BookTitle::new(row.title)?;
        let currency = row.price_currency.parse::<Currency>()?;
        let price = Price::new(row.price_amount, currency)?;
        let stock = match (row.stock_id, row.quantity_available, row.status) {
            (Some(stock_id), Some(quantity), Some(status)) => Stock::restore(
                StockId::new(stock_id)?,
                QuantityAvailable::new(quantity)?,
                status.parse::<StockStatus>()?,
            ),
            _ => Stock::initial(StockId::from(&id)),
        };
        Ok(Book::restore(id, title, price, stock))
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn save(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO books (id, title, price_amount, price_currency)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET title = EXCLUDED.title,
                price_amount = EXCLUDED.price_amount,
                price_currency = EXCLUDED.price_currency
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.price().amount())
        .bind(book.price().currency().code())
        .execute(&mut *con)
        .await
        .convert_error()?;

        let stock = book.stock();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO stocks (id, book_id, quantity_available, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET quantity_available = EXCLUDED.quantity_available,
                status = EXCLUDED.status
            "#,
        )
        .bind(stock.id().as_ref())
        .bind(book.id().as_ref())
        .bind(stock.quantity_available().as_ref())
        .bind(stock.status().as_str())
        .execute(&mut *con)
        .await
        .convert_error()?;

        tracing::debug!("saved book {}", book.id().as_ref());
        Ok(())
    }

    async fn find(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT b.id, b.title, b.price_amount, b.price_currency,
                   s.id AS stock_id, s.quantity_available, s.status
            FROM books b
            LEFT JOIN stocks s ON s.book_id = b.id
            WHERE b.id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Book::try_from)
            .transpose()
            .change_context(KernelError::Persistence)
            .attach_printable_lazy(|| format!("Stored book `{}` is malformed", id.as_ref()))
    }

    async fn delete(con: &mut PgConnection, id: &BookId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        tracing::debug!("deleted book {}", id.as_ref());
        Ok(())
    }
}
