use kernel::prelude::entity::{Book, DestructBook, DestructStock};

/// Read projection of a book and its stock.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookDto {
    pub isbn: String,
    pub title: String,
    pub price_amount: i64,
    pub quantity_available: i32,
    pub status: String,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            id,
            title,
            price,
            stock,
            events: _,
        } = value.into_destruct();
        let DestructStock {
            quantity_available,
            status,
            ..
        } = stock.into_destruct();
        Self {
            isbn: id.into(),
            title: title.into(),
            price_amount: *price.amount(),
            quantity_available: quantity_available.into(),
            status: status.as_str().to_string(),
        }
    }
}

pub struct RegisterBookDto {
    pub isbn: String,
    pub title: String,
    pub price: i64,
}

pub struct GetBookDto {
    pub isbn: String,
}

pub struct UpdateBookDto {
    pub isbn: String,
    pub title: Option<String>,
    pub price: Option<i64>,
}

pub struct ChangeStockDto {
    pub isbn: String,
    pub amount: i32,
}

pub struct DeleteBookDto {
    pub isbn: String,
}
