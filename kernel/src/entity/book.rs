mod id;
mod price;
mod stock;
mod title;

pub use self::{id::*, price::*, stock::*, title::*};
use destructure::Destructure;
use vodca::References;

use crate::entity::OccurredAt;
use crate::event::BookEvent;
use crate::KernelError;

/// Aggregate root of the catalog. Stock is only ever changed through the book,
/// and every fact worth telling the outside world is queued in `events`.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    price: Price,
    stock: Stock,
    events: Vec<BookEvent>,
}

impl Book {
    /// Registers a brand-new book with empty stock and records [`BookEvent::Created`].
    pub fn new(id: BookId, title: BookTitle, price: Price) -> Self {
        let stock = Stock::initial(StockId::from(&id));
        let created = BookEvent::Created {
            id: id.clone(),
            title: title.clone(),
            occurred_at: OccurredAt::now(),
        };
        Self {
            id,
            title,
            price,
            stock,
            events: vec![created],
        }
    }

    /// Rebuilds a book loaded from storage. No events are recorded.
    pub fn restore(id: BookId, title: BookTitle, price: Price, stock: Stock) -> Self {
        Self {
            id,
            title,
            price,
            stock,
            events: Vec::new(),
        }
    }

    pub fn change_title(&mut self, title: BookTitle) {
        self.title = title;
    }

    pub fn change_price(&mut self, price: Price) {
        self.price = price;
    }

    pub fn increase_stock(&mut self, amount: i32) -> error_stack::Result<(), KernelError> {
        self.stock.increase_quantity(amount)
    }

    pub fn decrease_stock(&mut self, amount: i32) -> error_stack::Result<(), KernelError> {
        self.stock.decrease_quantity(amount)
    }

    pub fn is_saleable(&self) -> bool {
        !self.stock.quantity_available().is_zero() && !self.stock.status().is_out_of_stock()
    }

    /// Hands over every pending event and leaves the buffer empty.
    pub fn pull_events(&mut self) -> Vec<BookEvent> {
        std::mem::take(&mut self.events)
    }
}
