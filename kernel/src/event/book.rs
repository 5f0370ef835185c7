use time::OffsetDateTime;

use crate::entity::{Book, BookId, BookTitle, OccurredAt};
use crate::event::DomainEvent;

pub const BOOK_CREATED: &str = "BookCreated";

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BookEvent {
    Created {
        id: BookId,
        title: BookTitle,
        occurred_at: OccurredAt<Book>,
    },
}

impl DomainEvent for BookEvent {
    fn name(&self) -> &'static str {
        match self {
            BookEvent::Created { .. } => BOOK_CREATED,
        }
    }

    fn occurred_at(&self) -> &OffsetDateTime {
        match self {
            BookEvent::Created { occurred_at, .. } => occurred_at.as_ref(),
        }
    }
}
