use kernel::interface::event::{BookEvent, DomainEvent, BOOK_CREATED};

use crate::event::EventEmitter;

/// Registers [`log_book_event`] for every book event name.
pub fn subscribe_book_logger(emitter: &EventEmitter<BookEvent>) {
    emitter.subscribe(BOOK_CREATED, log_book_event);
}

pub fn log_book_event(event: &BookEvent) {
    match event {
        BookEvent::Created { id, title, .. } => tracing::info!(
            event = event.name(),
            isbn = %id.as_ref(),
            title = %title.as_ref(),
            occurred_at = %event.occurred_at(),
            "book created"
        ),
    }
}
