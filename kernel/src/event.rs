mod book;

pub use self::book::*;
use time::OffsetDateTime;

pub trait DomainEvent: 'static + Sync + Send {
    /// Name subscribers register against.
    fn name(&self) -> &'static str;
    fn occurred_at(&self) -> &OffsetDateTime;
}

/// Delivers events to whoever subscribed to their name. Delivery problems are the
/// publisher's own business; callers get nothing back.
pub trait EventPublisher<Event: DomainEvent>: 'static + Sync + Send {
    fn publish(&self, event: Event);
}

pub trait DependOnBookEventPublisher: 'static + Sync + Send {
    type BookEventPublisher: EventPublisher<BookEvent>;
    fn book_event_publisher(&self) -> &Self::BookEventPublisher;
}
