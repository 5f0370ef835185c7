use error_stack::Report;
use vodca::{AsRefln, Fromln};

use crate::entity::BookId;
use crate::KernelError;

#[derive(Debug, Clone, Hash, Eq, PartialEq, Fromln, AsRefln)]
pub struct StockId(String);

impl StockId {
    pub fn new(id: impl Into<String>) -> error_stack::Result<Self, KernelError> {
        let id = id.into();
        if id.is_empty() {
            return Err(Report::new(KernelError::InvalidArgument)
                .attach_printable("Stock id must not be empty"));
        }
        Ok(Self(id))
    }
}

// A book owns exactly one stock, so the stock shares the book's identity value.
impl From<&BookId> for StockId {
    fn from(id: &BookId) -> Self {
        let raw: &String = id.as_ref();
        Self(raw.clone())
    }
}
