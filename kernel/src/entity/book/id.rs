use error_stack::Report;
use vodca::{AsRefln, Fromln};

use crate::KernelError;

/// ISBN of a book. Any non-empty string is accepted.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> error_stack::Result<Self, KernelError> {
        let id = id.into();
        if id.is_empty() {
            return Err(Report::new(KernelError::InvalidArgument)
                .attach_printable("Book id (ISBN) must not be empty"));
        }
        Ok(Self(id))
    }
}
