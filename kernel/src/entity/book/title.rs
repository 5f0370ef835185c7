use error_stack::Report;
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, Hash, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookTitle(String);

impl BookTitle {
    pub fn new(title: impl Into<String>) -> error_stack::Result<Self, KernelError> {
        let title = title.into();
        if title.is_empty() {
            return Err(Report::new(KernelError::InvalidArgument)
                .attach_printable("Book title must not be empty"));
        }
        Ok(Self(title))
    }
}
