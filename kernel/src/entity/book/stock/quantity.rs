use error_stack::Report;
use vodca::{AsRefln, Fromln};

use crate::KernelError;

/// Number of copies on hand. Never negative; every change yields a new value.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Fromln, AsRefln)]
pub struct QuantityAvailable(i32);

impl QuantityAvailable {
    pub fn new(quantity: impl Into<i32>) -> error_stack::Result<Self, KernelError> {
        let quantity = quantity.into();
        if quantity < 0 {
            return Err(Report::new(KernelError::InvalidArgument)
                .attach_printable(format!("Quantity must not be negative: {quantity}")));
        }
        Ok(Self(quantity))
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn increment(&self, amount: i32) -> error_stack::Result<Self, KernelError> {
        if amount < 0 {
            return Err(Report::new(KernelError::InvalidArgument)
                .attach_printable(format!("Cannot increase by a negative amount: {amount}")));
        }
        let quantity = self.0.checked_add(amount).ok_or_else(|| {
            Report::new(KernelError::InvalidArgument)
                .attach_printable(format!("Quantity overflow: {} + {amount}", self.0))
        })?;
        Ok(Self(quantity))
    }

    pub fn decrement(&self, amount: i32) -> error_stack::Result<Self, KernelError> {
        if amount < 0 {
            return Err(Report::new(KernelError::InvalidArgument)
                .attach_printable(format!("Cannot decrease by a negative amount: {amount}")));
        }
        if amount > self.0 {
            return Err(Report::new(KernelError::InsufficientStock)
                .attach_printable(format!("Requested {amount} but only {} available", self.0)));
        }
        Ok(Self(self.0 - amount))
    }
}
