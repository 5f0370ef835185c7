mod id;
mod quantity;
mod status;

pub use self::{id::*, quantity::*, status::*};
use destructure::Destructure;
use vodca::References;

use crate::KernelError;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Stock {
    id: StockId,
    quantity_available: QuantityAvailable,
    status: StockStatus,
}

impl Stock {
    /// Empty stock: nothing on hand, out of stock.
    pub fn initial(id: StockId) -> Self {
        Self {
            id,
            quantity_available: QuantityAvailable::zero(),
            status: StockStatus::OutOfStock,
        }
    }

    /// Rehydrates a stock exactly as stored.
    pub fn restore(
        id: StockId,
        quantity_available: QuantityAvailable,
        status: StockStatus,
    ) -> Self {
        Self {
            id,
            quantity_available,
            status,
        }
    }

    pub(crate) fn increase_quantity(
        &mut self,
        amount: i32,
    ) -> error_stack::Result<(), KernelError> {
        self.quantity_available = self.quantity_available.increment(amount)?;
        if !self.quantity_available.is_zero() {
            self.status = StockStatus::InStock;
        }
        Ok(())
    }

    pub(crate) fn decrease_quantity(
        &mut self,
        amount: i32,
    ) -> error_stack::Result<(), KernelError> {
        self.quantity_available = self.quantity_available.decrement(amount)?;
        if self.quantity_available.is_zero() {
            self.status = StockStatus::OutOfStock;
        }
        Ok(())
    }
}
