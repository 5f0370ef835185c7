use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;

use crate::KernelError;

const IN_STOCK: &str = "IN_STOCK";
const LOW_STOCK: &str = "LOW_STOCK";
const OUT_OF_STOCK: &str = "OUT_OF_STOCK";

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum StockStatus {
    InStock,
    // No transition produces this yet; it only comes back from storage.
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => IN_STOCK,
            StockStatus::LowStock => LOW_STOCK,
            StockStatus::OutOfStock => OUT_OF_STOCK,
        }
    }

    pub fn is_out_of_stock(&self) -> bool {
        matches!(self, StockStatus::OutOfStock)
    }
}

impl Display for StockStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StockStatus {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            IN_STOCK => Ok(StockStatus::InStock),
            LOW_STOCK => Ok(StockStatus::LowStock),
            OUT_OF_STOCK => Ok(StockStatus::OutOfStock),
            _ => Err(Report::new(KernelError::InvalidArgument)
                .attach_printable(format!("Unknown stock status: {s}"))),
        }
    }
}
