use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use vodca::References;

use crate::KernelError;

const JPY: &str = "JPY";

/// Currencies a [`Price`] may be expressed in.
/// Only yen is accepted for now; adding a currency means adding a variant here.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Currency {
    Jpy,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Jpy => JPY,
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = Report<KernelError>;
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            JPY => Ok(Currency::Jpy),
            _ => Err(Report::new(KernelError::InvalidArgument)
                .attach_printable(format!("Unsupported currency: {code}"))),
        }
    }
}

/// Non-negative amount in the smallest unit of its currency.
#[derive(Debug, Clone, Hash, Eq, PartialEq, References)]
pub struct Price {
    amount: i64,
    currency: Currency,
}

impl Price {
    pub fn new(
        amount: impl Into<i64>,
        currency: Currency,
    ) -> error_stack::Result<Self, KernelError> {
        let amount = amount.into();
        if amount < 0 {
            return Err(Report::new(KernelError::InvalidArgument)
                .attach_printable(format!("Price must not be negative: {amount} {currency}")));
        }
        Ok(Self { amount, currency })
    }
}
