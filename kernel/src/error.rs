use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    InvalidArgument,
    InsufficientStock,
    DuplicateIdentity,
    Concurrency,
    Timeout,
    Persistence,
    Transaction,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::InvalidArgument => write!(f, "Invalid argument"),
            KernelError::InsufficientStock => write!(f, "Insufficient stock"),
            KernelError::DuplicateIdentity => write!(f, "Identity already registered"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Persistence => write!(f, "Persistence failure"),
            KernelError::Transaction => write!(f, "Transaction failure"),
            KernelError::Internal => write!(f, "Internal error"),
        }
    }
}

impl Context for KernelError {}
