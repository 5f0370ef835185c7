use kernel::KernelError;

/// Converts a foreign error into a [`KernelError`] report at the driver boundary.
pub trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}
