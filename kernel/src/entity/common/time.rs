use std::marker::PhantomData;

use time::OffsetDateTime;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln)]
pub struct OccurredAt<T>(OffsetDateTime, PhantomData<T>);

impl<T> OccurredAt<T> {
    pub fn new(time: impl Into<OffsetDateTime>) -> Self {
        Self(time.into(), PhantomData)
    }

    pub fn now() -> Self {
        Self::new(OffsetDateTime::now_utc())
    }
}
