pub use crate::error::*;

mod database;
mod entity;
mod error;
mod event;
mod repository;
mod service;

#[cfg(feature = "prelude")]
pub mod prelude {
    pub mod entity {
        pub use crate::entity::*;
    }
}

#[cfg(feature = "interface")]
pub mod interface {
    pub mod database {
        pub use crate::database::*;
    }
    pub mod event {
        pub use crate::event::*;
    }
    pub mod repository {
        pub use crate::repository::*;
    }
    pub mod service {
        pub use crate::service::*;
    }
}
