mod time;

pub use self::time::*;
