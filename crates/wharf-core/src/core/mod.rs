pub mod error;
pub mod error_help;
pub mod name;
pub mod path;

pub use error::{WharfError, WharfResult};
