pub mod error;
pub mod filter;
pub mod types;

pub use error::FilterError;
pub use filter::{capped_limit, Filter};
pub use types::*;
