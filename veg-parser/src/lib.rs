pub mod error;
pub mod filter;
pub mod parsers;

pub use error::ParseError;
pub use filter::{AnomalyFilter, AnomalyRule};
