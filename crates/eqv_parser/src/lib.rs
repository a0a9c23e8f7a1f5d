pub mod error;
pub mod latex;
pub mod token;

pub use error::ParseError;
pub use latex::parse_latex;
pub use token::{tokenize, Token};
