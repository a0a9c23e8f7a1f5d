use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Failed to tokenize at: '{0}'")]
    Tokenize(String),
    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),
    #[error("Unexpected end of input")]
    UnexpectedEnd,
    #[error("Unconsumed input: {0}")]
    UnconsumedInput(String),
    #[error("Empty input")]
    EmptyInput,
    #[error("Integral is missing its differential (expected a trailing 'dx')")]
    MissingDifferential,
    #[error("Unmatched '{{' in input")]
    UnmatchedBrace,
}
