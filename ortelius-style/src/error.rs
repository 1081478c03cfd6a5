use thiserror::Error;

/// Error returned when a filter expression cannot be parsed from a style
/// document.
///
/// Malformed filters fail at parse time; a successfully parsed filter never
/// fails to evaluate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterParseError {
    /// Filter node is not a JSON array.
    #[error("filter must be an array, got: {0}")]
    NotAnArray(String),

    /// Filter array does not start with an operator string.
    #[error("filter must start with an operator string")]
    MissingOperator,

    /// Operator is not part of the filter grammar.
    #[error("unknown filter operator: {0}")]
    UnknownOperator(String),

    /// Operator got the wrong number or shape of arguments.
    #[error("invalid arguments for operator {0}")]
    InvalidArguments(&'static str),

    /// Comparison literal is not a string, number or boolean.
    #[error("invalid filter literal: {0}")]
    InvalidLiteral(String),
}
