use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleParseError {
    #[error("rule string {0:?} must have the form \"B<digits>/S<digits>\"")]
    Malformed(String),

    #[error("neighbor count '{0}' is outside 1..=8")]
    CountOutOfRange(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error(transparent)]
    Rule(#[from] RuleParseError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cell ({row}, {col}) is out of bounds for a {rows}x{cols} grid")]
pub struct BoundsError {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternParseError {
    #[error("pattern has no rows")]
    Empty,

    #[error("invalid character {0:?} in pattern row {1}")]
    InvalidChar(char, usize),
}
