use thiserror::Error;

/// Problems with a grid or a search request that prevent a search from starting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("grid must have at least one row")]
    InvalidRowCount,

    #[error("grid width of {width}px does not fit {rows} rows")]
    InvalidWidth { rows: usize, width: u32 },

    #[error("no start cell has been placed")]
    MissingStart,

    #[error("no end cell has been placed")]
    MissingEnd,

    #[error("cell ({row}, {column}) is outside the grid")]
    CellOutOfRange { row: usize, column: usize },

    #[error("cell ({row}, {column}) is a barrier and cannot be an endpoint")]
    BarrierEndpoint { row: usize, column: usize },
}

/// Problems with a textual grid description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseGridError {
    #[error("grid text contains no rows")]
    Empty,

    #[error("grid must be square: line {line} has {found} cells, expected {expected}")]
    NotSquare {
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("unknown glyph {glyph:?} at line {line}, column {column}")]
    UnknownGlyph {
        line: usize,
        column: usize,
        glyph: char,
    },

    #[error("more than one start cell (second at line {line}, column {column})")]
    DuplicateStart { line: usize, column: usize },

    #[error("more than one end cell (second at line {line}, column {column})")]
    DuplicateEnd { line: usize, column: usize },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

#[derive(Error, Debug)]
pub enum LoadConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigurationError),
}
