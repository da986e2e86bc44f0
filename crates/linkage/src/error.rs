use std::fmt;

#[derive(Debug)]
pub enum LinkError {
    /// Config text failed TOML deserialization.
    ConfigParse(String),
    /// Config parsed but breaks a cross-field rule (empty merge list,
    /// threshold out of range, etc.).
    ConfigValidation(String),
    /// A configured column does not exist in the table's headers.
    MissingColumn { table: String, column: String },
    /// A table has no header row at all.
    EmptyTable { table: String },
    /// Malformed CSV input.
    Csv { table: String, message: String },
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "cannot parse config: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "invalid config: {msg}"),
            Self::MissingColumn { table, column } => {
                write!(f, "table '{table}': missing column '{column}'")
            }
            Self::EmptyTable { table } => write!(f, "table '{table}': no header row"),
            Self::Csv { table, message } => write!(f, "table '{table}': {message}"),
        }
    }
}

impl std::error::Error for LinkError {}
