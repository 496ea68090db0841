use std::path::PathBuf;

use thiserror::Error;

/// App errors
#[derive(Error, Debug)]
pub enum AppError {

    /// Toml parsing error
    #[error("Failed to parse config file: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Config parsing error
    #[error("Failed to parse config file: {0}")]
    ConfigParseError(&'static str),

    /// Missing arguments
    #[error("Missing mandatory arguments: {0}\nTry `wastesort --help` for more information.")]
    MissingArgError(&'static str),

    /// Invalid argument value
    #[error("Incorrect argument value: {0}")]
    InvalidArgError(&'static str),

    /// Library error
    #[error("{0}")]
    LibError(#[from] wastesort_lib::Error),

    /// Reading user input
    #[error("Reading user input: {0}")]
    Rustyline(#[from] rustyline::error::ReadlineError),

    /// Disposal guide failed to load
    #[error("The disposal guide could not be loaded: {0}")]
    GuideUnavailable(String),

    /// Vector index has not been built
    #[error("Vector index not found at {}. Run `wastesort build-index` first.", .0.display())]
    IndexMissing(PathBuf),

    /// General error.
    #[error("{0}")]
    Error(String),
}
