use crate::item::Item;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MiningError>;

#[derive(Debug, Error)]
pub enum MiningError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}:{line}: {message}")]
    Format {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("line {line}: {items} items but {utilities} utilities")]
    LengthMismatch {
        line: usize,
        items: usize,
        utilities: usize,
    },

    #[error("line {line}: item {item} has negative utility {utility}")]
    NegativeUtility { line: usize, item: Item, utility: f64 },

    #[error("line {line}: transaction utility {utility} is below the sum of its item utilities {sum}")]
    UtilityBelowItems { line: usize, utility: f64, sum: f64 },

    #[error("{count} transactions exceed the {max} that can be indexed")]
    TooManyTransactions { count: usize, max: usize },

    #[error("taxonomy contains a cycle through item {item}")]
    TaxonomyCycle { item: Item },

    #[error("item {child} has two parents: {first} and {second}")]
    ConflictingParent { child: Item, first: Item, second: Item },

    #[error("minimum utility must be a finite non-negative number, got {0}")]
    InvalidThreshold(f64),
}

impl MiningError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> MiningError {
        MiningError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn format(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> MiningError {
        MiningError::Format {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_message_names_path() {
        let err = MiningError::io("out.txt", io::Error::new(io::ErrorKind::Other, "disk full"));
        assert_eq!(err.to_string(), "I/O error on out.txt: disk full");
    }
}
