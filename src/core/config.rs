//! Pipeline configuration.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use super::error::{Error, Result};

/// Number of cells when nothing else is requested.
pub const DEFAULT_TAPE_SIZE: usize = 1000;

/// Number of cells on the tape. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TapeSize(NonZeroUsize);

impl TapeSize {
    pub fn new(cells: usize) -> Result<Self> {
        NonZeroUsize::new(cells)
            .map(TapeSize)
            .ok_or_else(|| Error::InvalidTapeSize {
                value: cells.to_string(),
            })
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for TapeSize {
    fn default() -> Self {
        TapeSize(NonZeroUsize::new(DEFAULT_TAPE_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

impl fmt::Display for TapeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TapeSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let cells = s.trim().parse::<usize>().map_err(|_| Error::InvalidTapeSize {
            value: s.to_string(),
        })?;
        TapeSize::new(cells)
    }
}

/// Settings for one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub tape_size: TapeSize,
    /// Merge runs of identical unary operators into counted instructions.
    pub fold_runs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tape_size: TapeSize::default(),
            fold_runs: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tape_size(mut self, tape_size: TapeSize) -> Self {
        self.tape_size = tape_size;
        self
    }

    pub fn with_fold_runs(mut self, fold_runs: bool) -> Self {
        self.fold_runs = fold_runs;
        self
    }
}
