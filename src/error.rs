// Copyright (c) 2026 rezky_nightky

use std::fmt;
use std::io;

/// Failures that stop the engine before (or while) it sets up a frame.
#[derive(Debug)]
pub enum InitError {
    /// The cell buffer or drop array for this size could not be reserved.
    BufferAllocation { width: u16, height: u16 },
    /// Writing the terminal setup sequence failed.
    Output(io::Error),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferAllocation { width, height } => {
                write!(f, "failed to allocate frame buffer for {width}x{height}")
            }
            Self::Output(e) => write!(f, "failed to prepare terminal: {e}"),
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BufferAllocation { .. } => None,
            Self::Output(e) => Some(e),
        }
    }
}

impl From<io::Error> for InitError {
    fn from(e: io::Error) -> Self {
        Self::Output(e)
    }
}
