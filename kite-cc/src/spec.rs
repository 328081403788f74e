//  SPEC.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 22:18:50
//  Last edited:
//    19 Oct 2026, 22:31:04
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines where the stages read from and write to.
//

use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FResult};
use std::io::{Read as _, Write as _};
use std::path::PathBuf;
use std::str::FromStr;
use std::{fs, io};

use tracing::debug;

use crate::errors::StageError;


/***** LIBRARY *****/
/// Where a stage reads its input from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Input {
    /// Standard input, given as `-`.
    Stdin,
    /// A file.
    File(PathBuf),
}

impl Input {
    /// Reads the whole input.
    ///
    /// # Errors
    /// This function errors if the input could not be read or is not UTF-8.
    pub fn read(&self) -> Result<String, StageError> {
        let mut raw: String = String::new();
        let res: Result<usize, io::Error> = match self {
            Self::Stdin => io::stdin().read_to_string(&mut raw),
            Self::File(path) => fs::File::open(path).and_then(|mut h| h.read_to_string(&mut raw)),
        };
        match res {
            Ok(n) => {
                debug!("Read {} bytes from {}", n, self);
                Ok(raw)
            },
            Err(err) => Err(StageError::InputRead { what: self.to_string(), source: err }),
        }
    }
}

impl Display for Input {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Stdin => write!(f, "<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl FromStr for Input {
    type Err = Infallible;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(if s == "-" { Self::Stdin } else { Self::File(s.into()) }) }
}



/// Where a stage writes its output to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Output {
    /// Standard output, given as `-`.
    Stdout,
    /// A file, which is created or truncated.
    File(PathBuf),
}

impl Output {
    /// Writes the given text as the whole output.
    ///
    /// # Errors
    /// This function errors if the output could not be written.
    pub fn write(&self, text: &str) -> Result<(), StageError> {
        let res: Result<(), io::Error> = match self {
            Self::Stdout => {
                let mut handle = io::stdout().lock();
                handle.write_all(text.as_bytes()).and_then(|_| handle.flush())
            },
            Self::File(path) => fs::write(path, text),
        };
        match res {
            Ok(_) => {
                debug!("Wrote {} bytes to {}", text.len(), self);
                Ok(())
            },
            Err(err) => Err(StageError::OutputWrite { what: self.to_string(), source: err }),
        }
    }
}

impl Display for Output {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Stdout => write!(f, "<stdout>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl FromStr for Output {
    type Err = Infallible;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(if s == "-" { Self::Stdout } else { Self::File(s.into()) }) }
}
