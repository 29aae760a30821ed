use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader};
use std::num::ParseIntError;
use std::path::Path;
use thiserror::Error;

/// A program in hex text form: one 32-bit instruction word per line,
/// `#` starts a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexProgram {
    pub words: Vec<u32>,
}

impl HexProgram {
    /// Parse the input as a hex program
    pub fn parse<R: BufRead>(input: R) -> Result<Self, HexError> {
        let mut words = Vec::new();

        for (line_number, line) in input.lines().enumerate() {
            let line = line?;

            // Drop trailing comments, then surrounding whitespace
            let word = match line.find('#') {
                Some(comment) => &line[..comment],
                None => &line,
            };
            let word = word.trim();

            if word.is_empty() {
                continue;
            }

            let word = u32::from_str_radix(word, 16).map_err(|source| HexError::InvalidWord {
                line: line_number + 1,
                text: word.to_string(),
                source,
            })?;
            words.push(word);
        }

        Ok(Self { words })
    }

    /// Read and parse a hex program file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, HexError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }
}

#[derive(Debug, Error)]
pub enum HexError {
    #[error("failed to read program: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: invalid instruction word '{text}': {source}")]
    InvalidWord {
        line: usize,
        text: String,
        source: ParseIntError,
    },
}
