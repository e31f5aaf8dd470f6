use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use crate::runtime::Emitter;

/// On-disk layout of an input sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Raw binary file, every byte is one unsigned number
    #[default]
    Bytes,
    /// Whitespace-separated decimal integers
    Text,
}

impl FromStr for InputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bytes" => Ok(InputFormat::Bytes),
            "text" => Ok(InputFormat::Text),
            other => Err(anyhow!("unknown input format '{}', expected 'bytes' or 'text'", other)),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Bytes => f.write_str("bytes"),
            InputFormat::Text => f.write_str("text"),
        }
    }
}

/// Decode an in-memory buffer
pub fn parse_numbers(contents: &[u8], format: InputFormat) -> Result<Vec<i64>> {
    match format {
        InputFormat::Bytes => Ok(contents.iter().map(|&byte| i64::from(byte)).collect()),
        InputFormat::Text => {
            let text = std::str::from_utf8(contents).context("text input is not valid UTF-8")?;
            text.split_whitespace()
                .enumerate()
                .map(|(idx, token)| {
                    token
                        .parse::<i64>()
                        .with_context(|| format!("invalid integer '{}' at position {}", token, idx + 1))
                })
                .collect()
        }
    }
}

/// Read an input sequence from `path`
pub fn read_numbers<P: AsRef<Path>>(path: P, format: InputFormat) -> Result<Vec<i64>> {
    let path = path.as_ref();
    let contents =
        std::fs::read(path).with_context(|| format!("failed to read input {}", path.display()))?;
    parse_numbers(&contents, format)
}

/// Echo the unsorted input on one line, space separated
pub fn write_input_line<W: Write>(writer: &mut W, input: &[i64]) -> Result<()> {
    for value in input {
        write!(writer, "{} ", value)?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Emitter writing one value per line
///
/// Write failures are latched and reported by [`WriteEmitter::finish`].
#[derive(Debug)]
pub struct WriteEmitter<W: Write> {
    writer: W,
    error: Option<std::io::Error>,
}

impl<W: Write> WriteEmitter<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self { writer, error: None }
    }

    /// Flush and surface the first write error, if any
    pub fn finish(mut self) -> Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err).context("failed to write sorted output");
        }
        self.writer.flush().context("failed to flush sorted output")?;
        Ok(self.writer)
    }
}

impl<W: Write> Emitter for WriteEmitter<W> {
    fn emit(&mut self, value: i64) {
        if self.error.is_none() {
            if let Err(err) = writeln!(self.writer, "{}", value) {
                self.error = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bytes_and_text() {
        assert_eq!(parse_numbers(&[0, 7, 255], InputFormat::Bytes).unwrap(), vec![0, 7, 255]);
        assert_eq!(
            parse_numbers(b" 3 -1\n4\t1 ", InputFormat::Text).unwrap(),
            vec![3, -1, 4, 1]
        );
        assert!(parse_numbers(b"3 x", InputFormat::Text).is_err());
        assert!(parse_numbers(b"", InputFormat::Text).unwrap().is_empty());
    }

    #[test]
    fn test_output_layout() {
        let mut line = Vec::new();
        write_input_line(&mut line, &[3, 1, 2]).unwrap();
        assert_eq!(String::from_utf8(line).unwrap(), "3 1 2 \n");

        let mut emitter = WriteEmitter::new(Vec::new());
        emitter.emit(1);
        emitter.emit(2);
        let written = emitter.finish().unwrap();
        assert_eq!(String::from_utf8(written).unwrap(), "1\n2\n");
    }
}
