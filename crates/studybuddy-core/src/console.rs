//! Line-oriented console I/O.
//!
//! Wraps any `BufRead`/`Write` pair so the interactive flow can be driven by
//! stdin/stdout in the binary and by byte buffers in tests.

use std::io::{self, BufRead, Write};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Write a line to the output.
    pub fn say(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", line.as_ref())
    }

    /// Print `message` without a newline and read one line.
    ///
    /// Returns `None` at end of input. The trailing newline is stripped.
    pub fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Read lines until a blank line or end of input, joined with `\n`.
    pub fn read_block(&mut self) -> io::Result<String> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_reads_one_line() {
        let mut console = Console::new("first\r\nsecond\n".as_bytes(), Vec::new());
        assert_eq!(console.prompt("> ").unwrap().as_deref(), Some("first"));
        assert_eq!(console.prompt("> ").unwrap().as_deref(), Some("second"));
        assert_eq!(console.prompt("> ").unwrap(), None);
        assert_eq!(String::from_utf8(console.into_output()).unwrap(), "> > > ");
    }

    #[test]
    fn block_stops_at_blank_line() {
        let mut console = Console::new("line one\nline two\n\nafter\n".as_bytes(), Vec::new());
        assert_eq!(console.read_block().unwrap(), "line one\nline two");
        assert_eq!(console.prompt("").unwrap().as_deref(), Some("after"));
    }

    #[test]
    fn block_stops_at_end_of_input() {
        let mut console = Console::new("only line".as_bytes(), Vec::new());
        assert_eq!(console.read_block().unwrap(), "only line");
    }
}
