//! The IO collaborator: typed input for READ and typed output for
//! WRITE, DPRINT and BREAK.

use std::io::{self, BufRead};

/// Source of values for the READ instruction.
///
/// `Ok(None)` means no value is available (end of input or a line that
/// does not parse); READ then stores `nil`. `Err` means the input itself
/// failed and ends the run.
pub trait InputReader {
    fn read_int(&mut self) -> io::Result<Option<i64>>;
    fn read_bool(&mut self) -> io::Result<Option<bool>>;
    fn read_string(&mut self) -> io::Result<Option<String>>;
}

/// Sink for rendered values.
pub trait OutputWriter {
    fn write_int(&mut self, value: i64) -> io::Result<()>;
    fn write_bool(&mut self, value: bool) -> io::Result<()>;
    fn write_string(&mut self, value: &str) -> io::Result<()>;
}

impl<W: io::Write + ?Sized> OutputWriter for W {
    fn write_int(&mut self, value: i64) -> io::Result<()> {
        write!(self, "{value}")
    }

    fn write_bool(&mut self, value: bool) -> io::Result<()> {
        self.write_all(if value { b"true" } else { b"false" })
    }

    fn write_string(&mut self, value: &str) -> io::Result<()> {
        self.write_all(value.as_bytes())
    }
}

/// Line-oriented reader: each READ consumes one line.
pub struct LineReader<R> {
    inner: R,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Next line without its terminator, or `None` at end of input.
    ///
    /// A read error, including a line that is not valid UTF-8, is
    /// returned as is.
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.inner.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

impl<R: BufRead> InputReader for LineReader<R> {
    fn read_int(&mut self) -> io::Result<Option<i64>> {
        Ok(self.next_line()?.and_then(|line| line.trim().parse().ok()))
    }

    fn read_bool(&mut self) -> io::Result<Option<bool>> {
        Ok(self
            .next_line()?
            .map(|line| line.trim().eq_ignore_ascii_case("true")))
    }

    fn read_string(&mut self) -> io::Result<Option<String>> {
        self.next_line()
    }
}

/// The channels one run talks to.
pub struct Io<'a> {
    pub input: &'a mut dyn InputReader,
    /// Program output (WRITE).
    pub stdout: &'a mut dyn OutputWriter,
    /// Diagnostic output (DPRINT, BREAK).
    pub stderr: &'a mut dyn OutputWriter,
}

impl<'a> Io<'a> {
    pub fn new(
        input: &'a mut dyn InputReader,
        stdout: &'a mut dyn OutputWriter,
        stderr: &'a mut dyn OutputWriter,
    ) -> Self {
        Self {
            input,
            stdout,
            stderr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(text: &str) -> LineReader<&[u8]> {
        LineReader::new(text.as_bytes())
    }

    #[test]
    fn reads_lines_in_order() {
        let mut r = reader("hello world\r\n42\ntrue");
        assert_eq!(r.read_string().unwrap(), Some("hello world".to_string()));
        assert_eq!(r.read_int().unwrap(), Some(42));
        assert_eq!(r.read_bool().unwrap(), Some(true));
        assert_eq!(r.read_string().unwrap(), None);
    }

    #[test]
    fn bad_int_is_none() {
        let mut r = reader("4x2\n");
        assert_eq!(r.read_int().unwrap(), None);
    }

    #[test]
    fn bool_is_true_only_for_true() {
        let mut r = reader("TRUE\nyes\n\n");
        assert_eq!(r.read_bool().unwrap(), Some(true));
        assert_eq!(r.read_bool().unwrap(), Some(false));
        assert_eq!(r.read_bool().unwrap(), Some(false));
        assert_eq!(r.read_bool().unwrap(), None);
    }

    #[test]
    fn empty_line_is_empty_string() {
        let mut r = reader("\n");
        assert_eq!(r.read_string().unwrap(), Some(String::new()));
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let mut r = LineReader::new(&b"ok\n\xff\xfe\n"[..]);
        assert_eq!(r.read_string().unwrap(), Some("ok".to_string()));
        let err = r.read_string().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn writer_renders_values() {
        let mut out = Vec::new();
        out.write_int(-7).unwrap();
        out.write_bool(false).unwrap();
        out.write_string("ž").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "-7falsež");
    }
}
