//! Console line splitting.
//! `\r`, `\n` and `\r\n` each end one line. Input ending in a terminator does not
//! produce a trailing empty line; a final unterminated line is still yielded.

use std::io::{self, BufRead};

/// Iterator over the lines of a reader, accepting any console line terminator.
pub struct ConsoleLines<R> {
    reader: R,
    /// Previous line ended with `\r`; swallow a directly following `\n`.
    skip_lf: bool,
    done: bool,
}

impl<R: BufRead> ConsoleLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            skip_lf: false,
            done: false,
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut bytes = Vec::new();
        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if buf.is_empty() {
                self.done = true;
                if bytes.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(String::from_utf8_lossy(&bytes).into_owned()));
            }

            let mut start = 0;
            if self.skip_lf {
                self.skip_lf = false;
                if buf[0] == b'\n' {
                    start = 1;
                }
            }

            match buf[start..].iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    let end = start + i;
                    bytes.extend_from_slice(&buf[start..end]);
                    self.skip_lf = buf[end] == b'\r';
                    self.reader.consume(end + 1);
                    return Ok(Some(String::from_utf8_lossy(&bytes).into_owned()));
                }
                None => {
                    bytes.extend_from_slice(&buf[start..]);
                    let len = buf.len();
                    self.reader.consume(len);
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for ConsoleLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_line() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    fn split(input: &str) -> Vec<String> {
        ConsoleLines::new(Cursor::new(input.as_bytes()))
            .map(|l| l.unwrap())
            .collect()
    }

    #[test]
    fn all_terminators() {
        assert_eq!(split("a\nb\rc\r\nd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn no_trailing_empty_line() {
        assert_eq!(split("a\r\n"), vec!["a"]);
        assert_eq!(split("a\n"), vec!["a"]);
        assert!(split("").is_empty());
    }

    #[test]
    fn blank_lines_are_kept() {
        assert_eq!(split("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split("\r\r"), vec!["", ""]);
    }

    #[test]
    fn crlf_split_across_buffer_boundary() {
        // Capacity 2 puts "\r" and "\n" into different fills.
        let reader = BufReader::with_capacity(2, Cursor::new(b"a\r\nb".to_vec()));
        let lines: Vec<String> = ConsoleLines::new(reader).map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["a", "b"]);
    }
}
