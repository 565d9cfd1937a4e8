//! Line splitting shared by the reference loader and the record filter.
//!
//! A line ends at `\n`, `\r\n` or a lone `\r`. The terminator is not part of
//! the returned line.

use std::io::{self, BufRead};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read the next line into `buf`. Returns `false` at end of stream.
pub(crate) fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    let mut read_any = false;

    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            return Ok(read_any);
        }
        read_any = true;

        match available.iter().position(|b| *b == b'\n' || *b == b'\r') {
            Some(end) => {
                let terminator = available[end];
                buf.extend_from_slice(&available[..end]);
                reader.consume(end + 1);
                if terminator == b'\r' {
                    skip_line_feed(reader)?;
                }
                return Ok(true);
            }
            None => {
                let len = available.len();
                buf.extend_from_slice(available);
                reader.consume(len);
            }
        }
    }
}

/// Consume the `\n` of a `\r\n` pair, if present.
fn skip_line_feed<R: BufRead>(reader: &mut R) -> io::Result<()> {
    loop {
        match reader.fill_buf() {
            Ok(available) => {
                if available.first() == Some(&b'\n') {
                    reader.consume(1);
                }
                return Ok(());
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Drop a leading UTF-8 byte order mark from the first line of a stream.
pub(crate) fn strip_bom(line: &mut Vec<u8>) {
    if line.starts_with(UTF8_BOM) {
        line.drain(..UTF8_BOM.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(input: &[u8]) -> Vec<Vec<u8>> {
        let mut reader = input;
        let mut buf = Vec::new();
        let mut lines = Vec::new();
        while read_line(&mut reader, &mut buf).unwrap() {
            lines.push(buf.clone());
        }
        lines
    }

    #[test]
    fn test_all_terminators_end_a_line() {
        assert_eq!(
            split(b"a\nb\r\nc\rd"),
            vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec(), b"d".to_vec()]
        );
    }

    #[test]
    fn test_empty_lines_are_kept() {
        assert_eq!(
            split(b"\n\r\r\n\r"),
            vec![Vec::<u8>::new(), Vec::new(), Vec::new(), Vec::new()]
        );
    }

    #[test]
    fn test_crlf_split_across_buffer_boundary() {
        let reader = io::BufReader::with_capacity(2, &b"ab\r\ncd"[..]);
        let mut reader = reader;
        let mut buf = Vec::new();

        assert!(read_line(&mut reader, &mut buf).unwrap());
        assert_eq!(buf, b"ab");
        assert!(read_line(&mut reader, &mut buf).unwrap());
        assert_eq!(buf, b"cd");
        assert!(!read_line(&mut reader, &mut buf).unwrap());
    }

    #[test]
    fn test_empty_stream_has_no_lines() {
        assert!(split(b"").is_empty());
    }

    #[test]
    fn test_strip_bom_only_at_start() {
        let mut line = b"\xEF\xBB\xBF15551234567".to_vec();
        strip_bom(&mut line);
        assert_eq!(line, b"15551234567");

        let mut line = b"1\xEF\xBB\xBF".to_vec();
        strip_bom(&mut line);
        assert_eq!(line, b"1\xEF\xBB\xBF");
    }
}
