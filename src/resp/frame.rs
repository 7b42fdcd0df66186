use std::io::{self, Write};

/// A single fully-parsed RESP value.
///
/// `Inline` only ever comes out of the scanner's legacy inline-command
/// path; it is never produced by [`Frame::to_bytes`] or [`Frame::stream`]
/// directly, since an inline command is always materialised into an
/// [`Frame::Array`] of [`Frame::BulkString`]s before it leaves the scanner.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    SimpleString(String),
    Error(String),
    Integer(i64),
    /// `None` is the RESP "null bulk string" (`$-1\r\n`).
    BulkString(Option<Vec<u8>>),
    /// `None` is the RESP "null array" (`*-1\r\n`).
    Array(Option<Vec<Frame>>),
    Inline(Vec<Vec<u8>>),
}

impl Frame {
    /// Convenience constructor for a non-null bulk string built from bytes.
    pub fn bulk(data: impl Into<Vec<u8>>) -> Frame {
        Frame::BulkString(Some(data.into()))
    }

    /// Convenience constructor for the null bulk string.
    pub fn null_bulk() -> Frame {
        Frame::BulkString(None)
    }

    /// Materialise the wire encoding of this frame into a fresh buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        // A Vec<u8> Write impl never errors, so this can't fail.
        self.stream(&mut buf).expect("writing to a Vec cannot fail");
        buf
    }

    /// Stream the wire encoding of this frame to `w`, returning the total
    /// number of bytes written even if a later chunk fails to write.
    pub fn stream(&self, w: &mut impl Write) -> io::Result<usize> {
        match self {
            Frame::SimpleString(s) => write_chunks(w, &[b"+", s.as_bytes(), b"\r\n"]),
            Frame::Error(s) => write_chunks(w, &[b"-", s.as_bytes(), b"\r\n"]),
            Frame::Integer(n) => {
                let body = n.to_string();
                write_chunks(w, &[b":", body.as_bytes(), b"\r\n"])
            }
            Frame::BulkString(None) => w.write(b"$-1\r\n"),
            Frame::BulkString(Some(data)) => {
                let len = data.len().to_string();
                write_chunks(w, &[b"$", len.as_bytes(), b"\r\n", data.as_slice(), b"\r\n"])
            }
            Frame::Array(None) => w.write(b"*-1\r\n"),
            Frame::Array(Some(items)) => {
                let len = items.len().to_string();
                let mut total = write_chunks(w, &[b"*", len.as_bytes(), b"\r\n"])?;
                for item in items {
                    total += item.stream(w)?;
                }
                Ok(total)
            }
            Frame::Inline(tokens) => {
                let items: Vec<Frame> = tokens
                    .iter()
                    .map(|t| Frame::BulkString(Some(t.clone())))
                    .collect();
                Frame::Array(Some(items)).stream(w)
            }
        }
    }
}

/// Write a sequence of byte slices, accumulating the total written even
/// once a later chunk errors out (matching the collaborator's `Stream`
/// contract of returning partial byte counts on write failure).
fn write_chunks(w: &mut impl Write, chunks: &[&[u8]]) -> io::Result<usize> {
    let mut total = 0;
    for chunk in chunks {
        match w.write(chunk) {
            Ok(n) => {
                total += n;
                if n < chunk.len() {
                    return Err(io::Error::new(io::ErrorKind::WriteZero, "short write"));
                }
            }
            Err(e) => return Err(io::Error::new(e.kind(), format!("{} (wrote {})", e, total))),
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_simple_string() {
        assert_eq!(Frame::SimpleString("OK".into()).to_bytes(), b"+OK\r\n");
    }

    #[test]
    fn encodes_error() {
        assert_eq!(
            Frame::Error("bad thing".into()).to_bytes(),
            b"-bad thing\r\n"
        );
    }

    #[test]
    fn encodes_integer() {
        assert_eq!(Frame::Integer(123).to_bytes(), b":123\r\n");
        assert_eq!(Frame::Integer(-5).to_bytes(), b":-5\r\n");
    }

    #[test]
    fn distinguishes_empty_bulk_from_null_bulk() {
        assert_eq!(Frame::BulkString(None).to_bytes(), b"$-1\r\n");
        assert_eq!(Frame::BulkString(Some(vec![])).to_bytes(), b"$0\r\n\r\n");
    }

    #[test]
    fn encodes_bulk_string() {
        assert_eq!(Frame::bulk("hello").to_bytes(), b"$5\r\nhello\r\n");
    }

    #[test]
    fn encodes_null_array() {
        assert_eq!(Frame::Array(None).to_bytes(), b"*-1\r\n");
    }

    #[test]
    fn encodes_nested_array() {
        let f = Frame::Array(Some(vec![
            Frame::Integer(1),
            Frame::Array(Some(vec![Frame::bulk("a")])),
        ]));
        assert_eq!(f.to_bytes(), b"*2\r\n:1\r\n*1\r\n$1\r\na\r\n");
    }

    #[test]
    fn stream_matches_to_bytes() {
        let f = Frame::Array(Some(vec![Frame::bulk("ECHO"), Frame::bulk("hi")]));
        let mut buf = Vec::new();
        let n = f.stream(&mut buf).unwrap();
        assert_eq!(n, buf.len());
        assert_eq!(buf, f.to_bytes());
    }
}
