use std::io::{self, BufRead, BufReader, Read};

use super::frame::Frame;
use super::RespError;

/// Internal outcome of a single (possibly recursive) frame decode: either a
/// frame, a non-terminal RESP error, or a terminal end-of-stream condition.
enum Outcome {
    Frame(Frame),
    Resp(RespError),
    Eof,
}

/// Streaming RESP decoder over a generic reader.
///
/// Mirrors the collaborator's `bufio.Reader`-based scanner: on any
/// intra-frame decode failure the underlying buffered reader is reset,
/// discarding bytes already pulled into its own buffer but preserving
/// whatever the kernel (or backing reader) hasn't handed over yet, so the
/// next [`Scanner::scan`] call starts clean on the next frame.
pub struct Scanner<R> {
    read: Option<BufReader<R>>,
    err: Option<RespError>,
    done: bool,
    frame: Option<Frame>,
}

impl<R: Read> Scanner<R> {
    pub fn new(r: R) -> Scanner<R> {
        Scanner {
            read: Some(BufReader::new(r)),
            err: None,
            done: false,
            frame: None,
        }
    }

    /// Attempt to parse the next frame. Returns `false` only once the
    /// stream has reached a terminal EOF / closed-pipe condition; on any
    /// other decode error it returns `true` with [`Scanner::err`] set, and
    /// the error is available for exactly one call.
    pub fn scan(&mut self) -> bool {
        if self.done {
            return false;
        }
        self.err = None;
        self.frame = None;
        match self.scan_type() {
            Outcome::Frame(f) => {
                self.frame = Some(f);
                true
            }
            Outcome::Resp(e) => {
                self.err = Some(e);
                true
            }
            Outcome::Eof => {
                self.done = true;
                false
            }
        }
    }

    /// The last decode error, if any. Terminal EOF is normalised to `None`.
    pub fn err(&self) -> Option<&RespError> {
        self.err.as_ref()
    }

    /// The last successfully parsed frame.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn take_frame(&mut self) -> Option<Frame> {
        self.frame.take()
    }

    fn reader(&mut self) -> &mut BufReader<R> {
        self.read.as_mut().expect("scanner reader taken")
    }

    /// Discard buffered-but-unconsumed bytes and rebind to the underlying
    /// reader, so the next read starts at the next unread byte.
    fn reset(&mut self) {
        let inner = self.read.take().expect("scanner reader taken").into_inner();
        self.read = Some(BufReader::new(inner));
    }

    fn scan_type(&mut self) -> Outcome {
        let mut line = Vec::new();
        match self.reader().read_until(b'\n', &mut line) {
            Ok(0) => return Outcome::Eof,
            Ok(_) => {}
            Err(e) => return io_outcome(e),
        }
        if line.len() < 2 || line[line.len() - 2] != b'\r' {
            self.reset();
            return Outcome::Resp(RespError::InvalidCrlf);
        }
        line.truncate(line.len() - 2);

        if line.is_empty() {
            self.reset();
            return Outcome::Resp(RespError::Other("empty line".into()));
        }

        let prefix = line[0];
        let rest = &line[1..];

        match prefix {
            b'+' => Outcome::Frame(Frame::SimpleString(lossy(rest))),
            b'-' => Outcome::Frame(Frame::Error(lossy(rest))),
            b':' => match parse_i64(rest) {
                Ok(n) => Outcome::Frame(Frame::Integer(n)),
                Err(e) => {
                    self.reset();
                    Outcome::Resp(e)
                }
            },
            b'$' => self.scan_bulk_string(rest),
            b'*' => self.scan_array(rest),
            _ => match tokenize_inline(&line) {
                Ok(tokens) => Outcome::Frame(Frame::Inline(tokens)),
                Err(e) => Outcome::Resp(e),
            },
        }
    }

    fn scan_bulk_string(&mut self, len_field: &[u8]) -> Outcome {
        let len = match parse_i64(len_field) {
            Ok(n) => n,
            Err(e) => {
                self.reset();
                return Outcome::Resp(e);
            }
        };
        if len < 0 {
            return Outcome::Frame(Frame::BulkString(None));
        }
        let mut buf = vec![0u8; len as usize];
        if len > 0 {
            if let Err(e) = self.reader().read_exact(&mut buf) {
                return io_outcome(e);
            }
        }
        let mut crlf = [0u8; 2];
        if let Err(e) = self.reader().read_exact(&mut crlf) {
            return io_outcome(e);
        }
        if crlf != *b"\r\n" {
            self.reset();
            return Outcome::Resp(RespError::MissingTerminatingCrlf);
        }
        Outcome::Frame(Frame::BulkString(Some(buf)))
    }

    fn scan_array(&mut self, len_field: &[u8]) -> Outcome {
        // Matches the collaborator's quirk: a malformed length field here
        // does NOT reset the buffered reader (only a negative length does).
        let len = match parse_i64(len_field) {
            Ok(n) => n,
            Err(e) => return Outcome::Resp(e),
        };
        if len < 0 {
            self.reset();
            return Outcome::Resp(RespError::NegativeArrayLength);
        }
        let mut items = Vec::with_capacity(len as usize);
        for _ in 0..len {
            match self.scan_type() {
                Outcome::Frame(f) => items.push(f),
                other => return other,
            }
        }
        Outcome::Frame(Frame::Array(Some(items)))
    }
}

fn io_outcome(e: io::Error) -> Outcome {
    if is_terminal(&e) {
        Outcome::Eof
    } else {
        Outcome::Resp(RespError::Other(e.to_string()))
    }
}

/// Classifies an I/O error as terminal (the socket is gone for good) or
/// merely transient. Reused on the write path in `connection` so a
/// one-off write hiccup doesn't tear down a connection that a real
/// terminal failure should.
pub(crate) fn is_terminal(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::UnexpectedEof
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
    )
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn parse_i64(bytes: &[u8]) -> Result<i64, RespError> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| RespError::InvalidInteger(lossy(bytes)))
}

/// Split a line on unquoted runs of spaces, honouring double-quoted spans
/// as single tokens. Embedded-quote escaping is not supported.
fn tokenize_inline(line: &[u8]) -> Result<Vec<Vec<u8>>, RespError> {
    let text = std::str::from_utf8(line)
        .map_err(|_| RespError::InvalidInline("not valid UTF-8".into()))?;
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    loop {
        while matches!(chars.peek(), Some(' ')) {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }
        let mut token = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some(c) => token.push(c),
                    None => return Err(RespError::InvalidInline("unterminated quote".into())),
                }
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == ' ' {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token.into_bytes());
    }

    if tokens.is_empty() {
        return Err(RespError::InvalidInline("empty command".into()));
    }
    Ok(tokens)
}
