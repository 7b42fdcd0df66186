use std::io::{BufWriter, Write};
use std::net::TcpStream;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crate::db::DatabaseManager;
use crate::dispatcher::Dispatcher;
use crate::resp::frame::Frame;
use crate::resp::scanner::{is_terminal, Scanner};
use crate::state::ClientState;

const ERR_SCAN: &str = "scan error";
const ERR_AUTH_REQUIRED: &str = "authentication required";

/// Drives one connection end-to-end for its whole lifetime, on the worker
/// thread that owns it. Mirrors the collaborator's per-connection request
/// loop: scan a frame, validate its shape, gate on auth, dispatch, write
/// the reply, repeat until the peer closes or the client sends QUIT.
pub fn serve(
    stream: TcpStream,
    dispatcher: &Dispatcher,
    manager: &dyn DatabaseManager,
    read_timeout: Duration,
    write_timeout: Duration,
    require_pass: Option<&str>,
) {
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let reader = match stream.try_clone() {
        Ok(r) => r,
        Err(e) => {
            log::warn!("failed to clone stream for {}: {}", peer, e);
            return;
        }
    };
    let mut scanner = Scanner::new(reader);
    let mut writer = BufWriter::new(stream);
    let mut state = ClientState::new(peer.clone());
    if let Some(pw) = require_pass {
        state.set_auth_required(pw);
    }

    loop {
        // Step 2 (read half): a fresh deadline before every read. Socket
        // read/write timeouts are a property of the underlying socket, so
        // setting them through either clone affects both.
        if let Err(e) = writer.get_ref().set_read_timeout(Some(read_timeout)) {
            log::warn!("failed to set read timeout for {}: {}", peer, e);
        }

        // Step 1: scan the next frame.
        if !scanner.scan() {
            break;
        }

        // Step 2: a decode error sends the fixed wire message and loops;
        // the specific reason is only logged, per the resolved Open
        // Question on framing-error policy.
        if let Some(err) = scanner.err() {
            log::warn!("{}: scan error: {}", peer, err);
            if !reply(&mut writer, &Frame::Error(ERR_SCAN.into()), write_timeout, &peer) {
                break;
            }
            continue;
        }

        let frame = match scanner.take_frame() {
            Some(f) => f,
            None => continue,
        };

        // Step 3: validate shape — a request must be a non-null array of
        // non-null bulk strings with at least one element.
        let params = match validate_request(frame) {
            Ok(p) => p,
            Err(msg) => {
                if !reply(&mut writer, &Frame::Error(msg.into()), write_timeout, &peer) {
                    break;
                }
                continue;
            }
        };

        let name = &params[0];
        let args = &params[1..];

        // Step 4: auth gate. Unauthenticated clients may only call AUTH
        // or QUIT; everything else is rejected before dispatch.
        if !state.authenticated() && !matches!(name.as_slice(), b"AUTH" | b"QUIT") {
            if !reply(&mut writer, &Frame::Error(ERR_AUTH_REQUIRED.into()), write_timeout, &peer) {
                break;
            }
            continue;
        }

        // Step 5/6: dispatch, with panics from a handler contained so one
        // bad command can't take the worker thread down.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            dispatcher.execute(name, manager, &mut state, args)
        }));

        let response = match outcome {
            Ok(Ok(frame)) => frame,
            Ok(Err(e)) => Frame::Error(e.to_string()),
            Err(_) => {
                log::error!("{}: command handler panicked for {:?}", peer, name);
                Frame::Error("internal error".into())
            }
        };

        // Step 7: write the reply and flush.
        if !reply(&mut writer, &response, write_timeout, &peer) {
            break;
        }

        // Step 8: honour QUIT once the reply has been flushed. The
        // connection is closed by falling through the loop naturally —
        // the next scan observes EOF on the now half-closed socket.
        if state.closed() {
            break;
        }
    }

    log::info!("{}: connection closed", peer);
}

/// A request frame must be a non-null array of at least one non-null bulk
/// string. Anything else is rejected with the matching wire message.
fn validate_request(frame: Frame) -> Result<Vec<Vec<u8>>, &'static str> {
    let items = match frame {
        Frame::Array(Some(items)) => items,
        Frame::Inline(tokens) => return validate_tokens(tokens),
        _ => return Err("received invalid type"),
    };
    if items.is_empty() {
        return Err("received empty array");
    }
    let mut params = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Frame::BulkString(Some(data)) => params.push(data),
            _ => return Err("received invalid data"),
        }
    }
    Ok(params)
}

fn validate_tokens(tokens: Vec<Vec<u8>>) -> Result<Vec<Vec<u8>>, &'static str> {
    if tokens.is_empty() {
        return Err("received empty array");
    }
    Ok(tokens)
}

/// Sets a fresh write deadline, then writes and flushes `frame`. Only a
/// terminal I/O error (EOF, closed/reset/aborted pipe) tears the
/// connection down — per spec.md §4.4, any other write error is logged
/// and the loop continues.
fn reply(writer: &mut BufWriter<TcpStream>, frame: &Frame, write_timeout: Duration, peer: &str) -> bool {
    if let Err(e) = writer.get_ref().set_write_timeout(Some(write_timeout)) {
        log::warn!("failed to set write timeout for {}: {}", peer, e);
    }
    if let Err(e) = frame.stream(writer) {
        log::warn!("{}: write failed: {}", peer, e);
        return !is_terminal(&e);
    }
    if let Err(e) = writer.flush() {
        log::warn!("{}: flush failed: {}", peer, e);
        return !is_terminal(&e);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_request_rejects_non_array() {
        assert_eq!(
            validate_request(Frame::Integer(1)),
            Err("received invalid type")
        );
    }

    #[test]
    fn validate_request_rejects_null_array() {
        assert_eq!(
            validate_request(Frame::Array(None)),
            Err("received invalid type")
        );
    }

    #[test]
    fn validate_request_rejects_empty_array() {
        assert_eq!(
            validate_request(Frame::Array(Some(vec![]))),
            Err("received empty array")
        );
    }

    #[test]
    fn validate_request_rejects_non_bulk_element() {
        let f = Frame::Array(Some(vec![Frame::Integer(1)]));
        assert_eq!(validate_request(f), Err("received invalid data"));
    }

    #[test]
    fn validate_request_rejects_null_bulk_element() {
        let f = Frame::Array(Some(vec![Frame::BulkString(None)]));
        assert_eq!(validate_request(f), Err("received invalid data"));
    }

    #[test]
    fn validate_request_accepts_well_formed_array() {
        let f = Frame::Array(Some(vec![Frame::bulk("PING")]));
        assert_eq!(validate_request(f), Ok(vec![b"PING".to_vec()]));
    }

    #[test]
    fn validate_request_accepts_inline_tokens() {
        let f = Frame::Inline(vec![b"PING".to_vec()]);
        assert_eq!(validate_request(f), Ok(vec![b"PING".to_vec()]));
    }
}
