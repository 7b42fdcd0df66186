mod auth;
mod echo;
mod ping;
mod quit;
mod select;
mod swapdb;

use std::sync::Arc;

use crate::dispatcher::{Dispatcher, Handler};

/// Installs every built-in command against `dispatcher`. Called once
/// during server setup, before the pool starts, so the registry is
/// read-only for the lifetime of every worker thread (see spec §5).
pub fn register_builtins(dispatcher: &mut Dispatcher) {
    let builtins: &[(&[u8], Arc<Handler>)] = &[
        (b"AUTH", Arc::new(auth::auth)),
        (b"ECHO", Arc::new(echo::echo)),
        (b"PING", Arc::new(ping::ping)),
        (b"SELECT", Arc::new(select::select)),
        (b"SWAPDB", Arc::new(swapdb::swapdb)),
        (b"QUIT", Arc::new(quit::quit)),
    ];
    for (name, handler) in builtins {
        dispatcher.add(name, Arc::clone(handler));
    }
}

/// Parses a command argument as a non-negative `i64` logical database id.
/// Used by SELECT and SWAPDB, which validate shape but never an upper
/// bound (see the resolved Open Question in SPEC_FULL.md §4.4).
fn parse_index(raw: &[u8]) -> Result<i64, crate::dispatcher::CommandError> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| crate::dispatcher::CommandError::new("invalid index"))?;
    let n: i64 = text
        .parse()
        .map_err(|_| crate::dispatcher::CommandError::new("invalid index"))?;
    if n < 0 {
        return Err(crate::dispatcher::CommandError::new("index out of range"));
    }
    Ok(n)
}
