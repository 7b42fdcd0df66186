use std::collections::HashMap;
use std::sync::Arc;

use crate::db::DatabaseManager;
use crate::resp::frame::Frame;
use crate::state::ClientState;

/// An error returned by a command handler, or by the dispatcher itself
/// when no handler matches. Carries just the wire-level message, since
/// that message is forwarded to the client verbatim as an `Error` frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError(pub String);

impl CommandError {
    pub fn new(msg: impl Into<String>) -> CommandError {
        CommandError(msg.into())
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for CommandError {}

pub type Handler = dyn Fn(&dyn DatabaseManager, &mut ClientState, &[Vec<u8>]) -> Result<Frame, CommandError>
    + Send
    + Sync;

/// A registry mapping command name (byte string, compared case-sensitively
/// as received) to a handler. A hash map is a valid substitute for a radix
/// tree at the command counts this dispatcher sees (see spec §9); the
/// trait-shaped interface below would let a radix tree be swapped in
/// without touching call sites.
pub struct Dispatcher {
    commands: HashMap<Vec<u8>, Arc<Handler>>,
}

impl Dispatcher {
    pub fn new() -> Dispatcher {
        Dispatcher {
            commands: HashMap::new(),
        }
    }

    /// Registers `name`. Returns `false` without mutating the registry if
    /// `name` is already registered.
    pub fn add(&mut self, name: &[u8], handler: Arc<Handler>) -> bool {
        if self.commands.contains_key(name) {
            return false;
        }
        self.commands.insert(name.to_vec(), handler);
        true
    }

    /// Removes `name`. Returns `true` iff a registration was removed.
    pub fn delete(&mut self, name: &[u8]) -> bool {
        self.commands.remove(name).is_some()
    }

    pub fn execute(
        &self,
        name: &[u8],
        manager: &dyn DatabaseManager,
        state: &mut ClientState,
        params: &[Vec<u8>],
    ) -> Result<Frame, CommandError> {
        match self.commands.get(name) {
            Some(handler) => handler(manager, state, params),
            None => Err(CommandError::new(format!(
                "unknown command '{}'",
                String::from_utf8_lossy(name)
            ))),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
