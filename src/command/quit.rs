use crate::db::DatabaseManager;
use crate::dispatcher::CommandError;
use crate::resp::frame::Frame;
use crate::state::ClientState;

/// `QUIT` — marks the connection for closing. The connection loop still
/// writes this reply and flushes it before tearing the socket down (see
/// SPEC_FULL.md §4.4's resolved Open Question on QUIT's close timing).
pub fn quit(
    _manager: &dyn DatabaseManager,
    state: &mut ClientState,
    params: &[Vec<u8>],
) -> Result<Frame, CommandError> {
    if !params.is_empty() {
        return Err(CommandError::new("no parameters expected"));
    }
    state.set_closed(true);
    Ok(Frame::SimpleString("OK".into()))
}
