use crate::db::DatabaseManager;
use crate::dispatcher::CommandError;
use crate::resp::frame::Frame;
use crate::state::ClientState;

/// `ECHO message` — replies with the given message, unmodified.
pub fn echo(
    _manager: &dyn DatabaseManager,
    _state: &mut ClientState,
    params: &[Vec<u8>],
) -> Result<Frame, CommandError> {
    if params.len() != 1 {
        return Err(CommandError::new("one parameter expected"));
    }
    Ok(Frame::bulk(params[0].clone()))
}
