use crate::db::DatabaseManager;
use crate::dispatcher::CommandError;
use crate::resp::frame::Frame;
use crate::state::ClientState;

/// `PING [message]` — replies `PONG` with no argument, or echoes `message`
/// back as a bulk string when one is given.
pub fn ping(
    _manager: &dyn DatabaseManager,
    _state: &mut ClientState,
    params: &[Vec<u8>],
) -> Result<Frame, CommandError> {
    match params.len() {
        0 => Ok(Frame::SimpleString("PONG".into())),
        1 => Ok(Frame::bulk(params[0].clone())),
        _ => Err(CommandError::new("one or zero parameters expected")),
    }
}
