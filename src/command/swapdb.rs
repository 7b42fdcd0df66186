use crate::command::parse_index;
use crate::db::DatabaseManager;
use crate::dispatcher::CommandError;
use crate::resp::frame::Frame;
use crate::state::ClientState;

/// `SWAPDB first second` — exchanges the contents of two logical
/// databases via the database manager. Unlike SELECT, this does reach
/// into the manager, since the swap itself is its entire effect.
pub fn swapdb(
    manager: &dyn DatabaseManager,
    _state: &mut ClientState,
    params: &[Vec<u8>],
) -> Result<Frame, CommandError> {
    if params.len() != 2 {
        return Err(CommandError::new("two parameters expected"));
    }
    let first = parse_index(&params[0])?;
    let second = parse_index(&params[1])?;
    manager
        .swap(first, second)
        .map_err(|e| CommandError::new(e.to_string()))?;
    Ok(Frame::SimpleString("OK".into()))
}
