use crate::command::parse_index;
use crate::db::DatabaseManager;
use crate::dispatcher::CommandError;
use crate::resp::frame::Frame;
use crate::state::ClientState;

/// `SELECT index` — switches the connection's logical database. Only the
/// shape of `index` is validated (a non-negative integer); no call is
/// made into the database manager and no upper bound is enforced, per
/// the resolved Open Question in SPEC_FULL.md §4.4.
pub fn select(
    _manager: &dyn DatabaseManager,
    state: &mut ClientState,
    params: &[Vec<u8>],
) -> Result<Frame, CommandError> {
    if params.len() != 1 {
        return Err(CommandError::new("one parameter expected"));
    }
    let index = parse_index(&params[0])?;
    state.set_database(index);
    Ok(Frame::SimpleString("OK".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryDatabaseManager;
    use crate::uuid::TimeCounterGenerator;

    fn manager() -> InMemoryDatabaseManager {
        InMemoryDatabaseManager::new(Box::new(TimeCounterGenerator::new()))
    }

    #[test]
    fn selects_a_valid_index() {
        let m = manager();
        let mut s = ClientState::new("addr");
        let frame = select(&m, &mut s, &[b"3".to_vec()]).unwrap();
        assert_eq!(frame, Frame::SimpleString("OK".into()));
        assert_eq!(s.database(), 3);
    }

    #[test]
    fn rejects_negative_index() {
        let m = manager();
        let mut s = ClientState::new("addr");
        let err = select(&m, &mut s, &[b"-1".to_vec()]).unwrap_err();
        assert_eq!(err.0, "index out of range");
    }

    #[test]
    fn rejects_non_numeric_index() {
        let m = manager();
        let mut s = ClientState::new("addr");
        let err = select(&m, &mut s, &[b"abc".to_vec()]).unwrap_err();
        assert_eq!(err.0, "invalid index");
    }

    #[test]
    fn rejects_wrong_argument_count() {
        let m = manager();
        let mut s = ClientState::new("addr");
        let err = select(&m, &mut s, &[]).unwrap_err();
        assert_eq!(err.0, "one parameter expected");
    }

    #[test]
    fn does_not_require_an_upper_bound() {
        let m = manager();
        let mut s = ClientState::new("addr");
        assert!(select(&m, &mut s, &[b"999999".to_vec()]).is_ok());
    }
}
