use crate::db::DatabaseManager;
use crate::dispatcher::CommandError;
use crate::resp::frame::Frame;
use crate::state::ClientState;

/// `AUTH password` — authenticates the connection. Wire reply on success
/// is an array containing a single `OK` simple string, matching the
/// dispatcher's general convention of always wrapping command replies in
/// an array (see SPEC_FULL.md §6).
pub fn auth(
    _manager: &dyn DatabaseManager,
    state: &mut ClientState,
    params: &[Vec<u8>],
) -> Result<Frame, CommandError> {
    if params.len() != 1 {
        return Err(CommandError::new("one parameter expected"));
    }
    let candidate = String::from_utf8_lossy(&params[0]).into_owned();
    let (ok, notice) = state.authenticate(&candidate);
    if let Some(msg) = notice {
        return Err(CommandError::new(msg));
    }
    if !ok {
        return Err(CommandError::new("authentication required"));
    }
    Ok(Frame::Array(Some(vec![Frame::SimpleString("OK".into())])))
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
    fn rejects_wrong_argument_count() {
        let m = manager();
        let mut s = ClientState::new("addr");
        let err = auth(&m, &mut s, &[]).unwrap_err();
        assert_eq!(err.0, "one parameter expected");
    }

    #[test]
    fn reports_no_password_set_when_none_required() {
        let m = manager();
        let mut s = ClientState::new("addr");
        let err = auth(&m, &mut s, &[b"anything".to_vec()]).unwrap_err();
        assert_eq!(err.0, crate::state::ERR_NO_PASS_SET);
    }

    #[test]
    fn succeeds_with_matching_password() {
        let m = manager();
        let mut s = ClientState::new("addr");
        s.set_auth_required("secret");
        let frame = auth(&m, &mut s, &[b"secret".to_vec()]).unwrap();
        assert_eq!(
            frame,
            Frame::Array(Some(vec![Frame::SimpleString("OK".into())]))
        );
        assert!(s.authenticated());
    }

    #[test]
    fn rejects_wrong_password() {
        let m = manager();
        let mut s = ClientState::new("addr");
        s.set_auth_required("secret");
        let err = auth(&m, &mut s, &[b"nope".to_vec()]).unwrap_err();
        assert_eq!(err.0, "authentication required");
    }
}
