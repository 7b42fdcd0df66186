/// Thrown when a client sends AUTH while no password is configured. This
/// isn't a hard failure — the caller decides whether to surface it — but
/// callers in this crate always do, matching the built-in AUTH command's
/// wire-level error message.
pub const ERR_NO_PASS_SET: &str = "Client sent AUTH, but no password set";

/// Per-connection mutable state: selected logical database, auth status,
/// and the quit flag. Owned exclusively by the one worker driving the
/// connection for its lifetime — never shared across threads.
#[derive(Debug, Clone)]
pub struct ClientState {
    database: i64,
    closed: bool,
    authenticated: bool,
    required_password: Option<String>,
    remote_addr: String,
}

impl ClientState {
    pub fn new(remote_addr: impl Into<String>) -> ClientState {
        ClientState {
            database: 0,
            closed: false,
            authenticated: true,
            required_password: None,
            remote_addr: remote_addr.into(),
        }
    }

    pub fn database(&self) -> i64 {
        self.database
    }

    pub fn set_database(&mut self, db: i64) {
        self.database = db;
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    /// Installing a non-empty password immediately revokes
    /// authentication; installing an empty one grants it.
    pub fn set_auth_required(&mut self, password: &str) {
        self.authenticated = password.is_empty();
        self.required_password = if password.is_empty() {
            None
        } else {
            Some(password.to_string())
        };
    }

    /// Returns `(accepted, optional informational error)`. The error is
    /// only ever [`ERR_NO_PASS_SET`] and only on the "no password
    /// required" path — it exists purely to let the caller inform the
    /// client that AUTH was unnecessary, not to signal failure.
    pub fn authenticate(&mut self, candidate: &str) -> (bool, Option<&'static str>) {
        match &self.required_password {
            None => {
                self.authenticated = true;
                (true, Some(ERR_NO_PASS_SET))
            }
            Some(required) if required == candidate => {
                self.authenticated = true;
                (true, None)
            }
            Some(_) => {
                self.authenticated = false;
                (false, None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_database_zero_and_open() {
        let s = ClientState::new("127.0.0.1:1234");
        assert_eq!(s.database(), 0);
        assert!(!s.closed());
        assert!(s.authenticated());
    }

    #[test]
    fn set_auth_required_with_password_revokes_auth() {
        let mut s = ClientState::new("addr");
        s.set_auth_required("secret");
        assert!(!s.authenticated());
    }

    #[test]
    fn set_auth_required_with_empty_password_grants_auth() {
        let mut s = ClientState::new("addr");
        s.set_auth_required("secret");
        s.set_auth_required("");
        assert!(s.authenticated());
    }

    #[test]
    fn authenticate_without_required_password_succeeds_with_notice() {
        let mut s = ClientState::new("addr");
        let (ok, err) = s.authenticate("anything");
        assert!(ok);
        assert_eq!(err, Some(ERR_NO_PASS_SET));
        assert!(s.authenticated());
    }

    #[test]
    fn authenticate_with_matching_password_succeeds() {
        let mut s = ClientState::new("addr");
        s.set_auth_required("secret");
        let (ok, err) = s.authenticate("secret");
        assert!(ok);
        assert!(err.is_none());
    }

    #[test]
    fn authenticate_with_wrong_password_fails_without_error() {
        let mut s = ClientState::new("addr");
        s.set_auth_required("secret");
        let (ok, err) = s.authenticate("nope");
        assert!(!ok);
        assert!(err.is_none());
        assert!(!s.authenticated());
    }
}
