use std::path::PathBuf;
use std::time::Duration;

/// Server configuration. Mirrors the collaborator config's defaults
/// exactly: loopback host on port 3030, one worker per CPU, five minute
/// read/write deadlines, no password.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub workers: usize,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub require_pass: Option<String>,
    /// Recorded for parity with the full system's configuration surface;
    /// unused here since file-backed database persistence is out of scope
    /// (see spec §1).
    pub database_location: PathBuf,
}

impl Config {
    pub fn new() -> Config {
        Config {
            host: "127.0.0.1:3030".to_string(),
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            read_timeout: Duration::from_secs(5 * 60),
            write_timeout: Duration::from_secs(5 * 60),
            require_pass: None,
            database_location: PathBuf::from("."),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let c = Config::new();
        assert_eq!(c.host, "127.0.0.1:3030");
        assert!(c.workers >= 1);
        assert_eq!(c.read_timeout, Duration::from_secs(300));
        assert_eq!(c.write_timeout, Duration::from_secs(300));
        assert!(c.require_pass.is_none());
    }
}
