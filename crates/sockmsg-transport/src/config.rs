use std::time::Duration;

/// Options applied when creating a listening endpoint.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Enable `SO_REUSEADDR` before binding. Default: `true`.
    pub reuse_address: bool,
    /// Pending-connection backlog passed to `listen`. Default: the platform maximum.
    pub backlog: i32,
}

impl ListenerConfig {
    /// Platform maximum backlog (`SOMAXCONN`).
    #[cfg(unix)]
    pub const MAX_BACKLOG: i32 = libc::SOMAXCONN;
    #[cfg(not(unix))]
    pub const MAX_BACKLOG: i32 = 128;
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            reuse_address: true,
            backlog: Self::MAX_BACKLOG,
        }
    }
}

/// Options applied when dialing a remote endpoint.
#[derive(Debug, Clone, Default)]
pub struct ConnectConfig {
    /// Per-address connect timeout. `None` blocks until the OS gives up.
    pub timeout: Option<Duration>,
    /// Disable Nagle's algorithm on the new connection.
    pub nodelay: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_defaults_match_legacy_setup() {
        let cfg = ListenerConfig::default();
        assert!(cfg.reuse_address);
        assert_eq!(cfg.backlog, ListenerConfig::MAX_BACKLOG);
        assert!(cfg.backlog > 0);
    }

    #[test]
    fn connect_defaults_block_without_nodelay() {
        let cfg = ConnectConfig::default();
        assert!(cfg.timeout.is_none());
        assert!(!cfg.nodelay);
    }
}
