//! Default value functions for configuration.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

pub fn default_svc() -> String {
    "slirc-bridge".to_string()
}

pub fn default_server() -> String {
    "chat.freenode.net:6697".to_string()
}

/// Login name of the invoking user, if the environment knows it.
pub fn default_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_default()
}

pub fn default_queue_capacity() -> usize {
    crate::control::DEFAULT_QUEUE_CAPACITY
}

pub fn default_socket_name() -> &'static str {
    "ctl"
}
