/// Per-slot node variant codes of the persisted chain registry.
pub const CHAIN_TYPES: &str = "chain_types";
/// Per-slot node levels, parallel to [`CHAIN_TYPES`].
pub const CHAIN_LEVELS: &str = "chain_levels";
/// Prefix of the per-node socket contents strings.
pub const SOCKETS_PREFIX: &str = "sockets/";

pub fn socket_key(node_index: usize) -> String {
    format!("{}{}", SOCKETS_PREFIX, node_index)
}

/// Parses the node index back out of a socket contents key.
pub fn socket_key_index(key: &str) -> Option<usize> {
    key.strip_prefix(SOCKETS_PREFIX)?.parse().ok()
}
