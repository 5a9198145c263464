use aioep_core::gateway::GatewayConfig;
use std::path::PathBuf;

/// Shared application state passed to all route handlers.
///
/// The gateway configuration is resolved once at startup (or injected by
/// tests) rather than re-read from the environment per request.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub gateway: GatewayConfig,
}

impl AppState {
    pub fn new(root: PathBuf, gateway: GatewayConfig) -> Self {
        Self { root, gateway }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_stores_root() {
        let state = AppState::new(PathBuf::from("/tmp/test"), GatewayConfig::openai());
        assert_eq!(state.root, PathBuf::from("/tmp/test"));
        assert!(state.gateway.api_key.is_none());
    }
}
