use std::sync::Arc;

use crate::config::Config;
use crate::hr_client::HrApiClient;
use crate::positions::PositionStore;
use crate::session::SessionState;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Used for logins; position traffic goes through `positions`.
    pub hr: HrApiClient,
    /// Pluggable positions backend. Default: RemotePositionStore. Swap via POSITIONS_BACKEND.
    pub positions: Arc<dyn PositionStore>,
    pub session: SessionState,
}
