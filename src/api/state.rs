use std::sync::Arc;

use crate::config::AppConfig;
use crate::startgg::TournamentSource;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn TournamentSource>,
    pub config: Arc<AppConfig>,
}
