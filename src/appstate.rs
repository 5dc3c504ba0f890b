use std::sync::Arc;

use reqwest::Client;

use crate::config::Settings;

#[derive(Clone, Debug)]
pub struct AppState {
    pub settings: Arc<Settings>,

    pub client: Client,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            client: Client::new(),
        }
    }
}
