mod project;
mod variablegroup;

use super::base::BaseClient;

/// Client for the TFS 2018 REST API (api-version 4.x).
#[derive(Debug, Clone)]
pub struct V4Client {
    base: BaseClient,
}

impl V4Client {
    const API_VERSION: &'static str = "4.1-preview.1";

    pub fn new(base: BaseClient) -> Self {
        Self { base }
    }
}
