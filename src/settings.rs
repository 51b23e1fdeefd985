use serde::Deserialize;

use crate::prelude::*;

#[derive(Deserialize, Debug, Clone)]
pub struct ApiConnectionSpec {
    /// Origin of the API server, e.g. `https://admin.example.com`. The fixed
    /// API path prefix is appended per request by the transport.
    pub base_url: String,
    /// Value of the client-identification header sent with every request.
    pub user_agent: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub api: ApiConnectionSpec,
}

impl Settings {
    /// Loads settings from `fleetsync.toml` (if present) overlaid with
    /// `FLEETSYNC_*` environment variables, e.g. `FLEETSYNC_API__BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("fleetsync").required(false))
            .add_source(config::Environment::with_prefix("FLEETSYNC").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
