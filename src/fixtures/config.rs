use crate::cli::Settings;
use crate::config::{Config, Credentials};

pub const SOURCE_TOKEN: &str = "glpat-fixture-token";
pub const DESTINATION_TOKEN: &str = "ghp_fixture_token";

pub fn get_credentials() -> Credentials {
    Credentials {
        source_token: SOURCE_TOKEN.to_string(),
        destination_token: DESTINATION_TOKEN.to_string(),
    }
}

/// Config whose source and destination APIs both point at `base_url`, e.g. a
/// wiremock server.
pub fn get_config(base_url: &str, settings: Settings) -> Config {
    let settings = Settings {
        source_api_url: Some(format!("{}/api/v4", base_url)),
        destination_api_url: Some(base_url.to_string()),
        ..settings
    };

    Config::new(settings, get_credentials())
}
