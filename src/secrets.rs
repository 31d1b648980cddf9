//! Marketing API credential loading.
//!
//! The dashboard surfaces whether the ad-platform credential pair is
//! configured; the analytics pipeline itself never consumes it.

use std::env;

const CLIENT_ID_VAR: &str = "NAVER_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "NAVER_CLIENT_SECRET";

#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Load the credential pair from the environment, reading a `.env` file
/// first when one is present. Returns `None` when either half is missing.
pub fn load_api_credentials() -> Option<ApiCredentials> {
    dotenv::dotenv().ok();
    let client_id = env::var(CLIENT_ID_VAR).ok().filter(|v| !v.is_empty())?;
    let client_secret = env::var(CLIENT_SECRET_VAR).ok().filter(|v| !v.is_empty())?;
    Some(ApiCredentials {
        client_id,
        client_secret,
    })
}
