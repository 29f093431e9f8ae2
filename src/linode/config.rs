use crate::common::{key_file_or_string, Error};

use super::{HttpTransport, LinodeDriver, API_ROOT};

fn default_api_root() -> url::Url {
    url::Url::parse(API_ROOT).expect("API_ROOT should be a valid URL")
}

#[derive(Clone, serde::Deserialize)]
pub struct Config {
    /// API key, or `@/path/to/file` to read it from a file.
    pub api_key: String,
    #[serde(default = "default_api_root")]
    pub api_root: url::Url,
}

impl TryFrom<Config> for LinodeDriver<HttpTransport> {
    type Error = Error;

    fn try_from(value: Config) -> Result<Self, Self::Error> {
        let api_key = key_file_or_string(value.api_key, "linode")?;
        Ok(LinodeDriver::new(HttpTransport::new(api_key, value.api_root)))
    }
}
