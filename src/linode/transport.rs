use std::collections::BTreeMap;

use serde_json::Value;
use snafu::ResultExt;

use crate::common::{ApiSnafu, DecodeSnafu, RequestSnafu, Result};

use super::models::{APIError, APIResponse};
use super::PROVIDER_NAME;

/// Query parameters of a single API call.
pub type Params = BTreeMap<String, String>;

pub const API_ACTION: &str = "api_action";

pub const API_ROOT: &str = "https://api.linode.com/";

/// Issues one call against the Linode API and returns the `DATA` member of
/// the response envelope.
pub trait Transport: Send + Sync {
    fn request(&self, params: &Params) -> Result<Value>;
}

fn process_errors(errors: Vec<APIError>) -> Result<()> {
    match errors.into_iter().next() {
        Some(err) => ApiSnafu {
            code: err.code,
            message: err.message,
        }
        .fail(),
        None => Ok(()),
    }
}

/// Describes a failed call without echoing the request URL, whose query
/// string carries the API key.
fn describe_failure(err: &ureq::Error) -> String {
    match err {
        ureq::Error::Status(code, _) => format!("status code {code}"),
        ureq::Error::Transport(transport) => match transport.message() {
            Some(message) => format!("{}: {message}", transport.kind()),
            None => transport.kind().to_string(),
        },
    }
}

pub struct HttpTransport {
    api_key: String,
    api_root: url::Url,
}

impl HttpTransport {
    pub fn new(api_key: String, api_root: url::Url) -> Self {
        Self { api_key, api_root }
    }
}

impl Transport for HttpTransport {
    fn request(&self, params: &Params) -> Result<Value> {
        let url = self.api_root.as_str();
        let action = params.get(API_ACTION).map(String::as_str).unwrap_or_default();
        tracing::debug!(
            url = url,
            action = action,
            provider = PROVIDER_NAME,
            "Sending request"
        );

        let req = params.iter().fold(
            ureq::get(url).query("api_key", &self.api_key),
            |req, (key, value)| req.query(key, value),
        );
        let resp: APIResponse = req
            .call()
            .map_err(|err| {
                RequestSnafu {
                    url,
                    action,
                    message: describe_failure(&err),
                }
                .build()
            })?
            .into_json()
            .boxed()
            .context(DecodeSnafu {
                message: "Failed to deserialize response",
            })?;

        process_errors(resp.errors)?;

        Ok(resp.data)
    }
}
