use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// The message never carries the request query, which holds the API key.
    #[snafu(display("{action} {url} failed: {message}"))]
    RequestError {
        url: String,
        action: String,
        message: String,
    },
    #[snafu(display("{message}"))]
    ResponseError { message: String },
    #[snafu(display("{message}: {source}"))]
    DecodeError {
        message: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Failure reported by the provider API, passed through untouched.
    #[snafu(display("API error {code}: {message}"))]
    ApiError { code: u32, message: String },
    #[snafu(display("Zone {zone_id} does not exist"))]
    ZoneNotFound { zone_id: String },
    #[snafu(display("Record {record_id} does not exist"))]
    RecordNotFound { record_id: String },
    #[snafu(display("Mapping failed: {message}"))]
    MappingError { message: String },
    #[snafu(display("Invalid {prefix} configuration: {message}"))]
    ConfigError { message: String, prefix: String },
}

pub type Result<T> = std::result::Result<T, Error>;
