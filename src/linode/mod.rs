mod config;
mod context;
mod driver;
mod models;
mod transport;

pub use config::*;
pub use context::*;
pub use driver::*;
pub use models::{
    record_type_from_linode, record_type_to_linode, RecordExtra, ZoneExtra, LINODE_TYPE_AAAA,
    RECORD_TYPE_MAP,
};
pub use transport::*;

pub const PROVIDER_NAME: &str = "Linode";
