use crate::common::{ConfigSnafu, Result};
use crate::linode::LinodeDriver;

pub const ENV_PREFIX: &str = "LINODE_DNS";

#[derive(Clone, serde::Deserialize)]
pub struct Config {
    pub linode: Option<crate::linode::Config>,
}

impl Config {
    /// Reads the configuration from `LINODE_DNS_*` environment variables,
    /// e.g. `LINODE_DNS_LINODE__API_KEY`.
    #[cfg(feature = "cli")]
    pub fn from_env() -> Result<Self> {
        ::config::Config::builder()
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|err| {
                ConfigSnafu {
                    message: err.to_string(),
                    prefix: ENV_PREFIX,
                }
                .build()
            })
    }

    pub fn into_driver(self) -> Result<LinodeDriver> {
        match self.linode {
            Some(cfg) => LinodeDriver::try_from(cfg),
            None => ConfigSnafu {
                message: "no provider configured",
                prefix: "linode",
            }
            .fail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "cli")]
    #[test]
    fn reads_linode_section_from_prefixed_env() {
        std::env::set_var("LINODE_DNS_LINODE__API_KEY", "from-env");
        let config = Config::from_env().unwrap();
        std::env::remove_var("LINODE_DNS_LINODE__API_KEY");

        let linode = config.linode.expect("linode section should be present");
        assert_eq!(linode.api_key, "from-env");
        assert_eq!(linode.api_root.as_str(), crate::linode::API_ROOT);
    }

    #[test]
    fn missing_provider_is_a_config_error() {
        let config = Config { linode: None };
        assert!(matches!(
            config.into_driver(),
            Err(crate::common::Error::ConfigError { .. })
        ));
    }
}
