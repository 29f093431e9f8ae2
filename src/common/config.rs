use super::{ConfigSnafu, Result};

/// If the value begins with an '@', read the following file path,
/// otherwise returns the value.
///
/// prefix is used to provide context in case of an error.
pub(crate) fn key_file_or_string(value: String, prefix: &str) -> Result<String> {
    Ok(match value.strip_prefix('@') {
        Some(key_file) => std::fs::read_to_string(key_file)
            .map_err(|err| {
                ConfigSnafu {
                    message: format!("Failed to read key from {key_file}: {err}"),
                    prefix,
                }
                .build()
            })?
            .trim()
            .into(),
        None => value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_value_is_returned() {
        assert_eq!(
            key_file_or_string("secret".into(), "linode").unwrap(),
            "secret"
        );
    }

    #[test]
    fn key_is_read_from_file() {
        let path = std::env::temp_dir().join("linode-dns-key-file-test");
        std::fs::write(&path, "from-file\n").unwrap();

        let value = key_file_or_string(format!("@{}", path.display()), "linode").unwrap();
        assert_eq!(value, "from-file");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = key_file_or_string("@/nonexistent/linode-key".into(), "linode").unwrap_err();
        assert!(matches!(err, crate::common::Error::ConfigError { .. }));
    }
}
