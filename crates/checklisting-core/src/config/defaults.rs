//! Default configuration values

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "checklisting.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "checklisting.toml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".checklisting.yaml";

/// Address `checklisting serve` binds to
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1";

/// Port `checklisting serve` listens on
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Get list of config file names to search for, in preference order
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_YAML,
        "checklisting.yml",
        DEFAULT_CONFIG_TOML,
        ALT_CONFIG_FILE,
        ".checklisting.toml",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_preferred_first() {
        assert_eq!(config_file_names()[0], DEFAULT_CONFIG_YAML);
    }
}
