use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::model::Config;
use crate::config::template;
use crate::error::ConfigError;

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let file = File::open(path).map_err(ConfigError::Read)?;
    load_config_from(file)
}

/// Renders, parses and validates a configuration read from `input`.
pub fn load_config_from<R: Read>(mut input: R) -> Result<Config, ConfigError> {
    let mut contents = String::new();
    input
        .read_to_string(&mut contents)
        .map_err(ConfigError::Read)?;
    let rendered = template::render(&contents)?;
    let mut cfg: Config = if rendered.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(&rendered).map_err(|e| ConfigError::Parse(e.to_string()))?
    };
    if cfg.hostname.is_empty() {
        cfg.hostname = system_hostname();
    }
    validate(&cfg)?;
    Ok(cfg)
}

fn system_hostname() -> String {
    sysinfo::System::host_name().unwrap_or_default()
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.root_path.is_empty() {
        return Err(ConfigError::Required("root"));
    }
    if cfg.destination.is_empty() {
        return Err(ConfigError::Required("dest"));
    }
    if cfg.log_directory.is_empty() {
        return Err(ConfigError::Required("logdir"));
    }
    if !cfg.include_exclude_file.is_empty() && !Path::new(&cfg.include_exclude_file).exists() {
        return Err(ConfigError::MissingFile {
            key: "incexcfile",
            path: cfg.include_exclude_file.clone(),
        });
    }

    let enc = &cfg.encryption;
    if enc.enable && !enc.gpg_sign_key.is_empty() && enc.passphrase.is_empty() {
        return Err(ConfigError::Invalid(
            "With gpg_sign_key passphrase is required".to_string(),
        ));
    }
    if enc.enable && enc.gpg_encryption_key.is_empty() && enc.passphrase.is_empty() {
        return Err(ConfigError::Invalid(
            "Encryption is enabled but no encryption key or passphrase is specified".to_string(),
        ));
    }

    // Loose two-character scheme match: "s3+http://", "s3://" and friends.
    if cfg.destination.starts_with("s3")
        && (cfg.aws.access_key_id.is_empty() || cfg.aws.secret_access_key.is_empty())
    {
        return Err(ConfigError::Invalid(
            "Destination is S3 but AWS credentials are not configured".to_string(),
        ));
    }
    if cfg.destination.starts_with("gs")
        && (cfg.google_cloud.access_key_id.is_empty()
            || cfg.google_cloud.secret_access_key.is_empty())
    {
        return Err(ConfigError::Invalid(
            "Destination is GS but Google Cloud credentials are not configured".to_string(),
        ));
    }

    Ok(())
}
