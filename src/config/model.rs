use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "root")]
    pub root_path: String,
    pub hostname: String,
    #[serde(rename = "dest")]
    pub destination: String,
    pub ftp_password: String,
    pub aws: AwsConfig,
    pub google_cloud: GoogleCloudConfig,
    pub swift: SwiftConfig,
    #[serde(rename = "inclist")]
    pub include: Vec<String>,
    #[serde(rename = "exclist")]
    pub exclude: Vec<String>,
    #[serde(rename = "incexcfile")]
    pub include_exclude_file: String,
    #[serde(rename = "excdevicefiles")]
    pub exclude_device_files: bool,
    pub encryption: EncryptionConfig,
    pub static_options: Vec<String>,
    pub cleanup: CleanupConfig,
    #[serde(rename = "logdir")]
    pub log_directory: String,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AwsConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Passed to duplicity verbatim, e.g. `--s3-use-ia`.
    pub storage_class: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GoogleCloudConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SwiftConfig {
    pub username: String,
    pub password: String,
    pub auth_url: String,
    pub auth_version: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct EncryptionConfig {
    pub enable: bool,
    pub passphrase: String,
    pub gpg_encryption_key: String,
    pub gpg_sign_key: String,
    pub hide_key_id: bool,
    pub secret_keyring: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CleanupConfig {
    #[serde(rename = "type", deserialize_with = "scalar_string")]
    pub kind: String,
    #[serde(deserialize_with = "scalar_string")]
    pub value: String,
}

impl CleanupConfig {
    /// Removal runs only for a named strategy other than `none`.
    pub fn is_enabled(&self) -> bool {
        !self.kind.is_empty() && self.kind != "none"
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct NotificationConfig {
    pub slack: SlackConfig,
    pub mondash: MonDashConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SlackConfig {
    pub hook_url: String,
    pub channel: String,
    pub username: String,
    pub emoji: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MonDashConfig {
    #[serde(rename = "board")]
    pub board_url: String,
    pub token: String,
    pub freshness: i64,
}

// Accepts `value: 2` as well as `value: "2"`.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    match value {
        serde_yaml::Value::Null => Ok(String::new()),
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar value, got {:?}",
            other
        ))),
    }
}
