//! Argument and environment fragments shared by every duplicity recipe.

use crate::config::Config;

pub(crate) const RESTORE_OPTION: &str = "restore";

/// Arguments and environment contributed by one fragment builder.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub args: Vec<String>,
    pub env: Vec<String>,
}

impl Fragment {
    pub fn extend(&mut self, other: Fragment) {
        self.args.extend(other.args);
        self.env.extend(other.env);
    }
}

/// Encryption flags for `operation`.
///
/// The passphrase only ever travels through the environment so it never
/// shows up in the process list.
pub fn encryption(cfg: &Config, operation: &str) -> Fragment {
    let enc = &cfg.encryption;
    let mut out = Fragment::default();

    if !enc.enable {
        out.args.push("--no-encryption".to_string());
        return out;
    }

    if !enc.passphrase.is_empty() {
        out.env.push(format!("PASSPHRASE={}", enc.passphrase));
    }

    if !enc.gpg_encryption_key.is_empty() {
        if enc.hide_key_id {
            out.args
                .push(format!("--hidden-encrypt-key={}", enc.gpg_encryption_key));
        } else {
            out.args.push(format!("--encrypt-key={}", enc.gpg_encryption_key));
        }
    }

    // duplicity does not sign on restore
    if !enc.gpg_sign_key.is_empty() && operation != RESTORE_OPTION {
        out.args.push(format!("--sign-key={}", enc.gpg_sign_key));
    }

    if !enc.gpg_encryption_key.is_empty() && !enc.secret_keyring.is_empty() {
        out.args
            .push(format!("--encrypt-secret-keyring={}", enc.secret_keyring));
    }

    out
}

/// Include/exclude selection. The order (excludes, includes, file list,
/// catch-all exclude) decides how duplicity resolves overlapping patterns.
pub fn include_exclude(cfg: &Config) -> Fragment {
    let mut out = Fragment::default();

    if cfg.exclude_device_files {
        out.args.push("--exclude-device-files".to_string());
    }

    out.args
        .extend(cfg.exclude.iter().map(|exc| format!("--exclude={}", exc)));
    out.args
        .extend(cfg.include.iter().map(|inc| format!("--include={}", inc)));

    if !cfg.include_exclude_file.is_empty() {
        out.args.push("--include-globbing-filelist".to_string());
        out.args.push(cfg.include_exclude_file.clone());
    }

    if !cfg.include.is_empty() || !cfg.include_exclude_file.is_empty() {
        out.args.push("--exclude=**".to_string());
    }

    out
}

/// Backend credentials: AWS, Google Cloud, Swift, then FTP.
pub fn credentials(cfg: &Config) -> Vec<String> {
    let mut env = Vec::new();

    if !cfg.aws.access_key_id.is_empty() {
        env.push(format!("AWS_ACCESS_KEY_ID={}", cfg.aws.access_key_id));
        env.push(format!("AWS_SECRET_ACCESS_KEY={}", cfg.aws.secret_access_key));
    }
    if !cfg.google_cloud.access_key_id.is_empty() {
        env.push(format!("GS_ACCESS_KEY_ID={}", cfg.google_cloud.access_key_id));
        env.push(format!(
            "GS_SECRET_ACCESS_KEY={}",
            cfg.google_cloud.secret_access_key
        ));
    }
    if !cfg.swift.username.is_empty() {
        env.push(format!("SWIFT_USERNAME={}", cfg.swift.username));
        env.push(format!("SWIFT_PASSWORD={}", cfg.swift.password));
        env.push(format!("SWIFT_AUTHURL={}", cfg.swift.auth_url));
        env.push(format!("SWIFT_AUTHVERSION={}", cfg.swift.auth_version));
    }
    if !cfg.ftp_password.is_empty() {
        env.push(format!("FTP_PASSWORD={}", cfg.ftp_password));
    }

    env
}

/// Drops the empty placeholders left by optional fragments.
pub fn clean(items: Vec<String>) -> Vec<String> {
    items.into_iter().filter(|i| !i.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cfg() -> Config {
        let mut cfg = Config::default();
        cfg.root_path = "/".to_string();
        cfg.destination = "file:///backup".to_string();
        cfg.log_directory = "/tmp".to_string();
        cfg
    }

    #[test]
    fn disabled_encryption_is_a_single_flag() {
        let mut cfg = cfg();
        cfg.encryption.passphrase = "ignored".to_string();
        cfg.encryption.gpg_encryption_key = "ABCD".to_string();
        let frag = encryption(&cfg, "full");
        assert_eq!(frag.args, vec!["--no-encryption"]);
        assert!(frag.env.is_empty());
    }

    #[test]
    fn passphrase_goes_to_env_only() {
        let mut cfg = cfg();
        cfg.encryption.enable = true;
        cfg.encryption.passphrase = "secret".to_string();
        let frag = encryption(&cfg, "full");
        assert!(frag.args.is_empty());
        assert_eq!(frag.env, vec!["PASSPHRASE=secret"]);
    }

    #[test]
    fn encrypt_key_flag_depends_on_hide_key_id() {
        let mut cfg = cfg();
        cfg.encryption.enable = true;
        cfg.encryption.gpg_encryption_key = "ABCD".to_string();
        assert_eq!(encryption(&cfg, "full").args, vec!["--encrypt-key=ABCD"]);
        cfg.encryption.hide_key_id = true;
        assert_eq!(
            encryption(&cfg, "full").args,
            vec!["--hidden-encrypt-key=ABCD"]
        );
    }

    #[test]
    fn sign_key_skipped_on_restore() {
        let mut cfg = cfg();
        cfg.encryption.enable = true;
        cfg.encryption.passphrase = "secret".to_string();
        cfg.encryption.gpg_encryption_key = "ABCD".to_string();
        cfg.encryption.gpg_sign_key = "EF01".to_string();
        assert_eq!(
            encryption(&cfg, "full").args,
            vec!["--encrypt-key=ABCD", "--sign-key=EF01"]
        );
        assert_eq!(encryption(&cfg, "restore").args, vec!["--encrypt-key=ABCD"]);
    }

    #[test]
    fn secret_keyring_needs_encryption_key() {
        let mut cfg = cfg();
        cfg.encryption.enable = true;
        cfg.encryption.passphrase = "secret".to_string();
        cfg.encryption.secret_keyring = "/root/.gnupg/secring.gpg".to_string();
        assert!(encryption(&cfg, "full").args.is_empty());

        cfg.encryption.gpg_encryption_key = "ABCD".to_string();
        assert_eq!(
            encryption(&cfg, "full").args,
            vec![
                "--encrypt-key=ABCD",
                "--encrypt-secret-keyring=/root/.gnupg/secring.gpg"
            ]
        );
    }

    #[test]
    fn include_exclude_ordering() {
        let mut cfg = cfg();
        cfg.exclude_device_files = true;
        cfg.exclude = vec!["/data/tmp".to_string(), "**/.cache".to_string()];
        cfg.include = vec!["/data".to_string(), "/etc".to_string()];
        cfg.include_exclude_file = "/etc/duplicity/filelist".to_string();
        assert_eq!(
            include_exclude(&cfg).args,
            vec![
                "--exclude-device-files",
                "--exclude=/data/tmp",
                "--exclude=**/.cache",
                "--include=/data",
                "--include=/etc",
                "--include-globbing-filelist",
                "/etc/duplicity/filelist",
                "--exclude=**",
            ]
        );
    }

    #[test]
    fn excludes_alone_have_no_catch_all() {
        let mut cfg = cfg();
        cfg.exclude = vec!["/proc".to_string()];
        assert_eq!(include_exclude(&cfg).args, vec!["--exclude=/proc"]);
    }

    #[test]
    fn file_list_alone_adds_catch_all() {
        let mut cfg = cfg();
        cfg.include_exclude_file = "/etc/duplicity/filelist".to_string();
        let args = include_exclude(&cfg).args;
        assert_eq!(args.last().map(String::as_str), Some("--exclude=**"));
    }

    #[test]
    fn credential_order() {
        let mut cfg = cfg();
        cfg.ftp_password = "ftp".to_string();
        cfg.swift.username = "swuser".to_string();
        cfg.swift.password = "swpass".to_string();
        cfg.swift.auth_url = "https://auth.example.com/v3".to_string();
        cfg.swift.auth_version = 3;
        cfg.google_cloud.access_key_id = "GOOG".to_string();
        cfg.google_cloud.secret_access_key = "gsecret".to_string();
        cfg.aws.access_key_id = "AKIA".to_string();
        cfg.aws.secret_access_key = "asecret".to_string();
        assert_eq!(
            credentials(&cfg),
            vec![
                "AWS_ACCESS_KEY_ID=AKIA",
                "AWS_SECRET_ACCESS_KEY=asecret",
                "GS_ACCESS_KEY_ID=GOOG",
                "GS_SECRET_ACCESS_KEY=gsecret",
                "SWIFT_USERNAME=swuser",
                "SWIFT_PASSWORD=swpass",
                "SWIFT_AUTHURL=https://auth.example.com/v3",
                "SWIFT_AUTHVERSION=3",
                "FTP_PASSWORD=ftp",
            ]
        );
    }

    #[test]
    fn clean_is_idempotent() {
        let items = vec![
            "full".to_string(),
            String::new(),
            "--no-encryption".to_string(),
            String::new(),
        ];
        let once = clean(items);
        assert_eq!(once, vec!["full", "--no-encryption"]);
        assert_eq!(clean(once.clone()), once);
    }
}
