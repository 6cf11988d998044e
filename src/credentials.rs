//! Credential loading and verification.
//!
//! This module provides utilities for:
//! - Reading the Basic auth username/password pair from disk at startup
//! - Checking candidate credentials against it in constant time

use std::{fmt, fs, io, path::Path};

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur while loading credentials. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("cannot read credentials file {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("malformed credentials file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("cannot initialise credential MAC: {0}")]
    Key(#[from] hmac::digest::InvalidLength),
}

/// The single configured username/password pair.
///
/// # File Format
///
/// ```json
/// { "Username": "admin", "Password": "secret" }
/// ```
#[derive(Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read credentials from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or cannot be read
    /// - The content is not a JSON object with string `Username` and `Password`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CredentialsError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let raw = fs::read_to_string(path).map_err(|source| CredentialsError::Read {
            path: display.clone(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| CredentialsError::Parse {
            path: display,
            source,
        })
    }
}

/// Read-only credential store consulted by the Basic auth middleware.
///
/// The plain-text pair is not kept. Instead the store holds HMAC-SHA256 tags
/// of the username and password under a key drawn fresh for every process.
/// Candidates are tagged the same way and compared with `verify_slice`, so
/// the comparison is constant-time and always covers a fixed 32 bytes no
/// matter how long the candidate strings are.
#[derive(Clone)]
pub struct CredentialStore {
    key: [u8; 32],
    username_tag: Vec<u8>,
    password_tag: Vec<u8>,
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

impl CredentialStore {
    pub fn new(credentials: Credentials) -> Result<Self, CredentialsError> {
        let key: [u8; 32] = rand::random();

        let username_tag = tag(&key, &credentials.username)?;
        let password_tag = tag(&key, &credentials.password)?;

        Ok(Self {
            key,
            username_tag,
            password_tag,
        })
    }

    /// Check a candidate username/password pair.
    ///
    /// Both fields are always checked, even when the username already failed.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let username_ok = self.matches(&self.username_tag, username);
        let password_ok = self.matches(&self.password_tag, password);

        username_ok & password_ok
    }

    fn matches(&self, expected: &[u8], candidate: &str) -> bool {
        let Ok(mut mac) = HmacSha256::new_from_slice(&self.key) else {
            return false;
        };
        mac.update(candidate.as_bytes());
        mac.verify_slice(expected).is_ok()
    }
}

fn tag(key: &[u8], value: &str) -> Result<Vec<u8>, CredentialsError> {
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(value.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn store(username: &str, password: &str) -> CredentialStore {
        CredentialStore::new(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn accepts_exact_match_only() {
        let store = store("admin", "secret");

        assert!(store.verify("admin", "secret"));
        assert!(!store.verify("admin", "Secret"));
        assert!(!store.verify("ADMIN", "secret"));
        assert!(!store.verify("secret", "admin"));
        assert!(!store.verify("admin", ""));
        assert!(!store.verify("", ""));
        assert!(!store.verify("admin", "secre"));
        assert!(!store.verify("admin", "secrets"));
        assert!(!store.verify("admi", "secret"));
    }

    #[test]
    fn empty_configured_password_matches_only_empty() {
        let store = store("admin", "");

        assert!(store.verify("admin", ""));
        assert!(!store.verify("admin", " "));
    }

    #[test]
    fn debug_output_hides_password() {
        let credentials = Credentials {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };

        assert!(!format!("{credentials:?}").contains("hunter2"));
    }

    #[test]
    fn load_reads_pascal_case_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Username": "admin", "Password": "secret"}}"#).unwrap();

        let credentials = Credentials::load(file.path()).unwrap();

        assert_eq!(credentials.username, "admin");
        assert_eq!(credentials.password, "secret");
    }

    #[test]
    fn load_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = Credentials::load(dir.path().join("creds.json")).unwrap_err();

        assert!(matches!(err, CredentialsError::Read { .. }));
    }

    #[test]
    fn load_fails_on_malformed_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Username": "admin"}}"#).unwrap();

        let err = Credentials::load(file.path()).unwrap_err();

        assert!(matches!(err, CredentialsError::Parse { .. }));
    }
}
