use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::api::LoginResponse;
use crate::platform::common::{atomic_write_private, remove_if_exists};

/// Current identity file version
const IDENTITY_VERSION: &str = "1.0";

/// File name inside the data directory
const IDENTITY_FILE: &str = "identity.json";

/// Role claim returned by the backend at login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the session lifecycle currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(Option<Role>),
}

/// The client's local belief about who is logged in
///
/// Written whole at login and removed whole at logout; nothing edits
/// individual fields in between.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IdentitySnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl IdentitySnapshot {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Snapshot for a successful login response
    pub fn from_login(response: &LoginResponse) -> Self {
        Self {
            token: Some(response.token.clone()),
            role: Some(response.user.role),
            student_id: response.user.student_id.clone(),
            display_name: Some(response.user.name.clone()),
            logged_in_at: Some(Utc::now()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub fn session_state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::Authenticated(self.role)
        } else {
            SessionState::Anonymous
        }
    }

    /// Short hash of the token, safe to print
    pub fn fingerprint(&self) -> Option<String> {
        let token = self.token.as_deref()?;
        let digest = Sha256::digest(token.as_bytes());
        Some(digest[..6].iter().map(|b| format!("{:02x}", b)).collect())
    }
}

/// On-disk envelope for the snapshot
#[derive(Debug, Deserialize, Serialize)]
struct IdentityFile {
    version: String,
    #[serde(flatten)]
    identity: IdentitySnapshot,
}

/// Persists the identity snapshot across runs
///
/// `login` and `logout` are the only operations that change what is stored.
#[derive(Debug, Clone)]
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(IDENTITY_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot; a missing, outdated or corrupt file means anonymous
    pub fn load(&self) -> Result<IdentitySnapshot> {
        if !self.path.exists() {
            return Ok(IdentitySnapshot::anonymous());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read identity file: {}", self.path.display()))?;

        let file: IdentityFile = match serde_json::from_str(&content) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(
                    "Unreadable identity file {} ({}). Treating as logged out.",
                    self.path.display(),
                    e
                );
                return Ok(IdentitySnapshot::anonymous());
            }
        };

        if file.version != IDENTITY_VERSION {
            tracing::warn!(
                "Identity file version mismatch (expected {}, got {}). Treating as logged out.",
                IDENTITY_VERSION,
                file.version
            );
            return Ok(IdentitySnapshot::anonymous());
        }

        Ok(file.identity)
    }

    /// Replace the stored snapshot with the one from a login response
    pub fn login(&self, response: &LoginResponse) -> Result<IdentitySnapshot> {
        let identity = IdentitySnapshot::from_login(response);

        let file = IdentityFile {
            version: IDENTITY_VERSION.to_string(),
            identity: identity.clone(),
        };
        let content = serde_json::to_string_pretty(&file)
            .context("Failed to serialize identity")?;

        atomic_write_private(&self.path, content.as_bytes())
            .with_context(|| format!("Failed to write identity file: {}", self.path.display()))?;

        tracing::debug!("Identity saved to {}", self.path.display());
        Ok(identity)
    }

    /// Forget everything about the current session
    ///
    /// Returns whether a session was stored.
    pub fn logout(&self) -> Result<bool> {
        let removed = remove_if_exists(&self.path)?;
        tracing::debug!("Identity cleared ({})", self.path.display());
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LoginUser;
    use tempfile::tempdir;

    fn admin_login() -> LoginResponse {
        LoginResponse {
            token: "tok-123".to_string(),
            user: LoginUser {
                student_id: None,
                name: "Ada".to_string(),
                role: Role::Admin,
            },
        }
    }

    #[test]
    fn missing_file_loads_as_anonymous() {
        let dir = tempdir().unwrap();
        let store = IdentityStore::new(dir.path());

        let identity = store.load().unwrap();
        assert_eq!(identity, IdentitySnapshot::anonymous());
        assert_eq!(identity.session_state(), SessionState::Anonymous);
    }

    #[test]
    fn login_then_load_restores_snapshot() {
        let dir = tempdir().unwrap();
        let store = IdentityStore::new(dir.path());

        let saved = store.login(&admin_login()).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(saved, loaded);
        assert_eq!(loaded.token.as_deref(), Some("tok-123"));
        assert_eq!(loaded.display_name.as_deref(), Some("Ada"));
        assert_eq!(loaded.session_state(), SessionState::Authenticated(Some(Role::Admin)));
        assert!(loaded.is_admin());
    }

    #[test]
    fn logout_clears_everything() {
        let dir = tempdir().unwrap();
        let store = IdentityStore::new(dir.path());

        store.login(&admin_login()).unwrap();
        assert!(store.logout().unwrap());

        assert_eq!(store.load().unwrap(), IdentitySnapshot::anonymous());
        assert!(!store.path().exists());
        assert!(!store.logout().unwrap());
    }

    #[test]
    fn version_mismatch_is_treated_as_anonymous() {
        let dir = tempdir().unwrap();
        let store = IdentityStore::new(dir.path());
        std::fs::write(store.path(), r#"{"version":"0.1","token":"old"}"#).unwrap();

        assert_eq!(store.load().unwrap(), IdentitySnapshot::anonymous());
    }

    #[test]
    fn corrupt_file_is_treated_as_anonymous() {
        let dir = tempdir().unwrap();
        let store = IdentityStore::new(dir.path());

        std::fs::write(store.path(), "garbage").unwrap();
        assert_eq!(store.load().unwrap(), IdentitySnapshot::anonymous());

        std::fs::write(store.path(), r#"{"version":"1.0","token":"t","role":"STUDENT"}"#).unwrap();
        assert_eq!(store.load().unwrap(), IdentitySnapshot::anonymous());

        assert!(store.logout().unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn role_uses_lowercase_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"student\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn empty_token_is_not_authenticated() {
        let identity = IdentitySnapshot {
            token: Some(String::new()),
            ..Default::default()
        };
        assert!(!identity.is_authenticated());
    }

    #[test]
    fn fingerprint_hides_token() {
        let identity = IdentitySnapshot::from_login(&admin_login());
        let print = identity.fingerprint().unwrap();

        assert_eq!(print.len(), 12);
        assert!(!print.contains("tok-123"));
        assert!(IdentitySnapshot::anonymous().fingerprint().is_none());
    }
}
