//! # Credential Store
//!
//! Users live in a single JSON object mapping username to an Argon2id PHC
//! string (`$argon2id$v=19$...`), which embeds its own salt and cost.
//!
//! The file is rewritten as a whole on every registration. [`CredentialStore`]
//! serializes registrations with a [`ProcessLock`] on a sibling `.lock` file
//! and re-reads the file inside it, so two sign-ups cannot overwrite each
//! other, whether they run in one process or in two.
//!
//! Verification of an unknown username still runs a full hash check against
//! a dummy hash, so the response time does not reveal whether the user exists.

use crate::error::{QuireError, Result};
use crate::lock::ProcessLock;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const MAX_USERNAME_LEN: usize = 25;
pub const MIN_PASSWORD_LEN: usize = 3;
pub const MAX_PASSWORD_LEN: usize = 25;

/// A password must contain at least one of these.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()-_=+[]{};:'\",.<>/?\\|`~";

pub type Users = BTreeMap<String, String>;

static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("quire-timing-equalizer!").ok());

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| QuireError::Hash(format!("Failed to hash password: {e}")))
}

fn check_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| QuireError::CorruptStore(format!("Invalid password hash format: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Check sign-up input. Returns the first problem found.
pub fn validate_registration(username: &str, password: &str) -> Result<()> {
    let invalid = |msg: &str| Err(QuireError::InvalidCredentials(msg.to_string()));

    if username.is_empty() {
        return invalid("A username is required.");
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return invalid("Usernames can be at most 25 characters.");
    }
    if username.chars().any(char::is_whitespace) {
        return invalid("Usernames cannot contain spaces.");
    }

    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return invalid("Passwords must be between 3 and 25 characters.");
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return invalid("Passwords must contain at least one special character.");
    }

    Ok(())
}

pub struct CredentialStore {
    path: PathBuf,
    lock: ProcessLock,
}

impl CredentialStore {
    /// Open the store at `path`, failing with `CorruptStore` if the file
    /// exists but cannot be parsed. A missing file is an empty store.
    pub fn open(path: PathBuf) -> Result<Self> {
        let store = Self::at(path);
        let users = store.load()?;
        tracing::debug!(path = %store.path.display(), users = users.len(), "loaded credentials");
        Ok(store)
    }

    fn at(path: PathBuf) -> Self {
        let mut lock_name = path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "users".into());
        lock_name.push(".lock");
        let lock = ProcessLock::new(path.with_file_name(lock_name));
        Self { path, lock }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Users> {
        if !self.path.exists() {
            return Ok(Users::new());
        }
        let content = fs::read_to_string(&self.path).map_err(QuireError::Io)?;
        if content.trim().is_empty() {
            return Ok(Users::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            QuireError::CorruptStore(format!("{}: {}", self.path.display(), e))
        })
    }

    pub fn verify(&self, username: &str, password: &str) -> Result<bool> {
        let users = self.load()?;
        match users.get(username) {
            Some(stored_hash) => check_password(password, stored_hash),
            None => {
                if let Some(dummy) = DUMMY_HASH.as_deref() {
                    let _ = check_password(password, dummy);
                }
                Ok(false)
            }
        }
    }

    pub fn register(&self, username: &str, password: &str) -> Result<()> {
        validate_registration(username, password)?;
        let password_hash = hash_password(password)?;

        self.lock.with(|| {
            let mut users = self.load()?;
            if users.contains_key(username) {
                return Err(QuireError::InvalidCredentials(format!(
                    "{} is already taken.",
                    username
                )));
            }
            users.insert(username.to_string(), password_hash);
            self.persist(&users)
        })?;

        tracing::info!(username, "registered user");
        Ok(())
    }

    fn persist(&self, users: &Users) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(QuireError::Io)?;
        }

        let content = serde_json::to_string_pretty(users).map_err(QuireError::Serialization)?;

        // Atomic write
        let tmp_file = dir.join(format!(".users-{}.tmp", Uuid::new_v4()));
        let written = fs::write(&tmp_file, content)
            .and_then(|_| fs::rename(&tmp_file, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_file);
            return Err(QuireError::Io(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::open(dir.path().join("users.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn registered_user_can_be_verified() {
        let (_dir, store) = store();
        store.register("admin", "secret!1").unwrap();

        assert!(store.verify("admin", "secret!1").unwrap());
        assert!(!store.verify("admin", "secret!2").unwrap());
        assert!(!store.verify("nobody", "secret!1").unwrap());
    }

    #[test]
    fn stored_value_is_a_hash() {
        let (_dir, store) = store();
        store.register("admin", "secret!1").unwrap();

        let users = store.load().unwrap();
        let hash = users.get("admin").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("secret!1"));
    }

    #[test]
    fn rejects_invalid_registrations() {
        let (_dir, store) = store();
        let long_username = "u".repeat(26);
        let long_password = format!("{}!", "a".repeat(25));
        let cases: [(&str, &str); 6] = [
            ("", "secret!1"),
            (long_username.as_str(), "secret!1"),
            ("two words", "secret!1"),
            ("admin", "a!"),
            ("admin", long_password.as_str()),
            ("admin", "secret1"),
        ];
        for (username, password) in cases {
            assert!(
                matches!(
                    store.register(username, password),
                    Err(QuireError::InvalidCredentials(_))
                ),
                "{username:?}/{password:?} should be rejected"
            );
        }
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn boundary_lengths_are_accepted() {
        let (_dir, store) = store();
        store.register("a", "ab!").unwrap();
        store
            .register(&"u".repeat(25), &format!("{}#", "p".repeat(24)))
            .unwrap();
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn usernames_are_unique() {
        let (_dir, store) = store();
        store.register("admin", "secret!1").unwrap();
        assert!(matches!(
            store.register("admin", "other!2"),
            Err(QuireError::InvalidCredentials(_))
        ));
        assert!(store.verify("admin", "secret!1").unwrap());
    }

    #[test]
    fn registration_takes_a_lock_file_beside_the_store() {
        let (dir, store) = store();
        store.register("admin", "secret!1").unwrap();

        assert!(dir.path().join("users.json.lock").is_file());
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn failed_rewrite_leaves_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        fs::create_dir(&path).unwrap();
        let store = CredentialStore::at(path);

        let mut users = Users::new();
        users.insert("admin".into(), "hash".into());
        assert!(matches!(store.persist(&users), Err(QuireError::Io(_))));

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn unparsable_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        fs::write(&path, "admin: [not json").unwrap();

        assert!(matches!(
            CredentialStore::open(path),
            Err(QuireError::CorruptStore(_))
        ));
    }

    #[test]
    fn bad_hash_is_corrupt_not_a_failed_login() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        fs::write(&path, r#"{ "admin": "plaintext" }"#).unwrap();

        let store = CredentialStore::open(path).unwrap();
        assert!(matches!(
            store.verify("admin", "plaintext"),
            Err(QuireError::CorruptStore(_))
        ));
    }
}
