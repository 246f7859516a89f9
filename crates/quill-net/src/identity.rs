//! Requester identity
//!
//! A random `user_` id created on first use and reused afterwards.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::ServiceError;

const SUFFIX_LEN: usize = 9;

/// Locally generated identifier sent with every request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequesterId(String);

impl RequesterId {
    /// File the id is persisted in, inside the state directory
    pub const FILE_NAME: &'static str = "requester_id";

    /// Generate a fresh `user_` + 9 base-36 characters id
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let suffix: String = (0..SUFFIX_LEN)
            .filter_map(|_| char::from_digit(rng.random_range(0..36), 36))
            .collect();
        Self(format!("user_{suffix}"))
    }

    /// Read the id from `dir`, creating and persisting one if absent
    pub fn load_or_create(dir: &Path) -> Result<Self, ServiceError> {
        let path = dir.join(Self::FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(stored) if !stored.trim().is_empty() => return Ok(Self(stored.trim().to_string())),
            Ok(_) => tracing::warn!(path = %path.display(), "requester id file is empty, regenerating"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let id = Self::generate();
        fs::create_dir_all(dir)?;
        fs::write(&path, id.as_str())?;
        tracing::info!(path = %path.display(), "created requester id");
        Ok(id)
    }

    /// Per-user state directory
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|d| d.join("quill"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RequesterId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RequesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_shape() {
        let id = RequesterId::generate();
        let suffix = id.as_str().strip_prefix("user_").unwrap();
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }
}
