// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Access-state persistence: versioned JSON envelope with atomic writes.
//!
//! Loading is infallible by design: a missing file yields compiled-in
//! defaults, a corrupt or foreign file is logged and discarded, and an
//! older schema version goes through [`migrate`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::access::AccessState;

/// Store identity carried in every persisted envelope.
pub const STORE_NAME: &str = "access-control";
/// Current schema version. Bump when a field's meaning changes.
pub const STORE_VERSION: f64 = 1.1;
/// File name under the state directory.
pub const STORE_FILE: &str = "access.json";

/// Persisted wrapper: identity, schema version, and the state snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub name: String,
    pub version: f64,
    pub state: serde_json::Value,
}

/// Resolve the store file under a state directory.
pub fn store_path(dir: &Path) -> PathBuf {
    dir.join(STORE_FILE)
}

/// Load persisted access state, migrating older snapshots.
pub fn load(path: &Path) -> AccessState {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return AccessState::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), err = %e, "failed to read access state");
            return AccessState::default();
        }
    };

    let envelope: Envelope = match serde_json::from_str(&contents) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(path = %path.display(), err = %e, "corrupt access state, using defaults");
            return AccessState::default();
        }
    };
    if envelope.name != STORE_NAME {
        tracing::warn!(path = %path.display(), name = %envelope.name, "foreign store file, using defaults");
        return AccessState::default();
    }

    migrate(envelope.state, envelope.version)
}

/// Migrate a persisted snapshot from `version` to the current schema.
///
/// Pure data in, data out:
/// - `< 1.1`: `openai_url` is cleared so the build-mode default is
///   recomputed on next read.
/// - Fields absent from the snapshot fill from [`AccessState::default`].
///
/// Gate fields (`need_code`, `access_code`) pass through untouched, so a
/// migration can never grant or revoke access by itself.
pub fn migrate(mut raw: serde_json::Value, version: f64) -> AccessState {
    if version < 1.1 {
        if let Some(obj) = raw.as_object_mut() {
            obj.insert("openai_url".to_owned(), serde_json::Value::String(String::new()));
        }
    }

    match serde_json::from_value(raw) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(version, err = %e, "unreadable access snapshot, using defaults");
            AccessState::default()
        }
    }
}

/// Save access state atomically (write tmp + rename).
///
/// Uses a unique temp filename (PID + counter) so concurrent saves never
/// race on the same `.tmp` file.
pub fn save(path: &Path, state: &AccessState) -> anyhow::Result<()> {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let envelope = Envelope {
        name: STORE_NAME.to_owned(),
        version: STORE_VERSION,
        state: serde_json::to_value(state)?,
    };
    let json = serde_json::to_string_pretty(&envelope)?;
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(
        "{}.{}.{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy(),
        std::process::id(),
        seq,
    );
    let tmp_path = path.with_file_name(tmp_name);
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "persist_tests.rs"]
mod tests;
