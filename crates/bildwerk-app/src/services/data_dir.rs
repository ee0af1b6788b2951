// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data directory and config file resolution.

use std::path::{Path, PathBuf};

use bildwerk_core::BildwerkConfig;
use bildwerk_core::error::Result;
use tracing::{debug, info};

const CONFIG_FILE: &str = "config.json";

/// Per-user application directory: `$XDG_DATA_HOME/bildwerk`, else
/// `~/.local/share/bildwerk`. Not created here.
pub fn data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        std::env::temp_dir()
    };
    base.join("bildwerk")
}

/// Default location of the persisted config.
pub fn default_config_path() -> PathBuf {
    data_dir().join(CONFIG_FILE)
}

/// Load config from `explicit`, else from the data directory if a file is
/// there, else fall back to defaults.
///
/// An explicitly named file must exist and parse.
pub fn load_config(explicit: Option<&Path>) -> Result<BildwerkConfig> {
    if let Some(path) = explicit {
        info!(path = %path.display(), "Loading config");
        return BildwerkConfig::load(path);
    }

    let path = default_config_path();
    if path.exists() {
        info!(path = %path.display(), "Loading config");
        BildwerkConfig::load(&path)
    } else {
        debug!(path = %path.display(), "No config file; using defaults");
        Ok(BildwerkConfig::default())
    }
}

/// Create `dir` (and parents) if needed.
pub fn ensure_dir(dir: &Path) -> Result<&Path> {
    std::fs::create_dir_all(dir)?;
    Ok(dir)
}
