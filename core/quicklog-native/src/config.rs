//! Engine load configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Library file names tried under the root, in order.
const LIBRARY_CANDIDATES: [(&str, &str); 4] = [
    ("x64", "QuickLogger.dll"),
    ("x86", "QuickLogger.dll"),
    ("x64", "libquicklogger.so"),
    ("x86", "libquicklogger.so"),
];

/// Where to find the engine, and whether to forward panics to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding the `x64/` and `x86/` library folders. Defaults to
    /// the directory of the running executable.
    pub root_path: Option<PathBuf>,
    /// Install the process-wide panic hook on first load.
    pub handle_exceptions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            handle_exceptions: true,
        }
    }
}

impl EngineConfig {
    /// Config rooted at `root`, with panic forwarding on.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root_path: Some(root.into()),
            ..Self::default()
        }
    }

    /// The effective root directory.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        if let Some(root) = &self.root_path {
            return root.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Every candidate library path, in the order they are tried.
    #[must_use]
    pub fn library_candidates(&self) -> Vec<PathBuf> {
        let root = self.root();
        LIBRARY_CANDIDATES
            .iter()
            .map(|(arch, file)| root.join(arch).join(file))
            .collect()
    }
}
