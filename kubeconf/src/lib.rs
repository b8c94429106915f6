pub mod clean;
pub mod direct;

use std::path::{Path, PathBuf};

use anyhow::Context as _;

pub use clean::*;

pub fn kube_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().context("Cannot determine the user's home directory")?;
    Ok(home.join(".kube"))
}

/// `$HOME/.kube/config`
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(kube_dir()?.join("config"))
}

/// Expands a leading `~` to the home directory. Other paths are returned as is.
pub fn expand_tilde(path: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
    let path = path.as_ref();
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir()
                .with_context(|| format!("Cannot expand '{}': no home directory", path.display()))?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}
