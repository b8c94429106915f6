use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use chrono::{Local, NaiveDateTime};
use kubeconf::KubeConfig;
use tracing::info;

use crate::{error::Result, Outcome};

/// Where to find the kubeconfig being edited and how to write it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub kubeconfig: PathBuf,
    pub backup: bool,
}

impl Settings {
    /// Uses the given path (with `~` expanded) or falls back to `$HOME/.kube/config`.
    pub fn resolve(kubeconfig: Option<&Path>, backup: bool) -> anyhow::Result<Settings> {
        let kubeconfig = match kubeconfig {
            Some(path) => kubeconf::expand_tilde(path)?,
            None => kubeconf::default_config_path()?,
        };
        Ok(Settings { kubeconfig, backup })
    }

    pub fn load(&self) -> anyhow::Result<KubeConfig> {
        KubeConfig::load(&self.kubeconfig).with_context(|| {
            format!(
                "error loading kubeconfig from '{}'",
                self.kubeconfig.display()
            )
        })
    }

    pub fn save(&self, kc: &KubeConfig) -> anyhow::Result<()> {
        if self.backup && self.kubeconfig.exists() {
            let backup = self.backup_path(Local::now().naive_local());
            fs::copy(&self.kubeconfig, &backup).with_context(|| {
                format!("Backing up kube config to '{}'", backup.display())
            })?;
            info!(backup = %backup.display(), "backed up kube config");
        }

        kc.write_to(&self.kubeconfig).with_context(|| {
            format!("error saving kubeconfig to '{}'", self.kubeconfig.display())
        })
    }

    /// Loads the kubeconfig, applies `edit` and saves only if it changed anything.
    pub fn edit<F>(&self, edit: F) -> Result<Vec<String>>
    where
        F: FnOnce(&mut KubeConfig, &Path) -> Result<Outcome>,
    {
        let mut kc = self.load()?;
        let outcome = edit(&mut kc, &self.kubeconfig)?;
        if outcome.changed {
            self.save(&kc)?;
        }
        Ok(outcome.report)
    }

    fn backup_path(&self, now: NaiveDateTime) -> PathBuf {
        let name = self
            .kubeconfig
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "config".to_string());
        self.kubeconfig
            .with_file_name(format!("{name}_{}", now.format("%Y%m%dT%H%M%S")))
    }
}
