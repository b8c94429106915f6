//! Name-keyed view of a kubeconfig, the shape every edit works on.

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write as _},
    path::Path,
};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt as _;

use anyhow::Context as _;
use serde_yaml::{Mapping, Value as YamlValue};
use tracing::debug;

use crate::direct;
pub use crate::direct::{ApiVersion, Cluster, ClusterSpec, Context, ContextSpec, Kind, User, UserSpec};

#[derive(Debug, Clone, PartialEq)]
pub struct KubeConfig {
    pub api_version: ApiVersion,
    pub kind: Kind,
    pub contexts: BTreeMap<String, ContextSpec>,
    pub current_context: String,
    pub clusters: BTreeMap<String, ClusterSpec>,
    pub preferences: YamlValue,
    pub users: BTreeMap<String, UserSpec>,
    pub extensions: Option<YamlValue>,
    pub extra: Mapping,
}

impl Default for KubeConfig {
    fn default() -> Self {
        direct::KubeConfig::default().into()
    }
}

impl From<direct::KubeConfig> for KubeConfig {
    fn from(kc: direct::KubeConfig) -> Self {
        Self {
            api_version: kc.api_version,
            kind: kc.kind,
            current_context: kc.current_context,
            preferences: kc.preferences,
            extensions: kc.extensions,
            extra: kc.extra,
            contexts: kc
                .contexts
                .into_iter()
                .map(|ctx| (ctx.name, ctx.context))
                .collect(),
            clusters: kc
                .clusters
                .into_iter()
                .map(|cls| (cls.name, cls.cluster))
                .collect(),
            users: kc
                .users
                .into_iter()
                .map(|usr| (usr.name, usr.user))
                .collect(),
        }
    }
}

impl From<KubeConfig> for direct::KubeConfig {
    fn from(kc: KubeConfig) -> Self {
        direct::KubeConfig {
            api_version: kc.api_version,
            kind: kc.kind,
            preferences: kc.preferences,
            current_context: kc.current_context,
            extensions: kc.extensions,
            extra: kc.extra,

            clusters: kc
                .clusters
                .into_iter()
                .map(|(name, cluster)| Cluster { name, cluster })
                .collect(),
            contexts: kc
                .contexts
                .into_iter()
                .map(|(name, context)| Context { name, context })
                .collect(),
            users: kc
                .users
                .into_iter()
                .map(|(name, user)| User { name, user })
                .collect(),
        }
    }
}

impl KubeConfig {
    pub fn parse(s: &str) -> anyhow::Result<KubeConfig> {
        Ok(direct::from_str(s)?.into())
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        let direct: direct::KubeConfig = self.clone().into();
        Ok(serde_yaml::to_string(&direct)?)
    }

    /// Reads a kubeconfig that must already exist.
    pub fn read_from(path: impl AsRef<Path>) -> anyhow::Result<KubeConfig> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Opening kube config '{}'", path.display()))?;
        let kc = Self::parse(&raw)
            .with_context(|| format!("Parsing kube config '{}'", path.display()))?;
        debug!(
            path = %path.display(),
            clusters = kc.clusters.len(),
            users = kc.users.len(),
            contexts = kc.contexts.len(),
            "loaded kube config"
        );
        Ok(kc)
    }

    /// Reads a kubeconfig, treating a missing file as an empty document.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<KubeConfig> {
        let path = path.as_ref();
        match fs::metadata(path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "kube config missing, starting empty");
                Ok(KubeConfig::default())
            }
            _ => Self::read_from(path),
        }
    }

    /// Writes the whole document, creating the parent directory if needed.
    pub fn write_to(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;

        let yaml = self.to_yaml()?;
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Credentials live in here: new files are owner-only.
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options
            .open(path)
            .with_context(|| format!("Opening kube config '{}' for writing", path.display()))?;
        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Writing kube config '{}'", path.display()))?;

        debug!(path = %path.display(), bytes = yaml.len(), "saved kube config");
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => fs::create_dir_all(dir)
            .with_context(|| format!("Creating directory '{}'", dir.display())),
        _ => Ok(()),
    }
}
