//! Importing one context, with the cluster and user it points at, from
//! another kubeconfig.

use std::{fs, io, path::Path};

use kubeconf::{ClusterSpec, ContextSpec, KubeConfig, UserSpec};
use tracing::{debug, info};

use crate::{
    cli::Kind,
    error::{EditError, Result},
    Outcome, Settings,
};

/// A context together with the entries it depends on, lifted out of a
/// source kubeconfig.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub context_name: String,
    pub context: ContextSpec,
    pub cluster_name: String,
    pub cluster: ClusterSpec,
    pub user: Option<(String, UserSpec)>,
}

impl Bundle {
    /// Fails unless the context, its cluster and (when it names one) its
    /// user all exist in `source`.
    pub fn extract(source: &KubeConfig, context_name: &str, source_path: &Path) -> Result<Bundle> {
        let context = source
            .contexts
            .get(context_name)
            .ok_or_else(|| EditError::ContextNotInSource {
                context: context_name.to_string(),
                path: source_path.to_path_buf(),
            })?;

        if context.cluster.is_empty() {
            return Err(EditError::NoClusterReference {
                context: context_name.to_string(),
                path: source_path.to_path_buf(),
            });
        }
        let missing = |kind, name: &str| EditError::MissingReference {
            kind,
            name: name.to_string(),
            context: context_name.to_string(),
            path: source_path.to_path_buf(),
        };

        let cluster = source
            .clusters
            .get(&context.cluster)
            .ok_or_else(|| missing(Kind::Cluster, &context.cluster))?;

        let user = if context.user.is_empty() {
            None
        } else {
            let user = source
                .users
                .get(&context.user)
                .ok_or_else(|| missing(Kind::User, &context.user))?;
            Some((context.user.clone(), user.clone()))
        };

        Ok(Bundle {
            context_name: context_name.to_string(),
            context: context.clone(),
            cluster_name: context.cluster.clone(),
            cluster: cluster.clone(),
            user,
        })
    }

    /// Gives the context, cluster and user all the same new name.
    pub fn renamed(mut self, name: &str) -> Bundle {
        self.context_name = name.to_string();
        self.cluster_name = name.to_string();
        self.context.cluster = name.to_string();
        if let Some((user_name, _)) = &mut self.user {
            *user_name = name.to_string();
            self.context.user = name.to_string();
        }
        self
    }

    /// Inserts every entry, overwriting whatever had the same name.
    pub fn install(self, target: &mut KubeConfig) {
        target.contexts.insert(self.context_name, self.context);
        target.clusters.insert(self.cluster_name, self.cluster);
        if let Some((user_name, user)) = self.user {
            target.users.insert(user_name, user);
        }
    }

    fn summary(&self, source_path: &Path, target_path: &Path) -> String {
        let user = match &self.user {
            Some((name, _)) => format!("user '{name}'"),
            None => "no specific user".to_string(),
        };
        format!(
            "Successfully merged context '{}' (with cluster '{}' and {user}) from '{}' into '{}'.",
            self.context_name,
            self.cluster_name,
            source_path.display(),
            target_path.display()
        )
    }
}

pub fn run(settings: &Settings, context: &str, from: &Path, name: Option<&str>) -> Result<Vec<String>> {
    let source_path = kubeconf::expand_tilde(from)?;
    match fs::metadata(&source_path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(EditError::SourceNotFound(source_path));
        }
        Err(err) => {
            return Err(anyhow::Error::new(err)
                .context(format!("Opening source kube config '{}'", source_path.display()))
                .into());
        }
        Ok(meta) if !meta.is_file() => return Err(EditError::SourceNotAFile(source_path)),
        Ok(_) => {}
    }
    let source = KubeConfig::read_from(&source_path)?;

    let mut bundle = Bundle::extract(&source, context, &source_path)?;
    if let Some(name) = name.filter(|name| !name.is_empty()) {
        debug!(from = context, to = name, "renaming imported entries");
        bundle = bundle.renamed(name);
    }

    settings.edit(|target, target_path| {
        let summary = bundle.summary(&source_path, target_path);
        info!(
            context = %bundle.context_name,
            cluster = %bundle.cluster_name,
            source = %source_path.display(),
            "merged"
        );
        bundle.install(target);
        Ok(Outcome::changed(vec![summary]))
    })
}
