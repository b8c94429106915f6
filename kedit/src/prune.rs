use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
};

use kubeconf::{ContextSpec, KubeConfig};
use tracing::{debug, info};

use crate::{error::Result, Outcome, Settings};

pub fn run(settings: &Settings) -> Result<Vec<String>> {
    settings.edit(|kc, path| Ok(prune(kc, path)))
}

/// Drops every cluster and user that no context references. With no
/// contexts at all, nothing is referenced and everything goes.
pub fn prune(kc: &mut KubeConfig, path: &Path) -> Outcome {
    let total_clusters = kc.clusters.len();
    let total_users = kc.users.len();

    if kc.contexts.is_empty() {
        if total_clusters == 0 && total_users == 0 {
            return Outcome::unchanged("No contexts, clusters, or users found. Nothing to prune.");
        }
        kc.clusters.clear();
        kc.users.clear();
        info!(clusters = total_clusters, users = total_users, "pruned everything, no contexts");
        return Outcome::changed(vec![format!(
            "No contexts found. Pruned {total_clusters} cluster(s) and {total_users} user(s) from '{}'.",
            path.display()
        )]);
    }

    let clusters: HashSet<String> = referenced(kc, |ctx| &ctx.cluster);
    let users: HashSet<String> = referenced(kc, |ctx| &ctx.user);
    debug!(?clusters, ?users, "referenced by contexts");

    let pruned_clusters = retain_referenced(&mut kc.clusters, &clusters);
    let pruned_users = retain_referenced(&mut kc.users, &users);

    if pruned_clusters == 0 && pruned_users == 0 {
        return Outcome::unchanged(format!(
            "No unreferenced clusters or users found in '{}'. Nothing to prune.",
            path.display()
        ));
    }

    info!(clusters = pruned_clusters, users = pruned_users, "pruned");
    Outcome::changed(vec![format!(
        "Pruned {pruned_clusters} cluster(s) (out of {total_clusters}) and {pruned_users} user(s) (out of {total_users}) from '{}'.",
        path.display()
    )])
}

/// Non-empty names that some context points at through `field`.
fn referenced(kc: &KubeConfig, field: impl Fn(&ContextSpec) -> &String) -> HashSet<String> {
    kc.contexts
        .values()
        .map(field)
        .filter(|name| !name.is_empty())
        .cloned()
        .collect()
}

fn retain_referenced<V>(entries: &mut BTreeMap<String, V>, referenced: &HashSet<String>) -> usize {
    let before = entries.len();
    entries.retain(|name, _| referenced.contains(name));
    before - entries.len()
}
