use std::path::Path;

use kubeconf::KubeConfig;
use tracing::{info, warn};

use crate::{cli::Kind, error::Result, Outcome, Settings};

pub fn run(settings: &Settings, kind: Kind, name: &str) -> Result<Vec<String>> {
    settings.edit(|kc, path| Ok(delete(kc, kind, name, path)))
}

/// Removes one entry. Contexts pointing at a deleted cluster or user are not
/// touched; they are logged as dangling instead.
pub fn delete(kc: &mut KubeConfig, kind: Kind, name: &str, path: &Path) -> Outcome {
    let existed = match kind {
        Kind::Cluster => kc.clusters.remove(name).is_some(),
        Kind::User => kc.users.remove(name).is_some(),
        Kind::Context => {
            let existed = kc.contexts.remove(name).is_some();
            if existed && kc.current_context == name {
                kc.current_context.clear();
                info!(context = name, "cleared current-context");
            }
            existed
        }
    };

    if !existed {
        return Outcome::unchanged(format!(
            "{kind} '{name}' not found in '{}'. Nothing to delete.",
            path.display()
        ));
    }

    info!(%kind, name, "deleted");
    let dangling = referencing_contexts(kc, kind, name);
    if !dangling.is_empty() {
        warn!(
            "{} context(s) still reference the deleted {kind} '{name}': {}",
            dangling.len(),
            dangling.join(", ")
        );
    }

    Outcome::changed(vec![format!(
        "Successfully deleted {kind} '{name}' from '{}'.",
        path.display()
    )])
}

fn referencing_contexts<'a>(kc: &'a KubeConfig, kind: Kind, name: &str) -> Vec<&'a str> {
    kc.contexts
        .iter()
        .filter(|(_, ctx)| match kind {
            Kind::Cluster => ctx.cluster == name,
            Kind::User => ctx.user == name,
            Kind::Context => false,
        })
        .map(|(ctx_name, _)| ctx_name.as_str())
        .collect()
}
