use std::{collections::BTreeMap, path::Path};

use kubeconf::{ContextSpec, KubeConfig};
use tracing::info;

use crate::{
    cli::Kind,
    error::{EditError, Result},
    Outcome, Settings,
};

pub fn run(settings: &Settings, kind: Kind, old: &str, new: &str) -> Result<Vec<String>> {
    if old == new {
        return Ok(identical(old).report);
    }
    settings.edit(|kc, path| rename(kc, kind, old, new, path))
}

fn identical(name: &str) -> Outcome {
    Outcome::unchanged(format!(
        "The old name and new name are identical ('{name}'). No changes made."
    ))
}

/// Renames an entry and rewrites everything that refers to it: context
/// references for clusters and users, current-context for contexts.
pub fn rename(kc: &mut KubeConfig, kind: Kind, old: &str, new: &str, path: &Path) -> Result<Outcome> {
    if old == new {
        return Ok(identical(old));
    }

    let mut report = vec![format!("Renamed {kind} '{old}' to '{new}'.")];
    match kind {
        Kind::Cluster => {
            move_entry(&mut kc.clusters, kind, old, new, path)?;
            let updated = retarget(&mut kc.contexts, |ctx| &mut ctx.cluster, old, new);
            report.extend(updated_line(updated, kind, new));
        }
        Kind::User => {
            move_entry(&mut kc.users, kind, old, new, path)?;
            let updated = retarget(&mut kc.contexts, |ctx| &mut ctx.user, old, new);
            report.extend(updated_line(updated, kind, new));
        }
        Kind::Context => {
            move_entry(&mut kc.contexts, kind, old, new, path)?;
            if kc.current_context == old {
                kc.current_context = new.to_string();
                report.push(format!("Updated current-context from '{old}' to '{new}'."));
            }
        }
    }

    info!(%kind, old, new, "renamed");
    Ok(Outcome::changed(report))
}

fn move_entry<V>(
    entries: &mut BTreeMap<String, V>,
    kind: Kind,
    old: &str,
    new: &str,
    path: &Path,
) -> Result<()> {
    let not_found = || EditError::NotFound {
        kind,
        name: old.to_string(),
        path: path.to_path_buf(),
    };

    if !entries.contains_key(old) {
        return Err(not_found());
    }
    if entries.contains_key(new) {
        return Err(EditError::AlreadyExists {
            kind,
            name: new.to_string(),
        });
    }

    let value = entries.remove(old).ok_or_else(not_found)?;
    entries.insert(new.to_string(), value);
    Ok(())
}

/// Points every context whose `field` equals `old` at `new`. Returns how many changed.
fn retarget(
    contexts: &mut BTreeMap<String, ContextSpec>,
    field: impl Fn(&mut ContextSpec) -> &mut String,
    old: &str,
    new: &str,
) -> usize {
    let mut updated = 0;
    for ctx in contexts.values_mut() {
        let reference = field(ctx);
        if reference.as_str() == old {
            *reference = new.to_string();
            updated += 1;
        }
    }
    updated
}

fn updated_line(updated: usize, kind: Kind, new: &str) -> Option<String> {
    (updated > 0).then(|| {
        format!("Updated {updated} context(s) to reference the new {kind} name '{new}'.")
    })
}
