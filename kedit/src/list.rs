use std::collections::BTreeMap;

use kubeconf::KubeConfig;
use tabular::{row, Table};

use crate::{cli::ListTarget, error::Result, Settings};

pub fn run(settings: &Settings, target: ListTarget, wide: bool) -> Result<Vec<String>> {
    let kc = settings.load()?;
    Ok(render(&kc, target, wide))
}

pub fn render(kc: &KubeConfig, target: ListTarget, wide: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if matches!(target, ListTarget::Cluster | ListTarget::All) {
        section(&mut lines, "Clusters", "clusters", &kc.clusters);
    }
    if matches!(target, ListTarget::User | ListTarget::All) {
        section(&mut lines, "Users", "users", &kc.users);
    }
    if matches!(target, ListTarget::Context | ListTarget::All) {
        if wide && !kc.contexts.is_empty() {
            context_table(&mut lines, kc);
        } else {
            section(&mut lines, "Contexts", "contexts", &kc.contexts);
        }
    }
    lines
}

// BTreeMap keys iterate in sorted order already.
fn section<V>(lines: &mut Vec<String>, title: &str, plural: &str, entries: &BTreeMap<String, V>) {
    if entries.is_empty() {
        lines.push(format!("No {plural} found."));
        return;
    }
    lines.push(format!("{title}:"));
    lines.extend(entries.keys().map(|name| format!("- {name}")));
}

fn context_table(lines: &mut Vec<String>, kc: &KubeConfig) {
    let mut table = Table::new("{:<}  {:<}  {:<}  {:<}");
    table.add_row(row!("CURRENT", "NAME", "CLUSTER", "USER"));
    for (name, ctx) in &kc.contexts {
        let marker = if *name == kc.current_context { "*" } else { "" };
        table.add_row(row!(marker, name, &ctx.cluster, &ctx.user));
    }

    lines.push("Contexts:".to_string());
    lines.extend(table.to_string().lines().map(|line| line.trim_end().to_string()));
}
