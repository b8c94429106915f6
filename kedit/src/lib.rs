//! Edits kubeconfig files in place.
//!
//! Every command loads the whole file, edits the name-keyed
//! [`kubeconf::KubeConfig`] in memory and writes it back only when the edit
//! succeeded and changed something.

pub mod cli;
pub mod delete;
pub mod error;
pub mod list;
pub mod merge;
pub mod prune;
pub mod rename;
pub mod settings;

use std::io::Write;

pub use cli::{Cli, Commands, Kind, ListTarget};
pub use error::EditError;
pub use settings::Settings;

/// What an edit did: whether the document needs saving, and the lines to
/// show the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub changed: bool,
    pub report: Vec<String>,
}

impl Outcome {
    pub fn unchanged(line: impl Into<String>) -> Self {
        Self {
            changed: false,
            report: vec![line.into()],
        }
    }

    pub fn changed(report: Vec<String>) -> Self {
        Self {
            changed: true,
            report,
        }
    }
}

pub fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let settings = Settings::resolve(cli.kubeconfig.as_deref(), cli.backup)?;

    let report = match cli.command {
        Commands::List { target, wide } => list::run(&settings, target, wide)?,
        Commands::Delete { kind, name } => delete::run(&settings, kind, &name)?,
        Commands::Rename {
            kind,
            old_name,
            new_name,
        } => rename::run(&settings, kind, &old_name, &new_name)?,
        Commands::Prune => prune::run(&settings)?,
        Commands::Merge {
            context,
            from,
            name,
        } => merge::run(&settings, &context, &from, name.as_deref())?,
    };

    for line in report {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
