use std::{fmt, path::PathBuf};

use clap::{ArgEnum, Parser, Subcommand};

/// Edit kubeconfig files: list, delete, rename, prune and merge entries.
#[derive(Parser, Debug)]
#[clap(name = "kedit", version, about, long_about = None)]
pub struct Cli {
    /// Path to the kubeconfig file [default: $HOME/.kube/config]
    #[clap(short, long, global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// Copy the kubeconfig aside before overwriting it
    #[clap(long, global = true)]
    pub backup: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, global = true, parse(from_occurrences))]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List cluster, user or context names (or all of them)
    List {
        #[clap(arg_enum)]
        target: ListTarget,

        /// Show each context's cluster and user, marking the current one
        #[clap(short, long)]
        wide: bool,
    },

    /// Delete a cluster, user or context by name.
    ///
    /// Contexts that reference a deleted cluster or user are left as they are
    /// and will point at nothing.
    Delete {
        #[clap(arg_enum)]
        kind: Kind,
        name: String,
    },

    /// Rename a cluster, user or context, updating every reference to it
    Rename {
        #[clap(arg_enum)]
        kind: Kind,
        old_name: String,
        new_name: String,
    },

    /// Remove clusters and users that no context references
    Prune,

    /// Import a context with its cluster and user from another kubeconfig.
    ///
    /// Entries with the same names in the target are overwritten.
    Merge {
        /// Name of the context in the source file
        context: String,

        /// Kubeconfig to import from
        #[clap(short = 's', long)]
        from: PathBuf,

        /// Name to give the imported context, cluster and user
        #[clap(short, long)]
        name: Option<String>,
    },
}

#[derive(ArgEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Cluster,
    User,
    Context,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Cluster => "cluster",
            Kind::User => "user",
            Kind::Context => "context",
        })
    }
}

#[derive(ArgEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListTarget {
    Cluster,
    User,
    Context,
    All,
}
