use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use kedit::Cli;
use kubeconf::KubeConfig;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const BASE: &str = "
apiVersion: v1
clusters:
- cluster:
    server: https://c1.example.com
    certificate-authority-data: Q0EK
    tls-server-name: c1.internal
  name: c1
- cluster:
    server: https://c2.example.com
  name: c2
contexts:
- context:
    cluster: c1
    user: u1
    namespace: apps
  name: ctx1
- context:
    cluster: c2
    user: u2
  name: ctx2
current-context: ctx1
kind: Config
preferences: {}
users:
- name: u1
  user:
    token: t1
- name: u2
  user:
    exec:
      apiVersion: client.authentication.k8s.io/v1beta1
      command: kubelogin
";

const SOURCE: &str = "
apiVersion: v1
clusters:
- cluster:
    server: https://new.example.com
  name: new-cluster
contexts:
- context:
    cluster: new-cluster
    user: new-user
  name: new-context
- context:
    cluster: new-cluster
  name: anonymous
current-context: new-context
kind: Config
preferences: {}
users:
- name: new-user
  user:
    token: new-token
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn with_config(contents: &str) -> Self {
        let fixture = Self::new();
        fs::write(fixture.config(), contents).unwrap();
        fixture
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn kedit(&self, args: &[&str]) -> anyhow::Result<String> {
        let config = self.config();
        let mut argv = vec!["kedit", "--kubeconfig", config.to_str().unwrap()];
        argv.extend_from_slice(args);

        let cli = Cli::try_parse_from(argv)?;
        let mut out = Vec::<u8>::new();
        kedit::run(cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn load(&self) -> KubeConfig {
        KubeConfig::read_from(self.config()).unwrap()
    }

    fn raw(&self) -> String {
        fs::read_to_string(self.config()).unwrap()
    }
}

fn shown(path: &Path) -> String {
    path.display().to_string()
}

#[test]
fn list_all() {
    let fx = Fixture::with_config(BASE);

    let out = fx.kedit(&["list", "all"]).unwrap();

    assert_eq!(
        out,
        "Clusters:\n- c1\n- c2\nUsers:\n- u1\n- u2\nContexts:\n- ctx1\n- ctx2\n"
    );
}

#[test]
fn list_on_missing_file_is_empty_and_creates_nothing() {
    let fx = Fixture::new();

    let out = fx.kedit(&["list", "context"]).unwrap();

    assert_eq!(out, "No contexts found.\n");
    assert!(!fx.config().exists());
}

#[test]
fn delete_current_context() {
    let fx = Fixture::with_config(BASE);

    let out = fx.kedit(&["delete", "context", "ctx1"]).unwrap();

    assert_eq!(
        out,
        format!("Successfully deleted context 'ctx1' from '{}'.\n", shown(&fx.config()))
    );
    let kc = fx.load();
    assert_eq!(kc.contexts.keys().collect::<Vec<_>>(), ["ctx2"]);
    assert_eq!(kc.current_context, "");
}

#[test]
fn delete_missing_entry_leaves_file_alone() {
    let fx = Fixture::with_config(BASE);

    let out = fx.kedit(&["delete", "cluster", "nope"]).unwrap();

    assert_eq!(
        out,
        format!("cluster 'nope' not found in '{}'. Nothing to delete.\n", shown(&fx.config()))
    );
    assert_eq!(fx.raw(), BASE);
}

#[test]
fn rename_cluster_updates_contexts_and_keeps_unknown_fields() {
    let fx = Fixture::with_config(BASE);

    let out = fx.kedit(&["rename", "cluster", "c1", "c3"]).unwrap();

    assert_eq!(
        out,
        "Renamed cluster 'c1' to 'c3'.\nUpdated 1 context(s) to reference the new cluster name 'c3'.\n"
    );
    let kc = fx.load();
    assert_eq!(kc.clusters.keys().collect::<Vec<_>>(), ["c2", "c3"]);
    assert_eq!(kc.contexts["ctx1"].cluster, "c3");
    assert_eq!(kc.contexts["ctx1"].namespace.as_deref(), Some("apps"));
    assert!(fx.raw().contains("tls-server-name: c1.internal"));
    assert!(fx.raw().contains("command: kubelogin"));
}

#[test]
fn rename_to_same_name_does_not_read_or_write() {
    let fx = Fixture::with_config("this is: [not valid");

    let out = fx.kedit(&["rename", "user", "u1", "u1"]).unwrap();

    assert_eq!(
        out,
        "The old name and new name are identical ('u1'). No changes made.\n"
    );
    assert_eq!(fx.raw(), "this is: [not valid");
}

#[test]
fn rename_conflict_is_an_error() {
    let fx = Fixture::with_config(BASE);

    let err = fx.kedit(&["rename", "context", "ctx1", "ctx2"]).unwrap_err();

    assert_eq!(err.to_string(), "a context with the name 'ctx2' already exists");
    assert_eq!(fx.raw(), BASE);
}

#[test]
fn prune_twice() {
    let fx = Fixture::with_config(BASE);
    fx.kedit(&["delete", "context", "ctx2"]).unwrap();

    let first = fx.kedit(&["prune"]).unwrap();
    let after_first = fx.raw();
    let second = fx.kedit(&["prune"]).unwrap();

    let path = shown(&fx.config());
    assert_eq!(
        first,
        format!("Pruned 1 cluster(s) (out of 2) and 1 user(s) (out of 2) from '{path}'.\n")
    );
    assert_eq!(
        second,
        format!("No unreferenced clusters or users found in '{path}'. Nothing to prune.\n")
    );
    assert_eq!(fx.raw(), after_first);
}

#[test]
fn merge_into_existing_config() {
    let fx = Fixture::with_config(BASE);
    let source = fx.write("source", SOURCE);

    let out = fx
        .kedit(&["merge", "new-context", "--from", source.to_str().unwrap()])
        .unwrap();

    assert_eq!(
        out,
        format!(
            "Successfully merged context 'new-context' (with cluster 'new-cluster' and user 'new-user') from '{}' into '{}'.\n",
            shown(&source),
            shown(&fx.config())
        )
    );
    let kc = fx.load();
    assert_eq!(kc.contexts.len(), 3);
    assert_eq!(kc.clusters.len(), 3);
    assert_eq!(kc.users.len(), 3);
    assert_eq!(kc.current_context, "ctx1");
    assert_eq!(kc.users["new-user"].token.as_deref(), Some("new-token"));
}

#[test]
fn merge_with_rename_into_missing_target() {
    let fx = Fixture::new();
    let source = fx.write("source", SOURCE);
    let target = fx.dir.path().join("fresh").join("config");

    let cli = Cli::try_parse_from([
        "kedit",
        "-k",
        target.to_str().unwrap(),
        "merge",
        "new-context",
        "-s",
        source.to_str().unwrap(),
        "-n",
        "prod",
    ])
    .unwrap();
    kedit::run(cli, &mut Vec::<u8>::new()).unwrap();

    let kc = KubeConfig::read_from(&target).unwrap();
    assert_eq!(kc.contexts.keys().collect::<Vec<_>>(), ["prod"]);
    assert_eq!(kc.contexts["prod"].cluster, "prod");
    assert_eq!(kc.contexts["prod"].user, "prod");
    assert_eq!(kc.clusters["prod"].server.as_deref(), Some("https://new.example.com"));
    assert_eq!(kc.users["prod"].token.as_deref(), Some("new-token"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn merge_is_idempotent() {
    let fx = Fixture::with_config(BASE);
    let source = fx.write("source", SOURCE);
    let args = ["merge", "anonymous", "--from", source.to_str().unwrap()];

    let out = fx.kedit(&args).unwrap();
    let once = fx.load();
    fx.kedit(&args).unwrap();

    assert!(out.contains("and no specific user"));
    assert_eq!(fx.load(), once);
    assert_eq!(once.users.len(), 2);
}

#[test]
fn merge_from_missing_source_fails() {
    let fx = Fixture::with_config(BASE);
    let source = fx.dir.path().join("missing.yaml");

    let err = fx
        .kedit(&["merge", "any", "--from", source.to_str().unwrap()])
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("source kubeconfig file '{}' not found", shown(&source))
    );
    assert_eq!(fx.raw(), BASE);
}

#[test]
fn merge_from_directory_is_not_reported_as_missing() {
    let fx = Fixture::with_config(BASE);
    let source = fx.dir.path().join("sources");
    fs::create_dir(&source).unwrap();

    let err = fx
        .kedit(&["merge", "any", "--from", source.to_str().unwrap()])
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("source kubeconfig '{}' is not a regular file", shown(&source))
    );
    assert_eq!(fx.raw(), BASE);
}

#[test]
fn merge_with_missing_user_leaves_target_untouched() {
    let fx = Fixture::with_config(BASE);
    let source = fx.write(
        "source",
        "
clusters:
- name: c
  cluster:
    server: https://c
contexts:
- name: broken
  context:
    cluster: c
    user: ghost
",
    );

    let err = fx
        .kedit(&["merge", "broken", "--from", source.to_str().unwrap()])
        .unwrap_err();

    assert!(err
        .to_string()
        .starts_with("user 'ghost' (referenced by context 'broken') not found in source kubeconfig"));
    assert_eq!(fx.raw(), BASE);
}

#[test]
fn unreadable_config_is_reported() {
    let fx = Fixture::with_config("clusters: [unterminated");

    let err = fx.kedit(&["list", "all"]).unwrap_err();

    assert!(format!("{err:#}").contains("Parsing kube config"));
}

#[test]
fn backup_copies_the_previous_file() {
    let fx = Fixture::with_config(BASE);

    fx.kedit(&["--backup", "delete", "user", "u2"]).unwrap();

    let backups: Vec<_> = fs::read_dir(fx.dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map_or(false, |name| name.starts_with("config_"))
        })
        .collect();
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), BASE);
    assert!(!fx.load().users.contains_key("u2"));
}
