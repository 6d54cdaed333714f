use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::state::State;

/// A pool's configuration and state captured together, as read from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub config: Config,
    #[serde(default)]
    pub state: State,
}

impl Snapshot {
    /// Parse a snapshot from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a snapshot from a file. `.json` files are parsed as JSON,
    /// everything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let snapshot = if is_json {
            Self::from_json(&content)?
        } else {
            Self::from_toml(&content)?
        };
        debug!(
            path = %path.display(),
            accounts = snapshot.config.account_configs.len(),
            balances = snapshot.state.balances().len(),
            requests = snapshot.state.requests().len(),
            workers = snapshot.state.workers().len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::QschedError;
    use crate::ids::{AccountId, RequestId};
    use crate::priority::Priority;

    const SNAPSHOT_TOML: &str = r#"
[config.account_configs.a1]
max_fanout = 3

[state.balances]
a1 = [1.0, 0.0, 0.0]

[[state.requests]]
id = "t5"
account_id = "a1"
enqueue_time = { seconds = 100 }

[[state.workers]]
id = "w1"

[state.workers.running_task]
priority = 0

[state.workers.running_task.request]
id = "t1"
account_id = "a1"

[[state.workers]]
id = "w2"
labels = ["linux"]
"#;

    #[test]
    fn parse_toml_snapshot() {
        let snapshot = Snapshot::from_toml(SNAPSHOT_TOML).unwrap();
        let a1 = AccountId::from("a1");
        assert_eq!(snapshot.config.account_config(&a1).unwrap().max_fanout, 3);
        assert_eq!(snapshot.state.balance(&a1).best_priority(), Priority::P0);
        assert_eq!(snapshot.state.balances().len(), 1);
        assert!(snapshot.state.requests().contains_key(&RequestId::from("t5")));
        assert_eq!(snapshot.state.workers().len(), 2);
        assert_eq!(
            snapshot.state.workers().values().filter(|w| w.is_idle()).count(),
            1
        );
    }

    #[test]
    fn empty_snapshot_is_default() {
        assert_eq!(Snapshot::from_toml("").unwrap(), Snapshot::default());
        assert_eq!(Snapshot::from_json("{}").unwrap(), Snapshot::default());
    }

    #[test]
    fn invalid_state_is_a_parse_error() {
        let toml = r#"
[[state.requests]]
id = ""
"#;
        let err = Snapshot::from_toml(toml).unwrap_err();
        assert!(matches!(err, QschedError::TomlParse(_)));
        assert!(err.to_string().contains("empty request id"), "{err}");
    }

    #[test]
    fn from_file_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("pool.toml");
        std::fs::write(&toml_path, SNAPSHOT_TOML).unwrap();
        let from_toml = Snapshot::from_file(&toml_path).unwrap();

        let json_path = dir.path().join("pool.json");
        let mut file = std::fs::File::create(&json_path).unwrap();
        file.write_all(serde_json::to_string(&from_toml).unwrap().as_bytes())
            .unwrap();
        let from_json = Snapshot::from_file(&json_path).unwrap();

        assert_eq!(from_toml, from_json);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Snapshot::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, QschedError::Io(_)));
    }
}
