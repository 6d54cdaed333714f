use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ids::AccountId;

/// Per-account scheduling policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Maximum number of running or earlier-queued tasks before further
    /// requests from the account are demoted to the free bucket.
    /// 0 means unlimited.
    #[serde(default)]
    pub max_fanout: u32,
    /// Requests from the account must not be dispatched from the free
    /// bucket.
    #[serde(default)]
    pub disable_free_tasks: bool,
}

impl AccountConfig {
    pub fn with_max_fanout(max_fanout: u32) -> Self {
        Self {
            max_fanout,
            ..Self::default()
        }
    }

    pub fn disabling_free_tasks(mut self) -> Self {
        self.disable_free_tasks = true;
        self
    }

    /// Whether a fanout limit applies to this account.
    pub fn is_limited(&self) -> bool {
        self.max_fanout > 0
    }
}

/// Scheduler configuration for a single pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Account policies, keyed by account id. Accounts without an entry are
    /// unconfigured: they get no fanout limit.
    #[serde(default)]
    pub account_configs: HashMap<AccountId, AccountConfig>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite the config for an account.
    pub fn add_account(&mut self, id: impl Into<AccountId>, config: AccountConfig) {
        self.account_configs.insert(id.into(), config);
    }

    /// Look up an account's config. `None` means the account is unconfigured.
    pub fn account_config(&self, id: &AccountId) -> Option<&AccountConfig> {
        self.account_configs.get(id)
    }
}
