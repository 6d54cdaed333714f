use std::collections::HashMap;

use qscheduler_core::{AccountId, Config, Worker};

/// Tracks, per account, how many tasks are already active (running, or
/// counted earlier in a priority-ordered walk) against the account's
/// configured fanout limit.
#[derive(Debug)]
pub(crate) struct FanoutCounter<'c, 'k> {
    config: &'c Config,
    active: HashMap<&'k AccountId, u32>,
}

impl<'c, 'k> FanoutCounter<'c, 'k> {
    pub(crate) fn new(config: &'c Config) -> Self {
        Self {
            config,
            active: HashMap::new(),
        }
    }

    /// Count the tasks currently running on `workers`. Idle workers and
    /// tasks without an account are skipped.
    pub(crate) fn count_running(&mut self, workers: impl IntoIterator<Item = &'k Worker>) {
        for account in workers.into_iter().filter_map(Worker::running_account) {
            self.count(account);
        }
    }

    pub(crate) fn count(&mut self, account: &'k AccountId) {
        *self.active.entry(account).or_default() += 1;
    }

    pub(crate) fn active(&self, account: &AccountId) -> u32 {
        self.active.get(account).copied().unwrap_or(0)
    }

    /// Whether the account has a fanout limit and has already reached it.
    /// Unconfigured and unlimited accounts are never throttled.
    pub(crate) fn is_throttled(&self, account: &AccountId) -> bool {
        match self.config.account_config(account) {
            Some(ac) if ac.is_limited() => self.active(account) >= ac.max_fanout,
            _ => false,
        }
    }

    pub(crate) fn is_configured(&self, account: &AccountId) -> bool {
        self.config.account_config(account).is_some()
    }
}
