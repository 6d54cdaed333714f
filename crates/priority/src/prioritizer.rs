use tracing::{debug, trace, warn};

use qscheduler_core::{zero_time, Config, State};

use crate::fanout::FanoutCounter;
use crate::ordered::{sort_requests, OrderedRequests, PrioritizedRequest};

/// Compute the dispatch priority of every queued request in `state`.
///
/// Each request first gets the best priority its account's balance allows
/// (accounts without a balance land in the free bucket). The requests are
/// then walked in priority order, and once an account has as many running
/// or earlier-queued tasks as its `max_fanout`, its remaining requests are
/// demoted to the free bucket. The result is sorted by priority, then by
/// enqueue time.
///
/// Neither input is modified; the result borrows the requests from `state`.
pub fn prioritize_requests<'a>(state: &'a State, config: &Config) -> OrderedRequests<'a> {
    let mut items = assign_priorities(state, config);
    sort_requests(&mut items);

    let mut fanout = FanoutCounter::new(config);
    fanout.count_running(state.workers().values());
    let demoted = demote_throttled(&mut items, &mut fanout);

    debug!(
        requests = items.len(),
        demoted,
        workers = state.workers().len(),
        "prioritized requests"
    );
    OrderedRequests::from_unsorted(items)
}

/// First pass: one entry per request, at the best priority for its
/// account's balance. Order is unspecified.
fn assign_priorities<'a>(state: &'a State, config: &Config) -> Vec<PrioritizedRequest<'a>> {
    state
        .requests()
        .values()
        .map(|request| {
            let priority = state.balance(&request.account_id).best_priority();
            let enqueued_at = request.try_enqueued_at().unwrap_or_else(|e| {
                warn!(
                    request = %request.id,
                    error = %e,
                    "invalid enqueue time, ordering request as enqueued at zero time"
                );
                zero_time()
            });
            let disable_if_free = config
                .account_config(&request.account_id)
                .is_some_and(|ac| ac.disable_free_tasks);
            PrioritizedRequest::new(priority, request, enqueued_at)
                .with_disable_if_free(disable_if_free)
        })
        .collect()
}

/// Second pass over priority-sorted entries: demote requests of accounts
/// that already reached their fanout limit. Returns the number of entries
/// moved into the free bucket. The entries are no longer sorted afterwards.
fn demote_throttled<'a>(
    items: &mut [PrioritizedRequest<'a>],
    fanout: &mut FanoutCounter<'_, 'a>,
) -> usize {
    let mut demoted = 0;
    for item in items.iter_mut() {
        let account = &item.request().account_id;
        // Unconfigured accounts are already in the free bucket by balance.
        if !fanout.is_configured(account) {
            continue;
        }
        if !item.priority().is_free() && fanout.is_throttled(account) {
            trace!(
                request = %item.request().id,
                account = %account,
                from = %item.priority(),
                "fanout limit reached, demoting to free bucket"
            );
            item.demote();
            demoted += 1;
        }
        fanout.count(account);
    }
    demoted
}
