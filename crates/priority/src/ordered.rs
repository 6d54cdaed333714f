use std::collections::BTreeMap;
use std::ops::Range;

use chrono::{DateTime, Utc};
use serde::Serialize;

use qscheduler_core::{Priority, TaskRequest};

/// A request annotated with the priority it should be dispatched at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrioritizedRequest<'a> {
    priority: Priority,
    request: &'a TaskRequest,
    /// Reserved for the dispatcher; never set during prioritization.
    scheduled: bool,
    /// The account disables free tasks: skip this entry if it is dispatched
    /// from the free bucket.
    disable_if_free: bool,
    /// Sort key, resolved once from the request's stored enqueue time.
    #[serde(skip)]
    enqueued_at: DateTime<Utc>,
}

impl<'a> PrioritizedRequest<'a> {
    pub(crate) fn new(priority: Priority, request: &'a TaskRequest, enqueued_at: DateTime<Utc>) -> Self {
        Self {
            priority,
            request,
            scheduled: false,
            disable_if_free: false,
            enqueued_at,
        }
    }

    pub(crate) fn with_disable_if_free(mut self, disable_if_free: bool) -> Self {
        self.disable_if_free = disable_if_free;
        self
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn request(&self) -> &'a TaskRequest {
        self.request
    }

    pub fn enqueued_at(&self) -> DateTime<Utc> {
        self.enqueued_at
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    pub fn disable_if_free(&self) -> bool {
        self.disable_if_free
    }

    pub fn mark_scheduled(&mut self) {
        self.scheduled = true;
    }

    pub(crate) fn demote(&mut self) {
        self.priority = Priority::FREE_BUCKET;
    }
}

/// Sort by ascending priority, then ascending enqueue time. The sort is
/// stable; entries equal on both keys keep their relative order.
pub(crate) fn sort_requests(items: &mut [PrioritizedRequest<'_>]) {
    items.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.enqueued_at.cmp(&b.enqueued_at))
    });
}

/// Prioritized requests, sorted by `(priority, enqueue time)`.
///
/// Lookups by priority band are binary searches over the sorted list, so a
/// dispatcher can walk the bands without rescanning.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OrderedRequests<'a> {
    items: Vec<PrioritizedRequest<'a>>,
}

impl<'a> OrderedRequests<'a> {
    /// Sort `items` and freeze them into an ordered view.
    pub(crate) fn from_unsorted(mut items: Vec<PrioritizedRequest<'a>>) -> Self {
        sort_requests(&mut items);
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[PrioritizedRequest<'a>] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PrioritizedRequest<'a>> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<PrioritizedRequest<'a>> {
        self.items
    }

    /// Index range of the entries with exactly `priority`.
    ///
    /// When nothing matches, the range is empty and starts at the position
    /// where such entries would be inserted.
    pub fn priority_range(&self, priority: Priority) -> Range<usize> {
        let start = self.items.partition_point(|item| item.priority < priority);
        let end = start + self.items[start..].partition_point(|item| item.priority <= priority);
        start..end
    }

    /// Entries with exactly `priority`, in order. Empty if there are none.
    pub fn for_priority(&self, priority: Priority) -> &[PrioritizedRequest<'a>] {
        &self.items[self.priority_range(priority)]
    }

    /// Mutable access to one band, so a dispatcher can mark entries as
    /// scheduled.
    pub fn for_priority_mut(&mut self, priority: Priority) -> &mut [PrioritizedRequest<'a>] {
        let range = self.priority_range(priority);
        &mut self.items[range]
    }

    /// Each distinct priority present, with its entries, highest priority
    /// first.
    pub fn bands(&self) -> Bands<'_, 'a> {
        Bands { rest: &self.items }
    }

    /// Number of entries per priority present.
    pub fn band_counts(&self) -> BTreeMap<Priority, usize> {
        self.bands().map(|(p, band)| (p, band.len())).collect()
    }
}

impl<'s, 'a> IntoIterator for &'s OrderedRequests<'a> {
    type Item = &'s PrioritizedRequest<'a>;
    type IntoIter = std::slice::Iter<'s, PrioritizedRequest<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Iterator over the priority bands of an [`OrderedRequests`].
pub struct Bands<'s, 'a> {
    rest: &'s [PrioritizedRequest<'a>],
}

impl<'s, 'a> Iterator for Bands<'s, 'a> {
    type Item = (Priority, &'s [PrioritizedRequest<'a>]);

    fn next(&mut self) -> Option<Self::Item> {
        let priority = self.rest.first()?.priority;
        let len = self.rest.partition_point(|item| item.priority <= priority);
        let (band, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some((priority, band))
    }
}
