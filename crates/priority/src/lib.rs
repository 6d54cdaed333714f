//! Request prioritization for the quota scheduler.
//!
//! [`prioritize_requests`] turns a pool's balances, queued requests and
//! running workers into an [`OrderedRequests`] view: every queued request
//! annotated with the priority it should be dispatched at, sorted so that a
//! dispatcher can walk the bands from highest to lowest priority with
//! [`OrderedRequests::for_priority`].

mod fanout;
pub mod ordered;
pub mod prioritizer;

pub use ordered::{Bands, OrderedRequests, PrioritizedRequest};
pub use prioritizer::prioritize_requests;
