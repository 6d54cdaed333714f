//! Data model shared by the quota scheduler crates: identifiers, priority
//! levels, account balances and configs, and the pool state snapshot.

pub mod balance;
pub mod config;
pub mod error;
pub mod ids;
pub mod priority;
pub mod snapshot;
pub mod state;
pub mod time;

pub use balance::Balance;
pub use config::{AccountConfig, Config};
pub use error::*;
pub use ids::{AccountId, RequestId, WorkerId};
pub use priority::{Priority, NUM_PRIORITIES};
pub use snapshot::Snapshot;
pub use state::{State, TaskRequest, TaskRun, Worker};
pub use time::{zero_time, Timestamp};
