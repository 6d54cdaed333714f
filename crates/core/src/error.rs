use thiserror::Error;

use crate::ids::{RequestId, WorkerId};

#[derive(Error, Debug)]
pub enum QschedError {
    #[error("empty request id")]
    EmptyRequestId,

    #[error("empty worker id")]
    EmptyWorkerId,

    #[error("request {0} is already known")]
    DuplicateRequest(RequestId),

    #[error("worker {0} is already known")]
    DuplicateWorker(WorkerId),

    #[error("invalid timestamp: seconds={seconds}, nanos={nanos}")]
    InvalidTimestamp { seconds: i64, nanos: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("snapshot parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QschedError>;
