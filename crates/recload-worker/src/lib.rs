#![warn(clippy::pedantic)]

pub mod error;
pub mod message;
pub mod task;
pub mod worker;

pub use error::{ResponseShapeError, WorkerError};
pub use message::{DecodeRequest, DecodeResponse};
pub use task::DecodeTask;
pub use worker::DecodeWorker;

pub use recload_codec::{DecodeConfig, ErrorKind};
