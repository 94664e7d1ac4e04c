//! Client side of the resume bullet service: the remote API, the bounded
//! history log and the view-models a front end renders.

pub mod api;
pub mod error;
pub mod history;
pub mod orchestrator;
pub mod view;

pub use api::{BulletApi, HttpBulletApi};
pub use error::ClientError;
pub use history::{Confirmation, HistoryLog, HistoryStore, HISTORY_LIMIT};
pub use orchestrator::{BulletOrchestrator, InFlight};
