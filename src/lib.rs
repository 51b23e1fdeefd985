//! Client-side synchronization engine for a remote-management platform.
//!
//! The server owns long-lived entities (clients, approvals, flows, hunts,
//! virtual-file-system entries) that change asynchronously. This crate keeps a
//! consumer in sync with them by polling: every subscription is a lazy,
//! infinite stream that re-fetches its resource at a fixed cadence, collapses
//! overlapping requests, and can be nudged out-of-band after a mutation so the
//! change becomes visible without waiting for the next tick.

pub mod api;
pub mod prelude;
pub mod service;
pub mod settings;
pub mod sync;

pub use api::error::{ApiError, ApiResult, ErrorKind, FailedResponse};
pub use api::params::{PathType, QueryParams};
pub use api::transport::{
    Api, ApiRequest, HttpTransport, Method, RawResponse, ReqwestTransport, URL_PREFIX,
};
pub use service::hunts::FlowWithArgType;
pub use service::notify::{LogNotificationSink, NotificationSink};
pub use service::{SyncService, urls};
pub use settings::Settings;
pub use sync::POLL_INTERVAL;
pub use sync::operation::{Completed, OperationStatus, await_operation};
pub use sync::poll::{poll, poll_with_trigger};
pub use sync::trigger::{TriggerObserver, TriggerSource};
