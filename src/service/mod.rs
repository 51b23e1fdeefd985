//! The synchronization facade: one subscribe/mutate surface per resource
//! kind, wired so that mutations nudge the matching subscriptions through
//! per-kind trigger channels.

pub mod approvals;
pub mod clients;
pub mod flows;
pub mod hunts;
pub mod notify;
pub mod urls;
pub mod vfs;

use tokio::sync::OnceCell;

use crate::api::error::ApiResult;
use crate::api::transport::{Api, HttpTransport, ReqwestTransport};
use crate::api::types::ApiFlowDescriptor;
use crate::prelude::*;
use crate::settings::Settings;
use crate::sync::trigger::TriggerSource;
use self::notify::{LogNotificationSink, NotificationSink};

/// Keeps consumers synchronized with server-side state. Cheap to clone; all
/// clones share the transport, the notification sink, the descriptor cache
/// and the trigger channels.
#[derive(Clone)]
pub struct SyncService {
    inner: Arc<Inner>,
}

pub(crate) struct Inner {
    pub(crate) api: Api,
    pub(crate) sink: Arc<dyn NotificationSink>,
    /// Flow descriptors change only on server redeploy; fetched at most once.
    pub(crate) flow_descriptors: OnceCell<Vec<ApiFlowDescriptor>>,
    pub(crate) client_approval_trigger: TriggerSource,
    pub(crate) hunt_approval_trigger: TriggerSource,
    pub(crate) scheduled_flows_trigger: TriggerSource,
    pub(crate) flows_trigger: TriggerSource,
}

impl SyncService {
    pub fn new(transport: Arc<dyn HttpTransport>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                api: Api::new(transport),
                sink,
                flow_descriptors: OnceCell::new(),
                client_approval_trigger: TriggerSource::new(),
                hunt_approval_trigger: TriggerSource::new(),
                scheduled_flows_trigger: TriggerSource::new(),
                flows_trigger: TriggerSource::new(),
            }),
        }
    }

    /// Production wiring: reqwest transport plus the log-backed sink.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let transport = ReqwestTransport::new(settings)?;
        Ok(Self::new(
            Arc::new(transport),
            Arc::new(LogNotificationSink),
        ))
    }

    pub(crate) fn api(&self) -> &Api {
        &self.inner.api
    }

    /// Dual-path failure surfacing: the sink gets a human-readable message,
    /// the caller still gets the original typed failure.
    pub(crate) fn report<T>(&self, result: ApiResult<T>) -> ApiResult<T> {
        if let Err(err) = &result {
            self.inner.sink.notify(&err.display_message());
        }
        result
    }
}
