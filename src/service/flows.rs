//! Flow and scheduled-flow operations. Flow listings are approval-gated: a
//! 403 surfaces as a typed access-denied failure so callers can prompt for an
//! approval instead of showing a generic failure banner.

use serde_json::Value;

use super::SyncService;
use crate::api::error::{ApiError, ApiResult};
use crate::api::params::QueryParams;
use crate::api::types::*;
use crate::prelude::*;
use crate::sync::POLL_INTERVAL;
use crate::sync::poll::{poll, poll_with_trigger};

impl SyncService {
    /// Descriptors of all startable flows. Fetched at most once per service;
    /// later calls return the cached listing.
    pub async fn list_flow_descriptors(&self) -> ApiResult<Vec<ApiFlowDescriptor>> {
        self.inner
            .flow_descriptors
            .get_or_try_init(|| async {
                let result: ApiListFlowDescriptorsResult = self
                    .report(self.api().get("/flows/descriptors", QueryParams::new()).await)?;
                Ok(result.items)
            })
            .await
            .cloned()
    }

    async fn find_flow_descriptor(&self, flow_name: &str) -> ApiResult<ApiFlowDescriptor> {
        let descriptors = self.list_flow_descriptors().await?;
        descriptors
            .into_iter()
            .find(|descriptor| descriptor.name.as_deref() == Some(flow_name))
            .ok_or_else(|| {
                ApiError::Contract(format!("flow descriptors do not contain {flow_name}"))
            })
    }

    /// Grafts the descriptor's `@type` tag onto the caller's argument object
    /// so the payload identifies its concrete shape on the wire.
    fn tagged_flow_args(descriptor: &ApiFlowDescriptor, flow_args: Value) -> Value {
        let mut args = serde_json::Map::new();
        if let Some(tag) = descriptor
            .default_args
            .as_ref()
            .and_then(|defaults| defaults.get("@type"))
        {
            args.insert("@type".to_owned(), tag.clone());
        }
        if let Value::Object(map) = flow_args {
            args.extend(map);
        }
        Value::Object(args)
    }

    pub async fn fetch_flow(&self, client_id: &str, flow_id: &str) -> ApiResult<ApiFlow> {
        let path = format!("/clients/{client_id}/flows/{flow_id}");
        self.report(self.api().get(&path, QueryParams::new()).await)
    }

    pub async fn list_flows_for_client(&self, args: &ApiListFlowsArgs) -> ApiResult<Vec<ApiFlow>> {
        let params = QueryParams::new()
            .set_opt("offset", args.offset)
            .set_opt("count", args.count)
            .set_opt("top_flows_only", args.top_flows_only)
            .set_opt("min_started_at", args.min_started_at)
            .set_opt("max_started_at", args.max_started_at)
            .set_opt("human_flows_only", args.human_flows_only);
        let path = format!("/clients/{}/flows", args.client_id);
        let result: ApiListFlowsResult = self.report(self.api().get(&path, params).await)?;
        Ok(result.items)
    }

    /// Lists the latest flows for the client at the standard cadence; starting
    /// or cancelling a flow forces an immediate extra evaluation.
    pub fn subscribe_to_flows_for_client(
        &self,
        args: &ApiListFlowsArgs,
    ) -> BoxStream<'static, ApiResult<Vec<ApiFlow>>> {
        let observer = self.inner.flows_trigger.observe();
        let service = self.clone();
        let args = args.clone();
        poll_with_trigger(POLL_INTERVAL, observer, move || {
            let service = service.clone();
            let args = args.clone();
            async move { service.list_flows_for_client(&args).await }
        })
        .boxed()
    }

    /// Starts a flow on the given client.
    pub async fn start_flow(
        &self,
        client_id: &str,
        flow_name: &str,
        flow_args: Value,
    ) -> ApiResult<ApiFlow> {
        let descriptor = self.find_flow_descriptor(flow_name).await?;
        let request = ApiCreateFlowArgs {
            client_id: Some(client_id.to_owned()),
            flow: Some(ApiFlow {
                name: Some(flow_name.to_owned()),
                args: Some(Self::tagged_flow_args(&descriptor, flow_args)),
                ..Default::default()
            }),
        };
        let path = format!("/clients/{client_id}/flows");
        let flow = self.report(self.api().post(&path, &request).await)?;
        self.inner.flows_trigger.pulse();
        Ok(flow)
    }

    /// Schedules a flow to start once the client comes online.
    pub async fn schedule_flow(
        &self,
        client_id: &str,
        flow_name: &str,
        flow_args: Value,
    ) -> ApiResult<ApiScheduledFlow> {
        let descriptor = self.find_flow_descriptor(flow_name).await?;
        let request = ApiCreateFlowArgs {
            client_id: Some(client_id.to_owned()),
            flow: Some(ApiFlow {
                name: Some(flow_name.to_owned()),
                args: Some(Self::tagged_flow_args(&descriptor, flow_args)),
                ..Default::default()
            }),
        };
        let path = format!("/clients/{client_id}/scheduled-flows");
        let scheduled = self.report(self.api().post(&path, &request).await)?;
        self.inner.scheduled_flows_trigger.pulse();
        Ok(scheduled)
    }

    pub async fn cancel_flow(&self, client_id: &str, flow_id: &str) -> ApiResult<ApiFlow> {
        let path = format!("/clients/{client_id}/flows/{flow_id}/actions/cancel");
        let flow = self.report(self.api().post(&path, &serde_json::json!({})).await)?;
        self.inner.flows_trigger.pulse();
        Ok(flow)
    }

    pub async fn unschedule_flow(
        &self,
        client_id: &str,
        scheduled_flow_id: &str,
    ) -> ApiResult<()> {
        let path = format!("/clients/{client_id}/scheduled-flows/{scheduled_flow_id}");
        self.report(self.api().delete(&path).await)?;
        self.inner.scheduled_flows_trigger.pulse();
        Ok(())
    }

    /// Lists flows scheduled on the client by the given user.
    pub async fn list_scheduled_flows(
        &self,
        client_id: &str,
        creator: &str,
    ) -> ApiResult<Vec<ApiScheduledFlow>> {
        let path = format!("/clients/{client_id}/scheduled-flows/{creator}");
        let result: ApiListScheduledFlowsResult =
            self.report(self.api().get(&path, QueryParams::new()).await)?;
        Ok(result.scheduled_flows)
    }

    pub fn subscribe_to_scheduled_flows(
        &self,
        client_id: &str,
        creator: &str,
    ) -> BoxStream<'static, ApiResult<Vec<ApiScheduledFlow>>> {
        let observer = self.inner.scheduled_flows_trigger.observe();
        let service = self.clone();
        let client_id = client_id.to_owned();
        let creator = creator.to_owned();
        poll_with_trigger(POLL_INTERVAL, observer, move || {
            let service = service.clone();
            let client_id = client_id.clone();
            let creator = creator.clone();
            async move { service.list_scheduled_flows(&client_id, &creator).await }
        })
        .boxed()
    }

    pub async fn list_results_for_flow(
        &self,
        query: &FlowResultsQuery,
    ) -> ApiResult<Vec<ApiFlowResult>> {
        let params = QueryParams::new()
            .set("offset", query.offset.unwrap_or(0))
            .set("count", query.count)
            .set_opt("with_tag", query.with_tag.as_deref())
            .set_opt("with_type", query.with_type.as_deref());
        let path = format!(
            "/clients/{}/flows/{}/results",
            query.client_id, query.flow_id
        );
        let result: ApiListFlowResultsResult = self.report(self.api().get(&path, params).await)?;
        Ok(result.items)
    }

    /// Continuously lists results for the given flow.
    pub fn subscribe_to_results_for_flow(
        &self,
        query: &FlowResultsQuery,
    ) -> BoxStream<'static, ApiResult<Vec<ApiFlowResult>>> {
        let service = self.clone();
        let query = query.clone();
        poll(POLL_INTERVAL, move || {
            let service = service.clone();
            let query = query.clone();
            async move { service.list_results_for_flow(&query).await }
        })
        .boxed()
    }

    pub async fn list_artifact_descriptors(&self) -> ApiResult<Vec<ArtifactDescriptor>> {
        let result: ApiListArtifactsResult =
            self.report(self.api().get("/artifacts", QueryParams::new()).await)?;
        Ok(result.items)
    }

    pub async fn list_output_plugin_descriptors(
        &self,
    ) -> ApiResult<Vec<ApiOutputPluginDescriptor>> {
        let result: ApiListOutputPluginDescriptorsResult = self
            .report(self.api().get("/output-plugins/all", QueryParams::new()).await)?;
        Ok(result.items)
    }
}
