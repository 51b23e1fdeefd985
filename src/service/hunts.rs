//! Hunt operations and subscriptions. Hunt results and errors are
//! approval-gated the same way flow listings are.

use super::SyncService;
use crate::api::error::{ApiError, ApiResult};
use crate::api::params::QueryParams;
use crate::api::types::*;
use crate::prelude::*;
use crate::sync::POLL_INTERVAL;
use crate::sync::poll::poll;

/// A flow paired with the `@type` tag of its argument payload, used as the
/// template when turning a one-off flow into a fleet-wide hunt.
#[derive(Debug, Clone)]
pub struct FlowWithArgType {
    pub flow: ApiFlow,
    pub flow_arg_type: Option<String>,
}

impl SyncService {
    /// Creates a hunt from either an existing flow or an existing hunt.
    pub async fn create_hunt(
        &self,
        description: &str,
        flow: Option<&FlowWithArgType>,
        original_hunt: Option<&ApiHunt>,
        safety_limits: &SafetyLimits,
        rules: ForemanClientRuleSet,
        output_plugins: Vec<OutputPluginDescriptor>,
        original_hunt_id: Option<&str>,
    ) -> ApiResult<ApiHunt> {
        if flow.is_none() && original_hunt.is_none() {
            return Err(ApiError::Contract(
                "a hunt must be based on either an existing flow or an existing hunt".to_owned(),
            ));
        }

        let hunt_runner_args = HuntRunnerArgs {
            description: Some(description.to_owned()),
            client_rate: Some(safety_limits.client_rate),
            client_limit: safety_limits.client_limit,
            crash_limit: safety_limits.crash_limit,
            expiry_time: safety_limits.expiry_time,
            avg_results_per_client_limit: safety_limits.avg_results_per_client_limit,
            avg_cpu_seconds_per_client_limit: safety_limits.avg_cpu_seconds_per_client_limit,
            avg_network_bytes_per_client_limit: safety_limits.avg_network_bytes_per_client_limit,
            per_client_cpu_limit: safety_limits.per_client_cpu_limit,
            per_client_network_limit_bytes: safety_limits.per_client_network_bytes_limit,
            output_plugins,
            client_rule_set: Some(rules),
        };

        let flow_name = flow
            .and_then(|flow| flow.flow.name.clone())
            .or_else(|| original_hunt.and_then(|hunt| hunt.flow_name.clone()));
        let flow_args = match flow {
            Some(flow) => {
                let mut args = serde_json::Map::new();
                if let Some(arg_type) = &flow.flow_arg_type {
                    args.insert("@type".to_owned(), serde_json::Value::from(arg_type.clone()));
                }
                if let Some(serde_json::Value::Object(map)) = &flow.flow.args {
                    args.extend(map.clone());
                }
                Some(serde_json::Value::Object(args))
            }
            None => original_hunt.and_then(|hunt| hunt.flow_args.clone()),
        };

        let request = ApiCreateHuntArgs {
            flow_name,
            flow_args,
            hunt_runner_args: Some(hunt_runner_args),
            original_flow: match original_hunt_id {
                Some(_) => None,
                None => flow.map(|flow| ApiFlowReference {
                    client_id: flow.flow.client_id.clone(),
                    flow_id: flow.flow.flow_id.clone(),
                }),
            },
            original_hunt: original_hunt_id.map(|hunt_id| ApiHuntReference {
                hunt_id: Some(hunt_id.to_owned()),
            }),
        };

        self.report(self.api().post("/hunts", &request).await)
    }

    pub async fn fetch_hunt(&self, hunt_id: &str) -> ApiResult<ApiHunt> {
        let path = format!("/hunts/{hunt_id}");
        self.report(self.api().get(&path, QueryParams::new()).await)
    }

    pub fn subscribe_to_hunt(&self, hunt_id: &str) -> BoxStream<'static, ApiResult<ApiHunt>> {
        let service = self.clone();
        let hunt_id = hunt_id.to_owned();
        poll(POLL_INTERVAL, move || {
            let service = service.clone();
            let hunt_id = hunt_id.clone();
            async move { service.fetch_hunt(&hunt_id).await }
        })
        .boxed()
    }

    pub async fn list_hunts(&self, args: &ApiListHuntsArgs) -> ApiResult<ApiListHuntsResult> {
        let params = QueryParams::new()
            .set_opt("offset", args.offset)
            .set_opt("count", args.count)
            .set_opt("robot_filter", args.robot_filter.as_deref())
            .set_opt("with_state", args.with_state.map(ApiHuntState::as_wire_str))
            .set("with_full_summary", true);
        self.report(self.api().get("/hunts", params).await)
    }

    pub fn subscribe_to_list_hunts(
        &self,
        args: &ApiListHuntsArgs,
    ) -> BoxStream<'static, ApiResult<ApiListHuntsResult>> {
        let service = self.clone();
        let args = args.clone();
        poll(POLL_INTERVAL, move || {
            let service = service.clone();
            let args = args.clone();
            async move { service.list_hunts(&args).await }
        })
        .boxed()
    }

    /// Updates hunt state, client limit and/or client rate.
    pub async fn patch_hunt(&self, hunt_id: &str, patch: &HuntPatch) -> ApiResult<ApiHunt> {
        let body = ApiHunt {
            state: patch.state,
            client_limit: patch.client_limit,
            client_rate: patch.client_rate,
            ..Default::default()
        };
        let path = format!("/hunts/{hunt_id}");
        self.report(self.api().patch(&path, &body).await)
    }

    /// Whether the current user may read this hunt's gated resources. A 403
    /// converts to `false` before it ever reaches a stream.
    pub async fn verify_hunt_access(&self, hunt_id: &str) -> ApiResult<bool> {
        let path = format!("/hunts/{hunt_id}/access");
        let result: ApiResult<serde_json::Value> = self.api().get(&path, QueryParams::new()).await;
        match result {
            Ok(_) => Ok(true),
            Err(err) if err.is_access_denied() => Ok(false),
            Err(err) => self.report(Err(err)),
        }
    }

    pub fn subscribe_to_verify_hunt_access(
        &self,
        hunt_id: &str,
    ) -> BoxStream<'static, ApiResult<bool>> {
        let service = self.clone();
        let hunt_id = hunt_id.to_owned();
        poll(POLL_INTERVAL, move || {
            let service = service.clone();
            let hunt_id = hunt_id.clone();
            async move { service.verify_hunt_access(&hunt_id).await }
        })
        .boxed()
    }

    pub async fn list_results_for_hunt(
        &self,
        args: &ApiListHuntResultsArgs,
    ) -> ApiResult<Vec<ApiHuntResult>> {
        let params = QueryParams::new()
            .set("huntId", args.hunt_id.as_str())
            .set_opt("offset", args.offset)
            .set_opt("count", args.count)
            .set_opt("with_type", args.with_type.as_deref());
        let path = format!("/hunts/{}/results", args.hunt_id);
        let result: ApiListHuntResultsResult = self.report(self.api().get(&path, params).await)?;
        Ok(result.items)
    }

    pub fn subscribe_to_results_for_hunt(
        &self,
        args: &ApiListHuntResultsArgs,
    ) -> BoxStream<'static, ApiResult<Vec<ApiHuntResult>>> {
        let service = self.clone();
        let args = args.clone();
        poll(POLL_INTERVAL, move || {
            let service = service.clone();
            let args = args.clone();
            async move { service.list_results_for_hunt(&args).await }
        })
        .boxed()
    }

    pub async fn list_errors_for_hunt(
        &self,
        args: &ApiListHuntErrorsArgs,
    ) -> ApiResult<Vec<ApiHuntError>> {
        let params = QueryParams::new()
            .set("huntId", args.hunt_id.as_str())
            .set_opt("offset", args.offset)
            .set_opt("count", args.count);
        let path = format!("/hunts/{}/errors", args.hunt_id);
        let result: ApiListHuntErrorsResult = self.report(self.api().get(&path, params).await)?;
        Ok(result.items)
    }

    pub fn subscribe_to_errors_for_hunt(
        &self,
        args: &ApiListHuntErrorsArgs,
    ) -> BoxStream<'static, ApiResult<Vec<ApiHuntError>>> {
        let service = self.clone();
        let args = args.clone();
        poll(POLL_INTERVAL, move || {
            let service = service.clone();
            let args = args.clone();
            async move { service.list_errors_for_hunt(&args).await }
        })
        .boxed()
    }

    pub async fn count_hunt_results_by_type(
        &self,
        hunt_id: &str,
    ) -> ApiResult<ApiCountHuntResultsByTypeResult> {
        let path = format!("/hunts/{hunt_id}/result-counts");
        self.report(self.api().get(&path, QueryParams::new()).await)
    }

    pub fn subscribe_to_hunt_results_count_by_type(
        &self,
        hunt_id: &str,
    ) -> BoxStream<'static, ApiResult<ApiCountHuntResultsByTypeResult>> {
        let service = self.clone();
        let hunt_id = hunt_id.to_owned();
        poll(POLL_INTERVAL, move || {
            let service = service.clone();
            let hunt_id = hunt_id.clone();
            async move { service.count_hunt_results_by_type(&hunt_id).await }
        })
        .boxed()
    }

    pub async fn hunt_client_completion_stats(
        &self,
        args: &ApiGetHuntClientCompletionStatsArgs,
    ) -> ApiResult<ApiGetHuntClientCompletionStatsResult> {
        let params = QueryParams::new().set_opt("size", args.size);
        let path = format!("/hunts/{}/client-completion-stats", args.hunt_id);
        self.report(self.api().get(&path, params).await)
    }

    pub fn subscribe_to_hunt_client_completion_stats(
        &self,
        args: &ApiGetHuntClientCompletionStatsArgs,
    ) -> BoxStream<'static, ApiResult<ApiGetHuntClientCompletionStatsResult>> {
        let service = self.clone();
        let args = args.clone();
        poll(POLL_INTERVAL, move || {
            let service = service.clone();
            let args = args.clone();
            async move { service.hunt_client_completion_stats(&args).await }
        })
        .boxed()
    }
}
