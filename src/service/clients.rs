//! Client search, lookup and subscription operations, plus the small
//! platform-configuration lookups that ride on the same API.

use chrono::{DateTime, TimeZone, Utc};

use super::SyncService;
use crate::api::error::ApiResult;
use crate::api::params::QueryParams;
use crate::api::types::*;
use crate::prelude::*;
use crate::sync::POLL_INTERVAL;
use crate::sync::poll::poll;

impl SyncService {
    /// Searches for clients matching the given query.
    pub async fn search_clients(&self, args: &ApiSearchClientsArgs) -> ApiResult<Vec<ApiClient>> {
        let params = QueryParams::new()
            .set("query", args.query.as_str())
            .set_opt("offset", args.offset)
            .set_opt("count", args.count);
        let result: ApiSearchClientsResult =
            self.report(self.api().get("/clients", params).await)?;
        Ok(result.items)
    }

    pub async fn fetch_client(&self, client_id: &str) -> ApiResult<ApiClient> {
        let path = format!("/clients/{client_id}");
        self.report(self.api().get(&path, QueryParams::new()).await)
    }

    /// Re-fetches the client at the standard cadence.
    pub fn subscribe_to_client(&self, client_id: &str) -> BoxStream<'static, ApiResult<ApiClient>> {
        let service = self.clone();
        let client_id = client_id.to_owned();
        poll(POLL_INTERVAL, move || {
            let service = service.clone();
            let client_id = client_id.clone();
            async move { service.fetch_client(&client_id).await }
        })
        .boxed()
    }

    /// Whether the current user may read this client's gated resources. A 403
    /// converts to `false` before it ever reaches a stream.
    pub async fn verify_client_access(&self, client_id: &str) -> ApiResult<bool> {
        let path = format!("/clients/{client_id}/access");
        let result: ApiResult<serde_json::Value> = self.api().get(&path, QueryParams::new()).await;
        match result {
            Ok(_) => Ok(true),
            Err(err) if err.is_access_denied() => Ok(false),
            Err(err) => self.report(Err(err)),
        }
    }

    pub fn subscribe_to_verify_client_access(
        &self,
        client_id: &str,
    ) -> BoxStream<'static, ApiResult<bool>> {
        let service = self.clone();
        let client_id = client_id.to_owned();
        poll(POLL_INTERVAL, move || {
            let service = service.clone();
            let client_id = client_id.clone();
            async move { service.verify_client_access(&client_id).await }
        })
        .boxed()
    }

    /// Historical snapshots of the client within the given range.
    pub async fn fetch_client_versions(
        &self,
        client_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> ApiResult<Vec<ApiClient>> {
        // If unset, the range starts one second from epoch and ends now.
        let start = start.unwrap_or_else(|| Utc.timestamp_opt(1, 0).unwrap());
        let end = end.unwrap_or_else(Utc::now);
        let params = QueryParams::new().set("start", start).set("end", end);
        let path = format!("/clients/{client_id}/versions");
        let result: ApiGetClientVersionsResult =
            self.report(self.api().get(&path, params).await)?;
        Ok(result.items)
    }

    pub async fn add_client_label(&self, client_id: &str, label: &str) -> ApiResult<()> {
        let body = ApiAddClientsLabelsArgs {
            client_ids: vec![client_id.to_owned()],
            labels: vec![label.to_owned()],
        };
        let result: ApiResult<serde_json::Value> =
            self.api().post("/clients/labels/add", &body).await;
        self.report(result).map(|_| ())
    }

    pub async fn remove_client_label(&self, client_id: &str, label: &str) -> ApiResult<String> {
        let body = ApiRemoveClientsLabelsArgs {
            client_ids: vec![client_id.to_owned()],
            labels: vec![label.to_owned()],
        };
        let result: ApiResult<serde_json::Value> =
            self.api().post("/clients/labels/remove", &body).await;
        self.report(result).map(|_| label.to_owned())
    }

    pub async fn fetch_all_client_labels(&self) -> ApiResult<Vec<ClientLabel>> {
        let result: ApiListClientsLabelsResult = self
            .report(self.api().get("/clients/labels", QueryParams::new()).await)?;
        Ok(result.items)
    }

    pub async fn fetch_current_user(&self) -> ApiResult<ApiUser> {
        self.report(self.api().get("/users/me", QueryParams::new()).await)
    }

    pub async fn suggest_approvers(
        &self,
        username_query: &str,
    ) -> ApiResult<Vec<ApproverSuggestion>> {
        let params = QueryParams::new().set("username_query", username_query);
        let result: ApiListApproverSuggestionsResult = self
            .report(self.api().get("/users/approver-suggestions", params).await)?;
        Ok(result.suggestions)
    }

    /// One string-valued configuration option. The protobuf default empty
    /// string maps to absent.
    async fn fetch_string_config_option(&self, name: &str) -> ApiResult<Option<String>> {
        let path = format!("/config/{name}");
        let option: ApiConfigOption =
            self.report(self.api().get(&path, QueryParams::new()).await)?;
        let value = option
            .value
            .as_ref()
            .and_then(|value| value.get("value"))
            .and_then(|value| value.as_str())
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        Ok(value)
    }

    pub async fn fetch_approval_config(&self) -> ApiResult<ApprovalConfig> {
        let optional_cc_email = self
            .fetch_string_config_option("Email.approval_optional_cc_address")
            .await?;
        Ok(ApprovalConfig { optional_cc_email })
    }

    /// The web authentication type the admin UI is configured with.
    pub async fn fetch_web_auth_type(&self) -> ApiResult<Option<String>> {
        self.fetch_string_config_option("AdminUI.webauth_manager")
            .await
    }

    /// The configured prefix for CLI export-command snippets.
    pub async fn fetch_export_command_prefix(&self) -> ApiResult<Option<String>> {
        self.fetch_string_config_option("AdminUI.export_command")
            .await
    }

    pub async fn fetch_ui_config(&self) -> ApiResult<ApiUiConfig> {
        self.report(self.api().get("/config/ui", QueryParams::new()).await)
    }

    /// Expands a glob expression into per-component example matches.
    pub async fn explain_glob_expression(
        &self,
        client_id: &str,
        glob_expression: &str,
        example_count: u32,
    ) -> ApiResult<Vec<GlobComponentExplanation>> {
        let path = format!("/clients/{client_id}/glob-expressions:explain");
        let args = ApiExplainGlobExpressionArgs {
            glob_expression: glob_expression.to_owned(),
            example_count,
        };
        let result: ApiExplainGlobExpressionResult =
            self.report(self.api().post(&path, &args).await)?;
        Ok(result.components)
    }

    pub async fn list_binaries(&self) -> ApiResult<Vec<ApiBinary>> {
        let result: ApiListBinariesResult = self
            .report(self.api().get("/config/binaries", QueryParams::new()).await)?;
        Ok(result.items)
    }

    pub async fn increase_counter_metric(
        &self,
        args: &ApiIncrementCounterMetricArgs,
    ) -> ApiResult<ApiIncrementCounterMetricResult> {
        self.api().post("/stats/increment_counter", args).await
    }
}
