//! Wire schema of the remote-management API.
//!
//! Conventions: field names are camelCase on the wire; big integers travel as
//! decimal strings everywhere (never as native JSON numbers, to avoid
//! precision loss above 2^53) and map to `u64`/`i64` via `DisplayFromStr`;
//! timestamps are microseconds since epoch; discriminated-union payloads
//! (flow/hunt arguments) carry a `@type` tag and stay `serde_json::Value`
//! until a caller interprets them. Every optional field is an explicit
//! `Option`, defaulted once at the facade boundary.

use serde_json::Value;
use serde_with::{DisplayFromStr, serde_as, skip_serializing_none};

use crate::prelude::*;
use crate::sync::operation::OperationStatus;

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiClientInformation {
    pub client_name: Option<String>,
    pub client_version: Option<u32>,
    pub build_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiUname {
    pub system: Option<String>,
    pub release: Option<String>,
    pub version: Option<String>,
    pub machine: Option<String>,
    pub fqdn: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiKnowledgeBase {
    pub os: Option<String>,
    pub fqdn: Option<String>,
    pub os_release: Option<String>,
    pub os_major_version: Option<u32>,
    pub os_minor_version: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientLabel {
    pub owner: Option<String>,
    pub name: Option<String>,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiClient {
    pub client_id: Option<String>,
    pub urn: Option<String>,
    pub agent_info: Option<ApiClientInformation>,
    pub knowledge_base: Option<ApiKnowledgeBase>,
    pub os_info: Option<ApiUname>,
    pub labels: Vec<ClientLabel>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub first_seen_at: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub last_seen_at: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub last_booted_at: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub memory_size: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub age: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct ApiSearchClientsArgs {
    pub query: String,
    pub offset: Option<u64>,
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiSearchClientsResult {
    pub items: Vec<ApiClient>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiGetClientVersionsResult {
    pub items: Vec<ApiClient>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiListClientsLabelsResult {
    pub items: Vec<ClientLabel>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAddClientsLabelsArgs {
    pub client_ids: Vec<String>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRemoveClientsLabelsArgs {
    pub client_ids: Vec<String>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiUser {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfigOption {
    pub name: Option<String>,
    pub is_redacted: Option<bool>,
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiUiConfig {
    pub heading: Option<String>,
    pub report_url: Option<String>,
    pub help_url: Option<String>,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApproverSuggestion {
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiListApproverSuggestionsResult {
    pub suggestions: Vec<ApproverSuggestion>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiExplainGlobExpressionArgs {
    pub glob_expression: String,
    pub example_count: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobComponentExplanation {
    pub glob_expression: Option<String>,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiExplainGlobExpressionResult {
    pub components: Vec<GlobComponentExplanation>,
}

// ---------------------------------------------------------------------------
// Approvals
// ---------------------------------------------------------------------------

/// Identity of one client approval. Every component is required; callers must
/// never infer a missing one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientApprovalKey {
    pub client_id: String,
    pub requestor: String,
    pub approval_id: String,
}

/// Identity of one hunt approval.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HuntApprovalKey {
    pub hunt_id: String,
    pub requestor: String,
    pub approval_id: String,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiClientApproval {
    pub id: Option<String>,
    pub subject: Option<ApiClient>,
    pub reason: Option<String>,
    pub is_valid: Option<bool>,
    pub is_valid_message: Option<String>,
    pub notified_users: Vec<String>,
    pub approvers: Vec<String>,
    pub email_cc_addresses: Vec<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub expiration_time_us: Option<u64>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCreateClientApprovalArgs {
    pub client_id: Option<String>,
    pub approval: Option<ApiClientApproval>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiListClientApprovalsResult {
    pub items: Vec<ApiClientApproval>,
}

/// Caller-supplied arguments for requesting client access.
#[derive(Debug, Clone, Default)]
pub struct ClientApprovalRequest {
    pub client_id: String,
    pub reason: String,
    pub approvers: Vec<String>,
    pub cc: Vec<String>,
    pub expiration_time_us: Option<u64>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiHuntApproval {
    pub id: Option<String>,
    pub subject: Option<ApiHunt>,
    pub reason: Option<String>,
    pub is_valid: Option<bool>,
    pub is_valid_message: Option<String>,
    pub notified_users: Vec<String>,
    pub approvers: Vec<String>,
    pub email_cc_addresses: Vec<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCreateHuntApprovalArgs {
    pub hunt_id: Option<String>,
    pub approval: Option<ApiHuntApproval>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiListHuntApprovalsResult {
    pub items: Vec<ApiHuntApproval>,
}

/// Caller-supplied arguments for requesting hunt access.
#[derive(Debug, Clone, Default)]
pub struct HuntApprovalRequest {
    pub hunt_id: String,
    pub reason: String,
    pub approvers: Vec<String>,
    pub cc: Vec<String>,
}

/// Platform-wide approval settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovalConfig {
    pub optional_cc_email: Option<String>,
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowState {
    Running,
    Terminated,
    Error,
    ClientCrashed,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiFlow {
    pub flow_id: Option<String>,
    pub client_id: Option<String>,
    pub name: Option<String>,
    pub creator: Option<String>,
    pub args: Option<Value>,
    pub progress: Option<Value>,
    pub state: Option<FlowState>,
    pub error_description: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub started_at: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub last_active_at: Option<u64>,
}

/// Arguments of the flow listing call. `min_started_at`/`max_started_at` are
/// microseconds since epoch.
#[derive(Debug, Clone, Default)]
pub struct ApiListFlowsArgs {
    pub client_id: String,
    pub offset: Option<u64>,
    pub count: Option<u64>,
    pub top_flows_only: Option<bool>,
    pub human_flows_only: Option<bool>,
    pub min_started_at: Option<i64>,
    pub max_started_at: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiListFlowsResult {
    pub items: Vec<ApiFlow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiFlowDescriptor {
    pub name: Option<String>,
    pub friendly_name: Option<String>,
    pub category: Option<String>,
    pub default_args: Option<Value>,
    pub block_hunt_creation: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiListFlowDescriptorsResult {
    pub items: Vec<ApiFlowDescriptor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArtifactDescriptor {
    pub artifact: Option<Value>,
    pub is_custom: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiListArtifactsResult {
    pub items: Vec<ArtifactDescriptor>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiOutputPluginDescriptor {
    pub name: Option<String>,
    pub description: Option<String>,
    pub args_type: Option<String>,
    pub plugin_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiListOutputPluginDescriptorsResult {
    pub items: Vec<ApiOutputPluginDescriptor>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiFlowReference {
    pub client_id: Option<String>,
    pub flow_id: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCreateFlowArgs {
    pub client_id: Option<String>,
    pub flow: Option<ApiFlow>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiFlowResult {
    pub payload: Option<Value>,
    pub payload_type: Option<String>,
    pub tag: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub timestamp: Option<u64>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiListFlowResultsResult {
    pub items: Vec<ApiFlowResult>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub total_count: Option<u64>,
}

/// Parameters of the flow results listing call.
#[derive(Debug, Clone, Default)]
pub struct FlowResultsQuery {
    pub client_id: String,
    pub flow_id: String,
    pub offset: Option<u64>,
    pub count: u64,
    pub with_type: Option<String>,
    pub with_tag: Option<String>,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiScheduledFlow {
    pub scheduled_flow_id: Option<String>,
    pub client_id: Option<String>,
    pub creator: Option<String>,
    pub flow_name: Option<String>,
    pub flow_args: Option<Value>,
    pub error: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub create_time: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiListScheduledFlowsResult {
    pub scheduled_flows: Vec<ApiScheduledFlow>,
}

// ---------------------------------------------------------------------------
// Hunts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiHuntState {
    Paused,
    Started,
    Stopped,
    Completed,
}

impl ApiHuntState {
    pub fn as_wire_str(self) -> &'static str {
        match self {
            ApiHuntState::Paused => "PAUSED",
            ApiHuntState::Started => "STARTED",
            ApiHuntState::Stopped => "STOPPED",
            ApiHuntState::Completed => "COMPLETED",
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiHuntReference {
    pub hunt_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForemanClientRuleSet {
    pub match_mode: Option<String>,
    pub rules: Vec<Value>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputPluginDescriptor {
    pub plugin_name: Option<String>,
    pub args: Option<Value>,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HuntRunnerArgs {
    pub description: Option<String>,
    pub client_rate: Option<f64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub client_limit: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub crash_limit: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub expiry_time: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub avg_results_per_client_limit: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub avg_cpu_seconds_per_client_limit: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub avg_network_bytes_per_client_limit: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub per_client_cpu_limit: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub per_client_network_limit_bytes: Option<u64>,
    pub output_plugins: Vec<OutputPluginDescriptor>,
    pub client_rule_set: Option<ForemanClientRuleSet>,
}

/// Caller-supplied safety limits for a new hunt, in native integer form. The
/// wire rendering converts each big integer to decimal text.
#[derive(Debug, Clone, Default)]
pub struct SafetyLimits {
    pub client_rate: f64,
    pub client_limit: Option<u64>,
    pub crash_limit: Option<u64>,
    pub expiry_time: Option<u64>,
    pub avg_results_per_client_limit: Option<u64>,
    pub avg_cpu_seconds_per_client_limit: Option<u64>,
    pub avg_network_bytes_per_client_limit: Option<u64>,
    pub per_client_cpu_limit: Option<u64>,
    pub per_client_network_bytes_limit: Option<u64>,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiHunt {
    pub hunt_id: Option<String>,
    pub name: Option<String>,
    pub state: Option<ApiHuntState>,
    pub state_reason: Option<String>,
    pub flow_name: Option<String>,
    pub flow_args: Option<Value>,
    pub hunt_runner_args: Option<HuntRunnerArgs>,
    pub creator: Option<String>,
    pub description: Option<String>,
    pub is_robot: Option<bool>,
    pub client_rate: Option<f64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub client_limit: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub created: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub init_start_time: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub last_start_time: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub all_clients_count: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub completed_clients_count: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub remaining_clients_count: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub clients_with_results_count: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub crashed_clients_count: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub failed_clients_count: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub results_count: Option<u64>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCreateHuntArgs {
    pub flow_name: Option<String>,
    pub flow_args: Option<Value>,
    pub hunt_runner_args: Option<HuntRunnerArgs>,
    pub original_flow: Option<ApiFlowReference>,
    pub original_hunt: Option<ApiHuntReference>,
}

#[derive(Debug, Clone, Default)]
pub struct ApiListHuntsArgs {
    pub offset: Option<u64>,
    pub count: Option<u64>,
    pub robot_filter: Option<String>,
    pub with_state: Option<ApiHuntState>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiListHuntsResult {
    pub items: Vec<ApiHunt>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub total_count: Option<u64>,
}

/// Patchable hunt fields, in native integer form.
#[derive(Debug, Clone, Default)]
pub struct HuntPatch {
    pub state: Option<ApiHuntState>,
    pub client_limit: Option<u64>,
    pub client_rate: Option<f64>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiHuntResult {
    pub client_id: Option<String>,
    pub payload: Option<Value>,
    pub payload_type: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub timestamp: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct ApiListHuntResultsArgs {
    pub hunt_id: String,
    pub offset: Option<u64>,
    pub count: Option<u64>,
    pub with_type: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiListHuntResultsResult {
    pub items: Vec<ApiHuntResult>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub total_count: Option<u64>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiHuntError {
    pub client_id: Option<String>,
    pub log_message: Option<String>,
    pub backtrace: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub timestamp: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct ApiListHuntErrorsArgs {
    pub hunt_id: String,
    pub offset: Option<u64>,
    pub count: Option<u64>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiListHuntErrorsResult {
    pub items: Vec<ApiHuntError>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub total_count: Option<u64>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HuntResultsTypeCount {
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiCountHuntResultsByTypeResult {
    pub items: Vec<HuntResultsTypeCount>,
}

#[derive(Debug, Clone, Default)]
pub struct ApiGetHuntClientCompletionStatsArgs {
    pub hunt_id: String,
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SampleFloat {
    pub x_value: Option<f64>,
    pub y_value: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiGetHuntClientCompletionStatsResult {
    pub start_points: Vec<SampleFloat>,
    pub complete_points: Vec<SampleFloat>,
}

// ---------------------------------------------------------------------------
// Virtual file system
// ---------------------------------------------------------------------------

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiFile {
    pub name: Option<String>,
    pub path: Option<String>,
    pub is_directory: Option<bool>,
    pub stat: Option<Value>,
    pub hash: Option<Value>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub age: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub last_collected: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub last_collected_size: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiGetFileDetailsResult {
    pub file: Option<ApiFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "UTF_8")]
    Utf8,
    #[serde(rename = "UTF_16")]
    Utf16,
    #[serde(rename = "LATIN_1")]
    Latin1,
}

impl TextEncoding {
    pub fn as_wire_str(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF_8",
            TextEncoding::Utf16 => "UTF_16",
            TextEncoding::Latin1 => "LATIN_1",
        }
    }
}

/// Arguments of the file text lookup.
#[derive(Debug, Clone, Default)]
pub struct GetFileTextOptions {
    pub offset: Option<u64>,
    pub length: Option<u64>,
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
    pub encoding: Option<TextEncoding>,
}

/// Arguments of the file blob lookup.
#[derive(Debug, Clone, Default)]
pub struct GetFileBlobOptions {
    pub offset: Option<u64>,
    pub length: Option<u64>,
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiGetFileTextResult {
    pub content: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub total_size: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiBrowseFilesystemEntry {
    pub path: Option<String>,
    pub children: Vec<ApiFile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiBrowseFilesystemResult {
    pub items: Vec<ApiBrowseFilesystemEntry>,
}

/// State of a server-side asynchronous VFS operation. `Running` is the
/// sentinel the status poll loops on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VfsOperationState {
    Running,
    Finished,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUpdateVfsFileContentArgs {
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiUpdateVfsFileContentResult {
    pub operation_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiGetVfsFileContentUpdateStateResult {
    pub state: Option<VfsOperationState>,
}

impl OperationStatus for ApiGetVfsFileContentUpdateStateResult {
    fn is_running(&self) -> bool {
        self.state == Some(VfsOperationState::Running)
    }
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCreateVfsRefreshOperationArgs {
    pub file_path: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub max_depth: Option<u64>,
    pub notify_user: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiCreateVfsRefreshOperationResult {
    pub operation_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiGetVfsRefreshOperationStateResult {
    pub state: Option<VfsOperationState>,
}

impl OperationStatus for ApiGetVfsRefreshOperationStateResult {
    fn is_running(&self) -> bool {
        self.state == Some(VfsOperationState::Running)
    }
}

// ---------------------------------------------------------------------------
// Miscellaneous
// ---------------------------------------------------------------------------

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiBinary {
    pub path: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub size: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub timestamp: Option<u64>,
    pub has_valid_signature: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiListBinariesResult {
    pub items: Vec<ApiBinary>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIncrementCounterMetricArgs {
    pub metric_name: String,
    pub field_values: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiIncrementCounterMetricResult {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_integers_parse_from_decimal_strings() {
        let hunt: ApiHunt = serde_json::from_str(
            r#"{"huntId": "H1", "clientLimit": "9007199254740993", "clientRate": 20.5}"#,
        )
        .unwrap();
        assert_eq!(hunt.client_limit, Some(9007199254740993));
        assert_eq!(hunt.client_rate, Some(20.5));
    }

    #[test]
    fn big_integers_serialize_as_decimal_strings() {
        let args = HuntRunnerArgs {
            client_limit: Some(9007199254740993),
            ..Default::default()
        };
        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(json["clientLimit"], "9007199254740993");
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let args = ApiCreateHuntArgs {
            flow_name: Some("Collector".to_owned()),
            ..Default::default()
        };
        let json = serde_json::to_value(&args).unwrap();
        assert!(json.get("originalFlow").is_none());
        assert!(json.get("originalHunt").is_none());
    }

    #[test]
    fn operation_states_use_the_running_sentinel() {
        let state: ApiGetVfsRefreshOperationStateResult =
            serde_json::from_str(r#"{"state": "RUNNING"}"#).unwrap();
        assert!(state.is_running());

        let state: ApiGetVfsRefreshOperationStateResult =
            serde_json::from_str(r#"{"state": "FINISHED"}"#).unwrap();
        assert!(!state.is_running());
    }

    #[test]
    fn unknown_state_counts_as_not_running() {
        let state = ApiGetVfsFileContentUpdateStateResult { state: None };
        assert!(!state.is_running());
    }
}
