//! Approval workflows for clients and hunts. Mutations pulse the matching
//! trigger channel so active subscriptions reflect the change on their next
//! evaluation instead of waiting out a full interval.

use super::SyncService;
use crate::api::error::ApiResult;
use crate::api::params::QueryParams;
use crate::api::types::*;
use crate::prelude::*;
use crate::sync::POLL_INTERVAL;
use crate::sync::poll::{poll, poll_with_trigger};

impl SyncService {
    /// Requests approval to give the current user access to a client.
    pub async fn request_client_approval(
        &self,
        args: &ClientApprovalRequest,
    ) -> ApiResult<ApiClientApproval> {
        let request = ApiCreateClientApprovalArgs {
            client_id: Some(args.client_id.clone()),
            approval: Some(ApiClientApproval {
                reason: Some(args.reason.clone()),
                notified_users: args.approvers.clone(),
                email_cc_addresses: args.cc.clone(),
                expiration_time_us: args.expiration_time_us,
                ..Default::default()
            }),
        };
        let path = format!("/users/me/approvals/client/{}", args.client_id);
        let approval = self.report(self.api().post(&path, &request).await)?;
        self.inner.client_approval_trigger.pulse();
        Ok(approval)
    }

    /// Lists the current user's approvals for a client, newest first.
    pub async fn list_client_approvals(
        &self,
        client_id: &str,
    ) -> ApiResult<Vec<ApiClientApproval>> {
        let path = format!("/users/me/approvals/client/{client_id}");
        let result: ApiListClientApprovalsResult =
            self.report(self.api().get(&path, QueryParams::new()).await)?;
        Ok(result.items)
    }

    pub fn subscribe_to_list_client_approvals(
        &self,
        client_id: &str,
    ) -> BoxStream<'static, ApiResult<Vec<ApiClientApproval>>> {
        let observer = self.inner.client_approval_trigger.observe();
        let service = self.clone();
        let client_id = client_id.to_owned();
        poll_with_trigger(POLL_INTERVAL, observer, move || {
            let service = service.clone();
            let client_id = client_id.clone();
            async move { service.list_client_approvals(&client_id).await }
        })
        .boxed()
    }

    pub async fn fetch_client_approval(
        &self,
        key: &ClientApprovalKey,
    ) -> ApiResult<ApiClientApproval> {
        let path = format!(
            "/users/{}/approvals/client/{}/{}",
            key.requestor, key.client_id, key.approval_id
        );
        self.report(self.api().get(&path, QueryParams::new()).await)
    }

    pub fn subscribe_to_client_approval(
        &self,
        key: &ClientApprovalKey,
    ) -> BoxStream<'static, ApiResult<ApiClientApproval>> {
        let service = self.clone();
        let key = key.clone();
        poll(POLL_INTERVAL, move || {
            let service = service.clone();
            let key = key.clone();
            async move { service.fetch_client_approval(&key).await }
        })
        .boxed()
    }

    pub async fn grant_client_approval(
        &self,
        key: &ClientApprovalKey,
    ) -> ApiResult<ApiClientApproval> {
        let path = format!(
            "/users/{}/approvals/client/{}/{}/actions/grant",
            key.requestor, key.client_id, key.approval_id
        );
        self.api().post(&path, &serde_json::json!({})).await
    }

    pub async fn list_recent_client_approvals(
        &self,
        count: Option<u64>,
    ) -> ApiResult<Vec<ApiClientApproval>> {
        let params = QueryParams::new().set_opt("count", count);
        let result: ApiListClientApprovalsResult = self
            .report(self.api().get("/users/me/approvals/client", params).await)?;
        Ok(result.items)
    }

    /// Requests approval to run a hunt.
    pub async fn request_hunt_approval(
        &self,
        args: &HuntApprovalRequest,
    ) -> ApiResult<ApiHuntApproval> {
        let request = ApiCreateHuntApprovalArgs {
            hunt_id: Some(args.hunt_id.clone()),
            approval: Some(ApiHuntApproval {
                reason: Some(args.reason.clone()),
                notified_users: args.approvers.clone(),
                email_cc_addresses: args.cc.clone(),
                ..Default::default()
            }),
        };
        let path = format!("/users/me/approvals/hunt/{}", args.hunt_id);
        let approval = self.report(self.api().post(&path, &request).await)?;
        self.inner.hunt_approval_trigger.pulse();
        Ok(approval)
    }

    /// Lists the current user's approvals for a hunt, newest first.
    pub async fn list_hunt_approvals(&self, hunt_id: &str) -> ApiResult<Vec<ApiHuntApproval>> {
        let path = format!("/users/me/approvals/hunt/{hunt_id}");
        let result: ApiListHuntApprovalsResult =
            self.report(self.api().get(&path, QueryParams::new()).await)?;
        Ok(result.items)
    }

    pub fn subscribe_to_list_hunt_approvals(
        &self,
        hunt_id: &str,
    ) -> BoxStream<'static, ApiResult<Vec<ApiHuntApproval>>> {
        let observer = self.inner.hunt_approval_trigger.observe();
        let service = self.clone();
        let hunt_id = hunt_id.to_owned();
        poll_with_trigger(POLL_INTERVAL, observer, move || {
            let service = service.clone();
            let hunt_id = hunt_id.clone();
            async move { service.list_hunt_approvals(&hunt_id).await }
        })
        .boxed()
    }

    pub async fn fetch_hunt_approval(&self, key: &HuntApprovalKey) -> ApiResult<ApiHuntApproval> {
        let path = format!(
            "/users/{}/approvals/hunt/{}/{}",
            key.requestor, key.hunt_id, key.approval_id
        );
        self.report(self.api().get(&path, QueryParams::new()).await)
    }

    pub fn subscribe_to_hunt_approval(
        &self,
        key: &HuntApprovalKey,
    ) -> BoxStream<'static, ApiResult<ApiHuntApproval>> {
        let service = self.clone();
        let key = key.clone();
        poll(POLL_INTERVAL, move || {
            let service = service.clone();
            let key = key.clone();
            async move { service.fetch_hunt_approval(&key).await }
        })
        .boxed()
    }

    pub async fn grant_hunt_approval(&self, key: &HuntApprovalKey) -> ApiResult<ApiHuntApproval> {
        let path = format!(
            "/users/{}/approvals/hunt/{}/{}/actions/grant",
            key.requestor, key.hunt_id, key.approval_id
        );
        self.api().post(&path, &serde_json::json!({})).await
    }
}
