//! Virtual-file-system lookups and the two operation-completion workflows
//! (directory refresh, file recollection).
//!
//! File text and blob lookups tolerate absence: a 404 means the entry was
//! never collected and yields `None` instead of a failure.

use bytes::Bytes;
use chrono::{DateTime, Utc};

use super::SyncService;
use crate::api::error::{ApiError, ApiResult, not_found_to};
use crate::api::params::{PathType, QueryParams, encode_path_segments, vfs_path};
use crate::api::types::*;
use crate::sync::POLL_INTERVAL;
use crate::sync::operation::await_operation;

impl SyncService {
    pub async fn get_file_details(
        &self,
        client_id: &str,
        path_type: PathType,
        path: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> ApiResult<ApiFile> {
        let vfs = vfs_path(path_type, path, true);
        let params = QueryParams::new().set_opt("timestamp", timestamp);
        let path = format!("/clients/{client_id}/vfs-details{vfs}");
        let result: ApiGetFileDetailsResult = self.report(self.api().get(&path, params).await)?;
        Ok(result.file.unwrap_or_default())
    }

    /// Collected text contents of a VFS file, or `None` if the entry does not
    /// exist at all.
    pub async fn get_file_text(
        &self,
        client_id: &str,
        path_type: PathType,
        path: &str,
        opts: &GetFileTextOptions,
    ) -> ApiResult<Option<ApiGetFileTextResult>> {
        let vfs = vfs_path(path_type, path, true);
        let params = QueryParams::new()
            .set(
                "encoding",
                opts.encoding.unwrap_or(TextEncoding::Utf8).as_wire_str(),
            )
            .set("offset", opts.offset.unwrap_or(0))
            .set_opt("length", opts.length)
            .set_opt("timestamp", opts.timestamp);
        let path = format!("/clients/{client_id}/vfs-text{vfs}");
        let result = self.api().get(&path, params).await.map(Some);
        self.report(not_found_to(result, None))
    }

    /// Collected raw contents of a VFS file, or `None` if the entry does not
    /// exist at all.
    pub async fn get_file_blob(
        &self,
        client_id: &str,
        path_type: PathType,
        path: &str,
        opts: &GetFileBlobOptions,
    ) -> ApiResult<Option<Bytes>> {
        let vfs = vfs_path(path_type, path, true);
        let params = QueryParams::new()
            .set("offset", opts.offset.unwrap_or(0))
            .set_opt("length", opts.length)
            .set_opt("timestamp", opts.timestamp);
        let path = format!("/clients/{client_id}/vfs-blob{vfs}");
        let result = self.api().get_bytes(&path, params).await.map(Some);
        self.report(not_found_to(result, None))
    }

    /// Size of the collected blob, taken from the content-length header of a
    /// HEAD request, or `None` if the entry does not exist at all.
    pub async fn get_file_blob_length(
        &self,
        client_id: &str,
        path_type: PathType,
        path: &str,
        opts: &GetFileBlobOptions,
    ) -> ApiResult<Option<u64>> {
        let vfs = vfs_path(path_type, path, true);
        let params = QueryParams::new()
            .set_opt("offset", opts.offset)
            .set_opt("length", opts.length)
            .set_opt("timestamp", opts.timestamp);
        let path = format!("/clients/{client_id}/vfs-blob{vfs}");
        let result = match self.api().head(&path, params).await {
            Ok(response) => response
                .content_length
                .ok_or_else(|| {
                    ApiError::Contract("blob response carries no content-length".to_owned())
                })
                .map(Some),
            Err(err) => Err(err),
        };
        self.report(not_found_to(result, None))
    }

    /// Lists a directory. The path here is a raw filesystem path, addressed
    /// without a path-type mount.
    pub async fn browse_filesystem(
        &self,
        client_id: &str,
        path: &str,
        include_directory_tree: bool,
    ) -> ApiResult<ApiBrowseFilesystemResult> {
        let mut encoded = encode_path_segments(path);
        if !encoded.starts_with('/') {
            encoded.insert(0, '/');
        }
        let params = QueryParams::new().set("include_directory_tree", include_directory_tree);
        let path = format!("/clients/{client_id}/filesystem{encoded}");
        self.report(self.api().get(&path, params).await)
    }

    /// Triggers recollection of a file and returns the new file details once
    /// the recollection has finished.
    pub async fn update_file_content(
        &self,
        client_id: &str,
        path_type: PathType,
        path: &str,
    ) -> ApiResult<ApiFile> {
        let file_path = vfs_path(path_type, path, false);
        let initiate = async {
            let args = ApiUpdateVfsFileContentArgs {
                file_path: Some(file_path),
            };
            let result: ApiUpdateVfsFileContentResult = self
                .api()
                .post(&format!("/clients/{client_id}/vfs-update"), &args)
                .await?;
            Ok(result.operation_id)
        };
        let poll_status = |operation_id: String| {
            let api = self.api().clone();
            async move {
                api.get::<ApiGetVfsFileContentUpdateStateResult>(
                    &format!("/clients/{client_id}/vfs-update/{operation_id}"),
                    QueryParams::new(),
                )
                .await
            }
        };
        let finalize = || async { self.get_file_details(client_id, path_type, path, None).await };

        let completed = await_operation(POLL_INTERVAL, initiate, poll_status, finalize).await;
        self.report(completed.map(|completed| completed.result))
    }

    /// Triggers a refresh of a directory listing and returns the new listing
    /// once the refresh has finished.
    pub async fn refresh_folder(
        &self,
        client_id: &str,
        path_type: PathType,
        path: &str,
        max_depth: Option<u64>,
    ) -> ApiResult<ApiBrowseFilesystemResult> {
        let file_path = vfs_path(path_type, path, false);
        let initiate = async {
            let args = ApiCreateVfsRefreshOperationArgs {
                file_path: Some(file_path),
                max_depth,
                notify_user: None,
            };
            let result: ApiCreateVfsRefreshOperationResult = self
                .api()
                .post(&format!("/clients/{client_id}/vfs-refresh-operations"), &args)
                .await?;
            Ok(result.operation_id)
        };
        let poll_status = |operation_id: String| {
            let api = self.api().clone();
            async move {
                api.get::<ApiGetVfsRefreshOperationStateResult>(
                    &format!("/clients/{client_id}/vfs-refresh-operations/{operation_id}"),
                    QueryParams::new(),
                )
                .await
            }
        };
        let finalize = || async { self.browse_filesystem(client_id, path, false).await };

        let completed = await_operation(POLL_INTERVAL, initiate, poll_status, finalize).await;
        self.report(completed.map(|completed| completed.result))
    }
}
