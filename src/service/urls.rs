//! Builders for download/export URLs and CLI snippets. These endpoints are
//! consumed by the browser or the CLI directly, so only the URL is built here;
//! no request is issued.

use crate::api::params::{PathType, vfs_path};
use crate::api::transport::URL_PREFIX;

/// Wire id of the body timeline format.
const TIMELINE_BODY_FORMAT: u32 = 1;

/// URL to download all collected files of a client as an archive.
pub fn client_archive_url(client_id: &str) -> String {
    format!("{URL_PREFIX}/clients/{client_id}/vfs-files-archive/")
}

/// URL to download a hunt's file results in TAR.GZ format.
pub fn hunt_files_archive_tar_gz_url(hunt_id: &str) -> String {
    format!("{URL_PREFIX}/hunts/{hunt_id}/results/files-archive?archive_format=TAR_GZ")
}

/// URL to download a hunt's file results in ZIP format.
pub fn hunt_files_archive_zip_url(hunt_id: &str) -> String {
    format!("{URL_PREFIX}/hunts/{hunt_id}/results/files-archive?archive_format=ZIP")
}

/// URL to download hunt results converted to CSV.
pub fn hunt_exported_results_csv_url(hunt_id: &str) -> String {
    format!("{URL_PREFIX}/hunts/{hunt_id}/exported-results/csv-zip")
}

/// URL to download hunt results converted to YAML.
pub fn hunt_exported_results_yaml_url(hunt_id: &str) -> String {
    format!("{URL_PREFIX}/hunts/{hunt_id}/exported-results/flattened-yaml-zip")
}

/// URL to download hunt results converted to SQLite.
pub fn hunt_exported_results_sqlite_url(hunt_id: &str) -> String {
    format!("{URL_PREFIX}/hunts/{hunt_id}/exported-results/sqlite-zip")
}

/// URL to download a flow's file results as an archive.
pub fn flow_files_archive_url(client_id: &str, flow_id: &str) -> String {
    format!("{URL_PREFIX}/clients/{client_id}/flows/{flow_id}/results/files-archive")
}

/// URL to download flow results converted to CSV.
pub fn exported_results_csv_url(client_id: &str, flow_id: &str) -> String {
    format!("{URL_PREFIX}/clients/{client_id}/flows/{flow_id}/exported-results/csv-zip")
}

/// URL to download flow results converted to YAML.
pub fn exported_results_yaml_url(client_id: &str, flow_id: &str) -> String {
    format!("{URL_PREFIX}/clients/{client_id}/flows/{flow_id}/exported-results/flattened-yaml-zip")
}

/// URL to download flow results converted to SQLite.
pub fn exported_results_sqlite_url(client_id: &str, flow_id: &str) -> String {
    format!("{URL_PREFIX}/clients/{client_id}/flows/{flow_id}/exported-results/sqlite-zip")
}

/// URL to download the raw contents of a VFS file.
pub fn file_blob_url(client_id: &str, path_type: PathType, path: &str) -> String {
    let vfs = vfs_path(path_type, path, true);
    format!("{URL_PREFIX}/clients/{client_id}/vfs-blob{vfs}")
}

/// URL to download the raw contents of a VFS temp file.
pub fn temp_blob_url(client_id: &str, path: &str) -> String {
    format!("{URL_PREFIX}/clients/{client_id}/vfs-blob/temp/{path}")
}

/// CLI snippet that downloads a flow's file results.
pub fn exported_results_command(
    prefix: &str,
    client_id: &str,
    filename: &str,
    flow_id: &str,
) -> String {
    format!(
        "{prefix} --exec_code 'api.Client(\"{client_id}\").Flow(\"{flow_id}\").GetFilesArchive().WriteToFile(\"{filename}\")'"
    )
}

/// CLI snippet that downloads a hunt's results.
pub fn hunt_export_command(prefix: &str, hunt_id: &str) -> String {
    format!(
        "{prefix} --exec_code 'api.Hunt(\"{hunt_id}\").GetFilesArchive().WriteToFile(\"./hunt_results_{hunt_id}.zip\")'"
    )
}

/// Rendering flags for the body timeline export.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineBodyOptions {
    pub timestamp_subsecond_precision: bool,
    pub inode_ntfs_file_reference_format: bool,
    pub backslash_escape: bool,
    pub carriage_return_escape: bool,
    pub non_printable_escape: bool,
}

/// URL to download a timeline flow's collected BODY file.
pub fn timeline_body_file_url(
    client_id: &str,
    flow_id: &str,
    opts: TimelineBodyOptions,
) -> String {
    let flags = [
        (
            "body_opts.timestamp_subsecond_precision",
            opts.timestamp_subsecond_precision,
        ),
        (
            "body_opts.inode_ntfs_file_reference_format",
            opts.inode_ntfs_file_reference_format,
        ),
        ("body_opts.backslash_escape", opts.backslash_escape),
        (
            "body_opts.carriage_return_escape",
            opts.carriage_return_escape,
        ),
        ("body_opts.non_printable_escape", opts.non_printable_escape),
    ];
    let query = flags
        .iter()
        .map(|(name, value)| format!("{name}={}", *value as u32))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{URL_PREFIX}/clients/{client_id}/flows/{flow_id}/timeline/{TIMELINE_BODY_FORMAT}?{query}"
    )
}
