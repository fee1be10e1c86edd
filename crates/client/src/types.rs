//! JSON shapes returned by the name node.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    File,
    Directory,
    Symlink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    #[serde(default)]
    pub path_suffix: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    #[serde(default)]
    pub length: u64,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub permission: String,
    #[serde(default)]
    pub access_time: i64,
    #[serde(default)]
    pub modification_time: i64,
    #[serde(default)]
    pub block_size: u64,
    #[serde(default)]
    pub replication: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symlink: Option<String>,
}

impl FileStatus {
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub directory_count: u64,
    pub file_count: u64,
    pub length: u64,
    #[serde(default)]
    pub quota: i64,
    #[serde(default)]
    pub space_consumed: u64,
    #[serde(default)]
    pub space_quota: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileStatusEnvelope {
    #[serde(rename = "FileStatus")]
    pub file_status: FileStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileStatusesEnvelope {
    #[serde(rename = "FileStatuses")]
    pub file_statuses: FileStatusList,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileStatusList {
    #[serde(rename = "FileStatus", default)]
    pub file_status: Vec<FileStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentSummaryEnvelope {
    #[serde(rename = "ContentSummary")]
    pub content_summary: ContentSummary,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BooleanEnvelope {
    pub boolean: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LongEnvelope {
    pub long: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PathEnvelope {
    #[serde(rename = "Path")]
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TokenEnvelope {
    #[serde(rename = "Token")]
    pub token: UrlString,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct UrlString {
    #[serde(rename = "urlString")]
    pub url_string: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_file_status() {
        let json = r#"{"FileStatus":{
            "accessTime":0,"blockSize":134217728,"group":"supergroup","length":24930,
            "modificationTime":1320173277227,"owner":"webuser","pathSuffix":"",
            "permission":"644","replication":1,"type":"FILE"}}"#;
        let status = serde_json::from_str::<FileStatusEnvelope>(json)
            .unwrap()
            .file_status;
        assert_eq!(status.file_type, FileType::File);
        assert_eq!(status.length, 24930);
        assert_eq!(status.owner, "webuser");
        assert!(!status.is_dir());
    }

    #[test]
    fn test_decode_empty_listing() {
        let json = r#"{"FileStatuses":{"FileStatus":[]}}"#;
        let list = serde_json::from_str::<FileStatusesEnvelope>(json).unwrap();
        assert!(list.file_statuses.file_status.is_empty());
    }
}
