//! JSON response DTOs for the ad unit API.
//!
//! Remote records are reshaped into these types before serialization.
//! Optional remote fields stay absent in the output rather than
//! serializing as null, and `children` only appears on assembled trees.

use serde::{Deserialize, Serialize};

use crate::inventory::{RemoteAdUnit, RemoteAdUnitSize, RemoteParentPath};

/// A single inventory unit.
///
/// `children` is populated by tree assembly only; flat listings leave it
/// empty and it is omitted from the JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdUnit {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<Vec<ParentPathEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<AdUnitSize>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AdUnit>,
}

/// One ancestor on an ad unit's path from the network root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentPathEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// A creative size an ad unit accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdUnitSize {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_type: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl From<RemoteAdUnit> for AdUnit {
    fn from(remote: RemoteAdUnit) -> Self {
        Self {
            id: remote.id,
            parent_id: remote.parent_id,
            name: remote.name,
            code: remote.ad_unit_code,
            status: remote.status,
            parent_path: remote
                .parent_path
                .map(|path| path.into_iter().map(ParentPathEntry::from).collect()),
            sizes: remote
                .ad_unit_sizes
                .map(|sizes| sizes.into_iter().map(AdUnitSize::from).collect()),
            children: Vec::new(),
        }
    }
}

impl From<RemoteParentPath> for ParentPathEntry {
    fn from(remote: RemoteParentPath) -> Self {
        Self {
            id: remote.id,
            name: remote.name,
            code: remote.ad_unit_code,
        }
    }
}

impl From<RemoteAdUnitSize> for AdUnitSize {
    fn from(remote: RemoteAdUnitSize) -> Self {
        Self {
            size: remote.full_display_string,
            environment_type: remote.environment_type,
            width: remote.size.width,
            height: remote.size.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::RemoteSize;

    fn remote_unit() -> RemoteAdUnit {
        RemoteAdUnit {
            id: "1001".to_string(),
            parent_id: Some("1000".to_string()),
            name: Some("Sports".to_string()),
            ad_unit_code: Some("sports".to_string()),
            status: Some("ACTIVE".to_string()),
            parent_path: Some(vec![RemoteParentPath {
                id: Some("1000".to_string()),
                name: Some("Network root".to_string()),
                ad_unit_code: Some("root".to_string()),
            }]),
            ad_unit_sizes: Some(vec![RemoteAdUnitSize {
                full_display_string: Some("300x250".to_string()),
                environment_type: Some("BROWSER".to_string()),
                size: RemoteSize {
                    width: 300,
                    height: 250,
                },
            }]),
        }
    }

    #[test]
    fn test_maps_remote_fields() {
        let unit = AdUnit::from(remote_unit());
        assert_eq!(unit.id, "1001");
        assert_eq!(unit.parent_id.as_deref(), Some("1000"));
        assert_eq!(unit.code.as_deref(), Some("sports"));
        assert_eq!(unit.status.as_deref(), Some("ACTIVE"));

        let path = unit.parent_path.unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].code.as_deref(), Some("root"));

        let sizes = unit.sizes.unwrap();
        assert_eq!(sizes[0].size.as_deref(), Some("300x250"));
        assert_eq!(sizes[0].width, 300);
        assert_eq!(sizes[0].height, 250);
        assert!(unit.children.is_empty());
    }

    #[test]
    fn test_absent_arrays_stay_absent() {
        let mut remote = remote_unit();
        remote.parent_path = None;
        remote.ad_unit_sizes = None;

        let unit = AdUnit::from(remote);
        assert!(unit.parent_path.is_none());
        assert!(unit.sizes.is_none());
    }

    #[test]
    fn test_serialization_omits_empty_fields() {
        let mut remote = remote_unit();
        remote.parent_path = None;
        remote.ad_unit_sizes = None;
        remote.name = None;

        let json = serde_json::to_value(AdUnit::from(remote)).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("parentId"));
        assert!(!obj.contains_key("name"));
        assert!(!obj.contains_key("parentPath"));
        assert!(!obj.contains_key("sizes"));
        assert!(!obj.contains_key("children"));
    }
}
