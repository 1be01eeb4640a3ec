//! Upstream record models
//!
//! Each record keeps only the fields the tracker reads. Anything else the
//! upstream API sends is dropped during deserialization, so schema churn on
//! the remote side never leaks into the snapshot.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single launch (the primary collection)
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Launch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Foreign key into the site collection
    #[serde(default)]
    pub launchpad: Option<String>,
    /// ISO-8601 timestamp as sent by upstream, parsed lazily
    #[serde(default)]
    pub date_utc: Option<String>,
    /// `None` when the outcome is unknown (e.g. upcoming launches)
    #[serde(default)]
    pub success: Option<bool>,
    /// Foreign key into the rocket collection
    #[serde(default)]
    pub rocket: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Rocket {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Launch site, called "launchpad" by the upstream API
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Site {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rockets: Option<Vec<String>>,
    #[serde(default)]
    pub launches: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_launch_drops_unknown_fields() {
        let raw = json!({
            "id": "5eb87cd9ffd86e000604b32a",
            "name": "FalconSat",
            "launchpad": "5e9e4502f5090995de566f86",
            "date_utc": "2006-03-24T22:30:00.000Z",
            "success": false,
            "rocket": "5e9d0d95eda69955f709d1eb",
            "flight_number": 1,
            "links": { "webcast": "https://example.com" }
        });

        let launch: Launch = serde_json::from_value(raw).unwrap();
        assert_eq!(launch.name, "FalconSat");
        assert_eq!(launch.success, Some(false));

        // the projection is the only thing that survives a round through serde
        let back = serde_json::to_value(&launch).unwrap();
        assert!(back.get("flight_number").is_none());
        assert!(back.get("links").is_none());
    }

    #[test]
    fn test_nullable_fields() {
        let launch: Launch = serde_json::from_value(json!({
            "id": "l1",
            "success": null,
            "date_utc": null
        }))
        .unwrap();
        assert_eq!(launch.success, None);
        assert_eq!(launch.date_utc, None);
        assert_eq!(launch.rocket, None);

        let site: Site = serde_json::from_value(json!({
            "id": "s1",
            "name": "VAFB SLC 4E",
            "rockets": null,
            "launches": ["l1", "l2"]
        }))
        .unwrap();
        assert_eq!(site.rockets, None);
        assert_eq!(site.launches.map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_null_names_keep_record() {
        let launch: Launch =
            serde_json::from_value(json!({ "id": "l2", "name": null, "success": true })).unwrap();
        assert_eq!(launch.id, "l2");
        assert_eq!(launch.name, "");
        assert_eq!(launch.success, Some(true));

        let rocket: Rocket = serde_json::from_value(json!({ "id": null, "name": null })).unwrap();
        assert_eq!(rocket, Rocket::default());
    }
}
