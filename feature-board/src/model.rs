use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product used when a caller does not name one.
pub const DEFAULT_PRODUCT_ID: &str = "default";

/// A user-submitted suggestion, scoped to a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRequest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub product_id: String,
    pub votes: i64,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    pub status: Status,
}

/// Review status of a feature request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Status {
    #[default]
    Submitted,
    Accepted,
    Rejected,
    Delivered,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Submitted => "Submitted",
            Status::Accepted => "Accepted",
            Status::Rejected => "Rejected",
            Status::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Accepts exactly `"up"` or `"down"`; anything else is not a direction.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "up" => Some(VoteDirection::Up),
            "down" => Some(VoteDirection::Down),
            _ => None,
        }
    }

    pub fn delta(self) -> i64 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

/// Orders requests by vote count, highest first. Ties keep their relative order.
pub fn rank(requests: &mut [FeatureRequest]) {
    requests.sort_by(|a, b| b.votes.cmp(&a.votes));
}

/// ISO-8601 timestamps with millisecond precision and a `Z` suffix.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(title: &str, votes: i64) -> FeatureRequest {
        FeatureRequest {
            id: title.to_lowercase(),
            title: title.to_string(),
            description: String::new(),
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            votes,
            created_at: Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap(),
            status: Status::default(),
        }
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_value(request("Dark mode", 3)).unwrap();

        assert_eq!(json["productId"], "default");
        assert_eq!(json["createdAt"], "2026-10-16T09:30:00.000Z");
        assert_eq!(json["status"], "Submitted");
        assert_eq!(json["votes"], 3);
        assert!(json.get("product_id").is_none());
    }

    #[test]
    fn created_at_accepts_offsets_when_parsing() {
        let json = serde_json::json!({
            "id": "abc",
            "title": "Export",
            "description": "",
            "productId": "default",
            "votes": -2,
            "createdAt": "2026-10-16T11:30:00.000+02:00",
            "status": "Delivered",
        });

        let parsed: FeatureRequest = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.created_at, Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap());
        assert_eq!(parsed.status, Status::Delivered);
        assert_eq!(parsed.votes, -2);
    }

    #[test]
    fn direction_parsing_is_exact() {
        assert_eq!(VoteDirection::parse("up"), Some(VoteDirection::Up));
        assert_eq!(VoteDirection::parse("down"), Some(VoteDirection::Down));
        assert_eq!(VoteDirection::parse("UP"), None);
        assert_eq!(VoteDirection::parse("sideways"), None);
        assert_eq!(VoteDirection::parse(""), None);
    }

    #[test]
    fn rank_orders_by_votes_and_keeps_ties_stable() {
        let mut requests = vec![
            request("Low", 1),
            request("First tie", 5),
            request("Negative", -3),
            request("Second tie", 5),
        ];

        rank(&mut requests);

        let titles: Vec<_> = requests.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["First tie", "Second tie", "Low", "Negative"]);
    }
}
