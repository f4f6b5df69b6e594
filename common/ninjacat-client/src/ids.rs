//! Identifier types shared by the report and advertiser APIs

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub type AgencyId = u64;
pub type AdvertiserId = u64;
pub type ReportId = u64;
pub type RequestId = u64;

/// A template or advertiser identifier
///
/// The service accepts numeric ids, but callers frequently hold them as strings.
/// The value keeps its JSON type so the signed token carries exactly what the
/// caller passed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{n}"),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        ResourceId::Number(value)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        ResourceId::Text(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        ResourceId::Text(value)
    }
}

/// Parse an agency id given either as a JSON number or as a numeric string
pub fn parse_agency_id(raw: &str) -> Option<AgencyId> {
    raw.trim().parse().ok()
}

/// Serde helper accepting `agency_id: 42` as well as `agency_id: "42"`
pub fn deserialize_agency_id<'de, D>(deserializer: D) -> Result<AgencyId, D::Error>
where
    D: Deserializer<'de>,
{
    match ResourceId::deserialize(deserializer)? {
        ResourceId::Number(n) => Ok(n),
        ResourceId::Text(s) => parse_agency_id(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("agency id is not numeric: {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_keeps_json_type() {
        assert_eq!(serde_json::to_string(&ResourceId::from(7u64)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&ResourceId::from("T1")).unwrap(),
            "\"T1\""
        );
    }

    #[test]
    fn test_resource_id_display() {
        assert_eq!(ResourceId::from(1234u64).to_string(), "1234");
        assert_eq!(ResourceId::from("A1").to_string(), "A1");
    }

    #[test]
    fn test_parse_agency_id() {
        assert_eq!(parse_agency_id("42"), Some(42));
        assert_eq!(parse_agency_id(" 42 "), Some(42));
        assert_eq!(parse_agency_id("agency"), None);
        assert_eq!(parse_agency_id(""), None);
    }

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "deserialize_agency_id")]
        agency_id: AgencyId,
    }

    #[test]
    fn test_deserialize_agency_id_number_or_string() {
        let a: Holder = serde_json::from_str(r#"{"agency_id": 17}"#).unwrap();
        let b: Holder = serde_json::from_str(r#"{"agency_id": "17"}"#).unwrap();
        assert_eq!(a.agency_id, 17);
        assert_eq!(b.agency_id, 17);
        assert!(serde_json::from_str::<Holder>(r#"{"agency_id": "x"}"#).is_err());
    }
}
