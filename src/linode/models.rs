use serde::Deserialize;
use serde_json::Value;
use snafu::ResultExt;

use crate::common::{DecodeSnafu, Extra, MappingSnafu, Record, RecordType, Result, Zone};

/// Linode's spelling of AAAA in the record type table. It has five letters.
/// Records read back from the API carry "AAAA", which decodes through the
/// generic type name.
pub const LINODE_TYPE_AAAA: &str = "AAAAA";

pub const RECORD_TYPE_MAP: [(RecordType, &str); 5] = [
    (RecordType::A, "A"),
    (RecordType::AAAA, LINODE_TYPE_AAAA),
    (RecordType::CNAME, "CNAME"),
    (RecordType::TXT, "TXT"),
    (RecordType::SRV, "SRV"),
];

pub fn record_type_to_linode(record_type: RecordType) -> Result<&'static str> {
    match RECORD_TYPE_MAP.iter().find(|(kind, _)| *kind == record_type) {
        Some((_, linode)) => Ok(*linode),
        None => MappingSnafu {
            message: format!("record type {record_type} is not supported by Linode"),
        }
        .fail(),
    }
}

/// Reverse of [`record_type_to_linode`]. A string that is neither a table
/// entry nor the name of a supported generic type is rejected.
pub fn record_type_from_linode(value: &str) -> Result<RecordType> {
    let upper = value.to_ascii_uppercase();
    RECORD_TYPE_MAP
        .iter()
        .find(|(kind, linode)| *linode == upper || kind.as_str() == upper)
        .map(|(kind, _)| *kind)
        .ok_or_else(|| {
            MappingSnafu {
                message: format!("unknown Linode record type {value}"),
            }
            .build()
        })
}

fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid id {other}"))),
    }
}

/// Renders a JSON scalar the way it is sent as a query parameter.
pub(super) fn param_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Deserialize)]
pub(super) struct APIError {
    #[serde(rename = "ERRORCODE")]
    pub code: u32,
    #[serde(rename = "ERRORMESSAGE", default)]
    pub message: String,
}

#[derive(Deserialize)]
pub(super) struct APIResponse {
    #[serde(rename = "ERRORARRAY", default)]
    pub errors: Vec<APIError>,
    #[serde(rename = "DATA", default)]
    pub data: Value,
}

#[derive(Deserialize)]
pub(super) struct ZoneItem {
    #[serde(rename = "DOMAINID", deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "DOMAIN")]
    pub domain: String,
    #[serde(rename = "TYPE")]
    pub kind: String,
    #[serde(rename = "TTL_SEC", default)]
    pub ttl: Option<u32>,
    #[serde(rename = "SOA_EMAIL", default)]
    pub soa_email: Value,
    #[serde(rename = "STATUS", default)]
    pub status: Value,
    #[serde(rename = "DESCRIPTION", default)]
    pub description: Value,
}

impl TryFrom<ZoneItem> for Zone {
    type Error = crate::common::Error;

    fn try_from(value: ZoneItem) -> Result<Self> {
        let extra = Extra::from([
            ("SOA_Email".to_string(), value.soa_email),
            ("status".to_string(), value.status),
            ("description".to_string(), value.description),
        ]);
        Ok(Zone {
            id: value.id,
            domain: value.domain,
            zone_type: value.kind.parse()?,
            ttl: value.ttl,
            extra,
        })
    }
}

#[derive(Deserialize)]
pub(super) struct RecordItem {
    #[serde(rename = "RESOURCEID", deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "NAME")]
    pub name: String,
    #[serde(rename = "TYPE")]
    pub kind: String,
    #[serde(rename = "TARGET")]
    pub target: String,
    #[serde(rename = "PROTOCOL", default)]
    pub protocol: Value,
    #[serde(rename = "TTL_SEC", default)]
    pub ttl_sec: Value,
    #[serde(rename = "PORT", default)]
    pub port: Value,
    #[serde(rename = "WEIGHT", default)]
    pub weight: Value,
}

impl RecordItem {
    pub fn into_record(self, zone: &Zone) -> Result<Record> {
        let extra = Extra::from([
            ("protocol".to_string(), self.protocol),
            ("ttl_sec".to_string(), self.ttl_sec),
            ("port".to_string(), self.port),
            ("weight".to_string(), self.weight),
        ]);
        Ok(Record {
            id: self.id,
            name: self.name,
            record_type: record_type_from_linode(&self.kind)?,
            data: self.target,
            zone: zone.clone(),
            extra,
        })
    }
}

fn extra_from_map<T: serde::de::DeserializeOwned>(extra: &Extra, kind: &str) -> Result<T> {
    let map: serde_json::Map<String, Value> = extra
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    serde_json::from_value(Value::Object(map))
        .boxed()
        .context(DecodeSnafu {
            message: format!("Invalid {kind} extra attributes"),
        })
}

fn extra_to_map<T: serde::Serialize>(extra: &T) -> Extra {
    match serde_json::to_value(extra) {
        Ok(Value::Object(map)) => map.into_iter().collect(),
        _ => Extra::new(),
    }
}

/// Zone attributes Linode accepts besides domain, type and TTL.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, Deserialize)]
pub struct ZoneExtra {
    #[serde(rename = "SOA_Email", skip_serializing_if = "Option::is_none")]
    pub soa_email: Option<String>,
    #[serde(rename = "Refresh_sec", skip_serializing_if = "Option::is_none")]
    pub refresh_sec: Option<u32>,
    #[serde(rename = "Retry_sec", skip_serializing_if = "Option::is_none")]
    pub retry_sec: Option<u32>,
    #[serde(rename = "Expire_sec", skip_serializing_if = "Option::is_none")]
    pub expire_sec: Option<u32>,
    #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
    pub status: Option<u32>,
    /// Comma separated list of master IPs, for slave zones.
    #[serde(rename = "master_ips", skip_serializing_if = "Option::is_none")]
    pub master_ips: Option<String>,
}

impl ZoneExtra {
    /// Keeps the allowed keys of a loose attribute map. Everything else is dropped.
    pub fn from_map(extra: &Extra) -> Result<Self> {
        extra_from_map(extra, "zone")
    }

    /// The attributes that are set, keyed by their Linode parameter name.
    pub fn to_map(&self) -> Extra {
        extra_to_map(self)
    }
}

/// Record attributes Linode accepts besides name, type and target.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, Deserialize)]
pub struct RecordExtra {
    #[serde(rename = "Priority", skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(rename = "Weight", skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(rename = "Port", skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,
    #[serde(rename = "Protocol", skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(rename = "TTL_sec", skip_serializing_if = "Option::is_none")]
    pub ttl_sec: Option<u32>,
}

impl RecordExtra {
    pub fn from_map(extra: &Extra) -> Result<Self> {
        extra_from_map(extra, "record")
    }

    pub fn to_map(&self) -> Extra {
        extra_to_map(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_types_round_trip_through_the_table() {
        for (kind, linode) in RECORD_TYPE_MAP {
            assert_eq!(record_type_to_linode(kind).unwrap(), linode);
            assert_eq!(record_type_from_linode(linode).unwrap(), kind);
            assert_eq!(
                record_type_to_linode(record_type_from_linode(linode).unwrap()).unwrap(),
                linode
            );
        }
    }

    #[test]
    fn aaaa_is_sent_with_five_letters() {
        assert_eq!(record_type_to_linode(RecordType::AAAA).unwrap(), "AAAAA");
        // The API reports the four letter name, which does not survive a
        // decode/encode cycle unchanged.
        let decoded = record_type_from_linode("AAAA").unwrap();
        assert_eq!(decoded, RecordType::AAAA);
        assert_ne!(record_type_to_linode(decoded).unwrap(), "AAAA");
    }

    #[test]
    fn unsupported_types_fail_in_both_directions() {
        for kind in [RecordType::MX, RecordType::NS, RecordType::PTR] {
            assert!(matches!(
                record_type_to_linode(kind),
                Err(crate::common::Error::MappingError { .. })
            ));
        }
        assert!(record_type_from_linode("MX").is_err());
        assert!(record_type_from_linode("bogus").is_err());
    }

    #[test]
    fn zone_extra_drops_unknown_keys() {
        let extra = Extra::from([
            ("SOA_Email".to_string(), json!("a@b.com")),
            ("bogus".to_string(), json!("x")),
        ]);
        let parsed = ZoneExtra::from_map(&extra).unwrap();
        assert_eq!(parsed.soa_email.as_deref(), Some("a@b.com"));

        let merged = parsed.to_map();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged["SOA_Email"], "a@b.com");
    }

    #[test]
    fn record_extra_with_wrong_value_type_is_rejected() {
        let extra = Extra::from([("Port".to_string(), json!("eighty"))]);
        assert!(matches!(
            RecordExtra::from_map(&extra),
            Err(crate::common::Error::DecodeError { .. })
        ));
    }

    #[test]
    fn zone_item_maps_fixed_extra_fields() {
        let item: ZoneItem = serde_json::from_value(json!({
            "DOMAINID": 5093,
            "DOMAIN": "linode.com",
            "TYPE": "master",
            "TTL_SEC": 0,
            "SOA_EMAIL": "dns@example.com",
            "STATUS": 1,
            "DESCRIPTION": "",
            "REFRESH_SEC": 0,
        }))
        .unwrap();
        let zone = Zone::try_from(item).unwrap();

        assert_eq!(zone.id, "5093");
        assert_eq!(zone.domain, "linode.com");
        assert_eq!(zone.ttl, Some(0));
        assert_eq!(zone.extra.len(), 3);
        assert_eq!(zone.extra["SOA_Email"], "dns@example.com");
        assert_eq!(zone.extra["status"], 1);
        assert_eq!(zone.extra["description"], "");
    }

    #[test]
    fn record_item_with_unknown_type_fails() {
        let zone = Zone {
            id: "1".into(),
            domain: "example.com".into(),
            zone_type: Default::default(),
            ttl: None,
            extra: Extra::new(),
        };
        let item: RecordItem = serde_json::from_value(json!({
            "RESOURCEID": "28537",
            "NAME": "www",
            "TYPE": "MX",
            "TARGET": "mail.example.com",
        }))
        .unwrap();
        assert!(matches!(
            item.into_record(&zone),
            Err(crate::common::Error::MappingError { .. })
        ));
    }
}
