use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{MappingSnafu, Result};

/// Provider specific attributes carried next to the generic fields.
pub type Extra = BTreeMap<String, serde_json::Value>;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    MX,
    NS,
    PTR,
    SRV,
    TXT,
}

impl RecordType {
    pub const ALL: [RecordType; 8] = [
        RecordType::A,
        RecordType::AAAA,
        RecordType::CNAME,
        RecordType::MX,
        RecordType::NS,
        RecordType::PTR,
        RecordType::SRV,
        RecordType::TXT,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::CNAME => "CNAME",
            RecordType::MX => "MX",
            RecordType::NS => "NS",
            RecordType::PTR => "PTR",
            RecordType::SRV => "SRV",
            RecordType::TXT => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = super::Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.to_ascii_uppercase();
        match Self::ALL.into_iter().find(|kind| kind.as_str() == upper) {
            Some(kind) => Ok(kind),
            None => MappingSnafu {
                message: format!("unknown record type {s}"),
            }
            .fail(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    #[default]
    Master,
    Slave,
}

impl ZoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::Master => "master",
            ZoneType::Slave => "slave",
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoneType {
    type Err = super::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "master" => Ok(ZoneType::Master),
            "slave" => Ok(ZoneType::Slave),
            _ => MappingSnafu {
                message: format!("unknown zone type {s}"),
            }
            .fail(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Zone {
    pub id: String,
    pub domain: String,
    #[serde(rename = "type")]
    pub zone_type: ZoneType,
    pub ttl: Option<u32>,
    pub extra: Extra,
}

/// Requested changes to a zone. `None`, empty strings and zero TTLs mean
/// "keep what is there".
#[derive(Debug, Clone, Default)]
pub struct ZoneUpdate {
    pub domain: Option<String>,
    pub zone_type: Option<ZoneType>,
    pub ttl: Option<u32>,
}

impl ZoneUpdate {
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref().filter(|domain| !domain.is_empty())
    }

    pub fn ttl(&self) -> Option<u32> {
        self.ttl.filter(|ttl| *ttl != 0)
    }
}

impl Zone {
    /// Builds the zone that results from applying `update` and the merged
    /// extra attributes on top of this one.
    pub fn with_update(&self, update: &ZoneUpdate, merged: Extra) -> Zone {
        let mut extra = self.extra.clone();
        extra.extend(merged.into_iter().filter(|(_, value)| !value.is_null()));

        Zone {
            id: self.id.clone(),
            domain: update.domain().unwrap_or(&self.domain).to_string(),
            zone_type: update.zone_type.unwrap_or(self.zone_type),
            ttl: update.ttl().or(self.ttl),
            extra,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub data: String,
    /// The zone this record was read from or written to.
    pub zone: Zone,
    pub extra: Extra,
}

/// The generic operation set every DNS driver exposes.
pub trait DnsDriver {
    type ZoneExtra;
    type RecordExtra;

    /// Record types this driver can write and read back.
    fn list_record_types(&self) -> Vec<RecordType>;
    fn list_zones(&self) -> Result<Vec<Zone>>;
    fn list_records(&self, zone: &Zone) -> Result<Vec<Record>>;
    fn get_zone(&self, zone_id: &str) -> Result<Zone>;
    fn get_record(&self, zone_id: &str, record_id: &str) -> Result<Record>;
    fn create_zone(
        &self,
        domain: &str,
        zone_type: ZoneType,
        ttl: Option<u32>,
        extra: Self::ZoneExtra,
    ) -> Result<Zone>;
    fn update_zone(&self, zone: &Zone, update: ZoneUpdate, extra: Self::ZoneExtra)
        -> Result<Zone>;
    fn create_record(
        &self,
        name: &str,
        zone: &Zone,
        record_type: RecordType,
        data: &str,
        extra: Self::RecordExtra,
    ) -> Result<Record>;
    fn update_record(
        &self,
        record: &Record,
        name: &str,
        record_type: RecordType,
        data: &str,
        extra: Self::RecordExtra,
    ) -> Result<Record>;
    fn delete_zone(&self, zone: &Zone) -> Result<bool>;
    fn delete_record(&self, record: &Record) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> Zone {
        let mut extra = Extra::new();
        extra.insert("SOA_Email".into(), "old@example.com".into());
        extra.insert("status".into(), 0.into());
        Zone {
            id: "z1".into(),
            domain: "example.com".into(),
            zone_type: ZoneType::Master,
            ttl: Some(3600),
            extra,
        }
    }

    #[test]
    fn update_without_ttl_keeps_prior_ttl() {
        let updated = zone().with_update(&ZoneUpdate::default(), Extra::new());
        assert_eq!(updated, zone());
    }

    #[test]
    fn update_with_ttl_changes_only_ttl() {
        let update = ZoneUpdate {
            ttl: Some(300),
            ..Default::default()
        };
        let updated = zone().with_update(&update, Extra::new());
        assert_eq!(updated.ttl, Some(300));
        assert_eq!(
            Zone {
                ttl: Some(3600),
                ..updated
            },
            zone()
        );
    }

    #[test]
    fn update_ignores_empty_domain_and_zero_ttl() {
        let update = ZoneUpdate {
            domain: Some(String::new()),
            ttl: Some(0),
            zone_type: Some(ZoneType::Slave),
        };
        let updated = zone().with_update(&update, Extra::new());
        assert_eq!(updated.domain, "example.com");
        assert_eq!(updated.ttl, Some(3600));
        assert_eq!(updated.zone_type, ZoneType::Slave);
    }

    #[test]
    fn update_overlays_extra_keys() {
        let mut merged = Extra::new();
        merged.insert("SOA_Email".into(), "new@example.com".into());
        merged.insert("Refresh_sec".into(), 60.into());
        let updated = zone().with_update(&ZoneUpdate::default(), merged);

        assert_eq!(updated.extra["SOA_Email"], "new@example.com");
        assert_eq!(updated.extra["Refresh_sec"], 60);
        assert_eq!(updated.extra["status"], 0);
    }

    #[test]
    fn record_type_parses_case_insensitively() {
        assert_eq!("aaaa".parse::<RecordType>().unwrap(), RecordType::AAAA);
        assert!(matches!(
            "SPF".parse::<RecordType>(),
            Err(crate::common::Error::MappingError { .. })
        ));
    }

    #[test]
    fn zone_type_rejects_unknown() {
        assert_eq!("Master".parse::<ZoneType>().unwrap(), ZoneType::Master);
        assert!("primary".parse::<ZoneType>().is_err());
    }
}
