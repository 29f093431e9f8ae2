use serde::de::DeserializeOwned;
use serde_json::Value;
use snafu::ResultExt;

use crate::common::{
    DecodeSnafu, DnsDriver, Extra, Record, RecordNotFoundSnafu, RecordType, ResponseSnafu,
    Result, Zone, ZoneNotFoundSnafu, ZoneType, ZoneUpdate,
};

use super::context::{disambiguate, OperationContext};
use super::models::{
    param_value, record_type_to_linode, RecordExtra, RecordItem, ZoneExtra, ZoneItem,
    RECORD_TYPE_MAP,
};
use super::transport::{HttpTransport, Params, Transport, API_ACTION};
use super::PROVIDER_NAME;

fn params(action: &str) -> Params {
    Params::from([(API_ACTION.to_string(), action.to_string())])
}

fn merge_extra(params: &mut Params, merged: &Extra) {
    params.extend(
        merged
            .iter()
            .map(|(key, value)| (key.clone(), param_value(value))),
    );
}

/// Reads an identity key such as `DomainID` out of a write response.
fn identity(data: &Value, key: &str) -> Result<String> {
    match data.get(key) {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => ResponseSnafu {
            message: format!("Response is missing {key}"),
        }
        .fail(),
    }
}

fn decode_items<T: DeserializeOwned>(data: Value, kind: &str) -> Result<Vec<T>> {
    serde_json::from_value(data).boxed().context(DecodeSnafu {
        message: format!("Failed to deserialize {kind} list"),
    })
}

pub struct LinodeDriver<T = HttpTransport> {
    transport: T,
}

impl<T: Transport> LinodeDriver<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Sends one call. `context` names the resource the call addresses and
    /// only lives as long as the call does.
    fn request(&self, params: Params, context: Option<&OperationContext>) -> Result<Value> {
        self.transport
            .request(&params)
            .map_err(|err| disambiguate(err, context))
    }

    fn to_zones(&self, data: Value) -> Result<Vec<Zone>> {
        decode_items::<ZoneItem>(data, "zone")?
            .into_iter()
            .map(Zone::try_from)
            .collect()
    }

    fn to_records(&self, data: Value, zone: &Zone) -> Result<Vec<Record>> {
        decode_items::<RecordItem>(data, "record")?
            .into_iter()
            .map(|item| item.into_record(zone))
            .collect()
    }
}

impl<T: Transport> DnsDriver for LinodeDriver<T> {
    type ZoneExtra = ZoneExtra;
    type RecordExtra = RecordExtra;

    fn list_record_types(&self) -> Vec<RecordType> {
        RECORD_TYPE_MAP.iter().map(|(kind, _)| *kind).collect()
    }

    fn list_zones(&self) -> Result<Vec<Zone>> {
        let data = self.request(params("domain.list"), None)?;
        let zones = self.to_zones(data)?;

        tracing::debug!(provider = PROVIDER_NAME, zones = zones.len(), "Listed zones");
        Ok(zones)
    }

    fn list_records(&self, zone: &Zone) -> Result<Vec<Record>> {
        let mut params = params("domain.resource.list");
        params.insert("DomainID".into(), zone.id.clone());

        let context = OperationContext::Zone(zone.id.clone());
        let data = self.request(params, Some(&context))?;
        let records = self.to_records(data, zone)?;

        tracing::debug!(
            provider = PROVIDER_NAME,
            zone_id = zone.id,
            records = records.len(),
            "Listed records"
        );
        Ok(records)
    }

    fn get_zone(&self, zone_id: &str) -> Result<Zone> {
        let mut params = params("domain.list");
        params.insert("DomainID".into(), zone_id.to_string());

        let context = OperationContext::Zone(zone_id.to_string());
        let data = self.request(params, Some(&context))?;
        let mut zones = self.to_zones(data)?;

        // Anything but exactly one match counts as missing.
        match (zones.pop(), zones.is_empty()) {
            (Some(zone), true) => Ok(zone),
            _ => ZoneNotFoundSnafu { zone_id }.fail(),
        }
    }

    fn get_record(&self, zone_id: &str, record_id: &str) -> Result<Record> {
        let zone = self.get_zone(zone_id)?;

        let mut params = params("domain.resource.list");
        params.insert("DomainID".into(), zone_id.to_string());
        params.insert("ResourceID".into(), record_id.to_string());

        let context = OperationContext::Zone(zone_id.to_string());
        let data = self.request(params, Some(&context))?;
        let mut records = self.to_records(data, &zone)?;

        match (records.pop(), records.is_empty()) {
            (Some(record), true) => Ok(record),
            _ => RecordNotFoundSnafu { record_id }.fail(),
        }
    }

    fn create_zone(
        &self,
        domain: &str,
        zone_type: ZoneType,
        ttl: Option<u32>,
        extra: ZoneExtra,
    ) -> Result<Zone> {
        let mut params = params("domain.create");
        params.insert("Domain".into(), domain.to_string());
        params.insert("Type".into(), zone_type.to_string());
        if let Some(ttl) = ttl.filter(|ttl| *ttl != 0) {
            params.insert("TTL_sec".into(), ttl.to_string());
        }
        let merged = extra.to_map();
        merge_extra(&mut params, &merged);

        let data = self.request(params, None)?;
        let zone = Zone {
            id: identity(&data, "DomainID")?,
            domain: domain.to_string(),
            zone_type,
            ttl,
            extra: merged,
        };

        tracing::info!(
            provider = PROVIDER_NAME,
            zone_id = zone.id,
            domain = zone.domain,
            "Created zone"
        );
        Ok(zone)
    }

    fn update_zone(&self, zone: &Zone, update: ZoneUpdate, extra: ZoneExtra) -> Result<Zone> {
        let mut params = params("domain.update");
        params.insert("DomainID".into(), zone.id.clone());
        if let Some(zone_type) = update.zone_type {
            params.insert("Type".into(), zone_type.to_string());
        }
        if let Some(domain) = update.domain() {
            params.insert("Domain".into(), domain.to_string());
        }
        if let Some(ttl) = update.ttl() {
            params.insert("TTL_sec".into(), ttl.to_string());
        }
        let merged = extra.to_map();
        merge_extra(&mut params, &merged);

        self.request(params, None)?;

        tracing::info!(provider = PROVIDER_NAME, zone_id = zone.id, "Updated zone");
        Ok(zone.with_update(&update, merged))
    }

    fn create_record(
        &self,
        name: &str,
        zone: &Zone,
        record_type: RecordType,
        data: &str,
        extra: RecordExtra,
    ) -> Result<Record> {
        let mut params = params("domain.resource.create");
        params.insert("DomainID".into(), zone.id.clone());
        params.insert("Name".into(), name.to_string());
        params.insert("Target".into(), data.to_string());
        params.insert("Type".into(), record_type_to_linode(record_type)?.to_string());
        let merged = extra.to_map();
        merge_extra(&mut params, &merged);

        let result = self.request(params, None)?;
        let record = Record {
            id: identity(&result, "ResourceID")?,
            name: name.to_string(),
            record_type,
            data: data.to_string(),
            zone: zone.clone(),
            extra: merged,
        };

        tracing::info!(
            provider = PROVIDER_NAME,
            zone_id = zone.id,
            record_id = record.id,
            kind = record_type.as_str(),
            name = name,
            "Created record"
        );
        Ok(record)
    }

    fn update_record(
        &self,
        record: &Record,
        name: &str,
        record_type: RecordType,
        data: &str,
        extra: RecordExtra,
    ) -> Result<Record> {
        let mut params = params("domain.resource.update");
        params.insert("ResourceID".into(), record.id.clone());
        params.insert("DomainID".into(), record.zone.id.clone());
        params.insert("Name".into(), name.to_string());
        params.insert("Target".into(), data.to_string());
        params.insert("Type".into(), record_type_to_linode(record_type)?.to_string());
        let merged = extra.to_map();
        merge_extra(&mut params, &merged);

        let result = self.request(params, None)?;
        let updated = Record {
            id: identity(&result, "ResourceID")?,
            name: name.to_string(),
            record_type,
            data: data.to_string(),
            zone: record.zone.clone(),
            extra: merged,
        };

        tracing::info!(
            provider = PROVIDER_NAME,
            zone_id = record.zone.id,
            record_id = updated.id,
            kind = record_type.as_str(),
            name = name,
            "Updated record"
        );
        Ok(updated)
    }

    fn delete_zone(&self, zone: &Zone) -> Result<bool> {
        let mut params = params("domain.delete");
        params.insert("DomainID".into(), zone.id.clone());

        let context = OperationContext::Zone(zone.id.clone());
        let data = self.request(params, Some(&context))?;

        let deleted = data.get("DomainID").is_some();
        if deleted {
            tracing::info!(provider = PROVIDER_NAME, zone_id = zone.id, "Deleted zone");
        } else {
            tracing::warn!(
                provider = PROVIDER_NAME,
                zone_id = zone.id,
                "Delete response did not confirm the zone"
            );
        }
        Ok(deleted)
    }

    fn delete_record(&self, record: &Record) -> Result<bool> {
        let mut params = params("domain.resource.delete");
        params.insert("DomainID".into(), record.zone.id.clone());
        params.insert("ResourceID".into(), record.id.clone());

        let context = OperationContext::Record(record.id.clone());
        let data = self.request(params, Some(&context))?;

        let deleted = data.get("ResourceID").is_some();
        if deleted {
            tracing::info!(
                provider = PROVIDER_NAME,
                zone_id = record.zone.id,
                record_id = record.id,
                "Deleted record"
            );
        } else {
            tracing::warn!(
                provider = PROVIDER_NAME,
                zone_id = record.zone.id,
                record_id = record.id,
                "Delete response did not confirm the record"
            );
        }
        Ok(deleted)
    }
}
