//! Typed per-entity metadata.
//!
//! The query collaborator attaches a loose key/value map to every entity.
//! It is converted once, here, into [`ServiceMetadata`]; everything
//! downstream reads plain `f64`/`String` fields.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use meshviz_error::{Error, Result};

pub const RATE: &str = "rate";
pub const RATE_2XX: &str = "rate_2xx";
pub const RATE_3XX: &str = "rate_3xx";
pub const RATE_4XX: &str = "rate_4xx";
pub const RATE_5XX: &str = "rate_5xx";
pub const LINK_PROM_GRAPH: &str = "link_prom_graph";

/// Requests per interval observed on the edge into an entity, by response class.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RateCounters {
    pub rate: f64,
    pub rate_2xx: f64,
    pub rate_3xx: f64,
    pub rate_4xx: f64,
    pub rate_5xx: f64,
}

impl RateCounters {
    pub fn new(rate: f64, rate_2xx: f64, rate_3xx: f64, rate_4xx: f64, rate_5xx: f64) -> Self {
        Self {
            rate,
            rate_2xx,
            rate_3xx,
            rate_4xx,
            rate_5xx,
        }
    }

    /// Counters for an entity that saw only successful traffic.
    pub fn all_ok(rate: f64) -> Self {
        Self::new(rate, rate, 0.0, 0.0, 0.0)
    }

    fn fields(&self) -> [(&'static str, f64); 5] {
        [
            (RATE, self.rate),
            (RATE_2XX, self.rate_2xx),
            (RATE_3XX, self.rate_3xx),
            (RATE_4XX, self.rate_4xx),
            (RATE_5XX, self.rate_5xx),
        ]
    }

    /// Reject negative or non-finite counters.
    pub fn validate(&self, entity: &str) -> Result<()> {
        for (key, value) in self.fields() {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_metadata_value(entity, key, value));
            }
        }
        Ok(())
    }
}

/// Validated metadata of one topology entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceMetadata {
    pub rates: RateCounters,
    pub link_prom_graph: String,
    /// Keys this crate does not interpret, kept verbatim.
    pub extra: BTreeMap<String, Value>,
}

impl ServiceMetadata {
    pub fn new(rates: RateCounters, link_prom_graph: impl Into<String>) -> Self {
        Self {
            rates,
            link_prom_graph: link_prom_graph.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Convert a raw metadata map, failing on the first missing or mistyped key.
    ///
    /// `entity` is only used to label errors.
    pub fn from_map(entity: &str, map: &Map<String, Value>) -> Result<Self> {
        let rates = RateCounters {
            rate: read_counter(entity, map, RATE)?,
            rate_2xx: read_counter(entity, map, RATE_2XX)?,
            rate_3xx: read_counter(entity, map, RATE_3XX)?,
            rate_4xx: read_counter(entity, map, RATE_4XX)?,
            rate_5xx: read_counter(entity, map, RATE_5XX)?,
        };
        rates.validate(entity)?;

        let link_prom_graph = match map.get(LINK_PROM_GRAPH) {
            Some(Value::String(link)) => link.clone(),
            Some(_) => {
                return Err(Error::mistyped_metadata_field(
                    entity,
                    LINK_PROM_GRAPH,
                    "string",
                ));
            }
            None => return Err(Error::missing_metadata_field(entity, LINK_PROM_GRAPH)),
        };

        let extra = map
            .iter()
            .filter(|(key, _)| !is_known_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            rates,
            link_prom_graph,
            extra,
        })
    }
}

fn is_known_key(key: &str) -> bool {
    matches!(
        key,
        RATE | RATE_2XX | RATE_3XX | RATE_4XX | RATE_5XX | LINK_PROM_GRAPH
    )
}

fn read_counter(entity: &str, map: &Map<String, Value>, key: &str) -> Result<f64> {
    match map.get(key) {
        Some(value) => value
            .as_f64()
            .ok_or_else(|| Error::mistyped_metadata_field(entity, key, "number")),
        None => Err(Error::missing_metadata_field(entity, key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshviz_error::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_from_map_reads_all_fields() {
        let raw = map(json!({
            "rate": 20.0,
            "rate_2xx": 10.0,
            "rate_3xx": 0,
            "rate_4xx": 10.0,
            "rate_5xx": 0.0,
            "link_prom_graph": "http://prometheus/graph?g0.expr=x",
            "source_version": "v1"
        }));

        let meta = ServiceMetadata::from_map("reviews (v2)", &raw).unwrap();
        assert_eq!(meta.rates, RateCounters::new(20.0, 10.0, 0.0, 10.0, 0.0));
        assert_eq!(meta.link_prom_graph, "http://prometheus/graph?g0.expr=x");
        assert_eq!(meta.extra.len(), 1);
        assert_eq!(meta.extra["source_version"], json!("v1"));
    }

    #[test]
    fn test_missing_counter_names_entity_and_key() {
        let raw = map(json!({
            "rate": 1.0, "rate_2xx": 1.0, "rate_3xx": 0.0, "rate_4xx": 0.0,
            "link_prom_graph": "x"
        }));

        let err = ServiceMetadata::from_map("reviews (v2)", &raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingMetadataField);
        assert_eq!(err.context_value("entity"), Some("reviews (v2)"));
        assert_eq!(err.context_value("key"), Some(RATE_5XX));
    }

    #[test]
    fn test_missing_link() {
        let raw = map(json!({
            "rate": 1.0, "rate_2xx": 1.0, "rate_3xx": 0.0, "rate_4xx": 0.0, "rate_5xx": 0.0
        }));

        let err = ServiceMetadata::from_map("details (v1)", &raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingMetadataField);
        assert_eq!(err.context_value("key"), Some(LINK_PROM_GRAPH));
    }

    #[test]
    fn test_mistyped_fields() {
        let raw = map(json!({
            "rate": "12", "rate_2xx": 1.0, "rate_3xx": 0.0, "rate_4xx": 0.0, "rate_5xx": 0.0,
            "link_prom_graph": "x"
        }));
        let err = ServiceMetadata::from_map("ratings (v1)", &raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingMetadataField);
        assert_eq!(err.context_value("key"), Some(RATE));
        assert_eq!(err.context_value("expected"), Some("number"));

        let raw = map(json!({
            "rate": 1.0, "rate_2xx": 1.0, "rate_3xx": 0.0, "rate_4xx": 0.0, "rate_5xx": 0.0,
            "link_prom_graph": 7
        }));
        let err = ServiceMetadata::from_map("ratings (v1)", &raw).unwrap_err();
        assert_eq!(err.context_value("expected"), Some("string"));
    }

    #[test]
    fn test_negative_counter_rejected() {
        let raw = map(json!({
            "rate": 1.0, "rate_2xx": -1.0, "rate_3xx": 0.0, "rate_4xx": 0.0, "rate_5xx": 0.0,
            "link_prom_graph": "x"
        }));
        let err = ServiceMetadata::from_map("ratings (v1)", &raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidMetadataValue);
        assert_eq!(err.context_value("key"), Some(RATE_2XX));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let rates = RateCounters::new(f64::NAN, 0.0, 0.0, 0.0, 0.0);
        assert!(rates.validate("x (v1)").is_err());
        assert!(RateCounters::all_ok(5.0).validate("x (v1)").is_ok());
    }
}
