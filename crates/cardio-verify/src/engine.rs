//! Patient input validator.
//!
//! `PatientValidator` checks raw JSON before anything reaches the core:
//!
//! 1. **Structural**: the payload is validated against a JSON Schema built
//!    from `FIELD_SPECS`. Every failure is collected so the caller sees the
//!    complete list in one pass.
//! 2. **Typed**: the payload is deserialized into `PatientFeatures` and the
//!    range table is re-checked on the typed record.
//!
//! Action ids are checked separately against the closed range 0..=4.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use cardio_contracts::{
    action::Action,
    error::{CardioError, CardioResult},
    patient::{PatientFeatures, FIELD_SPECS},
};

/// JSON Schema for one patient record.
pub fn patient_schema() -> Value {
    let mut properties = Map::new();
    for spec in FIELD_SPECS.iter() {
        let mut property = Map::new();
        property.insert(
            "type".to_string(),
            json!(if spec.integer { "integer" } else { "number" }),
        );
        property.insert("description".to_string(), json!(spec.description));
        match spec.allowed {
            Some(allowed) => {
                let values: Vec<Value> = allowed.iter().map(|v| json!(*v as i64)).collect();
                property.insert("enum".to_string(), Value::Array(values));
            }
            None => {
                property.insert("minimum".to_string(), json!(spec.min));
                property.insert("maximum".to_string(), json!(spec.max));
            }
        }
        properties.insert(spec.name.to_string(), Value::Object(property));
    }

    let required: Vec<&str> = FIELD_SPECS.iter().map(|s| s.name).collect();
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "PatientFeatures",
        "type": "object",
        "required": required,
        "properties": properties,
    })
}

/// Validates raw patient JSON and action ids at the input boundary.
pub struct PatientValidator {
    schema: Value,
}

impl PatientValidator {
    pub fn new() -> Self {
        Self { schema: patient_schema() }
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Validate `payload` and convert it to a typed record.
    ///
    /// # Errors
    ///
    /// - `SchemaValidation` with one message per failing field
    /// - `InvalidPatient` if the typed range check still fails
    /// - `ConfigError` if the schema itself cannot be compiled
    pub fn validate_json(&self, payload: &Value) -> CardioResult<PatientFeatures> {
        // ── Phase 1: JSON Schema structural validation ────────────────────────
        let validator = jsonschema::validator_for(&self.schema).map_err(|e| {
            CardioError::ConfigError { reason: format!("invalid patient JSON Schema: {e}") }
        })?;

        let failures: Vec<String> = validator
            .iter_errors(payload)
            .map(|error| {
                let path = error.instance_path.to_string();
                let location = if path.is_empty() { "(root)".to_string() } else { path };
                format!("{}: {}", location, error)
            })
            .collect();

        if !failures.is_empty() {
            warn!(failure_count = failures.len(), "patient input rejected by schema");
            return Err(CardioError::SchemaValidation { failures });
        }

        // ── Phase 2: typed conversion and range re-check ─────────────────────
        let features: PatientFeatures = serde_json::from_value(payload.clone()).map_err(|e| {
            CardioError::SchemaValidation { failures: vec![format!("(root): {e}")] }
        })?;
        features.validate()?;

        debug!("patient input accepted");
        Ok(features)
    }

    /// Parse `text` as JSON, then `validate_json`.
    pub fn validate_str(&self, text: &str) -> CardioResult<PatientFeatures> {
        let payload: Value = serde_json::from_str(text).map_err(|e| CardioError::SchemaValidation {
            failures: vec![format!("(root): invalid JSON: {e}")],
        })?;
        self.validate_json(&payload)
    }

    /// Check an action id from the boundary.
    pub fn validate_action(&self, value: i64) -> CardioResult<Action> {
        Action::try_from(value).inspect_err(|_| {
            warn!(action = value, "action id rejected");
        })
    }

    /// Validate a `{"patient": {...}, "action": n}` simulation request.
    pub fn validate_simulation_request(&self, payload: &Value) -> CardioResult<(PatientFeatures, Action)> {
        let patient = payload.get("patient").ok_or_else(|| CardioError::SchemaValidation {
            failures: vec!["(root): \"patient\" is a required property".to_string()],
        })?;
        let action = payload
            .get("action")
            .and_then(Value::as_i64)
            .ok_or_else(|| CardioError::SchemaValidation {
                failures: vec!["/action: must be an integer".to_string()],
            })?;

        let action = self.validate_action(action)?;
        let features = self.validate_json(patient)?;
        Ok((features, action))
    }
}

impl Default for PatientValidator {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use cardio_contracts::{action::Action, error::CardioError};

    use super::{patient_schema, PatientValidator};

    fn valid_payload() -> serde_json::Value {
        json!({
            "age": 63, "sex": 1, "cp": 3, "trestbps": 145, "chol": 233, "fbs": 1,
            "restecg": 0, "thalach": 150, "exang": 0, "oldpeak": 2.3, "slope": 2,
            "ca": 0, "thal": 6
        })
    }

    fn failures(err: CardioError) -> Vec<String> {
        match err {
            CardioError::SchemaValidation { failures } => failures,
            other => panic!("expected SchemaValidation, got {:?}", other),
        }
    }

    // ── Schema document ───────────────────────────────────────────────────────

    #[test]
    fn schema_lists_all_fields_as_required() {
        let schema = patient_schema();
        assert_eq!(schema["required"].as_array().unwrap().len(), 13);
        assert_eq!(schema["properties"]["trestbps"]["minimum"], 50.0);
        assert_eq!(schema["properties"]["trestbps"]["maximum"], 250.0);
        assert_eq!(schema["properties"]["cp"]["type"], "integer");
        assert_eq!(schema["properties"]["thal"]["enum"], json!([3, 6, 7]));
    }

    // ── Accepting input ───────────────────────────────────────────────────────

    #[test]
    fn valid_patient_is_accepted() {
        let features = PatientValidator::new().validate_json(&valid_payload()).unwrap();
        assert_eq!(features.trestbps, 145.0);
        assert_eq!(features.oldpeak, 2.3);
        assert_eq!(features.thal, 6.0);
    }

    #[test]
    fn valid_patient_from_text() {
        let text = valid_payload().to_string();
        assert!(PatientValidator::new().validate_str(&text).is_ok());
    }

    // ── Rejecting input ───────────────────────────────────────────────────────

    #[test]
    fn missing_field_is_reported() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("chol");
        let msgs = failures(PatientValidator::new().validate_json(&payload).unwrap_err());
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("chol"), "{}", msgs[0]);
    }

    #[test]
    fn all_range_failures_collected_with_field_paths() {
        let mut payload = valid_payload();
        payload["age"] = json!(150);
        payload["trestbps"] = json!(20);
        payload["thal"] = json!(5);
        let msgs = failures(PatientValidator::new().validate_json(&payload).unwrap_err());
        assert_eq!(msgs.len(), 3, "{:?}", msgs);
        assert!(msgs.iter().any(|m| m.starts_with("/age")));
        assert!(msgs.iter().any(|m| m.starts_with("/trestbps")));
        assert!(msgs.iter().any(|m| m.starts_with("/thal")));
    }

    #[test]
    fn wrong_type_is_reported() {
        let mut payload = valid_payload();
        payload["chol"] = json!("high");
        let msgs = failures(PatientValidator::new().validate_json(&payload).unwrap_err());
        assert!(msgs.iter().any(|m| m.starts_with("/chol")));
    }

    #[test]
    fn non_object_payload_is_reported_at_root() {
        let msgs = failures(PatientValidator::new().validate_json(&json!([1, 2, 3])).unwrap_err());
        assert!(msgs.iter().any(|m| m.starts_with("(root)")));
    }

    #[test]
    fn malformed_text_is_rejected() {
        let msgs = failures(PatientValidator::new().validate_str("{\"age\": ").unwrap_err());
        assert!(msgs[0].contains("invalid JSON"));
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    #[test]
    fn action_range_is_enforced() {
        let v = PatientValidator::new();
        assert_eq!(v.validate_action(0).unwrap(), Action::MonitorOnly);
        assert_eq!(v.validate_action(4).unwrap(), Action::IntensiveTreatment);
        assert!(matches!(v.validate_action(5), Err(CardioError::InvalidAction { value: 5 })));
        assert!(matches!(v.validate_action(-1), Err(CardioError::InvalidAction { value: -1 })));
    }

    #[test]
    fn simulation_request_checks_action_before_patient() {
        let v = PatientValidator::new();
        let ok = v
            .validate_simulation_request(&json!({ "patient": valid_payload(), "action": 2 }))
            .unwrap();
        assert_eq!(ok.1, Action::SingleMedication);

        let err = v
            .validate_simulation_request(&json!({ "patient": { "age": 500 }, "action": 9 }))
            .unwrap_err();
        assert!(matches!(err, CardioError::InvalidAction { value: 9 }));

        let err = v.validate_simulation_request(&json!({ "patient": valid_payload() })).unwrap_err();
        assert!(matches!(err, CardioError::SchemaValidation { .. }));
    }
}
