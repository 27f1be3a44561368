//! Attribute-map compilation
//!
//! Turns a raw attribute map, as declared on a model definition, into a
//! [`Schema`]. A declared attribute is either a bare type string or an
//! object carrying the recognized modifiers; anything else fails the
//! compile. Normalization is total and defensive: an unknown type never
//! reaches an adapter unmapped, it degrades to `string` instead.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{MapperError, MapperResult};
use crate::schema::{AttributeType, NormalizedAttribute, Schema};

/// Which automatic attributes the compiler may inject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoPolicy {
    pub auto_pk: bool,
    pub auto_created_at: bool,
    pub auto_updated_at: bool,
}

impl Default for AutoPolicy {
    fn default() -> Self {
        Self {
            auto_pk: true,
            auto_created_at: true,
            auto_updated_at: true,
        }
    }
}

impl AutoPolicy {
    /// Disable every automatic attribute
    pub fn none() -> Self {
        Self {
            auto_pk: false,
            auto_created_at: false,
            auto_updated_at: false,
        }
    }
}

/// A declared attribute: a bare type string or a modifier object
///
/// Unrecognized object keys are ignored by construction; only the fields
/// named here have any effect on the compiled schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AttributeDefinition {
    Type(String),
    Definition(AttributeModifiers),
}

/// The recognized modifier fields of an object-form attribute
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeModifiers {
    #[serde(rename = "type")]
    pub attr_type: Option<String>,
    pub defaults_to: Option<Value>,
    pub primary_key: Option<bool>,
    pub auto_increment: Option<bool>,
    pub unique: Option<bool>,
    pub index: Option<bool>,
}

impl Schema {
    /// Compile a raw attribute map into a schema
    ///
    /// Fails only for attribute entries that are neither a string nor an
    /// object. After all declared attributes compile, automatic attributes
    /// are injected according to `policy`: an auto-increment `id` primary
    /// key when no attribute declares `primaryKey` and none is literally
    /// named `id`, and `createdAt`/`updatedAt` timestamps when not already
    /// declared.
    pub fn compile(
        attributes: &serde_json::Map<String, Value>,
        policy: &AutoPolicy,
    ) -> MapperResult<Schema> {
        let mut compiled = BTreeMap::new();
        let mut primary_key_declared = false;

        for (name, raw) in attributes {
            let definition: AttributeDefinition =
                serde_json::from_value(raw.clone()).map_err(|_| {
                    MapperError::schema_validation(
                        name,
                        "expected a type string or an attribute object",
                    )
                })?;

            let attr = match definition {
                AttributeDefinition::Type(declared) => {
                    NormalizedAttribute::of_type(AttributeType::from_declared(&declared))
                }
                AttributeDefinition::Definition(modifiers) => {
                    // Declaring primaryKey at all, even as false, marks the
                    // model as managing its own key.
                    if modifiers.primary_key.is_some() {
                        primary_key_declared = true;
                    }
                    normalize_modifiers(modifiers)
                }
            };

            compiled.insert(name.clone(), attr);
        }

        inject_auto_attributes(&mut compiled, attributes, primary_key_declared, policy);

        Ok(Schema::from_attributes(compiled))
    }
}

fn normalize_modifiers(modifiers: AttributeModifiers) -> NormalizedAttribute {
    let declared_type = modifiers
        .attr_type
        .as_deref()
        .map(AttributeType::from_declared)
        .unwrap_or(AttributeType::String);

    let mut attr = NormalizedAttribute::of_type(declared_type);
    attr.defaults_to = modifiers.defaults_to;
    attr.primary_key = modifiers.primary_key.unwrap_or(false);
    attr.unique = modifiers.unique.unwrap_or(false);
    attr.index = modifiers.index.unwrap_or(false);

    // An autoIncrement declaration forces the integer type, overriding any
    // declared type regardless of key order in the source object.
    if let Some(auto_increment) = modifiers.auto_increment {
        attr.auto_increment = auto_increment;
        attr.attr_type = AttributeType::Integer;
    }

    attr
}

fn inject_auto_attributes(
    compiled: &mut BTreeMap<String, NormalizedAttribute>,
    declared: &serde_json::Map<String, Value>,
    primary_key_declared: bool,
    policy: &AutoPolicy,
) {
    // A literal `id` attribute suppresses injection even without a
    // primaryKey flag.
    if policy.auto_pk && !primary_key_declared && !declared.contains_key("id") {
        let mut id = NormalizedAttribute::of_type(AttributeType::Integer);
        id.auto_increment = true;
        id.primary_key = true;
        id.defaults_to = Some(Value::String("AUTO_INCREMENT".to_string()));
        compiled.insert("id".to_string(), id);
    }

    let timestamp = || {
        let mut attr = NormalizedAttribute::of_type(AttributeType::Date);
        attr.defaults_to = Some(Value::String("NOW".to_string()));
        attr
    };

    if policy.auto_created_at && !declared.contains_key("createdAt") {
        compiled.insert("createdAt".to_string(), timestamp());
    }
    if policy.auto_updated_at && !declared.contains_key("updatedAt") {
        compiled.insert("updatedAt".to_string(), timestamp());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> serde_json::Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn bare_string_attribute_compiles_to_its_type() {
        let schema = Schema::compile(&attrs(json!({ "name": "string" })), &AutoPolicy::none())
            .unwrap();

        let name = schema.get("name").unwrap();
        assert_eq!(name.attr_type, AttributeType::String);
        assert!(name.defaults_to.is_none());
        assert!(!name.primary_key);
    }

    #[test]
    fn object_attribute_keeps_type_and_default() {
        let schema = Schema::compile(
            &attrs(json!({
                "phone": { "type": "string", "defaultsTo": "555-555-5555" }
            })),
            &AutoPolicy::none(),
        )
        .unwrap();

        let phone = schema.get("phone").unwrap();
        assert_eq!(phone.attr_type, AttributeType::String);
        assert_eq!(phone.defaults_to, Some(json!("555-555-5555")));
    }

    #[test]
    fn unknown_type_in_object_degrades_to_string() {
        let schema = Schema::compile(
            &attrs(json!({ "website": { "type": "url" } })),
            &AutoPolicy::none(),
        )
        .unwrap();

        assert_eq!(schema.get("website").unwrap().attr_type, AttributeType::String);
    }

    #[test]
    fn unrecognized_object_keys_are_ignored() {
        let schema = Schema::compile(
            &attrs(json!({
                "name": { "type": "string", "required": true, "maxLength": 50 }
            })),
            &AutoPolicy::none(),
        )
        .unwrap();

        let name = schema.get("name").unwrap();
        assert_eq!(name.attr_type, AttributeType::String);
        assert!(!name.unique);
        assert!(!name.index);
    }

    #[test]
    fn auto_increment_forces_integer_over_declared_type() {
        let schema = Schema::compile(
            &attrs(json!({
                "counter": { "type": "string", "autoIncrement": true }
            })),
            &AutoPolicy::none(),
        )
        .unwrap();

        let counter = schema.get("counter").unwrap();
        assert!(counter.auto_increment);
        assert_eq!(counter.attr_type, AttributeType::Integer);
    }

    #[test]
    fn malformed_attribute_entry_fails_compilation() {
        let err = Schema::compile(&attrs(json!({ "age": 42 })), &AutoPolicy::none())
            .unwrap_err();

        match err {
            MapperError::SchemaValidation { attribute, .. } => assert_eq!(attribute, "age"),
            other => panic!("expected schema validation error, got {:?}", other),
        }
    }

    #[test]
    fn auto_pk_injects_auto_increment_id() {
        let policy = AutoPolicy {
            auto_pk: true,
            auto_created_at: false,
            auto_updated_at: false,
        };
        let schema = Schema::compile(&attrs(json!({ "name": "string" })), &policy).unwrap();

        let id = schema.get("id").unwrap();
        assert_eq!(id.attr_type, AttributeType::Integer);
        assert!(id.auto_increment);
        assert!(id.primary_key);
        assert_eq!(id.defaults_to, Some(json!("AUTO_INCREMENT")));
        assert_eq!(schema.primary_key(), Some("id"));
    }

    #[test]
    fn declared_primary_key_suppresses_id_injection() {
        let policy = AutoPolicy {
            auto_pk: true,
            auto_created_at: false,
            auto_updated_at: false,
        };
        let schema = Schema::compile(
            &attrs(json!({
                "uuid": { "type": "string", "primaryKey": true }
            })),
            &policy,
        )
        .unwrap();

        assert!(!schema.contains("id"));
        assert_eq!(schema.primary_key(), Some("uuid"));
    }

    #[test]
    fn literal_id_attribute_suppresses_injection_without_primary_key_flag() {
        let policy = AutoPolicy {
            auto_pk: true,
            auto_created_at: false,
            auto_updated_at: false,
        };
        let schema = Schema::compile(&attrs(json!({ "id": "string" })), &policy).unwrap();

        let id = schema.get("id").unwrap();
        assert_eq!(id.attr_type, AttributeType::String);
        assert!(!id.auto_increment);
        assert!(!id.primary_key);
    }

    #[test]
    fn timestamps_inject_under_their_flags() {
        let schema =
            Schema::compile(&attrs(json!({ "name": "string" })), &AutoPolicy::default()).unwrap();

        for name in ["createdAt", "updatedAt"] {
            let attr = schema.get(name).unwrap();
            assert_eq!(attr.attr_type, AttributeType::Date);
            assert_eq!(attr.defaults_to, Some(json!("NOW")));
        }
    }

    #[test]
    fn declared_timestamps_are_not_overwritten() {
        let schema = Schema::compile(
            &attrs(json!({ "createdAt": "datetime" })),
            &AutoPolicy::default(),
        )
        .unwrap();

        assert_eq!(
            schema.get("createdAt").unwrap().attr_type,
            AttributeType::Datetime
        );
        assert!(schema.get("createdAt").unwrap().defaults_to.is_none());
        // updatedAt was not declared, so it still injects.
        assert_eq!(schema.get("updatedAt").unwrap().attr_type, AttributeType::Date);
    }

    #[test]
    fn compilation_is_idempotent() {
        let raw = attrs(json!({
            "name": "string",
            "phone": { "type": "string", "defaultsTo": "555-555-5555" },
            "seq": { "autoIncrement": true }
        }));
        let policy = AutoPolicy::default();

        let first = Schema::compile(&raw, &policy).unwrap();
        let second = Schema::compile(&raw, &policy).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn at_most_one_primary_key_after_compilation() {
        let schema =
            Schema::compile(&attrs(json!({ "name": "string" })), &AutoPolicy::default()).unwrap();

        let pk_count = schema.iter().filter(|(_, attr)| attr.primary_key).count();
        assert_eq!(pk_count, 1);
    }
}
