use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::value::bare_schema_name;

/// Type tag of schema entries.
pub const SCHEMA_TYPE_TAG: &str = "structschema";

/// Entry name prefix under which schemas are published.
pub const SCHEMA_ENTRY_PREFIX: &str = "/.schema/struct:";

/// Scalar types accepted in a struct field list.
const PRIMITIVE_TYPES: &[&str] = &[
    "bool", "char", "int8", "int16", "int32", "int64", "uint8", "uint16", "uint32", "uint64",
    "float", "float32", "double", "float64",
];

/// One `type name` declaration of a field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub type_name: String,
    pub name: String,
    /// Element count for `type name[N]` declarations
    pub count: usize,
}

/// A registered struct layout.
#[derive(Debug, Clone, PartialEq)]
pub struct StructSchema {
    pub name: String,
    pub field_list: String,
    pub fields: Vec<FieldSpec>,
    /// Number of `f64` values in a flattened value, when every field is a
    /// double or a double-only nested struct.
    pub double_width: Option<usize>,
}

impl StructSchema {
    /// Entry name under which the schema is published.
    pub fn entry_name(&self) -> String {
        schema_entry_name(&self.name)
    }
}

pub fn schema_entry_name(schema: &str) -> String {
    format!("{SCHEMA_ENTRY_PREFIX}{schema}")
}

/// Parses a `;`-separated list of `type name` declarations.
///
/// Empty declarations (e.g. a trailing `;`) are skipped. Every type must be
/// a primitive or a struct already present in `known`.
pub fn parse_field_list(
    schema: &str,
    field_list: &str,
    known: &HashMap<String, StructSchema>,
) -> Result<Vec<FieldSpec>> {
    let invalid = |reason: String| Error::InvalidSchema {
        name: schema.to_string(),
        reason,
    };

    let mut fields: Vec<FieldSpec> = Vec::new();
    for decl in field_list.split(';').map(str::trim).filter(|d| !d.is_empty()) {
        let mut parts = decl.split_whitespace();
        let (type_name, raw_name) = match (parts.next(), parts.next(), parts.next()) {
            (Some(t), Some(n), None) => (t, n),
            _ => return Err(invalid(format!("expected `type name`, got `{}`", decl))),
        };

        let (name, count) = match raw_name.split_once('[') {
            Some((name, rest)) => {
                let count = rest
                    .strip_suffix(']')
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|n| *n > 0)
                    .ok_or_else(|| invalid(format!("bad array length in `{}`", decl)))?;
                (name, count)
            }
            None => (raw_name, 1),
        };

        if !is_identifier(name) {
            return Err(invalid(format!("bad field name `{}`", name)));
        }
        if fields.iter().any(|f| f.name == name) {
            return Err(invalid(format!("duplicate field `{}`", name)));
        }
        if !PRIMITIVE_TYPES.contains(&type_name) && !known.contains_key(type_name) {
            return Err(invalid(format!("unknown field type `{}`", type_name)));
        }

        fields.push(FieldSpec {
            type_name: type_name.to_string(),
            name: name.to_string(),
            count,
        });
    }

    if fields.is_empty() {
        return Err(invalid("field list is empty".to_string()));
    }
    Ok(fields)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn double_width(fields: &[FieldSpec], known: &HashMap<String, StructSchema>) -> Option<usize> {
    fields.iter().try_fold(0usize, |acc, field| {
        let width = match field.type_name.as_str() {
            "double" | "float64" => 1,
            other => known.get(other)?.double_width?,
        };
        Some(acc + width * field.count)
    })
}

/// Struct schemas registered in the current session.
///
/// Registration is idempotent per name: the first field list wins and later
/// attempts are ignored.
///
/// # Examples
///
/// ```
/// # use wpilog_logger::schema_registry::SchemaRegistry;
/// let mut schemas = SchemaRegistry::new();
/// let added = schemas.register("Translation2d", "double x;double y").unwrap();
/// assert!(added.is_some());
///
/// // Second registration is a no-op
/// assert!(schemas.register("struct:Translation2d", "double x").unwrap().is_none());
/// assert_eq!(schemas.get("Translation2d").unwrap().double_width, Some(2));
/// ```
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, StructSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and records a schema.
    ///
    /// Returns the new schema when it was added, `None` when the name was
    /// already registered. Names may carry a `struct:` prefix.
    pub fn register(&mut self, name: &str, field_list: &str) -> Result<Option<StructSchema>> {
        let name = bare_schema_name(name);
        if self.schemas.contains_key(name) {
            return Ok(None);
        }
        if !is_identifier(name) {
            return Err(Error::InvalidSchema {
                name: name.to_string(),
                reason: "schema name must be an identifier".to_string(),
            });
        }

        let fields = parse_field_list(name, field_list, &self.schemas)?;
        let schema = StructSchema {
            name: name.to_string(),
            field_list: field_list.to_string(),
            double_width: double_width(&fields, &self.schemas),
            fields,
        };
        self.schemas.insert(name.to_string(), schema.clone());
        Ok(Some(schema))
    }

    pub fn get(&self, name: &str) -> Option<&StructSchema> {
        self.schemas.get(bare_schema_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Checks that a struct value of `field_count` doubles can be written.
    pub fn check_value(&self, schema: &str, field_count: usize) -> Result<()> {
        let registered = self
            .get(schema)
            .ok_or_else(|| Error::UnregisteredSchema(schema.to_string()))?;
        match registered.double_width {
            Some(expected) if expected != field_count => Err(Error::StructArity {
                schema: registered.name.clone(),
                expected,
                actual: field_count,
            }),
            _ => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
