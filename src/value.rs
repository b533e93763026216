use std::fmt;

/// Prefix of every struct type tag, e.g. `struct:Pose2d`.
pub const STRUCT_TYPE_PREFIX: &str = "struct:";

/// A typed value that can be written as the payload of a data record.
///
/// The variant decides both the payload layout and the type tag announced in
/// the entry's Start record, so every name must keep a single variant for the
/// whole session.
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    String(String),
    BooleanArray(Vec<bool>),
    /// Widened to 64-bit elements on the wire and tagged `int64[]`.
    Int32Array(Vec<i32>),
    Int64Array(Vec<i64>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
    StringArray(Vec<String>),
    /// Fixed-layout composite of doubles, described by a registered schema.
    Struct {
        /// Schema name without the `struct:` prefix
        schema: String,
        fields: Vec<f64>,
    },
}

impl LogValue {
    /// The wire type tag of this value.
    pub fn type_tag(&self) -> String {
        match self {
            LogValue::Boolean(_) => "boolean".to_string(),
            LogValue::Int32(_) => "int32".to_string(),
            LogValue::Int64(_) => "int64".to_string(),
            LogValue::Float(_) => "float".to_string(),
            LogValue::Double(_) => "double".to_string(),
            LogValue::String(_) => "string".to_string(),
            LogValue::BooleanArray(_) => "boolean[]".to_string(),
            LogValue::Int32Array(_) | LogValue::Int64Array(_) => "int64[]".to_string(),
            LogValue::FloatArray(_) => "float[]".to_string(),
            LogValue::DoubleArray(_) => "double[]".to_string(),
            LogValue::StringArray(_) => "string[]".to_string(),
            LogValue::Struct { schema, .. } => struct_type_tag(schema),
        }
    }

    /// Schema name for struct values.
    pub fn struct_schema(&self) -> Option<&str> {
        match self {
            LogValue::Struct { schema, .. } => Some(bare_schema_name(schema)),
            _ => None,
        }
    }
}

/// Builds the `struct:<Name>` tag for a schema name, prefixed or not.
pub fn struct_type_tag(schema: &str) -> String {
    format!("{STRUCT_TYPE_PREFIX}{}", bare_schema_name(schema))
}

/// Strips an optional `struct:` prefix from a schema name.
pub fn bare_schema_name(name: &str) -> &str {
    name.strip_prefix(STRUCT_TYPE_PREFIX).unwrap_or(name)
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "]")
}

/// Human-readable rendering used for the live side-channel.
impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Boolean(v) => write!(f, "{}", v),
            LogValue::Int32(v) => write!(f, "{}", v),
            LogValue::Int64(v) => write!(f, "{}", v),
            LogValue::Float(v) => write!(f, "{}", v),
            LogValue::Double(v) => write!(f, "{}", v),
            LogValue::String(s) => write!(f, "{}", s),
            LogValue::BooleanArray(v) => write_list(f, v),
            LogValue::Int32Array(v) => write_list(f, v),
            LogValue::Int64Array(v) => write_list(f, v),
            LogValue::FloatArray(v) => write_list(f, v),
            LogValue::DoubleArray(v) => write_list(f, v),
            LogValue::StringArray(v) => write_list(f, v),
            LogValue::Struct { schema, fields } => match (bare_schema_name(schema), fields.as_slice()) {
                ("Pose2d", [x, y, theta]) => write!(f, "x={:.2},y={:.2},θ={:.2}", x, y, theta),
                ("Translation2d", [x, y]) => write!(f, "x={:.2},y={:.2}", x, y),
                ("Rotation2d", [theta]) => write!(f, "θ={:.2}", theta),
                _ => {
                    write!(f, "{}", bare_schema_name(schema))?;
                    write_list(f, fields)
                }
            },
        }
    }
}
