use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// A leaf value in a config tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Char(char),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Human-readable kind, used in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "boolean",
            Scalar::Char(_) => "character",
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Str(_) => "string",
        }
    }

    pub(crate) fn to_yaml(&self) -> Value {
        match self {
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Char(c) => Value::String(c.to_string()),
            Scalar::Int(i) => Value::Number((*i).into()),
            Scalar::Float(f) => Value::Number((*f).into()),
            Scalar::Str(s) => Value::String(s.clone()),
        }
    }

    /// Read a decoded YAML value as a scalar. Returns `None` for anything that
    /// is not a bool, number or string.
    pub(crate) fn from_yaml(value: &Value) -> Option<Scalar> {
        match value {
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Scalar::Int(i)),
                None => n.as_f64().map(Scalar::Float),
            },
            Value::String(s) => Some(Scalar::Str(s.clone())),
            _ => None,
        }
    }
}

/// Describe a decoded YAML value for error messages.
pub(crate) fn yaml_kind(value: &Value) -> String {
    match Scalar::from_yaml(value) {
        Some(scalar) => scalar.kind().to_string(),
        None => match value {
            Value::Null => "null".into(),
            Value::Sequence(_) => "sequence".into(),
            Value::Mapping(_) => "mapping".into(),
            Value::Tagged(t) => format!("tagged value {}", t.tag),
            _ => "unknown".into(),
        },
    }
}

/// A Rust type that can be stored as a [`Scalar`].
///
/// `to_scalar` returning `None` means the field has nothing to write and is
/// skipped on save (this is what `Option<V>` does for `None`).
pub trait ScalarField: Sized {
    const KIND: &'static str;

    fn to_scalar(&self) -> Option<Scalar>;

    fn from_scalar(scalar: &Scalar) -> Option<Self>;
}

impl ScalarField for bool {
    const KIND: &'static str = "boolean";

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Bool(*self))
    }

    fn from_scalar(scalar: &Scalar) -> Option<Self> {
        match scalar {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl ScalarField for char {
    const KIND: &'static str = "character";

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Char(*self))
    }

    fn from_scalar(scalar: &Scalar) -> Option<Self> {
        match scalar {
            Scalar::Char(c) => Some(*c),
            Scalar::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl ScalarField for String {
    const KIND: &'static str = "string";

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Str(self.clone()))
    }

    fn from_scalar(scalar: &Scalar) -> Option<Self> {
        match scalar {
            Scalar::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

macro_rules! integer_field {
    ($($ty:ty),*) => {
        $(
            impl ScalarField for $ty {
                const KIND: &'static str = "integer";

                fn to_scalar(&self) -> Option<Scalar> {
                    Some(Scalar::Int(i64::from(*self)))
                }

                fn from_scalar(scalar: &Scalar) -> Option<Self> {
                    match scalar {
                        Scalar::Int(i) => <$ty>::try_from(*i).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

integer_field!(i8, i16, i32, i64, u8, u16, u32);

impl ScalarField for f64 {
    const KIND: &'static str = "float";

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Float(*self))
    }

    fn from_scalar(scalar: &Scalar) -> Option<Self> {
        match scalar {
            Scalar::Float(f) => Some(*f),
            Scalar::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl ScalarField for f32 {
    const KIND: &'static str = "float";

    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Float(f64::from(*self)))
    }

    fn from_scalar(scalar: &Scalar) -> Option<Self> {
        f64::from_scalar(scalar).map(|f| f as f32)
    }
}

impl<V: ScalarField> ScalarField for Option<V> {
    const KIND: &'static str = V::KIND;

    fn to_scalar(&self) -> Option<Scalar> {
        self.as_ref().and_then(V::to_scalar)
    }

    fn from_scalar(scalar: &Scalar) -> Option<Self> {
        V::from_scalar(scalar).map(Some)
    }
}

/// Per-field overrides: alternate key name and the comments written next to
/// the field.
///
/// Build with the fluent helpers; they normalize blank input so that an
/// empty override or comment behaves exactly like an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMeta {
    pub path_override: Option<String>,
    pub inline_comment: Option<String>,
    pub block_comment: Vec<String>,
}

impl FieldMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the field under `key` instead of its declared name.
    pub fn key(mut self, key: &str) -> Self {
        self.path_override = (!key.is_empty()).then(|| key.to_string());
        self
    }

    /// Comment appended to the end of the field's line.
    pub fn inline_comment(mut self, comment: &str) -> Self {
        self.inline_comment = (!comment.trim().is_empty()).then(|| comment.to_string());
        self
    }

    /// Comment lines written above the field.
    pub fn block_comment<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.block_comment = lines
            .into_iter()
            .map(Into::into)
            .filter(|line: &String| !line.trim().is_empty())
            .collect();
        self
    }
}

/// Throttle settings for the [`TaskGate`](crate::TaskGate).
///
/// At most `requests_per_window` units start within any
/// `window_millis + safety_buffer_millis` period. A zero-length window
/// disables throttling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateSettings {
    pub requests_per_window: u32,
    pub window_millis: u64,
    pub safety_buffer_millis: u64,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            requests_per_window: 20,
            window_millis: 0,
            safety_buffer_millis: 0,
        }
    }
}
