//! Explicit field schemas for config sections.
//!
//! A config type describes its fields once, in declaration order, through a
//! [`SchemaBuilder`]. Each entry pairs a key with typed accessors and the
//! field's [`FieldMeta`]. Both mapping directions walk the same list, so the
//! key a value is written under is always the key it is read back from.
//!
//! ```ignore
//! #[derive(Default, Clone)]
//! struct Server {
//!     name: String,
//!     limits: Limits,
//! }
//!
//! impl Section for Server {
//!     fn schema(fields: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
//!         fields
//!             .scalar("name", |s| &s.name, |s| &mut s.name)
//!             .meta(FieldMeta::new().inline_comment("server id"))
//!             .nested("limits", |s| &s.limits, |s| &mut s.limits)
//!     }
//! }
//! ```

use std::collections::HashSet;

use serde_yaml::Mapping;

use crate::error::ConfigError;
use crate::model::{self, StructuralModel};
use crate::path::{self, KeyPath};
use crate::resolve;
use crate::types::{FieldMeta, Scalar, ScalarField};

/// A type that maps to one section of a config file.
///
/// `Default` supplies the values used for keys missing from the file.
pub trait Section: Default + 'static {
    /// Register this type's fields, in the order they should be written.
    fn schema(fields: SchemaBuilder<Self>) -> SchemaBuilder<Self>;
}

type ReadScalar<T> = Box<dyn Fn(&T) -> Option<Scalar> + Send + Sync>;
type WriteScalar<T> = Box<dyn Fn(&mut T, &Scalar) -> bool + Send + Sync>;
type ReadSection<T> = Box<dyn Fn(&T) -> Result<StructuralModel, ConfigError> + Send + Sync>;
type WriteSection<T> =
    Box<dyn Fn(&mut T, &Mapping, &KeyPath) -> Result<(), ConfigError> + Send + Sync>;

pub(crate) enum FieldKind<T> {
    Scalar {
        expected: &'static str,
        read: ReadScalar<T>,
        write: WriteScalar<T>,
    },
    Nested {
        read: ReadSection<T>,
        write: WriteSection<T>,
    },
}

/// One registered field.
pub struct Field<T> {
    name: String,
    meta: FieldMeta,
    kind: FieldKind<T>,
}

impl<T> Field<T> {
    /// The declared field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The key this field is written under: the override if one is set,
    /// otherwise the declared name.
    pub fn key(&self) -> &str {
        self.meta.path_override.as_deref().unwrap_or(&self.name)
    }

    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    pub fn is_nested(&self) -> bool {
        matches!(self.kind, FieldKind::Nested { .. })
    }

    pub(crate) fn kind(&self) -> &FieldKind<T> {
        &self.kind
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("meta", &self.meta)
            .field("nested", &self.is_nested())
            .finish()
    }
}

/// The validated, ordered field list of a [`Section`].
pub struct Schema<T> {
    fields: Vec<Field<T>>,
}

impl<T> std::fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema").field("fields", &self.fields).finish()
    }
}

impl<T: Section> Schema<T> {
    /// Build and validate the schema of `T`.
    pub fn of() -> Result<Self, ConfigError> {
        T::schema(SchemaBuilder::new()).build()
    }
}

impl<T> Schema<T> {
    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Field<T>> {
        self.fields.iter().find(|f| f.key() == key)
    }
}

/// Collects field registrations for a [`Section`].
pub struct SchemaBuilder<T> {
    fields: Vec<Field<T>>,
    misplaced_meta: bool,
}

impl<T: 'static> SchemaBuilder<T> {
    fn new() -> Self {
        Self {
            fields: Vec::new(),
            misplaced_meta: false,
        }
    }

    /// Register a scalar field (`bool`, `char`, integers, floats, `String`, or
    /// an `Option` of one of those).
    pub fn scalar<V: ScalarField + 'static>(
        mut self,
        name: &str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            meta: FieldMeta::default(),
            kind: FieldKind::Scalar {
                expected: V::KIND,
                read: Box::new(move |t: &T| get(t).to_scalar()),
                write: Box::new(move |t: &mut T, scalar: &Scalar| match V::from_scalar(scalar) {
                    Some(value) => {
                        *get_mut(t) = value;
                        true
                    }
                    None => false,
                }),
            },
        });
        self
    }

    /// Register a nested section.
    pub fn nested<N: Section>(
        mut self,
        name: &str,
        get: fn(&T) -> &N,
        get_mut: fn(&mut T) -> &mut N,
    ) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            meta: FieldMeta::default(),
            kind: FieldKind::Nested {
                read: Box::new(move |t: &T| model::build(Some(get(t)))),
                write: Box::new(move |t: &mut T, mapping: &Mapping, at: &KeyPath| {
                    *get_mut(t) = resolve::resolve_at::<N>(mapping, at)?;
                    Ok(())
                }),
            },
        });
        self
    }

    /// Register a nested section that may be absent. `None` is written as an
    /// empty section; a section present in the file loads as `Some`.
    pub fn optional_nested<N: Section>(
        mut self,
        name: &str,
        get: fn(&T) -> &Option<N>,
        get_mut: fn(&mut T) -> &mut Option<N>,
    ) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            meta: FieldMeta::default(),
            kind: FieldKind::Nested {
                read: Box::new(move |t: &T| model::build(get(t).as_ref())),
                write: Box::new(move |t: &mut T, mapping: &Mapping, at: &KeyPath| {
                    *get_mut(t) = Some(resolve::resolve_at::<N>(mapping, at)?);
                    Ok(())
                }),
            },
        });
        self
    }

    /// Attach metadata to the most recently registered field.
    pub fn meta(mut self, meta: FieldMeta) -> Self {
        match self.fields.last_mut() {
            Some(field) => field.meta = meta,
            None => self.misplaced_meta = true,
        }
        self
    }

    /// Validate keys and produce the schema.
    pub fn build(self) -> Result<Schema<T>, ConfigError> {
        if self.misplaced_meta {
            return Err(ConfigError::InvalidKey {
                key: String::new(),
                reason: "metadata registered before any field".into(),
            });
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            let key = field.key();
            path::validate_segment(key)?;
            if !seen.insert(key) {
                return Err(ConfigError::InvalidKey {
                    key: key.into(),
                    reason: "registered more than once".into(),
                });
            }
        }

        Ok(Schema {
            fields: self.fields,
        })
    }
}
