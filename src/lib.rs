//! Typed YAML config files that keep their comments. Describe a struct once,
//! point at a file, and load or save it.
//!
//! Yamlfig maps a config struct to a YAML document and back. Each field can
//! carry an inline comment and a block comment; they are written next to the
//! field on every save, so a file regenerated from code still reads like a
//! hand-written one.
//!
//! ```ignore
//! let file = Yamlfig::builder::<ServerConfig>()
//!     .app_name("myapp")
//!     .build()?;
//! let config = file.load_or_default()?;
//! ```
//!
//! That call reads `myapp.yml` from the platform config directory, fills keys
//! missing from the file with `ServerConfig::default()`, and writes a
//! commented file with the defaults if there was none.
//!
//! # Schema
//!
//! A config type implements [`Section`] and registers its fields, in the
//! order they should appear in the file, on a [`SchemaBuilder`]:
//!
//! ```ignore
//! impl Section for ServerConfig {
//!     fn schema(fields: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
//!         fields
//!             .scalar("name", |c| &c.name, |c| &mut c.name)
//!             .meta(FieldMeta::new().inline_comment("server id"))
//!             .scalar("port", |c| &c.port, |c| &mut c.port)
//!             .nested("limits", |c| &c.limits, |c| &mut c.limits)
//!     }
//! }
//! ```
//!
//! - **Scalars** are `bool`, `char`, integers, floats and `String`, or an
//!   `Option` of one. A `None` scalar is left out of the file.
//! - **Sections** are any other [`Section`] type, or an `Option` of one
//!   (written as an empty section when `None`).
//! - **[`FieldMeta`]** renames the key in the file and attaches comments.
//!
//! Keys are checked when the schema is built: a key that is empty, repeated,
//! or contains `.`, `:`, `#` or a control character is rejected with
//! [`ConfigError::InvalidKey`].
//!
//! # Saving
//!
//! A save turns the struct into a [`StructuralModel`] (values plus comments
//! keyed by [`KeyPath`]), emits plain YAML, and re-inserts the comments by
//! scanning the emitted text for section headers. The result is swapped into
//! place with a write-replace: the new text goes to `<file>.tmp`, the old
//! file is moved to `<file>.old`, and the old file is moved back if the swap
//! fails. See [`ReplaceOutcome`] for the three ways that can end.
//!
//! ```text
//! name: srv1 # server id
//! port: 25565
//! limits:
//!
//!   # do not exceed 500
//!   max: 100
//! ```
//!
//! # Loading
//!
//! Loading starts from `C::default()` and overwrites every field present in
//! the file. Comments in the file are ignored; the ones in code win on the
//! next save.
//!
//! - Missing keys and `null` values keep the default.
//! - Integers are accepted for float fields. Any other kind mismatch, or an
//!   integer out of range for its field, fails with
//!   [`ConfigError::TypeMismatch`].
//! - A section where a scalar is expected (or the reverse) and keys nothing
//!   reads are logged at `warn` and skipped.
//!
//! # Background calls
//!
//! With the `async` feature (on by default), [`ConfigFile::load_async`] and
//! [`ConfigFile::save_async`] queue the call on a [`TaskGate`]: one worker on
//! the current tokio runtime that runs queued calls in order and can be
//! rate-limited with [`GateSettings`].
//!
//! # Error handling
//!
//! All fallible operations return [`ConfigError`]. File errors carry the
//! path, and key errors carry the full dotted key. The library logs through
//! `tracing` and never installs a subscriber.

pub mod error;
pub mod types;

pub mod annotate;
mod builder;
mod config_file;
#[cfg(feature = "async")]
mod gate;
pub mod model;
pub mod path;
pub mod persist;
pub mod replace;
mod resolve;
mod schema;

#[cfg(test)]
mod fixtures;

pub use builder::{Yamlfig, YamlfigBuilder};
pub use config_file::ConfigFile;
pub use error::ConfigError;
#[cfg(feature = "async")]
pub use gate::TaskGate;
pub use model::StructuralModel;
pub use path::KeyPath;
pub use replace::{FileSystem, ReplaceOutcome, StdFs};
pub use resolve::resolve;
pub use schema::{Field, Schema, SchemaBuilder, Section};
pub use types::{FieldMeta, GateSettings, Scalar, ScalarField};
