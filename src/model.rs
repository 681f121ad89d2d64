//! The structural model: a generic config tree plus the comments that belong
//! next to its keys, and the mapping from typed sections into it.

use std::collections::BTreeMap;

use serde_yaml::Value;
use tracing::debug;

use crate::error::ConfigError;
use crate::path::KeyPath;
use crate::schema::{FieldKind, Schema, Section};
use crate::types::Scalar;

/// A value in the tree: a scalar leaf or a nested section.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Section(Values),
}

/// Keys of one section, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values(Vec<(String, Node)>);

impl Values {
    /// Insert or replace `key`.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = node,
            None => self.0.push((key, node)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to the YAML mapping handed to the emitter.
    pub fn to_yaml(&self) -> Value {
        let mut mapping = serde_yaml::Mapping::with_capacity(self.0.len());
        for (key, node) in &self.0 {
            let value = match node {
                Node::Scalar(scalar) => scalar.to_yaml(),
                Node::Section(values) => values.to_yaml(),
            };
            mapping.insert(Value::String(key.clone()), value);
        }
        Value::Mapping(mapping)
    }
}

/// A config tree ready to be written.
///
/// Comment maps are keyed by the full path of the key they annotate. When a
/// child model is attached under a parent key, its comment entries move into
/// the parent with that key prepended, so the root model always holds paths
/// as seen from the top of the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuralModel {
    values: Values,
    inline_comments: BTreeMap<KeyPath, String>,
    block_comments: BTreeMap<KeyPath, Vec<String>>,
}

impl StructuralModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, scalar: Scalar) {
        self.values.insert(key, Node::Scalar(scalar));
    }

    /// Attach `child` as the section `key`, re-keying its comments under `key`.
    pub fn attach(&mut self, key: &str, child: StructuralModel) {
        self.values.insert(key, Node::Section(child.values));
        for (path, comment) in child.inline_comments {
            self.inline_comments.insert(path.prefixed(key), comment);
        }
        for (path, lines) in child.block_comments {
            self.block_comments.insert(path.prefixed(key), lines);
        }
    }

    pub fn add_inline_comment(&mut self, path: KeyPath, comment: impl Into<String>) {
        self.inline_comments.insert(path, comment.into());
    }

    pub fn add_block_comment(&mut self, path: KeyPath, lines: Vec<String>) {
        if !lines.is_empty() {
            self.block_comments.insert(path, lines);
        }
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn inline_comment(&self, path: &KeyPath) -> Option<&str> {
        self.inline_comments.get(path).map(String::as_str)
    }

    pub fn block_comment(&self, path: &KeyPath) -> Option<&[String]> {
        self.block_comments.get(path).map(Vec::as_slice)
    }

    pub fn inline_comments(&self) -> &BTreeMap<KeyPath, String> {
        &self.inline_comments
    }

    pub fn block_comments(&self) -> &BTreeMap<KeyPath, Vec<String>> {
        &self.block_comments
    }

    pub fn has_comments(&self) -> bool {
        !self.inline_comments.is_empty() || !self.block_comments.is_empty()
    }
}

/// Build the model of a section value.
///
/// `None` yields an empty model, so an absent nested section is still written
/// as an (empty) section rather than dropped.
pub fn build<C: Section>(input: Option<&C>) -> Result<StructuralModel, ConfigError> {
    let mut model = StructuralModel::new();
    let Some(input) = input else {
        return Ok(model);
    };

    let schema = Schema::<C>::of()?;
    for field in schema.fields() {
        let key = field.key();
        match field.kind() {
            FieldKind::Scalar { read, .. } => match read(input) {
                Some(scalar) => model.set(key, scalar),
                None => {
                    debug!(key, "field has no value, skipped");
                    continue;
                }
            },
            FieldKind::Nested { read, .. } => model.attach(key, read(input)?),
        }

        let meta = field.meta();
        if let Some(comment) = &meta.inline_comment {
            model.add_inline_comment(KeyPath::single(key), comment.clone());
        }
        model.add_block_comment(KeyPath::single(key), meta.block_comment.clone());
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{DeepConfig, OptionalConfig, ServerConfig};

    fn path(segments: &[&str]) -> KeyPath {
        segments.iter().copied().collect()
    }

    #[test]
    fn none_builds_empty_model() {
        let model = build::<ServerConfig>(None).unwrap();
        assert!(model.values().is_empty());
        assert!(!model.has_comments());
    }

    #[test]
    fn scalars_and_sections_are_mapped() {
        let model = build(Some(&ServerConfig::default())).unwrap();
        let values = model.values();
        assert_eq!(values.len(), 3);
        assert_eq!(
            values.get("name"),
            Some(&Node::Scalar(Scalar::Str("srv1".into())))
        );
        assert_eq!(values.get("port"), Some(&Node::Scalar(Scalar::Int(25565))));
        match values.get("limits") {
            Some(Node::Section(limits)) => {
                assert_eq!(limits.get("max"), Some(&Node::Scalar(Scalar::Int(100))));
            }
            other => panic!("Expected section, got {other:?}"),
        }
    }

    #[test]
    fn nested_comments_are_prefixed() {
        let model = build(Some(&ServerConfig::default())).unwrap();
        assert_eq!(model.inline_comment(&path(&["name"])), Some("server id"));
        assert_eq!(
            model.block_comment(&path(&["limits", "max"])),
            Some(&["do not exceed 500".to_string()][..])
        );
        assert_eq!(model.block_comment(&path(&["max"])), None);
    }

    #[test]
    fn deep_comments_keep_full_paths() {
        let model = build(Some(&DeepConfig::default())).unwrap();
        let inline: Vec<String> = model.inline_comments().keys().map(|p| p.to_string()).collect();
        assert!(inline.contains(&"outer.inner.leaf".to_string()));
        assert!(inline.contains(&"outer.inner".to_string()));
        assert!(inline.contains(&"outer".to_string()));
        assert!(inline.contains(&"top".to_string()));
    }

    #[test]
    fn absent_optional_section_is_empty_not_missing() {
        let model = build(Some(&OptionalConfig::default())).unwrap();
        assert_eq!(
            model.values().get("extra"),
            Some(&Node::Section(Values::default()))
        );
    }

    #[test]
    fn none_scalar_is_skipped_with_its_comment() {
        let model = build(Some(&OptionalConfig::default())).unwrap();
        assert!(model.values().get("nickname").is_none());
        assert_eq!(model.inline_comment(&path(&["nickname"])), None);
    }

    #[test]
    fn path_override_is_used_as_key() {
        let model = build(Some(&OptionalConfig::default())).unwrap();
        assert!(model.values().get("max-retries").is_some());
        assert!(model.values().get("retries").is_none());
    }

    #[test]
    fn attach_rekeys_child_comments() {
        let mut child = StructuralModel::new();
        child.set("max", Scalar::Int(1));
        child.add_inline_comment(KeyPath::single("max"), "cap");
        child.add_block_comment(KeyPath::single("max"), vec!["above".into()]);

        let mut parent = StructuralModel::new();
        parent.attach("limits", child);

        assert_eq!(parent.inline_comment(&path(&["limits", "max"])), Some("cap"));
        assert!(parent.block_comment(&path(&["limits", "max"])).is_some());
        assert_eq!(parent.inline_comment(&path(&["max"])), None);
    }

    #[test]
    fn insert_replaces_existing_key() {
        let mut values = Values::default();
        values.insert("a", Node::Scalar(Scalar::Int(1)));
        values.insert("b", Node::Scalar(Scalar::Int(2)));
        values.insert("a", Node::Scalar(Scalar::Int(3)));
        let keys: Vec<&str> = values.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(values.get("a"), Some(&Node::Scalar(Scalar::Int(3))));
    }

    #[test]
    fn to_yaml_keeps_order() {
        let model = build(Some(&ServerConfig::default())).unwrap();
        let text = serde_yaml::to_string(&model.values().to_yaml()).unwrap();
        assert_eq!(text, "name: srv1\nport: 25565\nlimits:\n  max: 100\n");
    }
}
