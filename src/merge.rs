//! Structural merge of semi-structured documents.
//!
//! Documents loaded from different formats share the [`Node`] shape so
//! existing file content, inferred data and defaults can be combined
//! without clobbering entries a user already wrote.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A generic document value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Node>),
    /// Unordered unique values; merging materializes them as a sorted sequence.
    #[serde(skip_deserializing)]
    Set(Vec<Node>),
    Mapping(IndexMap<String, Node>),
    /// Section-oriented mapping where every value is itself a mapping.
    #[serde(skip_deserializing)]
    Sections(IndexMap<String, IndexMap<String, Node>>),
}

impl Node {
    /// An empty mapping.
    pub fn mapping() -> Self {
        Node::Mapping(IndexMap::new())
    }

    /// Builds a set, dropping duplicates.
    pub fn set<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Node>,
    {
        let mut values: Vec<Node> = values.into_iter().map(Into::into).collect();
        values.sort_by(Node::total_cmp);
        values.dedup();
        Node::Set(values)
    }

    /// Name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "boolean",
            Node::Integer(_) => "integer",
            Node::Float(_) => "float",
            Node::String(_) => "string",
            Node::Sequence(_) => "sequence",
            Node::Set(_) => "set",
            Node::Mapping(_) => "mapping",
            Node::Sections(_) => "sections",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Node::Sequence(_) | Node::Set(_) | Node::Mapping(_) | Node::Sections(_)
        )
    }

    fn is_empty_container(&self) -> bool {
        match self {
            Node::Sequence(items) | Node::Set(items) => items.is_empty(),
            Node::Mapping(map) => map.is_empty(),
            Node::Sections(sections) => sections.is_empty(),
            _ => false,
        }
    }

    /// Truthiness used by the scalar coalesce rule.
    pub fn is_truthy(&self) -> bool {
        match self {
            Node::Null => false,
            Node::Bool(b) => *b,
            Node::Integer(i) => *i != 0,
            Node::Float(f) => *f != 0.0,
            Node::String(s) => !s.is_empty(),
            _ => !self.is_empty_container(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of a sequence or set.
    pub fn as_items(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) | Node::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut IndexMap<String, Node>> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a key of a mapping or a section of a sections document.
    pub fn get(&self, key: &str) -> Option<Node> {
        match self {
            Node::Mapping(map) => map.get(key).cloned(),
            Node::Sections(sections) => sections.get(key).cloned().map(Node::Mapping),
            _ => None,
        }
    }

    /// Renders a scalar the way it appears in line-oriented formats.
    pub fn to_plain_string(&self) -> String {
        match self {
            Node::Null => String::new(),
            Node::Bool(b) => b.to_string(),
            Node::Integer(i) => i.to_string(),
            Node::Float(f) => f.to_string(),
            Node::String(s) => s.clone(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Node::Null => 0,
            Node::Bool(_) => 1,
            Node::Integer(_) | Node::Float(_) => 2,
            Node::String(_) => 3,
            Node::Sequence(_) | Node::Set(_) => 4,
            Node::Mapping(_) | Node::Sections(_) => 5,
        }
    }

    /// Total order used to sort set members deterministically.
    pub fn total_cmp(&self, other: &Node) -> Ordering {
        match (self, other) {
            (Node::Bool(a), Node::Bool(b)) => a.cmp(b),
            (Node::Integer(a), Node::Integer(b)) => a.cmp(b),
            (Node::Integer(a), Node::Float(b)) => (*a as f64).total_cmp(b),
            (Node::Float(a), Node::Integer(b)) => a.total_cmp(&(*b as f64)),
            (Node::Float(a), Node::Float(b)) => a.total_cmp(b),
            (Node::String(a), Node::String(b)) => a.cmp(b),
            (
                Node::Sequence(a) | Node::Set(a),
                Node::Sequence(b) | Node::Set(b),
            ) => a
                .iter()
                .zip(b)
                .map(|(x, y)| x.total_cmp(y))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (Node::Mapping(a), Node::Mapping(b)) => a
                .iter()
                .zip(b)
                .map(|((ka, va), (kb, vb))| ka.cmp(kb).then_with(|| va.total_cmp(vb)))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Key/value pairs of a mapping-like node.
    fn into_entries(self) -> Vec<(String, Node)> {
        match self {
            Node::Mapping(map) => map.into_iter().collect(),
            Node::Sections(sections) => sections
                .into_iter()
                .map(|(name, section)| (name, Node::Mapping(section)))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Integer(value)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(values: Vec<T>) -> Self {
        Node::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Node>> for Node {
    fn from(map: IndexMap<String, Node>) -> Self {
        Node::Mapping(map)
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Node::Null,
            serde_json::Value::Bool(b) => Node::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Node::Integer(i),
                None => Node::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Node::String(s),
            serde_json::Value::Array(items) => {
                Node::Sequence(items.into_iter().map(Node::from).collect())
            }
            serde_json::Value::Object(map) => {
                Node::Mapping(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

/// Merges `b` into `a`.
///
/// Mappings merge key by key, sequences append the novel elements of `b`,
/// sets become a sorted union and scalars coalesce to the first truthy value.
///
/// # Errors
/// * `Error::MergeTypeConflict` when two containers of different shapes meet,
///   or a non-mapping value is assigned into a sections document
pub fn merge(a: Node, b: Node) -> Result<Node> {
    if a.is_container() && b.is_empty_container() {
        return Ok(a);
    }

    match (a, b) {
        (a, b)
            if b.is_container() && a.is_empty_container() && !matches!(a, Node::Sections(_)) =>
        {
            Ok(b)
        }
        (Node::Mapping(a), b @ (Node::Mapping(_) | Node::Sections(_))) => {
            merge_mapping(a, b.into_entries()).map(Node::Mapping)
        }
        (Node::Sections(a), b @ (Node::Mapping(_) | Node::Sections(_))) => {
            merge_sections(a, b.into_entries()).map(Node::Sections)
        }
        (Node::Sequence(a), Node::Sequence(b) | Node::Set(b)) => {
            let novel: Vec<Node> = b.into_iter().filter(|item| !a.contains(item)).collect();
            let mut merged = a;
            merged.extend(novel);
            Ok(Node::Sequence(merged))
        }
        (Node::Set(a), Node::Set(b) | Node::Sequence(b)) => {
            let mut union = a;
            union.extend(b);
            union.sort_by(Node::total_cmp);
            union.dedup();
            Ok(Node::Sequence(union))
        }
        (a, b) if a.is_container() && b.is_container() => {
            Err(Error::MergeTypeConflict { left: a.kind(), right: b.kind() })
        }
        (a, b) => Ok(if a.is_truthy() { a } else { b }),
    }
}

fn merge_mapping(
    mut a: IndexMap<String, Node>,
    entries: Vec<(String, Node)>,
) -> Result<IndexMap<String, Node>> {
    for (key, value) in entries {
        match a.get_mut(&key) {
            Some(slot) => {
                let current = std::mem::take(slot);
                *slot = merge(current, value)?;
            }
            None => {
                a.insert(key, value);
            }
        }
    }
    Ok(a)
}

fn merge_sections(
    mut a: IndexMap<String, IndexMap<String, Node>>,
    entries: Vec<(String, Node)>,
) -> Result<IndexMap<String, IndexMap<String, Node>>> {
    for (key, value) in entries {
        match a.get_mut(&key) {
            Some(section) => {
                let current = Node::Mapping(std::mem::take(section));
                match merge(current, value)? {
                    Node::Mapping(merged) => *section = merged,
                    other => {
                        return Err(Error::MergeTypeConflict {
                            left: "section",
                            right: other.kind(),
                        })
                    }
                }
            }
            // sections cannot take a plain key; create the section, then assign
            None => match value {
                Node::Mapping(values) => a.entry(key).or_default().extend(values),
                other => {
                    return Err(Error::MergeTypeConflict {
                        left: "sections",
                        right: other.kind(),
                    })
                }
            },
        }
    }
    Ok(a)
}

/// Merges any number of values, later values folded into earlier ones:
/// `merge_all([a, b, c]) == merge(a, merge(b, c))`.
///
/// No values yield an empty mapping; a single value is returned unchanged.
pub fn merge_all<I>(values: I) -> Result<Node>
where
    I: IntoIterator<Item = Node>,
{
    let mut values: Vec<Node> = values.into_iter().collect();
    let Some(mut merged) = values.pop() else {
        return Ok(Node::mapping());
    };
    while let Some(value) = values.pop() {
        merged = merge(value, merged)?;
    }
    Ok(merged)
}
