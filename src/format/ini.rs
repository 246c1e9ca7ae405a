//! Section-oriented INI documents (`setup.cfg`, `tox.ini`).
//!
//! Values continued on indented lines whose first line is empty load as
//! sequences, and sequences dump back as indented continuation lines.

use super::Format;
use crate::error::{Error, Result};
use crate::merge::Node;
use indexmap::IndexMap;
use std::fmt::Write;

const INDENT: &str = "    ";

pub struct Ini;

fn value_from_lines(lines: Vec<String>) -> Node {
    match lines.split_first() {
        Some((first, rest)) if first.is_empty() && !rest.is_empty() => {
            Node::Sequence(rest.iter().cloned().map(Node::String).collect())
        }
        _ => Node::String(lines.join("\n")),
    }
}

type Sections = IndexMap<String, IndexMap<String, Node>>;

fn flush(
    section: Option<&String>,
    pending: &mut Option<(String, Vec<String>)>,
    sections: &mut Sections,
) {
    if let (Some(name), Some((key, lines))) = (section, pending.take()) {
        sections.entry(name.clone()).or_default().insert(key, value_from_lines(lines));
    }
}

impl Ini {
    fn error(&self, reason: String) -> Error {
        Error::FormatError { format: self.name(), reason }
    }
}

impl Format for Ini {
    fn name(&self) -> &'static str {
        "INI"
    }

    fn load(&self, text: &str) -> Result<Node> {
        let mut sections: Sections = IndexMap::new();
        let mut section: Option<String> = None;
        let mut pending: Option<(String, Vec<String>)> = None;

        for (number, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if line.starts_with([' ', '\t']) {
                if let Some((_, lines)) = pending.as_mut() {
                    lines.push(trimmed.to_string());
                    continue;
                }
                return Err(self.error(format!("line {}: unexpected indentation", number + 1)));
            }

            flush(section.as_ref(), &mut pending, &mut sections);

            if let Some(name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                let name = name.trim().to_string();
                sections.entry(name.clone()).or_default();
                section = Some(name);
                continue;
            }

            if section.is_none() {
                return Err(self.error(format!("line {}: key outside of a section", number + 1)));
            }
            let Some(split) = trimmed.find(['=', ':']) else {
                return Err(self.error(format!("line {}: expected 'key = value'", number + 1)));
            };
            let key = trimmed[..split].trim().to_string();
            let value = trimmed[split + 1..].trim().to_string();
            pending = Some((key, vec![value]));
        }
        flush(section.as_ref(), &mut pending, &mut sections);

        Ok(Node::Sections(sections))
    }

    fn dump(&self, node: &Node) -> Result<String> {
        let sections: Vec<(&String, &IndexMap<String, Node>)> = match node {
            Node::Sections(sections) => sections.iter().collect(),
            Node::Mapping(map) => map
                .iter()
                .map(|(name, value)| match value {
                    Node::Mapping(section) => Ok((name, section)),
                    other => Err(self.error(format!(
                        "section '{name}' must be a mapping, found {}",
                        other.kind()
                    ))),
                })
                .collect::<Result<_>>()?,
            other => return Err(self.error(format!("cannot dump {} as INI", other.kind()))),
        };

        let mut out = String::new();
        for (name, section) in sections {
            let _ = writeln!(out, "[{name}]");
            for (key, value) in section {
                match value {
                    Node::Sequence(items) | Node::Set(items) => {
                        let _ = write!(out, "{key} =");
                        for item in items {
                            let _ = write!(out, "\n{INDENT}{}", item.to_plain_string());
                        }
                        out.push('\n');
                    }
                    Node::Mapping(_) | Node::Sections(_) => {
                        return Err(self.error(format!("'{name}.{key}' is nested too deeply")));
                    }
                    scalar => {
                        let value = scalar.to_plain_string();
                        let mut lines = value.lines();
                        match lines.next().filter(|first| !first.is_empty()) {
                            Some(first) => {
                                let _ = write!(out, "{key} = {first}");
                            }
                            None => {
                                let _ = write!(out, "{key} =");
                            }
                        }
                        // continuation lines keep multi-line values parseable
                        for line in lines {
                            let _ = write!(out, "\n{INDENT}{line}");
                        }
                        out.push('\n');
                    }
                }
            }
            out.push('\n');
        }
        Ok(out)
    }

    fn empty(&self) -> Node {
        Node::Sections(IndexMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_continuation_lines() {
        let text = "[options]\ninstall_requires =\n    numpy\n    pandas\nzip_safe = false\n";
        let node = Ini.load(text).unwrap();
        let options = node.get("options").unwrap();
        assert_eq!(options.get("install_requires"), Some(Node::from(vec!["numpy", "pandas"])));
        assert_eq!(options.get("zip_safe"), Some(Node::from("false")));
    }

    #[test]
    fn test_key_outside_section() {
        assert!(Ini.load("name = x\n").is_err());
    }

    #[test]
    fn test_multiline_value_dumps_as_continuation() {
        let text = "[metadata]\ndescription = first line\n    second line\n";
        let node = Ini.load(text).unwrap();
        let description = node.get("metadata").and_then(|m| m.get("description"));
        assert_eq!(description, Some(Node::from("first line\nsecond line")));
        assert_eq!(Ini.dump(&node).unwrap(), format!("{text}\n"));
    }

    #[test]
    fn test_dump_sequences_as_continuations() {
        let node = Ini.load("[metadata]\nkeywords =\n    a\n    b\n").unwrap();
        assert_eq!(Ini.dump(&node).unwrap(), "[metadata]\nkeywords =\n    a\n    b\n\n");
    }
}
