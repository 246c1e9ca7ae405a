//! Line-oriented text documents such as `requirements.txt` and `.gitignore`.

use super::Format;
use crate::error::Result;
use crate::merge::Node;

pub struct Text;

impl Format for Text {
    fn name(&self) -> &'static str {
        "text"
    }

    fn load(&self, text: &str) -> Result<Node> {
        Ok(Node::Sequence(text.lines().map(Node::from).collect()))
    }

    fn dump(&self, node: &Node) -> Result<String> {
        Ok(match node.as_items() {
            Some(items) => items.iter().map(Node::to_plain_string).collect::<Vec<_>>().join("\n"),
            None => node.to_plain_string(),
        })
    }

    fn empty(&self) -> Node {
        Node::Sequence(Vec::new())
    }
}
