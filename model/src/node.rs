use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::{Map, Value};

const RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

/// One element of tutorial content.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Title {
        text: String,
    },
    Paragraph {
        text: String,
    },
    Image {
        url: String,
    },
    /// A choice point offering named alternative paths.
    BranchSet {
        branches: Vec<BranchOption>,
    },
    /// One named alternative path, shown when its enclosing branch set selects it.
    Branch {
        name: String,
        content: Vec<Node>,
    },
    /// Decoded from input that did not match any known node shape.
    Malformed {
        tag: Option<String>,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Note {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "BranchOptionRepr")]
pub struct BranchOption {
    pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BranchOptionRepr {
    Name(String),
    Object { name: String },
}

impl From<BranchOptionRepr> for BranchOption {
    fn from(value: BranchOptionRepr) -> Self {
        match value {
            BranchOptionRepr::Name(name) | BranchOptionRepr::Object { name } => Self { name },
        }
    }
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            notes: Vec::new(),
        }
    }

    pub fn with_notes<I, S>(mut self, notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notes = notes.into_iter().map(|text| Note { text: text.into() }).collect();
        self
    }

    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, NodeKind::Malformed { .. })
    }

    /// Decode a node leniently: shape errors become [`NodeKind::Malformed`]
    /// instead of failing the surrounding document.
    pub fn from_value(value: Value) -> Self {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Node::new(NodeKind::Malformed {
                    tag: None,
                    reason: format!("expected a node object, found {other}"),
                });
            }
        };
        let tag = fields
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_owned);

        let notes = match fields.remove("notes") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(notes) => serde_json::from_value::<Vec<Note>>(notes)
                .map_err(|err| format!("invalid notes: {err}")),
        };

        match (Self::kind_from_fields(tag.as_deref(), &mut fields), notes) {
            (Ok(kind), Ok(notes)) => Node { kind, notes },
            (Err(reason), _) | (Ok(_), Err(reason)) => {
                Node::new(NodeKind::Malformed { tag, reason })
            }
        }
    }

    fn kind_from_fields(
        tag: Option<&str>,
        fields: &mut Map<String, Value>,
    ) -> Result<NodeKind, String> {
        let kind = match tag {
            Some("title") => NodeKind::Title {
                text: take_field(fields, "text")?,
            },
            Some("paragraph") => NodeKind::Paragraph {
                text: take_field(fields, "text")?,
            },
            Some("image") => NodeKind::Image {
                url: take_field(fields, "url")?,
            },
            Some("branches") => NodeKind::BranchSet {
                branches: take_field(fields, "branches")?,
            },
            Some("branch") => {
                let name = take_field(fields, "name")?;
                let content: Vec<Node> = match fields.remove("content") {
                    // Children take ownership of their subtrees; nothing is re-buffered.
                    Some(Value::Array(items)) => stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || {
                        items.into_iter().map(Node::from_value).collect()
                    }),
                    Some(other) => {
                        return Err(format!(
                            "invalid `content`: expected an array, found {other}"
                        ));
                    }
                    None => return Err("missing field `content`".to_owned()),
                };
                NodeKind::Branch { name, content }
            }
            Some(other) => {
                return Err(format!(
                    "unknown node type `{other}`, expected one of `title`, `paragraph`, `image`, `branches`, `branch`"
                ));
            }
            None => return Err("missing field `type`".to_owned()),
        };
        Ok(kind)
    }
}

fn take_field<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    name: &str,
) -> Result<T, String> {
    let value = fields
        .remove(name)
        .ok_or_else(|| format!("missing field `{name}`"))?;
    serde_json::from_value(value).map_err(|err| format!("invalid `{name}`: {err}"))
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Node::from_value(value))
    }
}

impl From<NodeKind> for Node {
    fn from(value: NodeKind) -> Self {
        Node::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::from_str;

    #[test]
    fn paragraph_with_notes() {
        let j = r#"{
            "type": "paragraph",
            "text": "Hi",
            "notes": [{ "text": "n1" }, { "text": "n2" }]
        }"#;
        let node: Node = from_str(j).unwrap();
        assert_eq!(
            node,
            Node::new(NodeKind::Paragraph {
                text: "Hi".to_owned()
            })
            .with_notes(["n1", "n2"])
        );
    }

    #[test]
    fn branch_options_accept_objects_and_names() {
        let j = r#"{ "type": "branches", "branches": [{ "name": "A" }, "B"] }"#;
        let node: Node = from_str(j).unwrap();
        let NodeKind::BranchSet { branches } = node.kind else {
            panic!("expected branch set, got {:?}", node.kind);
        };
        let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn nested_branch_content() {
        let j = r#"{
            "type": "branch",
            "name": "A",
            "content": [{ "type": "image", "url": "a.png" }]
        }"#;
        let node: Node = from_str(j).unwrap();
        assert_eq!(
            node.kind,
            NodeKind::Branch {
                name: "A".to_owned(),
                content: vec![Node::new(NodeKind::Image {
                    url: "a.png".to_owned()
                })],
            }
        );
    }

    #[test]
    fn unknown_tag_is_malformed() {
        let node: Node = from_str(r#"{ "type": "video", "url": "x" }"#).unwrap();
        let NodeKind::Malformed { tag, reason } = node.kind else {
            panic!("expected malformed node");
        };
        assert_eq!(tag.as_deref(), Some("video"));
        assert!(reason.contains("video"));
    }

    #[test]
    fn missing_field_is_malformed() {
        let node: Node = from_str(r#"{ "type": "title" }"#).unwrap();
        let NodeKind::Malformed { tag, reason } = node.kind else {
            panic!("expected malformed node");
        };
        assert_eq!(tag.as_deref(), Some("title"));
        assert!(reason.contains("text"));
    }

    #[test]
    fn bad_notes_are_malformed() {
        let node: Node = from_str(r#"{ "type": "title", "text": "T", "notes": 3 }"#).unwrap();
        assert!(node.is_malformed());
    }

    #[test]
    fn malformed_child_keeps_siblings() {
        let j = r#"{
            "type": "branch",
            "name": "A",
            "content": [{ "type": "??" }, { "type": "paragraph", "text": "ok" }]
        }"#;
        let node: Node = from_str(j).unwrap();
        let NodeKind::Branch { content, .. } = node.kind else {
            panic!("expected branch");
        };
        assert!(content[0].is_malformed());
        assert_eq!(
            content[1].kind,
            NodeKind::Paragraph {
                text: "ok".to_owned()
            }
        );
    }

    #[test]
    fn non_object_node_is_malformed() {
        let node: Node = from_str(r#""just text""#).unwrap();
        let NodeKind::Malformed { tag, reason } = node.kind else {
            panic!("expected malformed node");
        };
        assert_eq!(tag, None);
        assert!(reason.contains("just text"));
    }

    #[test]
    fn non_array_content_is_malformed() {
        let node: Node = from_str(r#"{ "type": "branch", "name": "A", "content": {} }"#).unwrap();
        let NodeKind::Malformed { tag, reason } = node.kind else {
            panic!("expected malformed node");
        };
        assert_eq!(tag.as_deref(), Some("branch"));
        assert!(reason.contains("content"));
    }

    #[test]
    fn owned_value_decodes_nested_branches() {
        let mut value = serde_json::json!({ "type": "paragraph", "text": "leaf" });
        for level in 0..200 {
            value = serde_json::json!({
                "type": "branch",
                "name": format!("L{level}"),
                "content": [value],
                "notes": [{ "text": "n" }]
            });
        }

        let mut node = Node::from_value(value);
        let mut depth = 0;
        while let NodeKind::Branch { content, .. } = node.kind {
            assert_eq!(node.notes.len(), 1);
            depth += 1;
            node = content.into_iter().next().unwrap();
        }
        assert_eq!(depth, 200);
        assert_eq!(
            node.kind,
            NodeKind::Paragraph {
                text: "leaf".to_owned()
            }
        );
    }
}
