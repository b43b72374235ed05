//! Line-tracked YAML node tree and logical path resolution

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::trace;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// A parsed YAML node; every node remembers the 1-based line it starts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Scalar {
        value: String,
        line: usize,
        /// Literal (`|`) or folded (`>`) style; the text starts below `line`
        block: bool,
    },
    Mapping { entries: Vec<(Node, Node)>, line: usize },
    Sequence { items: Vec<Node>, line: usize },
    Alias { line: usize },
}

impl Node {
    /// 1-based source line of the node
    pub fn line(&self) -> usize {
        match self {
            Node::Scalar { line, .. }
            | Node::Mapping { line, .. }
            | Node::Sequence { line, .. }
            | Node::Alias { line } => *line,
        }
    }

    /// Key and value of the entry whose key is the scalar `key`
    fn entry(&self, key: &str) -> Option<(&Node, &Node)> {
        match self {
            Node::Mapping { entries, .. } => entries.iter().find_map(|(k, v)| match k {
                Node::Scalar { value, .. } if value == key => Some((k, v)),
                _ => None,
            }),
            _ => None,
        }
    }
}

/// A scalar found at a logical path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarValue {
    /// Scalar text as the parser reports it (quotes removed)
    pub value: String,
    /// 1-based physical line holding the value
    pub line: usize,
}

/// Read-only view of a YAML file addressable by dotted path
#[derive(Debug, Clone)]
pub struct YamlDocument {
    path: Utf8PathBuf,
    root: Option<Node>,
}

impl YamlDocument {
    /// Read and parse a YAML file
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::DocumentRead {
            path: path.to_string(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Parse YAML text; `path` is only used for error context
    pub fn parse(path: &Utf8Path, content: &str) -> Result<Self> {
        let mut builder = TreeBuilder::default();
        let mut parser = Parser::new_from_str(content);
        parser
            .load(&mut builder, false)
            .map_err(|e| Error::DocumentParse {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            path: path.to_owned(),
            root: builder.root,
        })
    }

    /// File this document was read from
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Root node of the first document, if the file had one
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Resolve a dot-separated path to a scalar
    pub fn get(&self, logical_path: &str) -> Result<ScalarValue> {
        let not_found = || Error::path_not_found(self.path.as_str(), logical_path);

        if logical_path.is_empty() {
            return Err(not_found());
        }

        let mut node = self.root.as_ref().ok_or_else(not_found)?;
        let mut key_line = node.line();
        for segment in logical_path.split('.') {
            let (key, value) = node.entry(segment).ok_or_else(not_found)?;
            key_line = key.line();
            node = value;
        }

        match node {
            Node::Scalar { value, line, block } => {
                if *block || *line != key_line {
                    return Err(Error::DetachedValue {
                        file: self.path.to_string(),
                        logical_path: logical_path.to_string(),
                        key_line,
                        line: if *block { *line + 1 } else { *line },
                    });
                }
                trace!("{}: {} = {} (line {})", self.path, logical_path, value, line);
                Ok(ScalarValue {
                    value: value.clone(),
                    line: *line,
                })
            }
            _ => Err(Error::not_scalar(self.path.as_str(), logical_path)),
        }
    }
}

/// Collection being assembled while its events stream in
enum Frame {
    Mapping {
        entries: Vec<(Node, Node)>,
        pending_key: Option<Node>,
        line: usize,
    },
    Sequence {
        items: Vec<Node>,
        line: usize,
    },
}

impl Frame {
    fn into_node(self) -> Node {
        match self {
            Frame::Mapping { entries, line, .. } => Node::Mapping { entries, line },
            Frame::Sequence { items, line } => Node::Sequence { items, line },
        }
    }
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    root: Option<Node>,
}

impl TreeBuilder {
    fn push_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => entries.push((key, node)),
                None => *pending_key = Some(node),
            },
            Some(Frame::Sequence { items, .. }) => items.push(node),
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
        }
    }

    /// Line of the key awaiting its value in the innermost mapping
    fn pending_key_line(&self) -> Option<usize> {
        match self.stack.last() {
            Some(Frame::Mapping {
                pending_key: Some(key),
                ..
            }) => Some(key.line()),
            _ => None,
        }
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        let line = mark.line();
        match ev {
            Event::Scalar(value, style, ..) => {
                // An omitted value is marked at whatever token follows it
                let line = match self.pending_key_line() {
                    Some(key_line) if value.is_empty() && style == TScalarStyle::Plain => key_line,
                    _ => line,
                };
                let block = matches!(style, TScalarStyle::Literal | TScalarStyle::Folded);
                self.push_node(Node::Scalar { value, line, block })
            }
            Event::Alias(..) => self.push_node(Node::Alias { line }),
            Event::MappingStart(..) => self.stack.push(Frame::Mapping {
                entries: Vec::new(),
                pending_key: None,
                line,
            }),
            Event::SequenceStart(..) => self.stack.push(Frame::Sequence {
                items: Vec::new(),
                line,
            }),
            Event::MappingEnd | Event::SequenceEnd => {
                if let Some(frame) = self.stack.pop() {
                    self.push_node(frame.into_node());
                }
            }
            _ => {}
        }
    }
}
