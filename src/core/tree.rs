//! Arena tree for parsed OFX markup
//!
//! The statement is read once into a flat arena of typed nodes. Nodes refer to
//! each other by [`NodeId`], which keeps the tree owned by a single value and
//! lets the renaming utility mutate text in place later on.
//!
//! Element names are compared ASCII case-insensitively, so the same lookups
//! work for upper-cased SGML output and for XML documents.

use crate::core::path::OfxPath;
use crate::types::{OfxError, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;

/// Index of a node inside a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Parsed markup tree
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

fn xml_error<E: Display>(e: E) -> OfxError {
    OfxError::markup(e.to_string())
}

fn element_name(start: &BytesStart<'_>) -> Result<String> {
    std::str::from_utf8(start.name().as_ref())
        .map(str::to_string)
        .map_err(xml_error)
}

impl Tree {
    /// Parse well-formed markup into a tree
    ///
    /// Declarations, processing instructions, comments and whitespace-only
    /// text are skipped. The document must have exactly one root element.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut tree = Tree { nodes: Vec::new() };
        let mut stack: Vec<NodeId> = Vec::new();

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(start) => {
                    let id = tree.open(&start, stack.last().copied())?;
                    stack.push(id);
                }
                Event::Empty(start) => {
                    tree.open(&start, stack.last().copied())?;
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(text) => {
                    let value = text.unescape().map_err(xml_error)?;
                    tree.append_text(stack.last().copied(), &value)?;
                }
                Event::CData(data) => {
                    let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    tree.append_text(stack.last().copied(), &value)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(OfxError::markup(format!(
                "element <{}> is never closed",
                tree.name(*open)
            )));
        }
        if tree.nodes.is_empty() {
            return Err(OfxError::markup("document has no root element"));
        }
        Ok(tree)
    }

    fn open(&mut self, start: &BytesStart<'_>, parent: Option<NodeId>) -> Result<NodeId> {
        if parent.is_none() && !self.nodes.is_empty() {
            return Err(OfxError::markup("document has more than one root element"));
        }

        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(xml_error)?;
            let key = std::str::from_utf8(attribute.key.as_ref())
                .map_err(xml_error)?
                .to_string();
            let value = attribute.unescape_value().map_err(xml_error)?.into_owned();
            attributes.push((key, value));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: element_name(start)?,
            attributes,
            text: None,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        Ok(id)
    }

    fn append_text(&mut self, target: Option<NodeId>, value: &str) -> Result<()> {
        let target = target.ok_or_else(|| {
            OfxError::markup(format!("text '{}' outside of the root element", value))
        })?;
        self.nodes[target.0]
            .text
            .get_or_insert_with(String::new)
            .push_str(value);
        Ok(())
    }

    /// The root element
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Element name of a node
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    /// Character data held directly by a node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.0].text.as_deref()
    }

    /// Replace the character data held by a node
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.nodes[id.0].text = Some(text.into());
    }

    /// Value of a named attribute
    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        self.nodes[id.0]
            .attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Parent of a node, `None` for the root
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Direct children of a node in document order
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0].children.iter().copied()
    }

    /// First direct child with the given name
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id)
            .find(|child| self.name(*child).eq_ignore_ascii_case(name))
    }

    /// Follow a `/`-separated relative path of child names from `from`
    ///
    /// At each step the first matching child is taken.
    pub fn select(&self, from: NodeId, path: &str) -> Option<NodeId> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(from, |node, segment| self.child(node, segment))
    }

    /// Trimmed, non-empty text at a relative path
    pub fn text_at(&self, from: NodeId, path: &str) -> Option<&str> {
        self.select(from, path)
            .and_then(|node| self.text(node))
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Resolve an absolute structural path starting at the root element
    pub fn find(&self, path: &OfxPath) -> Option<NodeId> {
        let mut segments = path.segments().iter();
        let root = self.root();
        match segments.next() {
            Some(first) if self.name(root).eq_ignore_ascii_case(first) => {}
            _ => return None,
        }
        segments.try_fold(root, |node, segment| self.child(node, segment))
    }

    /// Every descendant of `from` with the given name, in document order
    ///
    /// The search is deep: matches nested at any level below `from` are
    /// returned, but the subtree of a match is not searched further.
    pub fn descendants(&self, from: NodeId, name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut pending: Vec<NodeId> = self.nodes[from.0].children.iter().rev().copied().collect();
        while let Some(node) = pending.pop() {
            if self.name(node).eq_ignore_ascii_case(name) {
                found.push(node);
            } else {
                pending.extend(self.nodes[node.0].children.iter().rev().copied());
            }
        }
        found
    }

    /// First element anywhere in the tree with the given name
    pub fn find_first(&self, name: &str) -> Option<NodeId> {
        let root = self.root();
        if self.name(root).eq_ignore_ascii_case(name) {
            return Some(root);
        }
        self.descendants(root, name).into_iter().next()
    }

    /// Serialize the tree as compact, single-line markup
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_node(&mut writer, self.root())?;
        String::from_utf8(writer.into_inner()).map_err(xml_error)
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> Result<()> {
        let node = &self.nodes[id.0];
        let mut start = BytesStart::new(node.name.as_str());
        for (key, value) in &node.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        writer.write_event(Event::Start(start)).map_err(xml_error)?;
        if let Some(text) = &node.text {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(xml_error)?;
        }
        for child in &node.children {
            self.write_node(writer, *child)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(node.name.as_str())))
            .map_err(xml_error)?;
        Ok(())
    }
}
