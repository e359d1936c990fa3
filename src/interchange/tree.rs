//! Generic labeled tree parsed from clipboard markup.
//!
//! The reader knows nothing about entities or actions. It builds a tree of
//! labels, attributes and text, grouping children by label. Labels listed in
//! [`MANY_LABELS`] are always stored as a sequence; any other label is stored
//! as a single node until a second occurrence promotes it to a sequence.
//! Extraction code only ever sees slices through [`TreeNode::children`], so
//! it never has to care which shape a label ended up in.

use indexmap::IndexMap;
use indexmap::map::Entry;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::ParseError;

/// Labels that are materialized as a sequence even with a single occurrence.
pub const MANY_LABELS: &[&str] = &[
    "Entity",
    "Attributes",
    "EntityAttribute",
    "ServerAction",
    "ClientAction",
    "ServiceAction",
    "Parameters",
    "InputParameter",
    "OutputParameter",
    "Variables",
    "Variable",
    "Link",
    "Assignment",
    "Case",
];

/// Label of the synthetic node holding the document's top-level elements.
pub const DOCUMENT_LABEL: &str = "#document";

/// Deepest element nesting accepted by [`Document::parse`].
pub const MAX_DEPTH: usize = 512;

fn is_many(label: &str) -> bool {
    MANY_LABELS.contains(&label)
}

#[derive(Clone, Debug)]
enum Slot {
    One(TreeNode),
    Many(Vec<TreeNode>),
}

impl Slot {
    fn new(node: TreeNode, many: bool) -> Self {
        if many {
            Slot::Many(vec![node])
        } else {
            Slot::One(node)
        }
    }

    fn push(&mut self, node: TreeNode) {
        let previous = std::mem::replace(self, Slot::Many(Vec::new()));
        *self = match previous {
            Slot::One(first) => Slot::Many(vec![first, node]),
            Slot::Many(mut nodes) => {
                nodes.push(node);
                Slot::Many(nodes)
            }
        };
    }

    fn as_slice(&self) -> &[TreeNode] {
        match self {
            Slot::One(node) => std::slice::from_ref(node),
            Slot::Many(nodes) => nodes,
        }
    }
}

/// One element: label, attributes in document order, concatenated text
/// content and labelled child groups.
#[derive(Clone, Debug)]
pub struct TreeNode {
    label: String,
    attributes: IndexMap<String, String>,
    text: String,
    children: IndexMap<String, Slot>,
}

impl TreeNode {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            attributes: IndexMap::new(),
            text: String::new(),
            children: IndexMap::new(),
        }
    }

    fn open(start: &BytesStart<'_>, position: u64) -> Result<Self, ParseError> {
        let name = start.local_name();
        let label = std::str::from_utf8(name.as_ref())?;
        let mut node = Self::new(label);

        for attr in start.attributes() {
            let attr = attr.map_err(|e| ParseError::xml(position, e))?;
            let key = std::str::from_utf8(attr.key.as_ref())?;
            let value = attr
                .unescape_value()
                .map_err(|e| ParseError::xml(position, e))?;
            node.attributes.insert(key.to_string(), value.into_owned());
        }
        Ok(node)
    }

    fn attach(&mut self, child: TreeNode) {
        let many = is_many(&child.label);
        match self.children.entry(child.label.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(Slot::new(child, many));
            }
            Entry::Occupied(mut slot) => slot.get_mut().push(child),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Text content. Each text run is trimmed before the runs are joined,
    /// so surrounding whitespace is not kept and `a <b/> c` reads as `ac`.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// A scalar field: the attribute `name`, else the text of the first
    /// child element labelled `name` when that text is non-empty.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.attr(name).or_else(|| {
            self.first(name)
                .map(TreeNode::text)
                .filter(|text| !text.is_empty())
        })
    }

    /// Boolean field: exactly the literal `"true"` is true.
    pub fn flag(&self, name: &str) -> bool {
        self.value(name) == Some("true")
    }

    /// All children labelled `label`, in document order.
    pub fn children(&self, label: &str) -> &[TreeNode] {
        self.children.get(label).map_or(&[], Slot::as_slice)
    }

    pub fn first(&self, label: &str) -> Option<&TreeNode> {
        self.children(label).first()
    }

    /// Whether `label` was stored as a sequence.
    pub fn is_sequence(&self, label: &str) -> bool {
        matches!(self.children.get(label), Some(Slot::Many(_)))
    }

    /// Child groups in order of first appearance.
    pub fn child_groups(&self) -> impl Iterator<Item = (&str, &[TreeNode])> {
        self.children
            .iter()
            .map(|(label, slot)| (label.as_str(), slot.as_slice()))
    }
}

/// A parsed document. The root is synthetic; the document's own top-level
/// element(s) are its children.
#[derive(Clone, Debug)]
pub struct Document {
    root: TreeNode,
}

impl Document {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut root = TreeNode::new(DOCUMENT_LABEL);
        let mut stack: Vec<TreeNode> = Vec::new();
        let mut saw_element = false;

        loop {
            let position = reader.buffer_position() as u64;
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    saw_element = true;
                    if stack.len() == MAX_DEPTH {
                        return Err(ParseError::TooDeep { limit: MAX_DEPTH });
                    }
                    stack.push(TreeNode::open(e, position)?);
                }
                Ok(Event::Empty(ref e)) => {
                    saw_element = true;
                    let node = TreeNode::open(e, position)?;
                    stack.last_mut().unwrap_or(&mut root).attach(node);
                }
                Ok(Event::End(ref e)) => {
                    let Some(node) = stack.pop() else {
                        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        return Err(ParseError::UnexpectedClose(name));
                    };
                    stack.last_mut().unwrap_or(&mut root).attach(node);
                }
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape().map_err(|err| ParseError::xml(position, err))?;
                    if let Some(open) = stack.last_mut() {
                        open.text.push_str(&text);
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(open) = stack.last_mut() {
                        open.text.push_str(&String::from_utf8_lossy(e));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ParseError::xml(reader.error_position() as u64, e));
                }
                Ok(_) => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(ParseError::Unclosed(open.label.clone()));
        }
        if !saw_element {
            return Err(ParseError::Empty);
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }
}
