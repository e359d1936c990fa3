//! Document exporter: entities and logic actions to clipboard markup.
//!
//! Output is shaped so that [`import`](super::import) reads it back:
//! flow nodes keep their `Name` (the node id), and every payload field goes
//! where the importer looks first.

use std::borrow::Cow;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;
use tracing::{debug, error};

use super::import::is_schema_label;
use super::types::external_type_label;
use crate::model::{Entity, FlowEdge, FlowNode, FlowStep, LogicAction, Variable};

const ROOT: &str = "ClipboardData";

#[derive(Debug, Error)]
#[error("write error: {0}")]
struct WriteError(String);

/// Serialize `entities` then `actions` into one clipboard document.
///
/// Never fails: if the writer reports an error the failure is logged and a
/// document with an empty root is returned instead.
pub fn export(entities: &[Entity], actions: &[LogicAction]) -> String {
    match write_document(entities, actions) {
        Ok(text) => {
            debug!(
                entities = entities.len(),
                actions = actions.len(),
                bytes = text.len(),
                "exported clipboard document"
            );
            text
        }
        Err(err) => {
            error!(%err, "clipboard export failed; returning an empty document");
            format!("<{ROOT}/>")
        }
    }
}

fn write_document(entities: &[Entity], actions: &[LogicAction]) -> Result<String, WriteError> {
    let mut out = ClipboardWriter::new();
    out.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    out.emit(Event::Start(BytesStart::new(ROOT)))?;
    for entity in entities {
        out.entity(entity)?;
    }
    for action in actions {
        out.action(action)?;
    }
    out.emit(Event::End(BytesEnd::new(ROOT)))?;
    out.finish()
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Escape an attribute value. Newlines, carriage returns and tabs become
/// character references so they survive attribute-value normalization.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    const SPECIAL: [char; 8] = ['&', '<', '>', '"', '\'', '\n', '\r', '\t'];
    if !value.contains(SPECIAL) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 16);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\n' => escaped.push_str("&#xA;"),
            '\r' => escaped.push_str("&#xD;"),
            '\t' => escaped.push_str("&#x9;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

fn push_attr(start: &mut BytesStart<'_>, key: &str, value: &str) {
    let escaped = escape_attribute(value);
    start.push_attribute((key.as_bytes(), escaped.as_bytes()));
}

/// Element name for an unrecognized flow-node tag.
///
/// A tag the importer would read as something else (`Link`, `Start`,
/// `Entity`, ...) gets a leading `_`.
fn element_name(tag: &str) -> Cow<'_, str> {
    let name = xml_name(tag);
    if is_schema_label(&name) {
        Cow::Owned(format!("_{name}"))
    } else {
        name
    }
}

/// Characters that cannot appear in a name become `_`; a name that cannot
/// start with its first character gets a leading `_`.
fn xml_name(tag: &str) -> Cow<'_, str> {
    let valid_start = |c: char| c == '_' || unicode_ident::is_xid_start(c);
    let valid_continue = |c: char| c == '-' || c == '.' || unicode_ident::is_xid_continue(c);

    let mut chars = tag.chars();
    let Some(first) = chars.next() else {
        return Cow::Borrowed("Node");
    };
    if valid_start(first) && chars.clone().all(valid_continue) {
        return Cow::Borrowed(tag);
    }

    let mut name = String::with_capacity(tag.len() + 1);
    if !valid_start(first) {
        name.push('_');
    }
    name.push(if valid_continue(first) { first } else { '_' });
    name.extend(chars.map(|c| if valid_continue(c) { c } else { '_' }));
    Cow::Owned(name)
}

struct ClipboardWriter {
    writer: Writer<Vec<u8>>,
}

impl ClipboardWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<(), WriteError> {
        self.writer
            .write_event(event)
            .map_err(|e| WriteError(e.to_string()))
    }

    fn finish(self) -> Result<String, WriteError> {
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(|e| WriteError(e.to_string()))
    }

    /// Emit `start` as an empty element, or wrap `body` in it.
    fn element(
        &mut self,
        start: BytesStart<'_>,
        has_body: bool,
        body: impl FnOnce(&mut Self) -> Result<(), WriteError>,
    ) -> Result<(), WriteError> {
        if !has_body {
            return self.emit(Event::Empty(start));
        }
        let end = start.to_end().into_owned();
        self.emit(Event::Start(start))?;
        body(self)?;
        self.emit(Event::End(end))
    }

    fn entity(&mut self, entity: &Entity) -> Result<(), WriteError> {
        let mut start = BytesStart::new("Entity");
        push_attr(&mut start, "Name", &entity.name);
        push_attr(&mut start, "Description", &entity.description);
        push_attr(&mut start, "IsPublic", bool_str(entity.is_public));
        push_attr(&mut start, "IsStatic", bool_str(entity.is_static));

        self.element(start, true, |out| {
            let container = BytesStart::new("Attributes");
            out.element(container, !entity.attributes.is_empty(), |out| {
                for attribute in &entity.attributes {
                    let mut start = BytesStart::new("EntityAttribute");
                    push_attr(&mut start, "Name", &attribute.name);
                    push_attr(&mut start, "Type", external_type_label(attribute.data_type));
                    if let Some(length) = attribute.length.filter(|_| attribute.data_type.has_length()) {
                        push_attr(&mut start, "Length", &length.to_string());
                    }
                    push_attr(&mut start, "IsMandatory", bool_str(attribute.is_mandatory));
                    push_attr(&mut start, "IsIdentifier", bool_str(attribute.is_identifier));
                    out.emit(Event::Empty(start))?;
                }
                Ok(())
            })
        })
    }

    fn action(&mut self, action: &LogicAction) -> Result<(), WriteError> {
        let mut start = BytesStart::new(action.kind.element_name());
        push_attr(&mut start, "Name", &action.name);
        push_attr(&mut start, "Description", &action.description);
        push_attr(&mut start, "IsPublic", bool_str(action.is_public));
        push_attr(&mut start, "IsFunction", bool_str(action.is_function));

        self.element(start, true, |out| {
            for input in &action.inputs {
                out.variable("InputParameter", input, false)?;
            }
            for output in &action.outputs {
                out.variable("OutputParameter", output, false)?;
            }
            for local in &action.locals {
                out.variable("Variable", local, true)?;
            }

            let flow = &action.flow;
            let has_flow = !(flow.nodes.is_empty() && flow.edges.is_empty());
            out.element(BytesStart::new("Flow"), has_flow, |out| {
                for node in &flow.nodes {
                    out.flow_node(node)?;
                }
                for edge in &flow.edges {
                    out.link(edge)?;
                }
                Ok(())
            })
        })
    }

    fn variable(&mut self, tag: &str, variable: &Variable, with_list: bool) -> Result<(), WriteError> {
        let mut start = BytesStart::new(tag);
        push_attr(&mut start, "Name", &variable.name);
        push_attr(&mut start, "Type", external_type_label(variable.data_type));
        if with_list {
            push_attr(&mut start, "IsList", bool_str(variable.is_list));
        }
        push_attr(&mut start, "IsMandatory", bool_str(variable.is_mandatory));
        if let Some(description) = &variable.description {
            push_attr(&mut start, "Description", description);
        }
        self.emit(Event::Empty(start))
    }

    fn flow_node(&mut self, node: &FlowNode) -> Result<(), WriteError> {
        let tag = match &node.step {
            FlowStep::Other { tag } => element_name(tag),
            step => Cow::Borrowed(step.tag()),
        };
        let mut start = BytesStart::new(&*tag);
        push_attr(&mut start, "Name", node.id.as_str());
        if node.label != node.id.as_str() {
            push_attr(&mut start, "Label", &node.label);
        }

        match &node.step {
            FlowStep::Assign { assignments } => {
                self.element(start, !assignments.is_empty(), |out| {
                    for assignment in assignments {
                        let mut line = BytesStart::new("Assignment");
                        push_attr(&mut line, "Variable", &assignment.variable);
                        push_attr(&mut line, "Value", &assignment.value);
                        out.emit(Event::Empty(line))?;
                    }
                    Ok(())
                })
            }
            FlowStep::If { condition } => self.element(start, true, |out| {
                out.emit(Event::Start(BytesStart::new("Condition")))?;
                out.emit(Event::Text(BytesText::new(condition)))?;
                out.emit(Event::End(BytesEnd::new("Condition")))
            }),
            FlowStep::Switch { variable, cases } => {
                push_attr(&mut start, "Variable", variable);
                self.element(start, !cases.is_empty(), |out| {
                    for case in cases {
                        let mut case_start = BytesStart::new("Case");
                        push_attr(&mut case_start, "Condition", case);
                        out.emit(Event::Empty(case_start))?;
                    }
                    Ok(())
                })
            }
            FlowStep::ExecuteServerAction { action_name }
            | FlowStep::RunServerAction { action_name }
            | FlowStep::RunClientAction { action_name } => self.element(start, true, |out| {
                let mut called = BytesStart::new("Action");
                push_attr(&mut called, "Name", action_name);
                out.emit(Event::Empty(called))
            }),
            FlowStep::Sql { query } => {
                push_attr(&mut start, "SQL", query);
                self.emit(Event::Empty(start))
            }
            FlowStep::JavaScript { code } => {
                push_attr(&mut start, "Code", code);
                self.emit(Event::Empty(start))
            }
            FlowStep::ForEach { record_list } => {
                if !record_list.is_empty() {
                    push_attr(&mut start, "RecordList", record_list);
                }
                self.emit(Event::Empty(start))
            }
            FlowStep::Comment { text } => {
                push_attr(&mut start, "Text", text);
                self.emit(Event::Empty(start))
            }
            FlowStep::RaiseException { exception, message } => {
                push_attr(&mut start, "Exception", exception);
                push_attr(&mut start, "ExceptionMessage", message);
                self.emit(Event::Empty(start))
            }
            FlowStep::Message { message, msg_type } => {
                push_attr(&mut start, "Message", message);
                push_attr(&mut start, "Type", msg_type);
                self.emit(Event::Empty(start))
            }
            FlowStep::Start
            | FlowStep::End
            | FlowStep::Aggregate
            | FlowStep::Download
            | FlowStep::Destination
            | FlowStep::Other { .. } => self.emit(Event::Empty(start)),
        }
    }

    fn link(&mut self, edge: &FlowEdge) -> Result<(), WriteError> {
        let mut start = BytesStart::new("Link");
        push_attr(&mut start, "Source", edge.source.as_str());
        push_attr(&mut start, "Target", edge.target.as_str());
        push_attr(&mut start, "Label", edge.label.as_deref().unwrap_or_default());
        self.emit(Event::Empty(start))
    }
}
