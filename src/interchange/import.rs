//! Document importer: clipboard markup to entities and logic actions.
//!
//! Two passes:
//!
//! ```text
//! text ──Document::parse──▶ TreeNode tree ──walk + EXTRACTORS──▶ ImportResult
//! ```
//!
//! The walk visits every element once. When an element's label has an entry
//! in [`EXTRACTORS`] the matching extraction runs, then the walk goes on
//! inside it looking only for the other family: an entity nested in an
//! action is found, an entity nested in an entity is not. Any other element
//! is only descended into, so unknown elements are skipped, never errors.

use tracing::{debug, warn};

use super::ParseError;
use super::tree::{Document, TreeNode};
use super::types::map_external_type;
use crate::base::{Id, Point};
use crate::model::{
    ActionKind, Assignment, Attribute, DanglingEdge, DataType, Entity, FlowEdge, FlowGraph,
    FlowNode, FlowStep, LogicAction, Variable,
};

const UNKNOWN_ENTITY_NAME: &str = "Unknown";
const UNKNOWN_ACTION_NAME: &str = "NewAction";
const SQL_PLACEHOLDER: &str = "-- query not provided";
const JAVASCRIPT_PLACEHOLDER: &str = "// script not provided";

/// Everything recognized in one document.
#[derive(Clone, Debug, Default)]
pub struct ImportResult {
    pub entities: Vec<Entity>,
    pub actions: Vec<LogicAction>,
}

impl ImportResult {
    /// Nothing recognized. Not an error; the caller decides how to report it.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.actions.is_empty()
    }

    /// Actions whose flow has edges pointing at nodes that do not exist.
    pub fn incomplete_flows(&self) -> Vec<(&LogicAction, Vec<DanglingEdge>)> {
        self.actions
            .iter()
            .filter_map(|action| {
                let dangling = action.flow.dangling_edges();
                (!dangling.is_empty()).then_some((action, dangling))
            })
            .collect()
    }
}

/// Parse `document` and extract every entity and action in it, assigning
/// them to `owner_id`.
///
/// Fails only when the text is not well-formed markup; nothing is returned
/// in that case.
pub fn import(document: &str, owner_id: &str) -> Result<ImportResult, ParseError> {
    let tree = Document::parse(document)?;
    let mut importer = Importer::new(Id::new(owner_id));
    importer.walk(tree.root(), &[]);

    let result = importer.finish();
    debug!(
        entities = result.entities.len(),
        actions = result.actions.len(),
        "imported clipboard document"
    );
    Ok(result)
}

// ============================================================================
// VISITOR
// ============================================================================

type Visit = fn(&mut Importer, &TreeNode);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Family {
    Entity,
    Action,
}

/// Label → extraction. Every label not listed here is only walked through.
const EXTRACTORS: &[(&str, Family, Visit)] = &[
    ("Entity", Family::Entity, Importer::visit_entity),
    ("ServerAction", Family::Action, Importer::visit_action),
    ("ClientAction", Family::Action, Importer::visit_action),
    ("ServiceAction", Family::Action, Importer::visit_action),
];

/// Labels read inside entities, actions and flows besides the extracted
/// elements and flow-node tags.
const STRUCTURAL_LABELS: &[&str] = &[
    "Attributes",
    "EntityAttribute",
    "Parameters",
    "InputParameter",
    "OutputParameter",
    "Variables",
    "Variable",
    "Flow",
    "Link",
    "Action",
    "Condition",
    "Assignments",
    "Assignment",
    "Case",
];

fn extractor(label: &str) -> Option<(Family, Visit)> {
    EXTRACTORS
        .iter()
        .find(|(name, _, _)| *name == label)
        .map(|(_, family, visit)| (*family, *visit))
}

/// Whether the importer gives `label` a meaning of its own.
pub(crate) fn is_schema_label(label: &str) -> bool {
    extractor(label).is_some()
        || FLOW_STEPS.iter().any(|(tag, _)| *tag == label)
        || STRUCTURAL_LABELS.contains(&label)
}

struct Importer {
    owner: Id,
    entities: Vec<Entity>,
    actions: Vec<LogicAction>,
}

impl Importer {
    fn new(owner: Id) -> Self {
        Self {
            owner,
            entities: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// `inside` holds the families of the extracted elements enclosing `node`.
    fn walk(&mut self, node: &TreeNode, inside: &[Family]) {
        for (label, children) in node.child_groups() {
            match extractor(label) {
                Some((family, _)) if inside.contains(&family) => {}
                Some((family, visit)) => {
                    let mut nested = inside.to_vec();
                    nested.push(family);
                    for child in children {
                        visit(self, child);
                        self.walk(child, &nested);
                    }
                }
                None => children.iter().for_each(|child| self.walk(child, inside)),
            }
        }
    }

    fn finish(self) -> ImportResult {
        ImportResult {
            entities: self.entities,
            actions: self.actions,
        }
    }

    fn visit_entity(&mut self, node: &TreeNode) {
        let attributes = node
            .children("Attributes")
            .iter()
            .flat_map(|container| container.children("EntityAttribute"))
            .chain(node.children("EntityAttribute"))
            .map(read_attribute)
            .collect();

        self.entities.push(Entity {
            id: Id::generate(),
            module_id: self.owner.clone(),
            name: non_empty(node, "Name").unwrap_or(UNKNOWN_ENTITY_NAME).to_string(),
            description: node.value("Description").unwrap_or_default().to_string(),
            is_static: node.flag("IsStatic"),
            is_public: node.flag("IsPublic"),
            attributes,
        });
    }

    fn visit_action(&mut self, node: &TreeNode) {
        let name = non_empty(node, "Name").unwrap_or(UNKNOWN_ACTION_NAME).to_string();
        let flow = read_flow(node);

        for dangling in flow.dangling_edges() {
            warn!(
                action = %name,
                edge = %dangling.edge,
                endpoint = %dangling.endpoint,
                missing = %dangling.missing,
                "flow edge references a node that is not in the flow"
            );
        }

        self.actions.push(LogicAction {
            id: Id::generate(),
            module_id: self.owner.clone(),
            kind: ActionKind::from_element_name(node.label()),
            description: node.value("Description").unwrap_or_default().to_string(),
            is_function: node.flag("IsFunction"),
            is_public: node.flag("IsPublic"),
            inputs: parameters(node, "InputParameter").map(read_parameter).collect(),
            outputs: parameters(node, "OutputParameter").map(read_parameter).collect(),
            locals: nested(node, "Variables", "Variable").map(read_local).collect(),
            flow_summary: format!("Imported logic with {} nodes.", flow.nodes.len()),
            flow,
            name,
        });
    }
}

// ============================================================================
// FIELD READERS
// ============================================================================

fn non_empty<'a>(node: &'a TreeNode, name: &str) -> Option<&'a str> {
    node.value(name).filter(|v| !v.is_empty())
}

/// Children labelled `label`, both direct and inside `container` elements.
fn nested<'a>(
    node: &'a TreeNode,
    container: &'static str,
    label: &'static str,
) -> impl Iterator<Item = &'a TreeNode> {
    node.children(label).iter().chain(
        node.children(container)
            .iter()
            .flat_map(move |c| c.children(label)),
    )
}

fn parameters<'a>(action: &'a TreeNode, label: &'static str) -> impl Iterator<Item = &'a TreeNode> {
    nested(action, "Parameters", label)
}

fn data_type(node: &TreeNode) -> DataType {
    map_external_type(node.value("Type").unwrap_or_default())
}

fn read_attribute(node: &TreeNode) -> Attribute {
    let data_type = data_type(node);
    let length = if data_type.has_length() {
        node.value("Length").and_then(|l| l.trim().parse().ok())
    } else {
        None
    };
    Attribute {
        id: Id::generate(),
        name: node.value("Name").unwrap_or_default().to_string(),
        data_type,
        length,
        is_mandatory: node.flag("IsMandatory"),
        is_identifier: node.flag("IsIdentifier"),
    }
}

fn read_variable(node: &TreeNode, is_list: bool) -> Variable {
    Variable {
        id: Id::generate(),
        name: node.value("Name").unwrap_or_default().to_string(),
        data_type: data_type(node),
        is_list,
        is_mandatory: node.flag("IsMandatory"),
        description: non_empty(node, "Description").map(str::to_string),
    }
}

/// Parameters never carry a list flag at the top level of the schema.
fn read_parameter(node: &TreeNode) -> Variable {
    read_variable(node, false)
}

fn read_local(node: &TreeNode) -> Variable {
    read_variable(node, node.flag("IsList"))
}

// ============================================================================
// FLOW
// ============================================================================

type StepReader = fn(&TreeNode) -> FlowStep;

/// Known flow-node labels, visited in this order.
const FLOW_STEPS: &[(&str, StepReader)] = &[
    ("Start", |_| FlowStep::Start),
    ("End", |_| FlowStep::End),
    ("Assign", read_assign),
    ("If", read_if),
    ("Switch", read_switch),
    ("ExecuteServerAction", |n| FlowStep::ExecuteServerAction {
        action_name: called_action(n),
    }),
    ("RunServerAction", |n| FlowStep::RunServerAction {
        action_name: called_action(n),
    }),
    ("RunClientAction", |n| FlowStep::RunClientAction {
        action_name: called_action(n),
    }),
    ("Aggregate", |_| FlowStep::Aggregate),
    ("SQL", read_sql),
    ("JavaScript", read_javascript),
    ("ForEach", |n| FlowStep::ForEach {
        record_list: text_field(n, "RecordList"),
    }),
    ("Comment", |n| FlowStep::Comment {
        text: text_field(n, "Text"),
    }),
    ("RaiseException", read_raise_exception),
    ("Message", read_message),
    ("Download", |_| FlowStep::Download),
    ("Destination", |_| FlowStep::Destination),
];

fn text_field(node: &TreeNode, name: &str) -> String {
    node.value(name).unwrap_or_default().to_string()
}

fn read_flow(action: &TreeNode) -> FlowGraph {
    let container = action.first("Flow").unwrap_or(action);

    let mut nodes = Vec::new();
    for (tag, read) in FLOW_STEPS {
        for element in container.children(tag) {
            nodes.push(read_node(element, tag, read(element)));
        }
    }

    let mut links: Vec<&TreeNode> = container.children("Link").iter().collect();
    if !std::ptr::eq(container, action) {
        links.extend(action.children("Link"));
    }
    let edges = links.into_iter().map(read_link).collect();

    FlowGraph { nodes, edges }
}

fn read_node(element: &TreeNode, tag: &str, step: FlowStep) -> FlowNode {
    let name = non_empty(element, "Name");
    let id = name.map_or_else(Id::generate, Id::new);
    let label = non_empty(element, "Label").or(name).unwrap_or(tag).to_string();
    FlowNode {
        id,
        label,
        position: Point::ORIGIN,
        step,
    }
}

fn read_link(element: &TreeNode) -> FlowEdge {
    FlowEdge {
        id: Id::generate(),
        source: Id::new(element.value("Source").unwrap_or_default()),
        target: Id::new(element.value("Target").unwrap_or_default()),
        label: non_empty(element, "Label").map(str::to_string),
    }
}

fn read_assign(node: &TreeNode) -> FlowStep {
    let assignments = nested(node, "Assignments", "Assignment")
        .map(|a| Assignment {
            variable: text_field(a, "Variable"),
            value: text_field(a, "Value"),
        })
        .collect();
    FlowStep::Assign { assignments }
}

fn read_if(node: &TreeNode) -> FlowStep {
    FlowStep::If {
        condition: text_field(node, "Condition"),
    }
}

fn read_switch(node: &TreeNode) -> FlowStep {
    FlowStep::Switch {
        variable: text_field(node, "Variable"),
        cases: node
            .children("Case")
            .iter()
            .map(|case| text_field(case, "Condition"))
            .collect(),
    }
}

/// Nested `<Action Name>`, else an `ActionName` attribute, else the node's
/// own name.
fn called_action(node: &TreeNode) -> String {
    node.first("Action")
        .and_then(|action| non_empty(action, "Name"))
        .or_else(|| non_empty(node, "ActionName"))
        .or_else(|| non_empty(node, "Name"))
        .unwrap_or_default()
        .to_string()
}

fn read_sql(node: &TreeNode) -> FlowStep {
    let query = non_empty(node, "SQL")
        .or_else(|| non_empty(node, "CommandText"))
        .or_else(|| non_empty(node, "Name"))
        .unwrap_or(SQL_PLACEHOLDER);
    FlowStep::Sql {
        query: query.to_string(),
    }
}

fn read_javascript(node: &TreeNode) -> FlowStep {
    let code = non_empty(node, "Script")
        .or_else(|| non_empty(node, "Code"))
        .unwrap_or(JAVASCRIPT_PLACEHOLDER);
    FlowStep::JavaScript {
        code: code.to_string(),
    }
}

fn read_raise_exception(node: &TreeNode) -> FlowStep {
    FlowStep::RaiseException {
        exception: non_empty(node, "Exception")
            .or_else(|| non_empty(node, "Name"))
            .unwrap_or_default()
            .to_string(),
        message: text_field(node, "ExceptionMessage"),
    }
}

fn read_message(node: &TreeNode) -> FlowStep {
    FlowStep::Message {
        message: text_field(node, "Message"),
        msg_type: non_empty(node, "MessageType")
            .or_else(|| non_empty(node, "Type"))
            .unwrap_or("Info")
            .to_string(),
    }
}
