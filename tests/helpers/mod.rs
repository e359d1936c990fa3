//! Shared documents and model builders for integration tests.

#![allow(dead_code)]

use butler::model::{
    ActionKind, Assignment, Attribute, DataType, Entity, FlowEdge, FlowGraph, FlowNode, FlowStep,
    LogicAction, Variable,
};

pub const MODULE: &str = "module-1";

/// An order-handling module as the editor puts it on the clipboard: the
/// entity is nested inside a module element and uses child-element fields.
pub const ORDER_MODULE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ClipboardData>
  <Module Name="Sales">
    <Entity IsPublic="true">
      <Name>Customer</Name>
      <Description>People &amp; companies that buy</Description>
      <Attributes>
        <EntityAttribute Name="Id" Type="rtLongInteger" IsIdentifier="true" IsMandatory="true"/>
        <EntityAttribute Name="Email" Type="rtEmail" Length="250"/>
      </Attributes>
    </Entity>
    <Entity Name="Order" IsPublic="True">
      <Attributes>
        <EntityAttribute Name="Id" Type="rtLongInteger" IsIdentifier="true"/>
        <EntityAttribute Name="CustomerId" Type="rtLongInteger" IsMandatory="true"/>
        <EntityAttribute Name="Total" Type="rtCurrency"/>
      </Attributes>
    </Entity>
  </Module>
  <ServerAction Name="CreateOrder" IsPublic="true">
    <InputParameter Name="CustomerId" Type="LongInteger" IsMandatory="true"/>
    <OutputParameter Name="OrderId" Type="LongInteger"/>
    <Variable Name="Lines" Type="Record" IsList="true"/>
    <Flow>
      <Start Name="Start"/>
      <Aggregate Name="GetCustomer"/>
      <If Name="Exists"><Condition>GetCustomer.List.Empty = False</Condition></If>
      <Assign Name="Prepare">
        <Assignment Variable="x" Value="1"/>
        <Assignment Variable="y" Value="2"/>
      </Assign>
      <ExecuteServerAction Name="Insert"><Action Name="CreateOrderRecord"/></ExecuteServerAction>
      <RaiseException Name="Missing" Exception="NotFound" ExceptionMessage="No such customer"/>
      <End Name="End"/>
      <Link Source="Start" Target="GetCustomer"/>
      <Link Source="GetCustomer" Target="Exists"/>
      <Link Source="Exists" Target="Prepare" Label="True"/>
      <Link Source="Exists" Target="Missing" Label="False"/>
      <Link Source="Prepare" Target="Insert"/>
      <Link Source="Insert" Target="End"/>
    </Flow>
  </ServerAction>
</ClipboardData>
"#;

pub fn customer() -> Entity {
    Entity::new(MODULE, "Customer")
        .with_attribute(Attribute::new("Id", DataType::LongInteger).identifier())
        .with_attribute(Attribute::new("Name", DataType::Text).with_length(100).mandatory())
}

pub fn order() -> Entity {
    Entity::new(MODULE, "Order")
        .with_attribute(Attribute::new("Id", DataType::LongInteger).identifier())
        .with_attribute(Attribute::new("CustomerId", DataType::LongInteger))
}

/// A loop: `Next` jumps back to `Check` until the list is exhausted.
pub fn loop_action() -> LogicAction {
    let flow = FlowGraph::new()
        .with_node(FlowNode::new("Start", FlowStep::Start))
        .with_node(FlowNode::new(
            "Each",
            FlowStep::ForEach {
                record_list: "GetOrders.List".into(),
            },
        ))
        .with_node(FlowNode::new(
            "Bump",
            FlowStep::Assign {
                assignments: vec![Assignment::new("Count", "Count + 1")],
            },
        ))
        .with_node(FlowNode::new("End", FlowStep::End))
        .with_edge(FlowEdge::new("Start", "Each"))
        .with_edge(FlowEdge::new("Each", "Bump").with_label("Cycle"))
        .with_edge(FlowEdge::new("Bump", "Each"))
        .with_edge(FlowEdge::new("Each", "End"));

    LogicAction::new(MODULE, "CountOrders", ActionKind::Server)
        .with_output(Variable::new("Count", DataType::Integer))
        .with_local(Variable::new("Orders", DataType::Record).list())
        .with_flow(flow)
}
