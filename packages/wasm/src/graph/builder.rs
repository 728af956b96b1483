//! Graph builder: flat person records to a symmetric kinship graph.
//!
//! # Resolution rules
//!
//! - **Parents** come from the father, mother and legacy parent fields,
//!   de-duplicated. A person named in someone's explicit children list gains
//!   that someone as a parent.
//! - **Children** are the union of a record's explicit children list and
//!   every record naming it as father, mother or parent.
//! - **Spouses** come from the spouse field and are made symmetric. Two
//!   parents of the same child are paired as spouses too, unless one is the
//!   other's parent.
//! - **Siblings** are not stored; `FamilyGraph::siblings_of` derives them.
//!
//! References to identifiers that are not in the input are kept on the node
//! as dangling entries. Self references are dropped. When an identifier is
//! repeated, the last record with that identifier wins.

use std::collections::HashMap;
use tracing::{debug, warn};

use super::family::FamilyGraph;
use super::node::{FamilyNode, PersonDetails, PersonId, push_unique};
use super::record::PersonRecord;

/// Build the kinship graph for one record snapshot.
///
/// Pure function of its input. The returned graph has no root selected yet.
pub fn build_family_graph(records: &[PersonRecord]) -> FamilyGraph {
    // Last record per identifier, in first-occurrence order.
    let mut slots: HashMap<PersonId, usize> = HashMap::with_capacity(records.len());
    let mut effective: Vec<&PersonRecord> = Vec::with_capacity(records.len());
    let mut duplicates: Vec<PersonId> = Vec::new();

    for record in records {
        match slots.get(&record.id) {
            Some(&slot) => {
                effective[slot] = record;
                push_unique(&mut duplicates, &record.id);
            }
            None => {
                slots.insert(record.id.clone(), effective.len());
                effective.push(record);
            }
        }
    }

    if !duplicates.is_empty() {
        warn!(count = duplicates.len(), "duplicate person identifiers, keeping last record");
    }

    let mut nodes: Vec<FamilyNode> = effective.iter().map(|r| seed_node(r)).collect();

    // Parents from the record's own fields, and the inferred reverse links.
    for (slot, record) in effective.iter().enumerate() {
        for parent in record.parent_refs() {
            if *parent == record.id {
                continue;
            }
            push_unique(&mut nodes[slot].parents, parent);
            if let Some(&parent_slot) = slots.get(parent) {
                push_unique(&mut nodes[parent_slot].children, &record.id);
            }
        }
    }

    // Explicit children lists, symmetrized onto the child's parents.
    for (slot, record) in effective.iter().enumerate() {
        let Some(children) = &record.children else {
            continue;
        };
        for child in children {
            if *child == record.id {
                continue;
            }
            push_unique(&mut nodes[slot].children, child);
            if let Some(&child_slot) = slots.get(child) {
                push_unique(&mut nodes[child_slot].parents, &record.id);
            }
        }
    }

    // Spouses, symmetrized.
    for (slot, record) in effective.iter().enumerate() {
        let Some(spouse) = &record.spouse_id else {
            continue;
        };
        if *spouse == record.id {
            continue;
        }
        push_unique(&mut nodes[slot].spouses, spouse);
        if let Some(&spouse_slot) = slots.get(spouse) {
            push_unique(&mut nodes[spouse_slot].spouses, &record.id);
        }
    }

    // Parents who share a child are partners even without a spouse field,
    // unless one of them is recorded as the other's parent.
    let mut implicit = 0usize;
    for slot in 0..nodes.len() {
        let co_parents: Vec<usize> = nodes[slot]
            .parents
            .iter()
            .filter_map(|id| slots.get(id).copied())
            .collect();
        for (i, &a) in co_parents.iter().enumerate() {
            for &b in &co_parents[i + 1..] {
                let (id_a, id_b) = (nodes[a].id.clone(), nodes[b].id.clone());
                if nodes[a].is_child_of(&id_b) || nodes[b].is_child_of(&id_a) {
                    continue;
                }
                if push_unique(&mut nodes[a].spouses, &id_b) {
                    implicit += 1;
                }
                push_unique(&mut nodes[b].spouses, &id_a);
            }
        }
    }

    // Relation lists follow input order; dangling identifiers go last in
    // the order they were met.
    let order = |id: &PersonId| slots.get(id).copied().unwrap_or(usize::MAX);
    for node in &mut nodes {
        node.parents.sort_by_key(|id| order(id));
        node.children.sort_by_key(|id| order(id));
        node.spouses.sort_by_key(|id| order(id));
    }

    debug!(
        records = records.len(),
        people = nodes.len(),
        implicit_partners = implicit,
        "built family graph"
    );

    FamilyGraph::from_nodes(nodes, duplicates)
}

fn seed_node(record: &PersonRecord) -> FamilyNode {
    let mut node = FamilyNode::new(record.id.clone());
    node.sex = record.sex;
    node.generation_hint = record.generation;
    if let Some(hint) = record.generation {
        node.generation = hint;
    }
    node.details = PersonDetails {
        name: record.name.clone(),
        birth: record.birth.clone(),
        death: record.death.clone(),
        image: record.image.clone(),
        occupation: record.occupation.clone(),
    };
    node
}
