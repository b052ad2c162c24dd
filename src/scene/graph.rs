// ABOUTME: Ownership graph over the views declared in a scene
// ABOUTME: Orders view creation so owners exist before children and rejects ownership cycles

use indexmap::IndexMap;
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use petgraph::Graph;
use std::collections::HashMap;

use super::document::ViewSpec;
use super::error::ValidationError;

/// Directed graph with an edge from every owner to each view it owns.
#[derive(Debug)]
pub struct OwnerGraph {
    graph: Graph<String, ()>,
}

impl OwnerGraph {
    pub fn build(views: &IndexMap<String, ViewSpec>) -> Result<Self, ValidationError> {
        let mut graph = Graph::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

        for name in views.keys() {
            node_map.insert(name.clone(), graph.add_node(name.clone()));
        }

        for (name, spec) in views {
            let Some(owner) = &spec.owner else {
                continue;
            };

            let owner_node =
                node_map
                    .get(owner)
                    .copied()
                    .ok_or_else(|| ValidationError::UnknownOwner {
                        view: name.clone(),
                        owner: owner.clone(),
                    })?;
            graph.add_edge(owner_node, node_map[name], ());
        }

        Ok(Self { graph })
    }

    /// View names with every owner ahead of the views it owns
    pub fn creation_order(&self) -> Result<Vec<String>, ValidationError> {
        let sorted = toposort(&self.graph, None).map_err(|cycle| ValidationError::OwnerCycle {
            views: self.cycle_members(cycle.node_id()),
        })?;

        Ok(sorted.into_iter().map(|node| self.graph[node].clone()).collect())
    }

    /// Follow owner links from `start` until a view repeats
    fn cycle_members(&self, start: NodeIndex) -> Vec<String> {
        let mut members = Vec::new();
        let mut current = start;

        loop {
            let name = self.graph[current].clone();
            if members.contains(&name) {
                break;
            }
            members.push(name);

            match self
                .graph
                .neighbors_directed(current, petgraph::Direction::Incoming)
                .next()
            {
                Some(owner) => current = owner,
                None => break,
            }
        }

        members
    }
}
