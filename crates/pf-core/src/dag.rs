//! Dependency graph building and topological ordering

use crate::error::{CoreError, CoreResult};
use crate::model::Model;
use crate::model_name::ModelName;
use crate::warning::Warning;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A directed acyclic graph of model dependencies.
///
/// Edges run from dependency to dependent, so topological order yields
/// dependencies first.
#[derive(Debug)]
pub struct ModelGraph {
    /// The underlying graph
    graph: DiGraph<ModelName, ()>,

    /// Map from model name to node index
    node_map: HashMap<ModelName, NodeIndex>,
}

impl ModelGraph {
    fn empty() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    fn add_node(&mut self, name: &ModelName) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(name.as_str()) {
            idx
        } else {
            let idx = self.graph.add_node(name.clone());
            self.node_map.insert(name.clone(), idx);
            idx
        }
    }

    /// Build the graph from manifest models.
    ///
    /// Dangling dependency references (a declared upstream that is not itself
    /// a model) produce a [`Warning::DanglingReference`] and the edge is
    /// dropped. Self-references are dropped silently. A cycle is fatal.
    pub fn build(models: &BTreeMap<ModelName, Model>) -> CoreResult<(Self, Vec<Warning>)> {
        let mut dag = Self::empty();
        let mut warnings = Vec::new();

        for name in models.keys() {
            dag.add_node(name);
        }

        for (name, model) in models {
            for dep in &model.depends_on {
                if dep == name {
                    continue;
                }
                if models.contains_key(dep) {
                    let from = dag.add_node(dep);
                    let to = dag.add_node(name);
                    dag.graph.add_edge(from, to, ());
                } else {
                    log::warn!("model '{name}' depends on unknown model '{dep}'");
                    warnings.push(Warning::DanglingReference {
                        model: name.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        dag.validate()?;

        Ok((dag, warnings))
    }

    /// Validate the graph has no cycles
    pub fn validate(&self) -> CoreResult<()> {
        match toposort(&self.graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(CoreError::CircularDependency {
                cycle: self.cycle_path(cycle.node_id()),
            }),
        }
    }

    /// Reconstruct a readable cycle path starting from a node, for error reporting
    fn cycle_path(&self, start: NodeIndex) -> String {
        let mut path: Vec<String> = vec![self.graph[start].to_string()];
        let mut visited = HashSet::new();
        visited.insert(start);
        let mut current = start;

        while let Some(edge) = self.graph.edges(current).next() {
            let target = edge.target();
            path.push(self.graph[target].to_string());

            if target == start || visited.contains(&target) {
                break;
            }

            visited.insert(target);
            current = target;
        }

        path.join(" -> ")
    }

    /// Get models in topological order (dependencies first)
    pub fn topological_order(&self) -> CoreResult<Vec<ModelName>> {
        match toposort(&self.graph, None) {
            Ok(indices) => Ok(indices
                .into_iter()
                .map(|idx| self.graph[idx].clone())
                .collect()),
            Err(cycle) => Err(CoreError::CircularDependency {
                cycle: self.cycle_path(cycle.node_id()),
            }),
        }
    }

    /// Direct upstream dependencies of a model, name-ascending
    pub fn dependencies(&self, model: &str) -> Vec<ModelName> {
        self.neighbors(model, petgraph::Direction::Incoming)
    }

    /// Direct downstream dependents of a model, name-ascending
    pub fn dependents(&self, model: &str) -> Vec<ModelName> {
        self.neighbors(model, petgraph::Direction::Outgoing)
    }

    fn neighbors(&self, model: &str, direction: petgraph::Direction) -> Vec<ModelName> {
        let Some(&idx) = self.node_map.get(model) else {
            return Vec::new();
        };
        let mut result: Vec<ModelName> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| {
                let neighbor = match direction {
                    petgraph::Direction::Incoming => e.source(),
                    petgraph::Direction::Outgoing => e.target(),
                };
                self.graph[neighbor].clone()
            })
            .collect();
        result.sort_unstable();
        result.dedup();
        result
    }

    /// True when no downstream model consumes this model's output
    pub fn is_terminal(&self, model: &str) -> bool {
        match self.node_map.get(model) {
            Some(&idx) => self
                .graph
                .edges_directed(idx, petgraph::Direction::Outgoing)
                .next()
                .is_none(),
            None => false,
        }
    }

    /// All model names in the graph, name-ascending
    pub fn models(&self) -> Vec<ModelName> {
        let mut names: Vec<ModelName> = self.node_map.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Check if a model exists in the graph
    pub fn contains(&self, model: &str) -> bool {
        self.node_map.contains_key(model)
    }

    /// Number of models in the graph
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// True when the graph holds no models
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
