//! Dependency graph for step execution ordering.
//!
//! Edges are explicit: each step lists the steps it runs after. Ordering
//! is deterministic, with declaration order breaking ties between steps
//! that become ready at the same time.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{EltError, Result};

/// A directed edge: `from` must succeed before `to` starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

/// Represents the dependency relationships between steps.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Step names in declaration order.
    order: Vec<String>,
    /// Map of step name to its direct dependencies.
    dependencies: HashMap<String, Vec<String>>,
    /// Map of step name to steps that depend on it.
    dependents: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Create a new dependency graph builder.
    pub fn builder() -> DependencyGraphBuilder {
        DependencyGraphBuilder::new()
    }

    /// Get the direct dependencies of a step.
    pub fn dependencies_of(&self, step: &str) -> &[String] {
        self.dependencies.get(step).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Get steps that depend on the given step.
    pub fn dependents_of(&self, step: &str) -> &[String] {
        self.dependents.get(step).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All edges, grouped by target in declaration order.
    pub fn edges(&self) -> Vec<Edge> {
        self.order
            .iter()
            .flat_map(|to| {
                self.dependencies_of(to).iter().map(move |from| Edge {
                    from: from.clone(),
                    to: to.clone(),
                })
            })
            .collect()
    }

    /// Returns steps in topological order (dependencies before dependents).
    ///
    /// Returns an error if a cycle is detected.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        let index: HashMap<&str, usize> = self
            .order
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();

        let mut in_degree: Vec<usize> = self
            .order
            .iter()
            .map(|s| self.dependencies_of(s).len())
            .collect();

        let mut ready: BTreeSet<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(i, _)| i)
            .collect();

        let mut result = Vec::with_capacity(self.order.len());

        while let Some(i) = ready.pop_first() {
            let step = &self.order[i];
            result.push(step.clone());

            for dependent in self.dependents_of(step) {
                let j = index[dependent.as_str()];
                in_degree[j] -= 1;
                if in_degree[j] == 0 {
                    ready.insert(j);
                }
            }
        }

        if result.len() != self.order.len() {
            let cycle = self.find_cycle().unwrap_or_else(|| {
                self.order
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| in_degree[*i] > 0)
                    .map(|(_, s)| s.clone())
                    .collect()
            });
            return Err(EltError::CircularDependency {
                cycle: cycle.join(" -> "),
            });
        }

        Ok(result)
    }

    /// Find a cycle in the graph, returning the path if one exists.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Unvisited,
            Visiting,
            Visited,
        }

        fn dfs<'a>(
            node: &'a str,
            graph: &'a DependencyGraph,
            state: &mut HashMap<&'a str, State>,
            path: &mut Vec<&'a str>,
        ) -> Option<Vec<String>> {
            state.insert(node, State::Visiting);
            path.push(node);

            for dep in graph.dependencies_of(node) {
                match state.get(dep.as_str()).copied().unwrap_or(State::Unvisited) {
                    State::Visiting => {
                        let start = path.iter().position(|s| *s == dep.as_str())?;
                        let mut cycle: Vec<String> =
                            path[start..].iter().map(|s| s.to_string()).collect();
                        cycle.push(dep.clone());
                        return Some(cycle);
                    }
                    State::Unvisited => {
                        if let Some(cycle) = dfs(dep, graph, state, path) {
                            return Some(cycle);
                        }
                    }
                    State::Visited => {}
                }
            }

            path.pop();
            state.insert(node, State::Visited);
            None
        }

        let mut state: HashMap<&str, State> = HashMap::new();
        let mut path = Vec::new();

        for step in &self.order {
            if state.get(step.as_str()).is_none() {
                if let Some(cycle) = dfs(step, self, &mut state, &mut path) {
                    return Some(cycle);
                }
            }
        }

        None
    }

    /// Get all transitive dependents of a step.
    pub fn transitive_dependents(&self, step: &str) -> HashSet<String> {
        let mut result = HashSet::new();
        let mut to_visit = vec![step.to_string()];

        while let Some(current) = to_visit.pop() {
            for dep in self.dependents_of(&current) {
                if result.insert(dep.clone()) {
                    to_visit.push(dep.clone());
                }
            }
        }

        result
    }
}

/// Builder for constructing a DependencyGraph.
#[derive(Debug, Default)]
pub struct DependencyGraphBuilder {
    steps: Vec<(String, Vec<String>)>,
}

impl DependencyGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step with its dependencies.
    pub fn add_step(mut self, name: impl Into<String>, depends_on: Vec<String>) -> Self {
        self.steps.push((name.into(), depends_on));
        self
    }

    /// Build the dependency graph.
    ///
    /// Rejects duplicate step names, edges to unknown steps, and self edges.
    /// Longer cycles are reported by [`DependencyGraph::topological_order`].
    pub fn build(self) -> Result<DependencyGraph> {
        let mut order = Vec::with_capacity(self.steps.len());
        let mut dependencies: HashMap<String, Vec<String>> = HashMap::new();

        for (name, deps) in self.steps {
            if dependencies.contains_key(&name) {
                return Err(EltError::InvalidWorkflow {
                    message: format!("step '{}' is defined more than once", name),
                });
            }
            let mut unique: Vec<String> = Vec::with_capacity(deps.len());
            for dep in deps {
                if !unique.contains(&dep) {
                    unique.push(dep);
                }
            }
            order.push(name.clone());
            dependencies.insert(name, unique);
        }

        let mut dependents: HashMap<String, Vec<String>> =
            order.iter().map(|s| (s.clone(), Vec::new())).collect();

        for step in &order {
            for dep in &dependencies[step] {
                if dep == step {
                    return Err(EltError::CircularDependency {
                        cycle: format!("{} -> {}", step, step),
                    });
                }
                match dependents.get_mut(dep) {
                    Some(list) => list.push(step.clone()),
                    None => {
                        return Err(EltError::InvalidWorkflow {
                            message: format!("step '{}' depends on unknown step '{}'", step, dep),
                        })
                    }
                }
            }
        }

        Ok(DependencyGraph {
            order,
            dependencies,
            dependents,
        })
    }
}
