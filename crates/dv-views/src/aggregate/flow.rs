//! Three-stage categorical flow graph (Sankey data)

use dv_data::Record;
use indexmap::IndexMap;
use ndarray::Array2;

/// A distinct stage label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNode {
    pub label: String,
    /// Stage (0, 1 or 2) the label first appeared in
    pub stage: usize,
}

/// Weighted edge between two node indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowEdge {
    pub source: usize,
    pub target: usize,
    pub weight: u32,
}

/// Nodes in first-appearance order plus weighted directed edges
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    nodes: IndexMap<String, usize>,
    edges: IndexMap<(usize, usize), u32>,
}

impl FlowGraph {
    /// Build the graph from each record's `stage1 -> stage2 -> stage3` path.
    ///
    /// Edge weight is the number of records sharing that consecutive pair.
    pub fn from_records<R: Record>(records: &[&R]) -> Self {
        let mut graph = Self::default();
        for record in records {
            let stages = record.flow_stages();
            let indices = [
                graph.intern(stages[0], 0),
                graph.intern(stages[1], 1),
                graph.intern(stages[2], 2),
            ];
            for pair in indices.windows(2) {
                *graph.edges.entry((pair[0], pair[1])).or_insert(0) += 1;
            }
        }
        graph
    }

    fn intern(&mut self, label: &str, stage: usize) -> usize {
        if let Some(index) = self.nodes.get_index_of(label) {
            return index;
        }
        self.nodes.insert_full(label.to_string(), stage).0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = FlowNode> + '_ {
        self.nodes.iter().map(|(label, &stage)| FlowNode {
            label: label.clone(),
            stage,
        })
    }

    pub fn node_index(&self, label: &str) -> Option<usize> {
        self.nodes.get_index_of(label)
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.nodes.get_index(index).map(|(label, _)| label.as_str())
    }

    pub fn stage(&self, index: usize) -> Option<usize> {
        self.nodes.get_index(index).map(|(_, &stage)| stage)
    }

    /// Edges in first-appearance order
    pub fn edges(&self) -> impl Iterator<Item = FlowEdge> + '_ {
        self.edges.iter().map(|(&(source, target), &weight)| FlowEdge { source, target, weight })
    }

    pub fn edge_weight(&self, source: usize, target: usize) -> u32 {
        self.edges.get(&(source, target)).copied().unwrap_or(0)
    }

    /// `N x N` matrix, `m[[s, t]]` is the weight of edge `s -> t`
    pub fn adjacency_matrix(&self) -> Array2<u32> {
        let n = self.nodes.len();
        let mut matrix = Array2::zeros((n, n));
        for (&(source, target), &weight) in &self.edges {
            matrix[[source, target]] = weight;
        }
        matrix
    }

    /// Total weight flowing through a node (max of in and out)
    pub fn throughput(&self, index: usize) -> u32 {
        let (incoming, outgoing) = self.edges.iter().fold((0, 0), |(i, o), (&(s, t), &w)| {
            (if t == index { i + w } else { i }, if s == index { o + w } else { o })
        });
        incoming.max(outgoing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fixtures::*;

    #[test]
    fn test_nodes_in_first_appearance_order() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let graph = FlowGraph::from_records(&refs);

        let labels: Vec<String> = graph.nodes().map(|n| n.label).collect();
        assert_eq!(labels, ["100k-150k", "Senior", "remote", "200k+", "50k-100k", "<50k"]);
        assert_eq!(graph.stage(1), Some(1));
        assert_eq!(graph.stage(3), Some(0));
    }

    #[test]
    fn test_edge_weights_and_matrix() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let graph = FlowGraph::from_records(&refs);

        let senior = graph.node_index("Senior").unwrap();
        let remote = graph.node_index("remote").unwrap();
        assert_eq!(graph.edge_weight(senior, remote), 4);
        assert_eq!(graph.edge_weight(remote, senior), 0);

        let matrix = graph.adjacency_matrix();
        assert_eq!(matrix.dim(), (6, 6));
        assert_eq!(matrix[[senior, remote]], 4);
        // Every record contributes two edges
        assert_eq!(matrix.sum(), 8);
        assert_eq!(graph.throughput(senior), 4);
    }

    #[test]
    fn test_empty_graph() {
        let graph = FlowGraph::from_records::<dv_data::SalaryRecord>(&[]);
        assert!(graph.is_empty());
        assert_eq!(graph.adjacency_matrix().dim(), (0, 0));
    }
}
