//! Three-column flow diagram

use dv_data::Record;

use super::RebuildView;
use crate::aggregate::{FilterScope, FlowGraph};
use crate::DashboardContext;

const STAGES: usize = 3;

/// Vertical gap between nodes of a column, in layout units
const NODE_PADDING: f64 = 0.02;

/// A node rectangle in unit layout space (`x` in `[0, 1]`, `y` downwards)
#[derive(Debug, Clone, PartialEq)]
pub struct FlowNodeBox {
    pub index: usize,
    pub label: String,
    pub stage: usize,
    pub x: f64,
    pub y0: f64,
    pub y1: f64,
    pub value: u32,
}

/// A band between two node boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub weight: u32,
    pub source_y0: f64,
    pub source_y1: f64,
    pub target_y0: f64,
    pub target_y1: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowLayout {
    pub nodes: Vec<FlowNodeBox>,
    pub links: Vec<FlowLink>,
}

impl FlowLayout {
    /// Stack each stage's nodes in a column, heights proportional to
    /// throughput; one scale is shared by all columns.
    pub fn compute(graph: &FlowGraph) -> Self {
        if graph.is_empty() {
            return Self::default();
        }

        let mut columns: [Vec<usize>; STAGES] = Default::default();
        for (index, node) in graph.nodes().enumerate() {
            columns[node.stage.min(STAGES - 1)].push(index);
        }

        let scale = columns
            .iter()
            .filter(|column| !column.is_empty())
            .map(|column| {
                let total: u32 = column.iter().map(|&i| graph.throughput(i)).sum();
                let available = 1.0 - NODE_PADDING * (column.len() - 1) as f64;
                if total == 0 {
                    f64::INFINITY
                } else {
                    available.max(0.0) / total as f64
                }
            })
            .fold(f64::INFINITY, f64::min);
        let scale = if scale.is_finite() { scale } else { 0.0 };

        let mut boxes: Vec<Option<FlowNodeBox>> = vec![None; graph.node_count()];
        for (stage, column) in columns.iter().enumerate() {
            let mut y = 0.0;
            for &index in column {
                let value = graph.throughput(index);
                let height = value as f64 * scale;
                boxes[index] = Some(FlowNodeBox {
                    index,
                    label: graph.label(index).unwrap_or_default().to_string(),
                    stage,
                    x: stage as f64 / (STAGES - 1) as f64,
                    y0: y,
                    y1: y + height,
                    value,
                });
                y += height + NODE_PADDING;
            }
        }
        let nodes: Vec<FlowNodeBox> = boxes.into_iter().flatten().collect();

        // Running offsets inside each node, for outgoing and incoming bands
        let mut out_offset: Vec<f64> = vec![0.0; graph.node_count()];
        let mut in_offset: Vec<f64> = vec![0.0; graph.node_count()];
        let links = graph
            .edges()
            .map(|edge| {
                let height = edge.weight as f64 * scale;
                let source_y0 = nodes[edge.source].y0 + out_offset[edge.source];
                let target_y0 = nodes[edge.target].y0 + in_offset[edge.target];
                out_offset[edge.source] += height;
                in_offset[edge.target] += height;
                FlowLink {
                    source: edge.source,
                    target: edge.target,
                    weight: edge.weight,
                    source_y0,
                    source_y1: source_y0 + height,
                    target_y0,
                    target_y1: target_y0 + height,
                }
            })
            .collect();

        Self { nodes, links }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlowScene {
    pub graph: FlowGraph,
    pub layout: FlowLayout,
}

#[derive(Debug, Default)]
pub struct FlowView {
    scene: FlowScene,
    generation: u64,
}

impl FlowView {
    pub fn scene(&self) -> &FlowScene {
        &self.scene
    }
}

impl<R: Record> RebuildView<R> for FlowView {
    fn name(&self) -> &'static str {
        "Flow"
    }

    fn rebuild(&mut self, ctx: &DashboardContext<R>) {
        self.generation += 1;
        let records = ctx.filtered(FilterScope::Both);
        let graph = FlowGraph::from_records(&records);
        let layout = FlowLayout::compute(&graph);
        tracing::debug!(
            "Flow rebuilt: {} nodes, {} links",
            layout.nodes.len(),
            layout.links.len()
        );
        self.scene = FlowScene { graph, layout };
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fixtures::sample;

    #[test]
    fn test_layout_columns() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let graph = FlowGraph::from_records(&refs);
        let layout = FlowLayout::compute(&graph);

        assert_eq!(layout.nodes.len(), graph.node_count());
        assert_eq!(layout.links.len(), graph.edges().count());

        // "Senior" carries all four records; the padded first column sets
        // the shared scale, (1 - 3 * 0.02) / 4 per record
        let senior = &layout.nodes[graph.node_index("Senior").unwrap()];
        assert_eq!(senior.x, 0.5);
        assert_eq!(senior.y0, 0.0);
        assert!((senior.y1 - 0.94).abs() < 1e-9);

        // Salary bands share the first column without overlapping
        let first_column: Vec<_> = layout.nodes.iter().filter(|n| n.stage == 0).collect();
        assert_eq!(first_column.len(), 4);
        for pair in first_column.windows(2) {
            assert!(pair[1].y0 >= pair[0].y1);
        }
    }

    #[test]
    fn test_link_bands_stack_inside_nodes() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let graph = FlowGraph::from_records(&refs);
        let layout = FlowLayout::compute(&graph);

        let senior = graph.node_index("Senior").unwrap();
        let incoming: Vec<_> = layout.links.iter().filter(|l| l.target == senior).collect();
        assert_eq!(incoming.len(), 4);
        assert_eq!(incoming[0].target_y0, 0.0);
        assert!((incoming[3].target_y1 - layout.nodes[senior].y1).abs() < 1e-9);
    }

    #[test]
    fn test_empty_layout() {
        let layout = FlowLayout::compute(&FlowGraph::default());
        assert!(layout.nodes.is_empty());
    }
}
