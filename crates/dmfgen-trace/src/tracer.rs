use std::collections::HashMap;

use dmfgen_core::Point;
use dmfgen_geometry::{Polygon, PolygonError};

use crate::primitives::Primitive;

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error(
        "malformed geometry in curve {primitive} near ({x:.4}, {y:.4}): {reason}"
    )]
    MalformedGeometry {
        primitive: usize,
        x: f64,
        y: f64,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct TraceOptions {
    /// Endpoints closer than this merge into one graph node.
    pub merge_eps: f64,
    /// Angular resolution for arc tessellation.
    pub arc_step_deg: f64,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            merge_eps: 1e-6,
            arc_step_deg: 20.0,
        }
    }
}

struct EdgeRec {
    a: usize,
    b: usize,
    primitive: usize,
}

/// Reconstruct closed simple polygons from an unordered primitive soup.
///
/// Endpoints are matched by quantized coordinates, never by float
/// equality. Every node must be shared by exactly two curve endpoints;
/// open chains and junctions fail with the offending primitive named.
/// Output order is deterministic: loops appear in the order their first
/// primitive appears in the input.
pub fn trace_polygons(
    primitives: &[Primitive],
    options: &TraceOptions,
) -> Result<Vec<Polygon>, TraceError> {
    let mut nodes: Vec<Point> = Vec::new();
    let mut node_ids: HashMap<(i64, i64), usize> = HashMap::new();
    let mut edges: Vec<EdgeRec> = Vec::new();
    let mut adjacency: Vec<Vec<usize>> = Vec::new();

    for (idx, primitive) in primitives.iter().enumerate() {
        let chain: Vec<Point> = match primitive {
            Primitive::Line(line) => vec![line.start, line.end],
            Primitive::Arc(arc) => arc.points(options.arc_step_deg),
        };
        for pair in chain.windows(2) {
            let a = intern(&mut nodes, &mut node_ids, &mut adjacency, pair[0], options.merge_eps, idx)?;
            let b = intern(&mut nodes, &mut node_ids, &mut adjacency, pair[1], options.merge_eps, idx)?;
            if a == b {
                // Tessellation points that quantize together; nothing to add.
                continue;
            }
            let edge = edges.len();
            edges.push(EdgeRec { a, b, primitive: idx });
            adjacency[a].push(edge);
            adjacency[b].push(edge);
        }
    }

    for (node, incident) in adjacency.iter().enumerate() {
        if incident.len() != 2 {
            let primitive = incident.first().map_or(0, |&e| edges[e].primitive);
            let p = nodes[node];
            return Err(TraceError::MalformedGeometry {
                primitive,
                x: p.x,
                y: p.y,
                reason: if incident.len() < 2 {
                    "open endpoint; curve does not close into a loop"
                } else {
                    "more than two curves meet at this point"
                },
            });
        }
    }

    let mut visited = vec![false; edges.len()];
    let mut polygons = Vec::new();
    for start_edge in 0..edges.len() {
        if visited[start_edge] {
            continue;
        }
        let start_node = edges[start_edge].a;
        let mut loop_points = Vec::new();
        let mut edge = start_edge;
        let mut from = start_node;
        loop {
            visited[edge] = true;
            loop_points.push(nodes[from]);
            let to = other_endpoint(&edges[edge], from);
            if to == start_node {
                break;
            }
            edge = other_edge(&adjacency[to], edge);
            from = to;
        }

        let anchor = nodes[start_node];
        let polygon = Polygon::new(loop_points).map_err(|err| TraceError::MalformedGeometry {
            primitive: edges[start_edge].primitive,
            x: anchor.x,
            y: anchor.y,
            reason: match err {
                PolygonError::TooFewVertices { .. } => "loop has fewer than 3 distinct vertices",
                PolygonError::ZeroArea => "loop encloses no area",
            },
        })?;
        polygons.push(polygon);
    }

    Ok(polygons)
}

fn intern(
    nodes: &mut Vec<Point>,
    node_ids: &mut HashMap<(i64, i64), usize>,
    adjacency: &mut Vec<Vec<usize>>,
    p: Point,
    eps: f64,
    primitive: usize,
) -> Result<usize, TraceError> {
    let key = quantize(p, eps).ok_or(TraceError::MalformedGeometry {
        primitive,
        x: p.x,
        y: p.y,
        reason: "endpoint coordinate is not finite",
    })?;
    Ok(*node_ids.entry(key).or_insert_with(|| {
        nodes.push(p);
        adjacency.push(Vec::new());
        nodes.len() - 1
    }))
}

fn quantize(p: Point, eps: f64) -> Option<(i64, i64)> {
    let qx = p.x / eps;
    let qy = p.y / eps;
    if !qx.is_finite() || !qy.is_finite() || qx.abs() >= 9e15 || qy.abs() >= 9e15 {
        return None;
    }
    Some((qx.round() as i64, qy.round() as i64))
}

fn other_endpoint(edge: &EdgeRec, node: usize) -> usize {
    if edge.a == node {
        edge.b
    } else {
        edge.a
    }
}

/// The second edge incident to a degree-2 node.
fn other_edge(incident: &[usize], edge: usize) -> usize {
    if incident[0] == edge {
        incident[1]
    } else {
        incident[0]
    }
}
