//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays are sorted by source node and indexed by edge position, so
//! iterating a node's outgoing edges is a contiguous scan.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(x, y)` to the nearest `NodeId`.  Used to
//! snap call, station and hospital locations onto the road graph.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ems_core::{Location, NodeId};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus a spatial index for node snapping.
///
/// Build with [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    /// Position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Location>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each edge (used for path reconstruction).
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Length of each edge in metres.
    pub edge_length_m: Vec<f64>,

    /// Non-emergency travel time in milliseconds.  Dijkstra cost before the
    /// per-priority speed factor is applied.
    pub edge_travel_ms: Vec<u32>,

    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// A network with no nodes or edges.  Every route request against it
    /// fails with [`SpatialError::EmptyNetwork`][crate::SpatialError::EmptyNetwork].
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Iterator over the edge positions of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = usize> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        start..end
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// The nearest road node to `pos`; `None` only for an empty network.
    pub fn snap_to_node(&self, pos: Location) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&pos.as_array())
            .map(|e| e.id)
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ems_core::Location;
/// use ems_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(Location::new(0.0, 0.0));
/// let c = b.add_node(Location::new(1_200.0, 0.0));
/// b.add_road(a, c, 1_200.0, 90_000); // 1.2 km, 90 s
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct RoadNetworkBuilder {
    nodes:     Vec<Location>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:      NodeId,
    to:        NodeId,
    length_m:  f64,
    travel_ms: u32,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Location) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64, travel_ms: u32) {
        self.raw_edges.push(RawEdge { from, to, length_m, travel_ms });
    }

    /// Add edges in both directions for an undirected road segment.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64, travel_ms: u32) {
        self.add_directed_edge(a, b, length_m, travel_ms);
        self.add_directed_edge(b, a, length_m, travel_ms);
    }

    pub fn node_pos(&self, id: NodeId) -> Location {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// O(E log E) for the edge sort plus O(N log N) for the R-tree bulk load.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable sort keeps insertion order among a node's edges, which keeps
        // Dijkstra tie-breaking reproducible.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:      Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:        Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m:  Vec<f64>    = raw.iter().map(|e| e.length_m).collect();
        let edge_travel_ms: Vec<u32>    = raw.iter().map(|e| e.travel_ms).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: pos.as_array(),
                id: NodeId::from_index(i),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadNetwork {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_travel_ms,
            spatial_idx,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
