//! Arena-based graph representation for shared and cyclic pointer graphs.
//!
//! Edges are `NodeId` indices into one `Vec<N>` instead of raw pointers, so
//! the whole graph is torn down for free when the `Graph` is dropped.

use crate::error::DeepWireError;
use crate::message::{Message, Pack, Sink, Source, Unpack};
use crate::transport::{SinkTransport, SourceTransport};
use anyhow::Result;
use tracing::{debug, warn};

/// Index of a node within a [`Graph`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// The per-node-type descriptor: how to pack/unpack a node's own payload,
/// and how to read and replace its outgoing edges.
pub trait GraphNode: Sized {
    fn pack_value<X: SourceTransport>(&self, msg: &mut Message<X, Source>) -> Result<()>;
    fn unpack_value<X: SinkTransport>(msg: &mut Message<X, Sink>) -> Result<Self>;

    fn edges(&self) -> &[NodeId];

    /// Install this node's outgoing edges once they have all been
    /// reconstructed. Called exactly once per node, after `unpack_value`,
    /// which is why edges are not part of `unpack_value` itself: a
    /// self-loop edge must be able to resolve to this node's id before its
    /// edge list exists.
    fn set_edges(&mut self, edges: Vec<NodeId>);
}

/// An arena of nodes reachable from `root`, preserving sharing and cycles.
#[derive(Debug)]
pub struct Graph<N> {
    nodes: Vec<N>,
    root: NodeId,
}

impl<N> Graph<N> {
    /// Build a graph directly from an already-populated arena. `root` must
    /// be a valid index into `nodes`.
    pub fn new(nodes: Vec<N>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &N {
        &self.nodes[id.0 as usize]
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<X: SourceTransport, N: GraphNode> Pack<X> for Graph<N> {
    fn pack(&self, msg: &mut Message<X, Source>) -> Result<()> {
        debug!("packing graph of {} nodes from root {:?}", self.len(), self.root);
        self.pack_node(self.root, msg)
    }
}

impl<N: GraphNode> Graph<N> {
    fn pack_node<X: SourceTransport>(
        &self,
        id: NodeId,
        msg: &mut Message<X, Source>,
    ) -> Result<()> {
        let key = id.0 as u64;

        // Seen-before-new: a shared or cyclic edge back to an already
        // emitted node only ever transmits its key, never the payload again.
        if msg.identity().lookup(key).is_some() {
            msg.scalar::<u8>(1)?;
            msg.scalar::<u32>(id.0)?;
            return Ok(());
        }

        // Record before recursing, so a self-loop or cycle discovered while
        // packing this node's own edges resolves back to this key instead
        // of recursing forever.
        msg.identity_mut().insert(key, key);
        msg.scalar::<u8>(2)?;
        msg.scalar::<u32>(id.0)?;

        let node = &self.nodes[id.0 as usize];
        node.pack_value(msg)?;

        let edges = node.edges().to_vec();
        msg.scalar::<i32>(edges.len() as i32)?;
        for edge in edges {
            self.pack_node(edge, msg)?;
        }
        Ok(())
    }
}

impl<X: SinkTransport, N: GraphNode> Unpack<X> for Graph<N> {
    fn unpack(msg: &mut Message<X, Sink>) -> Result<Self> {
        let mut nodes = Vec::new();
        let root = Self::unpack_node(msg, &mut nodes)?;
        debug!("unpacked graph of {} nodes, root {:?}", nodes.len(), root);
        Ok(Graph { nodes, root })
    }
}

impl<N: GraphNode> Graph<N> {
    fn unpack_node<X: SinkTransport>(
        msg: &mut Message<X, Sink>,
        nodes: &mut Vec<N>,
    ) -> Result<NodeId> {
        let tag: u8 = msg.scalar()?;
        let key: u32 = msg.scalar()?;

        match tag {
            1 => {
                let dest = msg
                    .identity()
                    .lookup(key as u64)
                    .ok_or(DeepWireError::UnknownIdentity(key as u64))?;
                Ok(NodeId(dest as u32))
            }
            2 => {
                let idx = nodes.len();
                if idx > u32::MAX as usize {
                    warn!("graph exceeds u32 node index range at {} nodes", idx + 1);
                    return Err(DeepWireError::GraphTooLarge(idx + 1).into());
                }
                let idx = idx as u32;
                msg.identity_mut().insert(key as u64, idx as u64);

                let value = N::unpack_value(msg)?;
                nodes.push(value);

                let num_edges: i32 = msg.scalar()?;
                if num_edges < 0 {
                    return Err(DeepWireError::LengthMismatch {
                        expected: 0,
                        found: num_edges as i64,
                    }
                    .into());
                }
                let mut edges = Vec::with_capacity(num_edges as usize);
                for _ in 0..num_edges {
                    edges.push(Self::unpack_node(msg, nodes)?);
                }
                nodes[idx as usize].set_edges(edges);

                Ok(NodeId(idx))
            }
            other => Err(DeepWireError::LengthMismatch {
                expected: 2,
                found: other as i64,
            }
            .into()),
        }
    }
}
