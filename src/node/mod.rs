//! # Trajectory Nodes
//!
//! A [`ReconNode`] ties a state snapshot to the object it was fit against and
//! a quality score. A [`NodeLedger`] keeps the nodes of one object in order
//! and only accepts nodes whose state has the layout it was declared with.
//!
//! ```
//! use std::rc::Rc;
//! use recon_state::node::{NodeLedger, ReconNode};
//! use recon_state::state::TrackState;
//!
//! let mut ledger: NodeLedger<&str> = NodeLedger::for_layout::<TrackState>();
//! let state = Rc::new(TrackState::new().into_inner());
//! ledger.push(ReconNode::new(Some(state), Some(Rc::new("hit cluster")), 0.5)).unwrap();
//! assert_eq!(ledger.len(), 1);
//! ```

use std::rc::Rc;

use crate::error::{ReconError, Result};
use crate::state::{ReconState, Schema, StateLayout};

/// A state snapshot, the object it belongs to, and a fit quality.
///
/// The handles are reference counted so that a snapshot or an object can be
/// shared between several nodes.
#[derive(Debug)]
pub struct ReconNode<O> {
    state: Option<Rc<ReconState>>,
    object: Option<Rc<O>>,
    quality: f64,
}

impl<O> ReconNode<O> {
    /// Create a node from its parts.
    pub fn new(state: Option<Rc<ReconState>>, object: Option<Rc<O>>, quality: f64) -> Self {
        Self {
            state,
            object,
            quality,
        }
    }

    /// The state snapshot, if any.
    pub fn state(&self) -> Option<&Rc<ReconState>> {
        self.state.as_ref()
    }

    /// Replace the state snapshot.
    pub fn set_state(&mut self, state: Option<Rc<ReconState>>) {
        self.state = state;
    }

    /// The object the node was fit against, if any.
    pub fn object(&self) -> Option<&Rc<O>> {
        self.object.as_ref()
    }

    /// Replace the object.
    pub fn set_object(&mut self, object: Option<Rc<O>>) {
        self.object = object;
    }

    /// Goodness of fit for the node. Zero until set.
    pub fn quality(&self) -> f64 {
        self.quality
    }

    /// Set the goodness of fit.
    pub fn set_quality(&mut self, quality: f64) {
        self.quality = quality;
    }
}

impl<O> Default for ReconNode<O> {
    fn default() -> Self {
        Self::new(None, None, 0.0)
    }
}

impl<O> Clone for ReconNode<O> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            object: self.object.clone(),
            quality: self.quality,
        }
    }
}

/// An ordered, append-only list of nodes sharing one state layout.
#[derive(Debug)]
pub struct NodeLedger<O> {
    schema: Schema,
    nodes: Vec<ReconNode<O>>,
}

// Cloning shares the objects, so `O` need not be `Clone`.
impl<O> Clone for NodeLedger<O> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            nodes: self.nodes.clone(),
        }
    }
}

impl<O> NodeLedger<O> {
    /// Create an empty ledger for states laid out by `schema`.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            nodes: Vec::new(),
        }
    }

    /// Create an empty ledger for a typed state.
    pub fn for_layout<S: StateLayout>() -> Self {
        Self::new(S::schema())
    }

    /// The layout every node state must have.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Append a node.
    ///
    /// # Errors
    ///
    /// * `ReconError::MissingObject` if the node has no object
    /// * `ReconError::WrongStateType` if the node carries a state with a
    ///   different layout than the ledger
    pub fn push(&mut self, node: ReconNode<O>) -> Result<()> {
        if node.object().is_none() {
            tracing::debug!(position = self.nodes.len(), "node without an object");
            return Err(ReconError::MissingObject(format!(
                "node {} has no associated object",
                self.nodes.len()
            )));
        }
        if let Some(state) = node.state() {
            if state.schema() != &self.schema {
                tracing::debug!(
                    expected = %self.schema.type_name(),
                    found = %state.type_name(),
                    "node state has the wrong layout"
                );
                return Err(ReconError::WrongStateType(format!(
                    "expected ({}), found ({})",
                    self.schema.type_name().trim_end(),
                    state.type_name().trim_end()
                )));
            }
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Does the ledger hold no nodes?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node at `index`, in push order.
    pub fn get(&self, index: usize) -> Option<&ReconNode<O>> {
        self.nodes.get(index)
    }

    /// Iterate over the nodes in push order.
    pub fn iter(&self) -> std::slice::Iter<'_, ReconNode<O>> {
        self.nodes.iter()
    }
}

impl<'a, O> IntoIterator for &'a NodeLedger<O> {
    type Item = &'a ReconNode<O>;
    type IntoIter = std::slice::Iter<'a, ReconNode<O>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
