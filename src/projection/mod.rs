//! # Projection
//!
//! Materialize the data of one state in the layout of another schema.
//!
//! Every block of the target schema that the source state exposes is copied
//! together with its within-block covariance. Blocks the source cannot
//! supply stay free. This is how a track can be read as a particle
//! hypothesis, or a vertex as a track:
//!
//! ```
//! use recon_state::projection::project;
//! use recon_state::state::{StateLayout, TrackState, VertexState};
//!
//! let vertex = VertexState::new();
//! let as_track = project(&vertex, &TrackState::schema());
//! assert_eq!(as_track.dimensions(), 10);
//! assert!(as_track.is_free(0).unwrap());
//! ```
//!
//! The generic projection drops the covariance between different blocks.
//! [`project_with_bundles`] restores it for bundles (such as position and
//! direction) that both layouts hold contiguously.

use crate::state::{Bundle, ReconState, Schema};
use crate::values::CorrelatedValues;

/// Project a state onto a schema, block by block.
pub fn project(source: &ReconState, target: &Schema) -> CorrelatedValues {
    let mut result = CorrelatedValues::new(target.dimension());
    result.set_type(&target.type_name());
    for slot in target.slots() {
        match source.block_offset(slot.kind) {
            Some(from) => result.copy_block_from(source.values(), from, slot.offset, slot.kind.size()),
            None => tracing::trace!(block = slot.kind.name(), "block not provided by the source, left free"),
        }
    }
    result
}

/// Project a state onto a schema, then copy the full covariance of each
/// listed bundle that both the source and the target expose.
pub fn project_with_bundles(source: &ReconState, target: &Schema, bundles: &[Bundle]) -> CorrelatedValues {
    let mut result = project(source, target);
    let target_capabilities = target.capabilities();
    for &bundle in bundles {
        let offsets = if target_capabilities.supports_bundle(bundle) {
            source.bundle_offset(bundle).zip(target.bundle_offset(bundle))
        } else {
            None
        };
        match offsets {
            Some((from, to)) => result.copy_block_from(source.values(), from, to, bundle.size()),
            None => tracing::trace!(?bundle, "bundle not shared by source and target"),
        }
    }
    result
}
