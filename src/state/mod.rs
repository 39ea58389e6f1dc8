//! # Reconstruction States
//!
//! A state is a [`CorrelatedValues`](crate::CorrelatedValues) laid out by a
//! [`Schema`]: an ordered list of named blocks (position, direction, energy
//! deposit, ...). Each block owns a contiguous range of parameters, starting
//! at an offset that is the sum of the sizes of the blocks declared before
//! it.
//!
//! The concrete state types ([`TrackState`], [`ShowerState`], ...) fix their
//! layout at compile time and expose named accessors through the block
//! traits:
//!
//! ```
//! use nalgebra::Vector4;
//! use recon_state::state::{EDepositBlock, PositionBlock, TrackState};
//!
//! let mut track = TrackState::new();
//! track.set_edeposit(3.5);
//! track.set_position(&Vector4::new(1.0, 2.0, 3.0, 0.0));
//!
//! assert_eq!(track.value(0).unwrap(), 3.5);
//! assert_eq!(track.value(TrackState::POSITION_INDEX + 2).unwrap(), 3.0);
//! ```
//!
//! Layouts that are only known at run time use [`ReconState`] directly with a
//! schema from [`Schema::builder`].

mod accessors;
mod block;
mod kinds;
mod recon_state;
mod schema;

pub use accessors::{
    ChargeBlock, ConeBlock, CurvatureBlock, DirectionBlock, EDepositBlock, HasReconState, MomentumBlock,
    PositionBlock, PositionDirectionBlock, PositionDirectionCurvatureBlock, StateLayout, WidthBlock,
};
pub use block::{BlockKind, Bundle, Capabilities};
pub use kinds::{ClusterState, PidState, ShowerState, TrackState, VertexState};
pub use recon_state::ReconState;
pub use schema::{layout_bundle_offset, layout_dimension, layout_offset, BlockSlot, Schema, SchemaBuilder};
