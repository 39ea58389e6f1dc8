//! # recon-state
//!
//! `recon-state` is the numeric core of a particle-track reconstruction data
//! model: fitted parameters together with their uncertainties and
//! correlations, and states composed out of reusable named blocks.
//!
//! The library provides:
//! - [`CorrelatedValues`], a parameter vector with its covariance, free/fixed
//!   parameter encoding, a cached Hessian and simple error propagation
//! - Block-composed states ([`TrackState`], [`ShowerState`], [`ClusterState`],
//!   [`VertexState`], [`PidState`]) with named accessors
//! - A projection engine that reads one state in another state's layout
//! - Trajectory nodes collected in type-checked ledgers
//!
//! ## Basic Usage
//!
//! ```
//! use nalgebra::Vector4;
//! use recon_state::{project, PidState, PositionBlock, StateLayout, TrackState};
//!
//! let mut track = TrackState::new();
//! track.set_position(&Vector4::new(10.0, 0.0, 25.0, 0.0));
//! track.set_position_variance(&Vector4::new(0.5, 0.5, 0.5, 1.0));
//!
//! let hypothesis = project(&track, &PidState::schema());
//! assert_eq!(hypothesis.value(2).unwrap(), 25.0);
//! assert!(hypothesis.is_free(PidState::DIMENSION - 1).unwrap());
//! ```
//!
//! Diagnostics are emitted through [`tracing`]; install a subscriber to see
//! them.

pub mod config;
pub mod error;
pub mod node;
pub mod projection;
pub mod state;
pub mod values;

mod utils;

// Re-exports for convenience
pub use config::CovarianceConfig;
pub use error::{ReconError, Result};
pub use node::{NodeLedger, ReconNode};
pub use projection::{project, project_with_bundles};
pub use state::{
    BlockKind, Bundle, ChargeBlock, ClusterState, ConeBlock, CurvatureBlock, DirectionBlock, EDepositBlock,
    HasReconState, MomentumBlock, PidState, PositionBlock, PositionDirectionBlock,
    PositionDirectionCurvatureBlock, ReconState, Schema, ShowerState, StateLayout, TrackState, VertexState,
    WidthBlock,
};
pub use values::{CorrelatedValues, ParameterStatus, FIXED_THRESHOLD, FIXED_VALUE, FREE_THRESHOLD, FREE_VALUE};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
