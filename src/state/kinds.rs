//! The concrete state types.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::accessors::sealed::StateStorage;
use super::accessors::*;
use super::block::{BlockKind, Bundle};
use super::recon_state::ReconState;
use crate::error::{ReconError, Result};
use crate::projection::project_with_bundles;
use crate::values::ParameterStatus;

macro_rules! state_kind {
    ($(#[$doc:meta])* $name:ident, $label:literal, [$($kind:ident),+ $(,)?]) => {
        $(#[$doc])*
        ///
        /// Loading checks that the stored layout is this one.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(try_from = "ReconState", into = "ReconState")]
        pub struct $name(ReconState);

        impl $name {
            /// Create a state with every parameter free.
            pub fn new() -> Self {
                Self(ReconState::new(<Self as StateLayout>::schema()))
            }

            /// Unwrap the runtime state.
            pub fn into_inner(self) -> ReconState {
                self.0
            }

            /// See [`ReconState::set_value`].
            pub fn set_value(&mut self, i: usize, value: f64) -> Result<()> {
                self.0.set_value(i, value)
            }

            /// See [`ReconState::set_covariance_value`].
            pub fn set_covariance_value(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
                self.0.set_covariance_value(i, j, value)
            }

            /// See [`ReconState::set_free`].
            pub fn set_free(&mut self, i: usize) -> Result<()> {
                self.0.set_free(i)
            }

            /// See [`ReconState::set_fixed`].
            pub fn set_fixed(&mut self, i: usize) -> Result<()> {
                self.0.set_fixed(i)
            }

            /// See [`ReconState::set_status`].
            pub fn set_status(&mut self, i: usize, status: ParameterStatus) -> Result<()> {
                self.0.set_status(i, status)
            }

            /// See [`ReconState::set_ndof`].
            pub fn set_ndof(&mut self, ndof: usize) {
                self.0.set_ndof(ndof)
            }

            /// See [`ReconState::validate`].
            pub fn validate(&mut self, fix: bool) -> bool {
                self.0.validate(fix)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl HasReconState for $name {
            fn recon_state(&self) -> &ReconState {
                &self.0
            }
        }

        impl StateStorage for $name {
            fn recon_state_mut(&mut self) -> &mut ReconState {
                &mut self.0
            }
        }

        impl StateLayout for $name {
            const NAME: &'static str = $label;
            const BLOCKS: &'static [BlockKind] = &[$(BlockKind::$kind),+];
        }

        impl Deref for $name {
            type Target = ReconState;

            fn deref(&self) -> &ReconState {
                &self.0
            }
        }

        impl From<$name> for ReconState {
            fn from(state: $name) -> ReconState {
                state.0
            }
        }

        impl TryFrom<ReconState> for $name {
            type Error = ReconError;

            fn try_from(state: ReconState) -> Result<Self> {
                let expected = <Self as StateLayout>::schema();
                if state.schema() != &expected {
                    tracing::debug!(expected = $label, found = %state.type_name(), "state layout mismatch");
                    return Err(ReconError::WrongStateType(format!(
                        "expected {} ({}), found ({})",
                        $label,
                        expected.type_name().trim_end(),
                        state.type_name().trim_end()
                    )));
                }
                Ok(Self(state))
            }
        }
    };
}

state_kind!(
    /// A cluster of hits: deposited energy and position.
    ClusterState, "Cluster", [EDeposit, Position]
);

state_kind!(
    /// An electromagnetic shower: a cluster with a direction and an opening
    /// angle.
    ShowerState, "Shower", [EDeposit, Position, Direction, Cone]
);

state_kind!(
    /// A track segment.
    TrackState, "Track", [EDeposit, Position, Direction, Curvature, Width]
);

state_kind!(
    /// A vertex: only a position.
    VertexState, "Vertex", [Position]
);

state_kind!(
    /// A particle identification hypothesis.
    PidState, "PID", [Position, Direction, Momentum, Charge]
);

impl EDepositBlock for ClusterState {}
impl PositionBlock for ClusterState {}

impl EDepositBlock for ShowerState {}
impl PositionBlock for ShowerState {}
impl DirectionBlock for ShowerState {}
impl ConeBlock for ShowerState {}
impl PositionDirectionBlock for ShowerState {}

impl EDepositBlock for TrackState {}
impl PositionBlock for TrackState {}
impl DirectionBlock for TrackState {}
impl CurvatureBlock for TrackState {}
impl WidthBlock for TrackState {}
impl PositionDirectionBlock for TrackState {}
impl PositionDirectionCurvatureBlock for TrackState {}

impl PositionBlock for VertexState {}

impl PositionBlock for PidState {}
impl DirectionBlock for PidState {}
impl MomentumBlock for PidState {}
impl ChargeBlock for PidState {}
impl PositionDirectionBlock for PidState {}

impl PidState {
    /// Start a particle hypothesis from a track.
    ///
    /// Position, direction and the covariance between them are copied. The
    /// momentum cannot be known without a field model and is left free; the
    /// charge is zero and free.
    pub fn from_track(track: &TrackState) -> Self {
        Self::from_position_direction(track)
    }

    /// Start a particle hypothesis from a shower.
    ///
    /// Like [`from_track`](Self::from_track), but the momentum is seeded with
    /// the deposited energy of the shower. It stays free.
    pub fn from_shower(shower: &ShowerState) -> Self {
        let mut pid = Self::from_position_direction(shower);
        pid.set_momentum(shower.edeposit());
        pid
    }

    fn from_position_direction(source: &ReconState) -> Self {
        let schema = <Self as StateLayout>::schema();
        let values = project_with_bundles(source, &schema, &[Bundle::PositionDirection]);
        Self(ReconState::from_parts(schema, values))
    }
}
