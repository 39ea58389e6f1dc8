//! Per-block accessors for typed states.
//!
//! Each block trait carries its offset as an associated constant computed
//! from the implementing layout, so the accessors index straight into the
//! shared values. Implementing a block trait for a layout that lacks the
//! block fails at compile time.

use nalgebra::{Vector3, Vector4};
use ndarray::Array2;

use super::block::{BlockKind, Bundle};
use super::recon_state::ReconState;
use super::schema::{layout_bundle_offset, layout_dimension, layout_offset, Schema};
use crate::error::{ReconError, Result};
use crate::projection;
use crate::values::CorrelatedValues;

use self::sealed::StateStorage as _;

/// Read access to the runtime state behind a typed state.
///
/// Writes go through the block accessors and the forwarding setters of the
/// typed states, which keep the layout fixed. Swapping in a state with
/// another layout does not compile:
///
/// ```compile_fail
/// use recon_state::state::{ShowerState, TrackState};
///
/// let mut track = TrackState::new();
/// *track = ShowerState::new().into_inner();
/// ```
///
/// ```compile_fail
/// use recon_state::state::{ShowerState, StateLayout, TrackState};
///
/// let mut track = TrackState::new();
/// *track.recon_state_mut() = ShowerState::new().into_inner();
/// ```
pub trait HasReconState {
    /// The runtime state.
    fn recon_state(&self) -> &ReconState;
}

pub(super) mod sealed {
    use super::ReconState;

    /// Mutable access, only implemented inside the crate.
    pub trait StateStorage {
        fn recon_state_mut(&mut self) -> &mut ReconState;
    }
}

/// A state type with a layout fixed at compile time.
pub trait StateLayout: HasReconState + sealed::StateStorage {
    /// Name of the state type.
    const NAME: &'static str;

    /// Blocks of the layout, in declared order.
    const BLOCKS: &'static [BlockKind];

    /// Total number of parameters.
    const DIMENSION: usize = layout_dimension(Self::BLOCKS);

    /// The layout as a runtime schema.
    fn schema() -> Schema {
        Schema::from_blocks(Self::BLOCKS)
    }

    /// Project any state into this layout.
    fn project(source: &ReconState) -> CorrelatedValues {
        projection::project(source, &Self::schema())
    }
}

fn read_local_covariance(state: &ReconState, offset: usize, size: usize, i: usize, j: usize) -> Result<f64> {
    if i >= size || j >= size {
        return Err(ReconError::cell(i, j, size));
    }
    Ok(state.values().get_covariance(offset + i, offset + j))
}

fn write_local_covariance(
    state: &mut ReconState,
    offset: usize,
    size: usize,
    (i, j): (usize, usize),
    value: f64,
) -> Result<()> {
    if i >= size || j >= size {
        return Err(ReconError::cell(i, j, size));
    }
    state.values_mut().put_covariance(offset + i, offset + j, value);
    Ok(())
}

fn write_covariance_block(state: &mut ReconState, offset: usize, size: usize, block: &Array2<f64>) -> Result<()> {
    if block.nrows() != size || block.ncols() != size {
        return Err(ReconError::dimensions(size, block.nrows().max(block.ncols())));
    }
    state.values_mut().put_covariance_block(offset, block);
    Ok(())
}

macro_rules! scalar_block {
    (
        $(#[$doc:meta])*
        $block:ident, $kind:ident, $index:ident,
        $get:ident, $set:ident, $get_variance:ident, $set_variance:ident
    ) => {
        $(#[$doc])*
        pub trait $block: StateLayout {
            /// Index of the parameter in the state.
            const $index: usize = layout_offset(Self::BLOCKS, BlockKind::$kind);

            /// The value.
            fn $get(&self) -> f64 {
                self.recon_state().values().get(Self::$index)
            }

            /// Set the value.
            fn $set(&mut self, value: f64) {
                self.recon_state_mut().values_mut().put(Self::$index, value)
            }

            /// The variance.
            fn $get_variance(&self) -> f64 {
                self.recon_state().values().get_covariance(Self::$index, Self::$index)
            }

            /// Set the variance. Sentinel variances mark the value free or fixed.
            fn $set_variance(&mut self, variance: f64) {
                self.recon_state_mut()
                    .values_mut()
                    .put_covariance(Self::$index, Self::$index, variance)
            }
        }
    };
}

scalar_block!(
    /// Energy deposited by the object.
    EDepositBlock, EDeposit, EDEPOSIT_INDEX,
    edeposit, set_edeposit, edeposit_variance, set_edeposit_variance
);

scalar_block!(
    /// Momentum magnitude of a particle hypothesis.
    MomentumBlock, Momentum, MOMENTUM_INDEX,
    momentum, set_momentum, momentum_variance, set_momentum_variance
);

scalar_block!(
    /// Charge of a particle hypothesis.
    ChargeBlock, Charge, CHARGE_INDEX,
    charge, set_charge, charge_variance, set_charge_variance
);

scalar_block!(
    /// Curvature of a track, signed by the bending direction.
    CurvatureBlock, Curvature, CURVATURE_INDEX,
    curvature, set_curvature, curvature_variance, set_curvature_variance
);

scalar_block!(
    /// Opening angle of a shower.
    ConeBlock, Cone, CONE_INDEX,
    cone, set_cone, cone_variance, set_cone_variance
);

scalar_block!(
    /// Transverse width of a track.
    WidthBlock, Width, WIDTH_INDEX,
    width, set_width, width_variance, set_width_variance
);

/// The four-position (x, y, z, t) of an object.
pub trait PositionBlock: StateLayout {
    const POSITION_INDEX: usize = layout_offset(Self::BLOCKS, BlockKind::Position);

    fn position(&self) -> Vector4<f64> {
        let values = self.recon_state().values();
        Vector4::from_fn(|i, _| values.get(Self::POSITION_INDEX + i))
    }

    fn set_position(&mut self, position: &Vector4<f64>) {
        let values = self.recon_state_mut().values_mut();
        for (i, &x) in position.iter().enumerate() {
            values.put(Self::POSITION_INDEX + i, x);
        }
    }

    /// The diagonal of the position covariance.
    fn position_variance(&self) -> Vector4<f64> {
        let values = self.recon_state().values();
        Vector4::from_fn(|i, _| values.get_covariance(Self::POSITION_INDEX + i, Self::POSITION_INDEX + i))
    }

    fn set_position_variance(&mut self, variance: &Vector4<f64>) {
        let values = self.recon_state_mut().values_mut();
        for (i, &v) in variance.iter().enumerate() {
            values.put_covariance(Self::POSITION_INDEX + i, Self::POSITION_INDEX + i, v);
        }
    }

    /// Covariance between two position components, indexed from zero.
    fn position_covariance(&self, i: usize, j: usize) -> Result<f64> {
        read_local_covariance(self.recon_state(), Self::POSITION_INDEX, 4, i, j)
    }

    fn set_position_covariance(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        write_local_covariance(self.recon_state_mut(), Self::POSITION_INDEX, 4, (i, j), value)
    }
}

/// The direction of an object. The direction is expected to be a unit
/// vector, but this is not enforced.
pub trait DirectionBlock: StateLayout {
    const DIRECTION_INDEX: usize = layout_offset(Self::BLOCKS, BlockKind::Direction);

    fn direction(&self) -> Vector3<f64> {
        let values = self.recon_state().values();
        Vector3::from_fn(|i, _| values.get(Self::DIRECTION_INDEX + i))
    }

    fn set_direction(&mut self, direction: &Vector3<f64>) {
        let values = self.recon_state_mut().values_mut();
        for (i, &x) in direction.iter().enumerate() {
            values.put(Self::DIRECTION_INDEX + i, x);
        }
    }

    fn direction_variance(&self) -> Vector3<f64> {
        let values = self.recon_state().values();
        Vector3::from_fn(|i, _| values.get_covariance(Self::DIRECTION_INDEX + i, Self::DIRECTION_INDEX + i))
    }

    fn set_direction_variance(&mut self, variance: &Vector3<f64>) {
        let values = self.recon_state_mut().values_mut();
        for (i, &v) in variance.iter().enumerate() {
            values.put_covariance(Self::DIRECTION_INDEX + i, Self::DIRECTION_INDEX + i, v);
        }
    }

    fn direction_covariance(&self, i: usize, j: usize) -> Result<f64> {
        read_local_covariance(self.recon_state(), Self::DIRECTION_INDEX, 3, i, j)
    }

    fn set_direction_covariance(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        write_local_covariance(self.recon_state_mut(), Self::DIRECTION_INDEX, 3, (i, j), value)
    }
}

/// Position and direction handled as one 7×7 block, including the cross
/// terms between them.
pub trait PositionDirectionBlock: PositionBlock + DirectionBlock {
    const POSITION_DIRECTION_INDEX: usize = layout_bundle_offset(Self::BLOCKS, Bundle::PositionDirection);

    fn position_direction_covariance(&self) -> Array2<f64> {
        self.recon_state()
            .values()
            .covariance_block(Self::POSITION_DIRECTION_INDEX, Bundle::PositionDirection.size())
    }

    /// # Errors
    ///
    /// * `ReconError::Range` if the matrix is not 7×7
    fn set_position_direction_covariance(&mut self, covariance: &Array2<f64>) -> Result<()> {
        write_covariance_block(
            self.recon_state_mut(),
            Self::POSITION_DIRECTION_INDEX,
            Bundle::PositionDirection.size(),
            covariance,
        )
    }
}

/// Position, direction and curvature handled as one 8×8 block.
pub trait PositionDirectionCurvatureBlock: PositionDirectionBlock + CurvatureBlock {
    const POS_DIR_CURV_INDEX: usize = layout_bundle_offset(Self::BLOCKS, Bundle::PositionDirectionCurvature);

    fn pos_dir_curv_covariance(&self) -> Array2<f64> {
        self.recon_state()
            .values()
            .covariance_block(Self::POS_DIR_CURV_INDEX, Bundle::PositionDirectionCurvature.size())
    }

    fn set_pos_dir_curv_covariance(&mut self, covariance: &Array2<f64>) -> Result<()> {
        write_covariance_block(
            self.recon_state_mut(),
            Self::POS_DIR_CURV_INDEX,
            Bundle::PositionDirectionCurvature.size(),
            covariance,
        )
    }
}
