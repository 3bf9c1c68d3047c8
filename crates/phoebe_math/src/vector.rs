//! Checked vector operations.

use crate::{MathError, MathResult, Vec3};

/// Extra vector operations that glam does not provide in checked form.
pub trait VecExt: Sized {
    /// Unit vector in the same direction.
    ///
    /// Fails with [`MathError::DegenerateVector`] for zero-length or
    /// non-finite input instead of producing NaN components.
    fn unit(self) -> MathResult<Self>;

    /// True if every component is within `eps` of zero.
    fn near_zero(self, eps: f64) -> bool;
}

impl VecExt for Vec3 {
    fn unit(self) -> MathResult<Vec3> {
        self.try_normalize().ok_or(MathError::DegenerateVector)
    }

    #[inline]
    fn near_zero(self, eps: f64) -> bool {
        self.abs().max_element() < eps
    }
}
