use std::fmt::Debug;

use ::num::{NumCast, ToPrimitive};

/// T values are float numbers usable as alignment scores
pub trait Float: ::num::Float + Debug + Default + Send + Sync {}

impl<T: ::num::Float + Debug + Default + Send + Sync> Float for T {}

/// Convert a primitive number into a float type.
///
/// Conversion between primitive numbers and floats can only round, it never fails for finite
/// inputs. Non-representable values become NaN and are caught by the callers' finiteness checks.
#[inline(always)]
pub fn cast<F: Float, T: ToPrimitive>(value: T) -> F {
    <F as NumCast>::from(value).unwrap_or_else(F::nan)
}
