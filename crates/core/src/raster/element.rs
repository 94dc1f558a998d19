//! Pixel element trait for typed band storage

use ndarray::{Array2, ArrayView2};
use num_traits::{NumCast, Zero};
use std::fmt::Debug;

use super::{Band, Scale};

/// Trait for types that can be stored in a named band.
///
/// Every implementor corresponds to exactly one [`Scale`] and knows how to
/// wrap itself into the matching [`Band`] variant.
pub trait PixelElement:
    Copy + Debug + PartialOrd + NumCast + Zero + Send + Sync + 'static
{
    /// Scale descriptor backed by this type
    const SCALE: Scale;

    /// Cast from f64 with numpy `astype` semantics: truncate toward zero,
    /// saturate at the type bounds, NaN becomes zero.
    fn from_f64(value: f64) -> Self;

    /// Widen to f64
    fn to_float(self) -> f64 {
        NumCast::from(self).unwrap_or(f64::NAN)
    }

    /// Wrap a typed array into a [`Band`]
    fn into_band(data: Array2<Self>) -> Band;
}

macro_rules! impl_pixel_element {
    ($t:ty, $scale:expr, $variant:ident) => {
        impl PixelElement for $t {
            const SCALE: Scale = $scale;

            fn from_f64(value: f64) -> Self {
                // `as` from float saturates and maps NaN to 0
                value as $t
            }

            fn into_band(data: Array2<Self>) -> Band {
                Band::$variant(data)
            }
        }
    };
}

impl_pixel_element!(u8, Scale::Bits8, U8);
impl_pixel_element!(u16, Scale::Bits16, U16);
impl_pixel_element!(u32, Scale::Bits32, U32);
impl_pixel_element!(f64, Scale::Float, F64);

/// Cast a float band into the element type `T`.
pub fn cast_band<T: PixelElement>(values: ArrayView2<'_, f64>) -> Array2<T> {
    values.mapv(T::from_f64)
}
