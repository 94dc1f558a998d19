//! Typed storage for one named layer

use ndarray::Array2;

use super::{PixelElement, Scale};

/// A single 2-D band held under a name inside a [`Raster`](super::Raster).
#[derive(Debug, Clone, PartialEq)]
pub enum Band {
    U8(Array2<u8>),
    U16(Array2<u16>),
    U32(Array2<u32>),
    F64(Array2<f64>),
}

impl Band {
    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Band::U8(a) => a.dim(),
            Band::U16(a) => a.dim(),
            Band::U32(a) => a.dim(),
            Band::F64(a) => a.dim(),
        }
    }

    /// Scale matching the storage type
    pub fn scale(&self) -> Scale {
        match self {
            Band::U8(_) => Scale::Bits8,
            Band::U16(_) => Scale::Bits16,
            Band::U32(_) => Scale::Bits32,
            Band::F64(_) => Scale::Float,
        }
    }

    /// Copy the band into a float array, ready for processing
    pub fn to_f64(&self) -> Array2<f64> {
        match self {
            Band::U8(a) => a.mapv(PixelElement::to_float),
            Band::U16(a) => a.mapv(PixelElement::to_float),
            Band::U32(a) => a.mapv(PixelElement::to_float),
            Band::F64(a) => a.clone(),
        }
    }

    pub fn as_u8(&self) -> Option<&Array2<u8>> {
        match self {
            Band::U8(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<&Array2<f64>> {
        match self {
            Band::F64(a) => Some(a),
            _ => None,
        }
    }
}

impl<T: PixelElement> From<Array2<T>> for Band {
    fn from(data: Array2<T>) -> Self {
        T::into_band(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_typed_array() {
        let band: Band = array![[1u16, 2], [3, 4]].into();
        assert_eq!(band.scale(), Scale::Bits16);
        assert_eq!(band.shape(), (2, 2));
        assert_eq!(band.to_f64(), array![[1.0, 2.0], [3.0, 4.0]]);
    }
}
