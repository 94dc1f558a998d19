//! Native TIFF/GeoTIFF source (without GDAL)
//!
//! Uses the `tiff` crate. Interleaved samples of the first image become
//! bands; the ModelPixelScale/ModelTiepoint pair becomes a transform.
//! Projection keys are not interpreted here; enable the `gdal` feature for
//! full GeoTIFF support.

use ndarray::Array2;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tracing::debug;

use super::{band_out_of_range, RasterSource};
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Georeference};

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;

/// A decoded TIFF held in memory, one array per sample.
#[derive(Debug, Clone)]
pub struct TiffSource {
    bands: Vec<Array2<f64>>,
    georef: Georeference,
}

impl TiffSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "decoding tiff");
        Self::decode(BufReader::new(file))
    }

    /// Decode from an in-memory buffer
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::decode(Cursor::new(data))
    }

    fn decode<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut decoder = Decoder::new(reader).map_err(decode_err)?;
        let (width, height) = decoder.dimensions().map_err(decode_err)?;
        let (rows, cols) = (height as usize, width as usize);

        let samples: Vec<f64> = match decoder.read_image().map_err(decode_err)? {
            DecodingResult::U8(buf) => buf.into_iter().map(f64::from).collect(),
            DecodingResult::U16(buf) => buf.into_iter().map(f64::from).collect(),
            DecodingResult::U32(buf) => buf.into_iter().map(f64::from).collect(),
            DecodingResult::I8(buf) => buf.into_iter().map(f64::from).collect(),
            DecodingResult::I16(buf) => buf.into_iter().map(f64::from).collect(),
            DecodingResult::I32(buf) => buf.into_iter().map(f64::from).collect(),
            DecodingResult::F32(buf) => buf.into_iter().map(f64::from).collect(),
            DecodingResult::F64(buf) => buf,
            _ => return Err(Error::Decode("unsupported TIFF sample format".to_string())),
        };

        let pixels = rows * cols;
        if pixels == 0 || samples.len() % pixels != 0 {
            return Err(Error::Decode(format!(
                "{} samples do not tile a {}x{} image",
                samples.len(),
                cols,
                rows
            )));
        }
        let count = samples.len() / pixels;
        let bands = (0..count)
            .map(|b| {
                let values: Vec<f64> = samples.iter().skip(b).step_by(count).copied().collect();
                Array2::from_shape_vec((rows, cols), values).map_err(|e| Error::Other(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let georef = Georeference {
            transform: read_transform(&mut decoder),
            projection: None,
            metadata: read_description(&mut decoder),
        };

        Ok(Self { bands, georef })
    }
}

impl RasterSource for TiffSource {
    fn band_count(&self) -> usize {
        self.bands.len()
    }

    fn read_band(&self, id: usize) -> Result<Array2<f64>> {
        id.checked_sub(1)
            .and_then(|i| self.bands.get(i))
            .cloned()
            .ok_or_else(|| band_out_of_range(id, self.bands.len()))
    }

    fn georeference(&self) -> Georeference {
        self.georef.clone()
    }
}

fn decode_err(e: tiff::TiffError) -> Error {
    Error::Decode(e.to_string())
}

fn read_transform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(Tag::Unknown(MODEL_PIXEL_SCALE)).ok()?;
    let tiepoint = decoder.get_tag_f64_vec(Tag::Unknown(MODEL_TIEPOINT)).ok()?;
    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }
    // tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ]
    let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
    let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
    Some(GeoTransform::north_up(origin_x, origin_y, scale[0], -scale[1]))
}

fn read_description<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<BTreeMap<String, String>> {
    let description = decoder.get_tag_ascii_string(Tag::ImageDescription).ok()?;
    Some(BTreeMap::from([("description".to_string(), description)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::encoder::{colortype, TiffEncoder};

    fn encode_rgb(rows: u32, cols: u32, data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut encoder = TiffEncoder::new(Cursor::new(&mut buf)).unwrap();
            let mut image = encoder.new_image::<colortype::RGB8>(cols, rows).unwrap();
            image
                .encoder()
                .write_tag(Tag::Unknown(MODEL_PIXEL_SCALE), &[30.0f64, 30.0, 0.0][..])
                .unwrap();
            image
                .encoder()
                .write_tag(
                    Tag::Unknown(MODEL_TIEPOINT),
                    &[0.0f64, 0.0, 0.0, 500_000.0, 4_200_000.0, 0.0][..],
                )
                .unwrap();
            image.write_data(data).unwrap();
        }
        buf
    }

    #[test]
    fn test_samples_become_bands() {
        // 1x2 image: pixel (r,g,b) = (1,2,3) then (4,5,6)
        let bytes = encode_rgb(1, 2, &[1, 2, 3, 4, 5, 6]);
        let source = TiffSource::from_bytes(&bytes).unwrap();

        assert_eq!(source.band_count(), 3);
        assert_eq!(source.read_band(1).unwrap(), ndarray::array![[1.0, 4.0]]);
        assert_eq!(source.read_band(3).unwrap(), ndarray::array![[3.0, 6.0]]);
        assert!(source.read_band(4).unwrap_err().is_validation());
    }

    #[test]
    fn test_geotiff_tags_become_transform() {
        let bytes = encode_rgb(1, 1, &[0, 0, 0]);
        let source = TiffSource::from_bytes(&bytes).unwrap();
        let transform = source.georeference().transform.unwrap();
        assert_eq!(
            transform.coefficients(),
            [500_000.0, 30.0, 0.0, 4_200_000.0, 0.0, -30.0]
        );
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = TiffSource::from_bytes(b"not a tiff").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
