use crate::core::scoring::deciles;
use crate::domain::model::{Breakpoints, Coordinates};
use crate::utils::error::{FloodRiskError, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

// GeoTIFF / GDAL 私有標籤
const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const MODEL_TRANSFORMATION: u16 = 34264;
const GDAL_NODATA: u16 = 42113;

/// Maps pixel indices to geographic coordinates:
/// `x = a*col + b*row + c`, `y = d*col + e*row + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineTransform {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }

    /// Geographic coordinates back to fractional `(col, row)`.
    /// `None` when the transform is degenerate.
    pub fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let det = self.a * self.e - self.b * self.d;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let dx = x - self.c;
        let dy = y - self.f;
        Some((
            (self.e * dx - self.b * dy) / det,
            (self.a * dy - self.d * dx) / det,
        ))
    }
}

/// Single-band elevation grid, loaded once and read-only afterwards.
/// Missing cells are stored as NaN.
#[derive(Debug, Clone)]
pub struct ElevationRaster {
    width: usize,
    height: usize,
    data: Vec<f64>,
    transform: AffineTransform,
    deciles: Breakpoints,
}

impl ElevationRaster {
    pub fn new(
        width: usize,
        height: usize,
        data: Vec<f64>,
        transform: AffineTransform,
    ) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width * height {
            return Err(FloodRiskError::DatasetError {
                layer: "elevation".to_string(),
                message: format!(
                    "grid of {}x{} cannot hold {} samples",
                    width,
                    height,
                    data.len()
                ),
            });
        }
        if transform.invert(0.0, 0.0).is_none() {
            return Err(FloodRiskError::DatasetError {
                layer: "elevation".to_string(),
                message: "affine transform is not invertible".to_string(),
            });
        }

        let cuts = deciles(&data).ok_or_else(|| FloodRiskError::DatasetError {
            layer: "elevation".to_string(),
            message: "raster has no valid elevation samples".to_string(),
        })?;
        let deciles = Breakpoints::new(cuts)?;

        Ok(Self {
            width,
            height,
            data,
            transform,
            deciles,
        })
    }

    /// 從單一波段 GeoTIFF 載入
    pub fn from_geotiff<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("🗺️ Loading elevation raster from {}", path.display());

        let mut decoder = Decoder::new(BufReader::new(File::open(path)?))?;
        let (width, height) = decoder.dimensions()?;
        let (width, height) = (width as usize, height as usize);

        let transform = read_transform(&mut decoder)?;
        let nodata = match decoder.find_tag(Tag::from_u16_exhaustive(GDAL_NODATA))? {
            Some(value) => value.into_string()?.trim_end_matches('\0').trim().parse::<f64>().ok(),
            None => None,
        };

        let samples: Vec<f64> = match decoder.read_image()? {
            DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::F64(v) => v,
            _ => {
                return Err(FloodRiskError::DatasetError {
                    layer: "elevation".to_string(),
                    message: "unsupported sample format".to_string(),
                })
            }
        };

        // 多波段時只取第一個波段
        let stride = (samples.len() / (width * height).max(1)).max(1);
        let data: Vec<f64> = samples
            .into_iter()
            .step_by(stride)
            .map(|v| match nodata {
                Some(nodata) if v == nodata => f64::NAN,
                _ => v,
            })
            .collect();

        tracing::debug!(
            "Elevation raster {}x{} (nodata: {:?}, transform: {:?})",
            width,
            height,
            nodata,
            transform
        );
        Self::new(width, height, data, transform)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }

    /// 10th-90th percentile cut points over every non-missing cell.
    pub fn deciles(&self) -> &Breakpoints {
        &self.deciles
    }

    /// Elevation of the cell nearest to the coordinates. Pixel indices are
    /// rounded half-to-even.
    pub fn sample(&self, coordinates: Coordinates) -> Result<f64> {
        let out_of_bounds = || FloodRiskError::ElevationOutOfBounds {
            lon: coordinates.longitude,
            lat: coordinates.latitude,
        };

        let (col, row) = self
            .transform
            .invert(coordinates.longitude, coordinates.latitude)
            .ok_or_else(out_of_bounds)?;
        let (col, row) = (col.round_ties_even(), row.round_ties_even());

        if !(col >= 0.0 && row >= 0.0 && col < self.width as f64 && row < self.height as f64) {
            return Err(out_of_bounds());
        }

        let value = self.data[row as usize * self.width + col as usize];
        if value.is_nan() {
            return Err(FloodRiskError::MissingElevation {
                lon: coordinates.longitude,
                lat: coordinates.latitude,
            });
        }
        Ok(value)
    }
}

pub fn get_elevation_from_coordinates(
    coordinates: Coordinates,
    raster: &ElevationRaster,
) -> Result<f64> {
    raster.sample(coordinates)
}

fn read_transform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<AffineTransform> {
    if let Some(matrix) = decoder.find_tag(Tag::from_u16_exhaustive(MODEL_TRANSFORMATION))? {
        let m = matrix.into_f64_vec()?;
        if m.len() >= 8 {
            return Ok(AffineTransform::new(m[0], m[1], m[3], m[4], m[5], m[7]));
        }
    }

    let scale = decoder.find_tag(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE))?;
    let tiepoint = decoder.find_tag(Tag::from_u16_exhaustive(MODEL_TIEPOINT))?;
    match (scale, tiepoint) {
        (Some(scale), Some(tiepoint)) => {
            let scale = scale.into_f64_vec()?;
            let tie = tiepoint.into_f64_vec()?;
            if scale.len() < 2 || tie.len() < 6 {
                return Err(FloodRiskError::DatasetError {
                    layer: "elevation".to_string(),
                    message: "malformed GeoTIFF georeferencing tags".to_string(),
                });
            }
            let (sx, sy) = (scale[0], scale[1]);
            let (i, j, x, y) = (tie[0], tie[1], tie[3], tie[4]);
            Ok(AffineTransform::new(sx, 0.0, x - i * sx, 0.0, -sy, y + j * sy))
        }
        _ => Err(FloodRiskError::DatasetError {
            layer: "elevation".to_string(),
            message: "GeoTIFF has no georeferencing tags".to_string(),
        }),
    }
}
