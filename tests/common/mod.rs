#![allow(dead_code)]

use anyhow::Result;
use std::path::Path;
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

// 測試用的小型資料集：國界 14-16 x 49-51，兩個行政區以 50 度為界
pub const BORDER_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"NAZ_STAT": "Česko"},
     "geometry": {"type": "Polygon", "coordinates": [[[14.0, 49.0], [16.0, 49.0], [16.0, 51.0], [14.0, 51.0], [14.0, 49.0]]]}}
  ]
}"#;

pub const REGIONS_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"NAZ_CZNUTS3": "Hlavní město Praha"},
     "geometry": {"type": "Polygon", "coordinates": [[[14.0, 50.0], [16.0, 50.0], [16.0, 51.0], [14.0, 51.0], [14.0, 50.0]]]}},
    {"type": "Feature", "properties": {"NAZ_CZNUTS3": "Jihočeský kraj"},
     "geometry": {"type": "Polygon", "coordinates": [[[14.0, 49.0], [16.0, 49.0], [16.0, 50.0], [14.0, 50.0], [14.0, 49.0]]]}}
  ]
}"#;

pub const RIVERS_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"name": "Vltava"},
     "geometry": {"type": "LineString", "coordinates": [[15.0, 49.0], [15.0, 51.0]]}}
  ]
}"#;

pub const WATER_BODIES_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"name": "Lipno"},
     "geometry": {"type": "Polygon", "coordinates": [[[14.2, 49.2], [14.4, 49.2], [14.4, 49.4], [14.2, 49.4], [14.2, 49.2]]]}},
    {"type": "Feature", "properties": {"name": "empty"}, "geometry": null}
  ]
}"#;

pub const FORESTS_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {},
     "geometry": {"type": "Polygon", "coordinates": [[[15.0, 50.0], [16.0, 50.0], [16.0, 51.0], [15.0, 51.0], [15.0, 50.0]]]}}
  ]
}"#;

/// 4x4 的 Float32 GeoTIFF，每格 0.5 度，左上角 (14, 51)
pub fn write_elevation_tiff(path: &Path) -> Result<()> {
    let mut data: Vec<f32> = (0..16).map(|v| 150.0 + v as f32 * 50.0).collect();
    data[15] = -9999.0;

    let file = std::fs::File::create(path)?;
    let mut encoder = TiffEncoder::new(file)?;
    let mut image = encoder.new_image::<colortype::Gray32Float>(4, 4)?;
    image
        .encoder()
        .write_tag(Tag::Unknown(33550), &[0.5_f64, 0.5, 0.0][..])?;
    image
        .encoder()
        .write_tag(Tag::Unknown(33922), &[0.0_f64, 0.0, 0.0, 14.0, 51.0, 0.0][..])?;
    image.encoder().write_tag(Tag::Unknown(42113), "-9999")?;
    image.write_data(&data)?;
    Ok(())
}

/// 在目錄中寫入完整的一組資料集，檔名與預設設定相同
pub fn write_datasets(dir: &Path) -> Result<()> {
    write_elevation_tiff(&dir.join("czech_elevation.tif"))?;
    std::fs::write(dir.join("border.geojson"), BORDER_GEOJSON)?;
    std::fs::write(dir.join("regions.geojson"), REGIONS_GEOJSON)?;
    std::fs::write(dir.join("rivers.geojson"), RIVERS_GEOJSON)?;
    std::fs::write(dir.join("water_bodies.geojson"), WATER_BODIES_GEOJSON)?;
    std::fs::write(dir.join("forests.geojson"), FORESTS_GEOJSON)?;
    Ok(())
}
