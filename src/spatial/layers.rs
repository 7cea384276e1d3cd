use crate::utils::error::{FloodRiskError, Result};
use geo::{Geometry, MultiPolygon, Polygon};
use geojson::{Feature, FeatureCollection, GeoJson};
use std::collections::HashMap;
use std::path::Path;

/// 讀取 GeoJSON FeatureCollection
fn read_features(layer: &str, path: &Path) -> Result<Vec<Feature>> {
    tracing::info!("📂 Loading {} layer from {}", layer, path.display());
    let text = std::fs::read_to_string(path)?;
    parse_features(&text)
}

fn parse_features(text: &str) -> Result<Vec<Feature>> {
    let geojson: GeoJson = text.parse()?;
    let collection = FeatureCollection::try_from(geojson)?;
    Ok(collection.features)
}

fn feature_geometry(feature: Feature) -> Result<Option<Geometry<f64>>> {
    match feature.geometry {
        Some(geometry) => Ok(Some(Geometry::<f64>::try_from(geometry)?)),
        None => Ok(None),
    }
}

/// Flattens every polygonal part of a geometry.
pub(crate) fn polygons_of(geometry: &Geometry<f64>) -> Vec<Polygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => vec![polygon.clone()],
        Geometry::MultiPolygon(multi) => multi.0.clone(),
        Geometry::GeometryCollection(collection) => {
            collection.0.iter().flat_map(polygons_of).collect()
        }
        _ => Vec::new(),
    }
}

/// A reference dataset of arbitrary geometries (rivers, water bodies, forests).
#[derive(Debug, Clone)]
pub struct FeatureLayer {
    name: String,
    geometries: Vec<Geometry<f64>>,
}

impl FeatureLayer {
    pub fn new(name: impl Into<String>, geometries: Vec<Geometry<f64>>) -> Self {
        Self {
            name: name.into(),
            geometries,
        }
    }

    pub fn from_geojson<P: AsRef<Path>>(name: &str, path: P) -> Result<Self> {
        let features = read_features(name, path.as_ref())?;
        Self::from_features(name, features)
    }

    pub fn from_geojson_str(name: &str, text: &str) -> Result<Self> {
        Self::from_features(name, parse_features(text)?)
    }

    fn from_features(name: &str, features: Vec<Feature>) -> Result<Self> {
        let total = features.len();
        let geometries: Vec<Geometry<f64>> = features
            .into_iter()
            .map(feature_geometry)
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        if geometries.len() < total {
            tracing::warn!(
                "⚠️ {} layer: skipped {} features without geometry",
                name,
                total - geometries.len()
            );
        }
        tracing::debug!("{} layer holds {} geometries", name, geometries.len());
        Ok(Self::new(name, geometries))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometries(&self) -> &[Geometry<f64>] {
        &self.geometries
    }

    pub fn polygons(&self) -> impl Iterator<Item = Polygon<f64>> + '_ {
        self.geometries.iter().flat_map(polygons_of)
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }
}

#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    pub area: MultiPolygon<f64>,
}

/// Administrative regions in dataset order, with optional merged labels
/// (several member regions reported under one composite label).
#[derive(Debug, Clone, Default)]
pub struct RegionLayer {
    regions: Vec<Region>,
    merged: HashMap<String, String>,
}

impl RegionLayer {
    pub fn new(regions: Vec<Region>) -> Self {
        Self {
            regions,
            merged: HashMap::new(),
        }
    }

    pub fn from_geojson<P: AsRef<Path>>(path: P, name_property: &str) -> Result<Self> {
        let features = read_features("regions", path.as_ref())?;
        Self::from_features(features, name_property)
    }

    pub fn from_geojson_str(text: &str, name_property: &str) -> Result<Self> {
        Self::from_features(parse_features(text)?, name_property)
    }

    fn from_features(features: Vec<Feature>, name_property: &str) -> Result<Self> {
        let mut regions = Vec::with_capacity(features.len());
        for (index, feature) in features.into_iter().enumerate() {
            let name = feature
                .property(name_property)
                .and_then(|value| value.as_str())
                .map(str::to_string)
                .ok_or_else(|| FloodRiskError::DatasetError {
                    layer: "regions".to_string(),
                    message: format!(
                        "feature #{} has no string property '{}'",
                        index, name_property
                    ),
                })?;

            let Some(geometry) = feature_geometry(feature)? else {
                tracing::warn!("⚠️ Region '{}' has no geometry, skipping", name);
                continue;
            };
            let polygons = polygons_of(&geometry);
            if polygons.is_empty() {
                tracing::warn!("⚠️ Region '{}' is not polygonal, skipping", name);
                continue;
            }
            regions.push(Region {
                name,
                area: MultiPolygon::new(polygons),
            });
        }
        tracing::debug!("Loaded {} regions", regions.len());
        Ok(Self::new(regions))
    }

    /// 把多個成員地區合併成同一個標籤
    pub fn with_merged<I, S>(mut self, label: &str, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for member in members {
            self.merged.insert(member.into(), label.to_string());
        }
        self
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// The label reported for a region name, after merging.
    pub fn label_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.merged.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Every distinct label this layer can produce.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .regions
            .iter()
            .map(|region| self.label_for(&region.name))
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}

/// 國界多邊形
#[derive(Debug, Clone)]
pub struct BorderLayer {
    area: MultiPolygon<f64>,
}

impl BorderLayer {
    pub fn new(area: MultiPolygon<f64>) -> Self {
        Self { area }
    }

    pub fn from_geojson<P: AsRef<Path>>(path: P) -> Result<Self> {
        let features = read_features("border", path.as_ref())?;
        Self::from_features(features)
    }

    pub fn from_geojson_str(text: &str) -> Result<Self> {
        Self::from_features(parse_features(text)?)
    }

    fn from_features(features: Vec<Feature>) -> Result<Self> {
        let mut polygons = Vec::new();
        for feature in features {
            if let Some(geometry) = feature_geometry(feature)? {
                polygons.extend(polygons_of(&geometry));
            }
        }
        if polygons.is_empty() {
            return Err(FloodRiskError::DatasetError {
                layer: "border".to_string(),
                message: "no polygon found".to_string(),
            });
        }
        Ok(Self::new(MultiPolygon::new(polygons)))
    }

    pub fn area(&self) -> &MultiPolygon<f64> {
        &self.area
    }
}
