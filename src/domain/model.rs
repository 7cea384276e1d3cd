use crate::utils::error::FloodRiskError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BREAKPOINT_COUNT: usize = 9;
pub const MONTHS: usize = 12;

/// 一組 12 個月的降水分數 (1-10)
pub type MonthlyScores = [u8; MONTHS];

/// WGS84 經緯度，順序為 (longitude, latitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((longitude, latitude): (f64, f64)) -> Self {
        Self::new(longitude, latitude)
    }
}

/// 9 個遞增門檻，切出 10 個分數區間
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Breakpoints([f64; BREAKPOINT_COUNT]);

impl Breakpoints {
    pub fn new(values: [f64; BREAKPOINT_COUNT]) -> Result<Self, FloodRiskError> {
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(FloodRiskError::InvalidBreakpoints {
                message: format!("value {} is not finite", bad),
            });
        }
        // 森林門檻本身就有重複的 0，所以只要求非遞減
        if values.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(FloodRiskError::InvalidBreakpoints {
                message: format!("values must be ascending: {:?}", values),
            });
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64; BREAKPOINT_COUNT] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for Breakpoints {
    type Error = FloodRiskError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        let len = values.len();
        let array: [f64; BREAKPOINT_COUNT] =
            values
                .try_into()
                .map_err(|_| FloodRiskError::InvalidBreakpoints {
                    message: format!("expected {} values, got {}", BREAKPOINT_COUNT, len),
                })?;
        Self::new(array)
    }
}

impl From<Breakpoints> for Vec<f64> {
    fn from(breakpoints: Breakpoints) -> Self {
        breakpoints.0.to_vec()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub elevation: f64,
    pub rivers: f64,
    pub water_bodies: f64,
    pub forest: f64,
    pub month_weights: [f64; MONTHS],
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            elevation: 0.3,
            rivers: 0.3,
            water_bodies: 0.1,
            forest: 0.1,
            month_weights: [
                0.0125, 0.025, 0.025, 0.025, 0.0125, 0.025, 0.0125, 0.0125, 0.0125, 0.0125, 0.0125,
                0.0125,
            ],
        }
    }
}

/// 地區名稱 → 每月降水分數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrecipitationTable(BTreeMap<String, MonthlyScores>);

impl PrecipitationTable {
    pub fn new(entries: BTreeMap<String, MonthlyScores>) -> Self {
        Self(entries)
    }

    pub fn scores_for(&self, region: &str) -> Result<&MonthlyScores, FloodRiskError> {
        self.0
            .get(region)
            .ok_or_else(|| FloodRiskError::UnknownPrecipitationRegion {
                region: region.to_string(),
            })
    }

    pub fn contains(&self, region: &str) -> bool {
        self.0.contains_key(region)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MonthlyScores)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for PrecipitationTable {
    fn default() -> Self {
        let entries: [(&str, MonthlyScores); 13] = [
            ("Jihomoravský kraj", [1, 1, 1, 1, 1, 1, 5, 4, 6, 1, 1, 1]),
            ("Jihočeský kraj", [5, 2, 2, 5, 10, 10, 10, 9, 1, 2, 5, 2]),
            ("Karlovarský kraj", [10, 8, 9, 7, 3, 2, 4, 6, 8, 7, 9, 10]),
            ("Královéhradecký kraj", [9, 7, 8, 6, 5, 5, 3, 1, 2, 8, 10, 8]),
            ("Liberecký kraj", [10, 10, 10, 9, 5, 9, 9, 3, 5, 10, 10, 10]),
            ("Moravskoslezský kraj", [4, 9, 9, 10, 10, 10, 10, 10, 10, 10, 6, 7]),
            ("Olomoucký kraj", [2, 6, 6, 8, 4, 4, 7, 7, 9, 6, 3, 6]),
            ("Pardubický kraj", [3, 5, 7, 4, 7, 5, 5, 5, 7, 5, 4, 5]),
            ("Plzeňský kraj", [5, 5, 5, 5, 5, 7, 2, 8, 3, 3, 7, 5]),
            ("Praha a Středočeský kraj", [1, 1, 1, 2, 2, 8, 1, 1, 1, 1, 1, 1]),
            ("Kraj Vysočina", [6, 3, 4, 1, 8, 5, 6, 5, 5, 4, 5, 4]),
            ("Zlínský kraj", [8, 10, 5, 10, 9, 1, 8, 10, 10, 9, 8, 9]),
            ("Ústecký kraj", [7, 4, 3, 3, 1, 3, 1, 2, 4, 5, 2, 3]),
        ];
        Self(
            entries
                .into_iter()
                .map(|(name, scores)| (name.to_string(), scores))
                .collect(),
        )
    }
}

/// Everything the scoring functions need besides the datasets.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringProfile {
    pub rivers_breakpoints: Breakpoints,
    pub water_bodies_breakpoints: Breakpoints,
    pub forest_breakpoints: Breakpoints,
    pub forest_buffer_radius: f64,
    pub weights: ScoreWeights,
    pub precipitation: PrecipitationTable,
}

// 預先以全國資料算好的分位數
pub const RIVERS_BREAKPOINTS: [f64; BREAKPOINT_COUNT] = [
    0.00101484, 0.00205205, 0.00315813, 0.00433401, 0.00559006, 0.00698083, 0.00862364,
    0.01077285, 0.01405417,
];
pub const WATER_BODIES_BREAKPOINTS: [f64; BREAKPOINT_COUNT] = [
    0.01058209, 0.01950404, 0.02715884, 0.0355059, 0.04431191, 0.05452197, 0.06668492, 0.08311381,
    0.10878065,
];
pub const FOREST_BREAKPOINTS: [f64; BREAKPOINT_COUNT] = [
    0.0, 0.0, 5.18138845, 15.32095872, 26.25553836, 37.97792867, 52.57936547, 70.03155797,
    92.7178144,
];

impl Default for ScoringProfile {
    fn default() -> Self {
        Self {
            rivers_breakpoints: Breakpoints(RIVERS_BREAKPOINTS),
            water_bodies_breakpoints: Breakpoints(WATER_BODIES_BREAKPOINTS),
            forest_breakpoints: Breakpoints(FOREST_BREAKPOINTS),
            forest_buffer_radius: 0.01,
            weights: ScoreWeights::default(),
            precipitation: PrecipitationTable::default(),
        }
    }
}

/// 各因子的 1-10 分數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorScores {
    pub elevation: u8,
    pub rivers: u8,
    pub water_bodies: u8,
    pub forest: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub elevation_m: f64,
    pub river_distance_deg: f64,
    pub water_body_distance_deg: f64,
    pub forest_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub address: String,
    pub coordinates: Coordinates,
    pub region: String,
    pub measurements: Measurements,
    pub scores: FactorScores,
    pub precipitation_scores: MonthlyScores,
    pub risk_score: f64,
    pub assessed_at: DateTime<Utc>,
}

impl RiskAssessment {
    pub fn summary(&self) -> String {
        format!(
            "Flood risk score for {} is {}.",
            self.address, self.risk_score
        )
    }
}
