use crate::domain::model::{
    Breakpoints, PrecipitationTable, ScoreWeights, ScoringProfile, FOREST_BREAKPOINTS,
    RIVERS_BREAKPOINTS, WATER_BODIES_BREAKPOINTS,
};
use crate::utils::error::{FloodRiskError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = "flood-risk-geocoder";

/// 整個程式的設定；每個區段都可省略，預設值即為捷克的資料
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FloodRiskConfig {
    /// 國界外地址的提示訊息使用的國名
    pub country_name: String,
    pub data: DataConfig,
    pub geocoder: GeocoderConfig,
    pub regions: RegionsConfig,
    pub scoring: ScoringConfig,
    pub weights: ScoreWeights,
    pub precipitation: PrecipitationTable,
}

impl Default for FloodRiskConfig {
    fn default() -> Self {
        Self {
            country_name: "Czechia".to_string(),
            data: DataConfig::default(),
            geocoder: GeocoderConfig::default(),
            regions: RegionsConfig::default(),
            scoring: ScoringConfig::default(),
            weights: ScoreWeights::default(),
            precipitation: PrecipitationTable::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub elevation: PathBuf,
    pub rivers: PathBuf,
    pub water_bodies: PathBuf,
    pub border: PathBuf,
    pub forests: PathBuf,
    pub regions: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            elevation: PathBuf::from("czech_elevation.tif"),
            rivers: PathBuf::from("rivers.geojson"),
            water_bodies: PathBuf::from("water_bodies.geojson"),
            border: PathBuf::from("border.geojson"),
            forests: PathBuf::from("forests.geojson"),
            regions: PathBuf::from("regions.geojson"),
        }
    }
}

impl DataConfig {
    /// 相對路徑以 base_dir 為基準
    pub fn resolve(&self, base_dir: &Path) -> Self {
        let join = |path: &PathBuf| {
            if path.is_absolute() {
                path.clone()
            } else {
                base_dir.join(path)
            }
        };
        Self {
            elevation: join(&self.elevation),
            rivers: join(&self.rivers),
            water_bodies: join(&self.water_bodies),
            border: join(&self.border),
            forests: join(&self.forests),
            regions: join(&self.regions),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub country_codes: Option<String>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEOCODER_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 10,
            country_codes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRegion {
    pub label: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionsConfig {
    pub name_property: String,
    pub merged: Vec<MergedRegion>,
}

impl Default for RegionsConfig {
    fn default() -> Self {
        Self {
            name_property: "NAZ_CZNUTS3".to_string(),
            merged: vec![MergedRegion {
                label: "Praha a Středočeský kraj".to_string(),
                members: vec![
                    "Hlavní město Praha".to_string(),
                    "Středočeský kraj".to_string(),
                ],
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub rivers_breakpoints: Breakpoints,
    pub water_bodies_breakpoints: Breakpoints,
    pub forest_breakpoints: Breakpoints,
    pub forest_buffer_radius: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let profile = ScoringProfile::default();
        Self {
            rivers_breakpoints: profile.rivers_breakpoints,
            water_bodies_breakpoints: profile.water_bodies_breakpoints,
            forest_breakpoints: profile.forest_breakpoints,
            forest_buffer_radius: profile.forest_buffer_radius,
        }
    }
}

impl FloodRiskConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FloodRiskError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${NOMINATIM_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FloodRiskError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn scoring_profile(&self) -> ScoringProfile {
        ScoringProfile {
            rivers_breakpoints: self.scoring.rivers_breakpoints,
            water_bodies_breakpoints: self.scoring.water_bodies_breakpoints,
            forest_breakpoints: self.scoring.forest_breakpoints,
            forest_buffer_radius: self.scoring.forest_buffer_radius,
            weights: self.weights.clone(),
            precipitation: self.precipitation.clone(),
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("country_name", &self.country_name)?;
        validation::validate_url("geocoder.endpoint", &self.geocoder.endpoint)?;
        validation::validate_non_empty_string("geocoder.user_agent", &self.geocoder.user_agent)?;
        validation::validate_positive_number(
            "geocoder.timeout_seconds",
            self.geocoder.timeout_seconds as usize,
            1,
        )?;

        validation::validate_path("data.elevation", &self.data.elevation.to_string_lossy())?;
        validation::validate_file_extension("data.elevation", &self.data.elevation, &["tif", "tiff"])?;
        for (field, path) in [
            ("data.rivers", &self.data.rivers),
            ("data.water_bodies", &self.data.water_bodies),
            ("data.border", &self.data.border),
            ("data.forests", &self.data.forests),
            ("data.regions", &self.data.regions),
        ] {
            validation::validate_path(field, &path.to_string_lossy())?;
            validation::validate_file_extension(field, path, &["geojson", "json"])?;
        }

        validation::validate_non_empty_string("regions.name_property", &self.regions.name_property)?;
        for merged in &self.regions.merged {
            validation::validate_non_empty_string("regions.merged.label", &merged.label)?;
            if merged.members.is_empty() {
                return Err(FloodRiskError::InvalidConfigValueError {
                    field: "regions.merged.members".to_string(),
                    value: merged.label.clone(),
                    reason: "merged region needs at least one member".to_string(),
                });
            }
        }

        if !(self.scoring.forest_buffer_radius > 0.0 && self.scoring.forest_buffer_radius.is_finite()) {
            return Err(FloodRiskError::InvalidConfigValueError {
                field: "scoring.forest_buffer_radius".to_string(),
                value: self.scoring.forest_buffer_radius.to_string(),
                reason: "radius must be a positive number".to_string(),
            });
        }

        let weights = &self.weights;
        for (field, weight) in [
            ("weights.elevation", weights.elevation),
            ("weights.rivers", weights.rivers),
            ("weights.water_bodies", weights.water_bodies),
            ("weights.forest", weights.forest),
        ]
        .into_iter()
        .chain(weights.month_weights.iter().map(|w| ("weights.month_weights", *w)))
        {
            validation::validate_weight(field, weight)?;
        }

        if self.precipitation.is_empty() {
            return Err(FloodRiskError::MissingConfigError {
                field: "precipitation".to_string(),
            });
        }
        for (region, scores) in self.precipitation.iter() {
            for score in scores {
                validation::validate_range(&format!("precipitation.{}", region), *score, 1, 10)?;
            }
        }

        Ok(())
    }
}

impl Validate for FloodRiskConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
