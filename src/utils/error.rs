use thiserror::Error;

#[derive(Error, Debug)]
pub enum FloodRiskError {
    #[error("Geocoding request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Geocoder returned an unusable response: {message}")]
    GeocoderResponse { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJsonError(#[from] geojson::Error),

    #[error("Raster decoding error: {0}")]
    RasterError(#[from] tiff::TiffError),

    #[error("Dataset '{layer}' is invalid: {message}")]
    DatasetError { layer: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },

    #[error("Invalid breakpoints: {message}")]
    InvalidBreakpoints { message: String },

    #[error("Coordinates ({lon}, {lat}) fall outside the elevation raster")]
    ElevationOutOfBounds { lon: f64, lat: f64 },

    #[error("No elevation data at ({lon}, {lat})")]
    MissingElevation { lon: f64, lat: f64 },

    #[error("Coordinates ({lon}, {lat}) do not belong to any known region")]
    RegionNotFound { lon: f64, lat: f64 },

    #[error("No precipitation scores for region '{region}'")]
    UnknownPrecipitationRegion { region: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FloodRiskError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::GeocoderResponse { .. } => ErrorCategory::Network,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidBreakpoints { .. } => ErrorCategory::Configuration,
            Self::IoError(_)
            | Self::SerializationError(_)
            | Self::GeoJsonError(_)
            | Self::RasterError(_)
            | Self::DatasetError { .. } => ErrorCategory::Data,
            Self::ElevationOutOfBounds { .. }
            | Self::MissingElevation { .. }
            | Self::RegionNotFound { .. }
            | Self::UnknownPrecipitationRegion { .. } => ErrorCategory::Location,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Location => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::Critical,
        }
    }

    /// 與地點相關的錯誤只影響這一個地址，互動模式可以重新詢問
    pub fn is_recoverable(&self) -> bool {
        self.category() == ErrorCategory::Location
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(_) => "Check the network connection and the geocoder endpoint, then retry",
            Self::GeocoderResponse { .. } => "Verify that the geocoder endpoint speaks the Nominatim search API",
            Self::IoError(_) => "Make sure every dataset file exists and is readable",
            Self::SerializationError(_) | Self::GeoJsonError(_) => {
                "Check that the vector datasets are valid GeoJSON FeatureCollections"
            }
            Self::RasterError(_) => "Check that the elevation file is a single-band GeoTIFF",
            Self::DatasetError { .. } => "Re-export the dataset with the expected geometry and attributes",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file and run again",
            Self::InvalidBreakpoints { .. } => "Provide exactly 9 ascending, finite breakpoint values",
            Self::ElevationOutOfBounds { .. } | Self::MissingElevation { .. } => {
                "Try an address further inside the covered country"
            }
            Self::RegionNotFound { .. } => "Try a nearby address; the region layer does not cover this point",
            Self::UnknownPrecipitationRegion { .. } => {
                "Add the region to the [precipitation] table of the configuration"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) | Self::GeocoderResponse { .. } => {
                "Could not reach the geocoding service.".to_string()
            }
            Self::ElevationOutOfBounds { .. } | Self::MissingElevation { .. } => {
                "No elevation data is available for this address.".to_string()
            }
            Self::RegionNotFound { .. } => {
                "Address could not be matched to any region.".to_string()
            }
            Self::UnknownPrecipitationRegion { region } => {
                format!("No precipitation history is known for {}.", region)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FloodRiskError>;
