use crate::domain::model::Coordinates;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 把自由文字地址解析成座標；找不到時回傳 `Ok(None)`
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>>;
}
