mod common;

use anyhow::Result;
use flood_risk::config::toml_config::GeocoderConfig;
use flood_risk::core::risk::calculate_risk_score;
use flood_risk::domain::model::{Coordinates, ScoringProfile};
use flood_risk::{
    FloodRiskConfig, FloodRiskContext, FloodRiskEngine, FloodRiskError, InteractiveSession,
    Location, NominatimGeocoder,
};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn engine_for(server: &MockServer, data_dir: &TempDir) -> Result<FloodRiskEngine<NominatimGeocoder>> {
    let config = FloodRiskConfig::default();
    let context = FloodRiskContext::load(&config.data, &config.regions, data_dir.path())?;
    let geocoder = NominatimGeocoder::new(&GeocoderConfig {
        endpoint: server.url("/search"),
        ..GeocoderConfig::default()
    })?;
    Ok(FloodRiskEngine::new(geocoder, context, config.scoring_profile()))
}

async fn mock_address(server: &MockServer, address: &str, lon: &str, lat: &str) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search").query_param("q", address);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([{ "lat": lat, "lon": lon, "display_name": address }]));
        })
        .await;
}

#[tokio::test]
async fn test_end_to_end_assessment() -> Result<()> {
    let data_dir = TempDir::new()?;
    common::write_datasets(data_dir.path())?;
    let server = MockServer::start_async().await;
    mock_address(&server, "Náměstí 1, Mělník", "15.0", "50.5").await;

    let engine = engine_for(&server, &data_dir)?;
    let coordinates = match engine.locate("Náměstí 1, Mělník").await? {
        Location::Found(coordinates) => coordinates,
        other => panic!("expected a location inside the border, got {:?}", other),
    };
    assert_eq!(coordinates, Coordinates::new(15.0, 50.5));

    let assessment = engine.assess("Náměstí 1, Mělník", coordinates)?;
    assert_eq!(assessment.region, "Praha a Středočeský kraj");
    assert_eq!(assessment.measurements.elevation_m, 450.0);
    assert_eq!(assessment.measurements.river_distance_deg, 0.0);
    // 緊鄰河流 => 最高分
    assert_eq!(assessment.scores.rivers, 10);
    assert!((1..=10).contains(&assessment.scores.elevation));
    assert!((1..=10).contains(&assessment.scores.water_bodies));
    assert!((1..=10).contains(&assessment.scores.forest));

    let profile = ScoringProfile::default();
    let expected = calculate_risk_score(
        assessment.scores.elevation,
        assessment.scores.rivers,
        assessment.scores.water_bodies,
        assessment.scores.forest,
        profile.precipitation.scores_for("Praha a Středočeský kraj")?,
        &profile.weights,
    );
    assert_eq!(assessment.risk_score, expected);
    assert_eq!(
        assessment.summary(),
        format!("Flood risk score for Náměstí 1, Mělník is {}.", expected)
    );
    Ok(())
}

#[tokio::test]
async fn test_locate_outside_border_and_unknown() -> Result<()> {
    let data_dir = TempDir::new()?;
    common::write_datasets(data_dir.path())?;
    let server = MockServer::start_async().await;
    mock_address(&server, "Stephansplatz, Wien", "16.3725", "48.2084").await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search").query_param("q", "Atlantis");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([]));
        })
        .await;

    let engine = engine_for(&server, &data_dir)?;
    assert!(matches!(
        engine.locate("Stephansplatz, Wien").await?,
        Location::OutsideBorder(_)
    ));
    assert_eq!(engine.locate("Atlantis").await?, Location::NotFound);
    Ok(())
}

#[tokio::test]
async fn test_session_recovers_from_nodata_cell() -> Result<()> {
    let data_dir = TempDir::new()?;
    common::write_datasets(data_dir.path())?;
    let server = MockServer::start_async().await;
    mock_address(&server, "Třeboň", "15.5", "49.5").await;
    mock_address(&server, "Tábor", "14.75", "49.75").await;

    let engine = engine_for(&server, &data_dir)?;
    let session = InteractiveSession::new(&engine, "Czechia", false);
    let input: &[u8] = "Třeboň\nTábor\n".as_bytes();
    let mut output = Vec::new();

    let assessment = session
        .run(input, &mut output)
        .await?
        .expect("second address should be assessed");
    let text = String::from_utf8(output)?;

    assert_eq!(assessment.region, "Jihočeský kraj");
    assert!(text.contains("No elevation data is available for this address."));
    assert!(text.ends_with(&format!("{}\n", assessment.summary())));
    Ok(())
}

#[tokio::test]
async fn test_geocoder_outage_is_fatal() -> Result<()> {
    let data_dir = TempDir::new()?;
    common::write_datasets(data_dir.path())?;
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search");
            then.status(503);
        })
        .await;

    let engine = engine_for(&server, &data_dir)?;
    let session = InteractiveSession::new(&engine, "Czechia", false);
    let mut output = Vec::new();

    let err = session
        .assess_once("Pardubice", &mut output)
        .await
        .unwrap_err();
    assert!(matches!(err, FloodRiskError::GeocoderResponse { .. }));
    assert!(!err.is_recoverable());
    Ok(())
}

#[test]
fn test_missing_precipitation_region_is_flagged() -> Result<()> {
    let data_dir = TempDir::new()?;
    common::write_datasets(data_dir.path())?;
    let mut config = FloodRiskConfig::default();
    config.regions.merged.clear();

    let context = FloodRiskContext::load(&config.data, &config.regions, data_dir.path())?;
    let geocoder = NominatimGeocoder::new(&config.geocoder)?;
    let engine = FloodRiskEngine::new(geocoder, context, config.scoring_profile());

    // 沒有合併時，「Hlavní město Praha」在降雨表裡找不到
    assert_eq!(
        engine.regions_without_precipitation(),
        vec!["Hlavní město Praha".to_string()]
    );
    let err = engine
        .assess("Karlův most", Coordinates::new(15.0, 50.5))
        .unwrap_err();
    assert!(matches!(
        err,
        FloodRiskError::UnknownPrecipitationRegion { ref region } if region == "Hlavní město Praha"
    ));
    assert!(err.is_recoverable());
    Ok(())
}

#[test]
fn test_blocking_runtime_smoke() -> Result<()> {
    let data_dir = TempDir::new()?;
    common::write_datasets(data_dir.path())?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search").query_param("q", "Tábor");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([{ "lat": "49.75", "lon": "14.75" }]));
    });

    let engine = engine_for(&server, &data_dir)?;
    let location = tokio_test::block_on(engine.locate("Tábor"))?;
    assert_eq!(location, Location::Found(Coordinates::new(14.75, 49.75)));
    Ok(())
}
