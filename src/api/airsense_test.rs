#[cfg(test)]
mod tests {
    use crate::api::{AirSenseClient, NearbyOptions};
    use crate::error::AppError;
    use crate::models::Coordinates;
    use crate::normalize::{ForecastSchema, LabelFormatter, Locale, NormalizeError};
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;
    use std::time::Duration;

    fn client_for(server: &ServerGuard) -> AirSenseClient {
        AirSenseClient::new(
            &server.url(),
            Duration::from_secs(5),
            LabelFormatter::utc(Locale::Fr),
        )
        .unwrap()
    }

    fn paris() -> Coordinates {
        Coordinates::new(48.8566, 2.3522).unwrap()
    }

    #[tokio::test]
    async fn test_get_forecast_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/forecast")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("latitude".into(), "48.8566".into()),
                Matcher::UrlEncoded("longitude".into(), "2.3522".into()),
                Matcher::UrlEncoded("hours".into(), "12".into()),
            ]))
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "forecast": [
                        {"timestamp": "2024-01-01T11:00:00Z", "aqi": 61.2, "confidence": 0.7},
                        {"timestamp": "2024-01-01T10:00:00Z", "aqi": 58, "confidence": 0.9}
                    ],
                    "forecast_timestamp": "2024-01-01T09:00:00Z"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let forecast = client_for(&server).get_forecast(paris(), 12).await.unwrap();

        mock.assert_async().await;
        assert_eq!(forecast.generated_at, "2024-01-01T09:00:00Z");
        let times: Vec<&str> = forecast.points.iter().map(|p| p.time.as_str()).collect();
        assert_eq!(times, vec!["10:00", "11:00"]);
        assert_eq!(forecast.points[1].aqi, 61);
    }

    #[tokio::test]
    async fn test_get_forecast_with_legacy_schema() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/forecast")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"predictions": [{"timestamp": "2024-01-01T10:00:00Z", "predicted_aqi": 33}]})
                    .to_string(),
            )
            .create_async()
            .await;

        let forecast = client_for(&server)
            .with_forecast_schema(ForecastSchema::legacy())
            .get_forecast(paris(), 24)
            .await
            .unwrap();
        assert_eq!(forecast.points[0].aqi, 33);
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/forecast")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let err = client_for(&server)
            .get_forecast(paris(), 24)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Status {
                endpoint: "forecast",
                status: 503
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/historical")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client_for(&server).get_history(paris()).await.unwrap_err();
        assert!(matches!(err, AppError::Decode { endpoint: "history", .. }));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Port 1 is reserved and refuses connections.
        let client = AirSenseClient::new(
            "http://127.0.0.1:1",
            Duration::from_secs(2),
            LabelFormatter::default(),
        )
        .unwrap();

        let err = client.get_history(paris()).await.unwrap_err();
        assert!(matches!(err, AppError::Unreachable { endpoint: "history", .. }));
    }

    #[tokio::test]
    async fn test_get_history_empty_is_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/historical")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("latitude".into(), "48.8566".into()),
                Matcher::UrlEncoded("longitude".into(), "2.3522".into()),
            ]))
            .with_status(200)
            .with_body(json!({"measurements": []}).to_string())
            .create_async()
            .await;

        let err = client_for(&server).get_history(paris()).await.unwrap_err();
        assert!(matches!(err, AppError::Normalize(NormalizeError::Empty(_))));
    }

    #[tokio::test]
    async fn test_get_nearby_stations_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/geolocation/nearby")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("radius_km".into(), "10".into()),
                Matcher::UrlEncoded("limit".into(), "5".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "search_center": {"latitude": 48.85, "longitude": 2.35},
                    "results": {
                        "total_found": 2,
                        "stations": [
                            {"id": "FR04143", "name": "Paris 13e", "latitude": 48.828, "longitude": 2.36},
                            {"name": "No id", "latitude": 48.9, "longitude": 2.3}
                        ]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let options = NearbyOptions {
            radius_km: 10.0,
            limit: 5,
        };
        let result = client_for(&server)
            .get_nearby_stations(paris(), options)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.stations.len(), 1);
        assert_eq!(result.total_found, 2);
        assert_eq!(result.parameters.radius_km, 10.0);
        assert_eq!(result.parameters.limit, 5);
    }

    #[tokio::test]
    async fn test_get_nearby_stations_empty_uses_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/geolocation/nearby")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"results": {"stations": []}}).to_string())
            .create_async()
            .await;

        let err = client_for(&server)
            .get_nearby_stations(paris(), NearbyOptions::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "No monitoring station found for this location."
        );
    }

    #[tokio::test]
    async fn test_get_location_snapshot() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/location/full")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"name": "Paris", "aqi": 42, "pm25": 11.5}).to_string())
            .create_async()
            .await;

        let snapshot = client_for(&server)
            .get_location_snapshot(paris())
            .await
            .unwrap();
        assert_eq!(snapshot.name, "Paris");
        assert_eq!(snapshot.aqi, Some(42));
        assert_eq!(snapshot.pm25, Some(11.5));
    }

    #[tokio::test]
    async fn test_invalid_arguments_rejected_before_request() {
        let client = AirSenseClient::new(
            "http://127.0.0.1:1",
            Duration::from_secs(1),
            LabelFormatter::default(),
        )
        .unwrap();

        let err = client.get_forecast(paris(), 0).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err = client
            .get_nearby_stations(
                paris(),
                NearbyOptions {
                    radius_km: -1.0,
                    limit: 5,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
