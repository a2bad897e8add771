// API Integration Tests
//
// Purpose: Exercise every endpoint through the router without binding a socket
// Run with: cargo test --features api --test api_integration_tests

#[cfg(feature = "api")]
mod api_tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use flood_risk_rust::{create_router, AppState, FloodPredictor};
    use serde_json::{json, Value};
    use tower::ServiceExt; // for oneshot

    // Helper: Router over the default (cutoff formula) predictor
    fn create_test_app() -> axum::Router {
        create_router(AppState::from_predictor(FloodPredictor::default()))
    }

    // Helper: Parse JSON response
    async fn json_response(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        serde_json::from_slice(&body).expect("Failed to parse JSON")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn sample_body() -> Value {
        json!({
            "rainfall_mm": 215.0,
            "humidity_pct": 82.0,
            "temperature_c": 29.0,
            "soil_moisture_pct": 55.0
        })
    }

    // =========================================================================
    // Section 1: Health Check
    // =========================================================================

    #[tokio::test]
    async fn test_health_check() {
        let response = create_test_app().oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["scorer"], "formula-cutoff");
        assert!(body["timestamp"].is_string());
    }

    // =========================================================================
    // Section 2: Prediction
    // =========================================================================

    #[tokio::test]
    async fn test_predict_sample() {
        let response = create_test_app()
            .oneshot(post_json("/api/predict", sample_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["risk_percent"], 60.29);
        assert_eq!(body["tier"]["low"], 60.0);
        assert_eq!(body["tier"]["high"], 70.0);
        assert_eq!(body["factors"]["ceiling_applied"], false);
        assert!(body["features"].is_object());
    }

    #[tokio::test]
    async fn test_predict_below_cutoff() {
        let response = create_test_app()
            .oneshot(post_json(
                "/api/predict",
                json!({
                    "rainfall_mm": 20.0,
                    "humidity_pct": 95.0,
                    "temperature_c": 30.0,
                    "soil_moisture_pct": 90.0
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["risk_percent"], 0.0);
        assert_eq!(body["factors"]["rainfall_cutoff"], true);
        assert_eq!(body["tier"]["low"], 0.0);
    }

    #[tokio::test]
    async fn test_predict_missing_field_rejected() {
        let response = create_test_app()
            .oneshot(post_json("/api/predict", json!({ "rainfall_mm": 215.0 })))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_predict_batch_preserves_order() {
        let response = create_test_app()
            .oneshot(post_json(
                "/api/predict/batch",
                json!({
                    "readings": [
                        sample_body(),
                        { "rainfall_mm": 10.0, "humidity_pct": 50.0, "temperature_c": 25.0, "soil_moisture_pct": 30.0 },
                        { "rainfall_mm": 600.0, "humidity_pct": 100.0, "temperature_c": 45.0, "soil_moisture_pct": 0.0 }
                    ]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["rows"], 3);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data[0]["risk_percent"], 60.29);
        assert_eq!(data[1]["risk_percent"], 0.0);
        assert!(data[2]["risk_percent"].as_f64().unwrap() > 60.29);
    }

    // =========================================================================
    // Section 3: Feature mapping
    // =========================================================================

    #[tokio::test]
    async fn test_mapped_features_ordered() {
        let response = create_test_app()
            .oneshot(post_json("/api/features", sample_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["rows"], 10);
        let data = body["data"].as_array().unwrap();
        for feature in data {
            let value = feature["value"].as_f64().unwrap();
            let max = feature["max"].as_f64().unwrap();
            assert!(value >= 0.0 && value <= max, "{}", feature);
        }
        assert_eq!(data[0]["max"], 16.0);
    }

    // =========================================================================
    // Section 4: Safety guide
    // =========================================================================

    #[tokio::test]
    async fn test_guidance_table() {
        let response = create_test_app().oneshot(get("/api/guidance")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["rows"], 10);
        assert_eq!(body["data"][0]["low"], 0.0);
        assert_eq!(body["data"][9]["high"], 100.0);
    }

    #[tokio::test]
    async fn test_guidance_lookup() {
        let response = create_test_app()
            .oneshot(get("/api/guidance/lookup?risk=45"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["tier"]["low"], 40.0);
        assert_eq!(body["tier"]["high"], 50.0);
    }

    #[tokio::test]
    async fn test_guidance_lookup_boundary_is_lower_tier() {
        let response = create_test_app()
            .oneshot(get("/api/guidance/lookup?risk=50"))
            .await
            .unwrap();

        let body = json_response(response).await;
        assert_eq!(body["tier"]["high"], 50.0);
    }

    #[tokio::test]
    async fn test_guidance_lookup_out_of_range() {
        let response = create_test_app()
            .oneshot(get("/api/guidance/lookup?risk=150"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = json_response(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_guidance_lookup_bad_query() {
        let response = create_test_app()
            .oneshot(get("/api/guidance/lookup?risk=abc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
