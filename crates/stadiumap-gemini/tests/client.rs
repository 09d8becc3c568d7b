//! Integration tests for `GeminiClient` using wiremock HTTP mocks.

use stadiumap_core::{Bounds, Coordinates, Stadium};
use stadiumap_discovery::{DiscoveryClient, DiscoveryError};
use stadiumap_gemini::{fallback_insight, GeminiClient, GeminiError, InsightCache, InsightClient};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn test_client(base_url: &str) -> GeminiClient {
    GeminiClient::with_base_url(Some("test-key"), 30, base_url)
        .expect("client construction should not fail")
        .with_retry(2, 0)
}

/// Wrap `answer` the way `generateContent` returns model text.
fn answer(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn madrid() -> Bounds {
    Bounds {
        north: 40.55,
        south: 40.30,
        east: -3.55,
        west: -3.85,
    }
}

fn bernabeu() -> Stadium {
    Stadium {
        id: "santiago-bernabeu".into(),
        name: "Santiago Bernabéu".into(),
        common_name: None,
        city: "Madrid".into(),
        country: "Spain".into(),
        capacity: 83_186,
        home_teams: vec!["Real Madrid".into()],
        coordinates: Coordinates::new(40.4531, -3.6883),
        image_url: None,
    }
}

#[tokio::test]
async fn area_scan_returns_validated_stadiums() {
    let server = MockServer::start().await;
    let stadiums = serde_json::json!([
        {
            "id": "metropolitano",
            "name": "Cívitas Metropolitano",
            "city": "Madrid",
            "country": "Spain",
            "capacity": 70460,
            "homeTeams": ["Atlético Madrid"],
            "coordinates": { "lat": 40.4362, "lng": -3.5995 },
            "imageUrl": "https://img.example/metropolitano.jpg"
        },
        {
            "id": "",
            "name": "Estadio de Vallecas",
            "city": "Madrid",
            "country": "Spain",
            "capacity": 14708.9,
            "coordinates": { "lat": 40.3918, "lng": -3.6588 }
        },
        {
            "id": "no-coords",
            "name": "Nowhere Park",
            "city": "Madrid",
            "country": "Spain",
            "capacity": 1000
        }
    ]);

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer(&stadiums.to_string())))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let found = client
        .stadiums_in_area(madrid())
        .await
        .expect("scan should succeed");

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id, "metropolitano");
    assert_eq!(
        found[0].image_url.as_deref(),
        Some("https://img.example/metropolitano.jpg")
    );
    assert_eq!(found[1].id, "estadio-de-vallecas");
    assert_eq!(found[1].capacity, 14_708);
    assert!(found[1].home_teams.is_empty());
    assert!(found[1]
        .image_url
        .as_deref()
        .is_some_and(|u| u.starts_with("https://picsum.photos/800/400?random=")));
}

#[tokio::test]
async fn area_scan_accepts_fenced_json() {
    let server = MockServer::start().await;
    let fenced = "```json\n[{\"id\":\"a\",\"name\":\"A\",\"city\":\"C\",\"country\":\"K\",\
                  \"capacity\":1,\"homeTeams\":[],\"coordinates\":{\"lat\":1.0,\"lng\":2.0}}]\n```";

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer(fenced)))
        .mount(&server)
        .await;

    let found = test_client(&server.uri())
        .stadiums_in_area(madrid())
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "a");
}

#[tokio::test]
async fn area_scan_caps_results() {
    let server = MockServer::start().await;
    let many: Vec<serde_json::Value> = (0..5)
        .map(|i| {
            serde_json::json!({
                "id": format!("s{i}"),
                "name": format!("S{i}"),
                "city": "C",
                "country": "K",
                "capacity": 1,
                "homeTeams": [],
                "coordinates": { "lat": f64::from(i), "lng": 0.0 }
            })
        })
        .collect();

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(answer(&serde_json::Value::from(many).to_string())),
        )
        .mount(&server)
        .await;

    let found = test_client(&server.uri())
        .with_scan_max_results(3)
        .stadiums_in_area(madrid())
        .await
        .unwrap();
    assert_eq!(found.len(), 3);
}

#[tokio::test]
async fn empty_answer_is_an_empty_scan() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let found = test_client(&server.uri())
        .stadiums_in_area(madrid())
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn malformed_answer_fails_the_scan() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer("not json at all")))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .stadiums_in_area(madrid())
        .await
        .unwrap_err();
    assert!(matches!(err, GeminiError::Deserialize { .. }));
}

#[tokio::test]
async fn server_errors_are_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer("[]")))
        .expect(1)
        .mount(&server)
        .await;

    let found = test_client(&server.uri())
        .stadiums_in_area(madrid())
        .await
        .expect("second attempt should succeed");
    assert!(found.is_empty());
}

#[tokio::test]
async fn api_error_message_is_surfaced_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .stadiums_in_area(madrid())
        .await
        .unwrap_err();
    match err {
        GeminiError::Status { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("API key not valid"));
            assert!(message.contains("INVALID_ARGUMENT"));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn discovery_seam_maps_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(0, 0);
    let err = client.scan_area(madrid()).await.unwrap_err();
    assert!(matches!(err, DiscoveryError::Source(_)));

    let keyless = GeminiClient::with_base_url(None, 30, &server.uri()).unwrap();
    let err = keyless.scan_area(madrid()).await.unwrap_err();
    assert!(matches!(err, DiscoveryError::NotConfigured(_)));
}

#[tokio::test]
async fn search_returns_single_stadium() {
    let server = MockServer::start().await;
    let record = serde_json::json!({
        "id": "la-bombonera",
        "name": "Estadio Alberto J. Armando",
        "commonName": "La Bombonera",
        "city": "Buenos Aires",
        "country": "Argentina",
        "capacity": 54000,
        "homeTeams": ["Boca Juniors"],
        "coordinates": { "lat": -34.6356, "lng": -58.3649 }
    });

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer(&record.to_string())))
        .mount(&server)
        .await;

    let found = test_client(&server.uri())
        .search_stadium("bombonera")
        .await
        .unwrap()
        .expect("should find a stadium");
    assert_eq!(found.id, "la-bombonera");
    assert_eq!(found.display_name(), "La Bombonera");
    assert!(found.image_url.is_some());
}

#[tokio::test]
async fn search_treats_null_and_incomplete_answers_as_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer("null")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(answer(r#"{"name": "", "city": "X"}"#)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.search_stadium("fake ground").await.unwrap().is_none());
    assert!(client.search_stadium("fake ground").await.unwrap().is_none());
}

#[tokio::test]
async fn blank_search_sends_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer("null")))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.search_stadium("   ").await.unwrap().is_none());
}

#[tokio::test]
async fn insight_is_parsed_from_answer() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "description": "Home of Real Madrid since 1947.",
        "funFact": "It has a retractable pitch."
    });

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer(&body.to_string())))
        .expect(1)
        .mount(&server)
        .await;

    let cache = InsightCache::new(test_client(&server.uri()));
    let first = cache.get_or_fetch(&bernabeu()).await;
    let second = cache.get_or_fetch(&bernabeu()).await;

    assert_eq!(first.description, "Home of Real Madrid since 1947.");
    assert_eq!(first.fun_fact, "It has a retractable pitch.");
    assert_eq!(first, second);
}

#[tokio::test]
async fn insight_failure_falls_back() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(matches!(
        client.request_insight(&bernabeu()).await,
        Err(GeminiError::EmptyResponse(_))
    ));
    assert_eq!(client.fetch_insight(&bernabeu()).await, fallback_insight());
}
