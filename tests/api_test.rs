/// HTTP-level tests: the full router driven in-process with `oneshot`,
/// backed by an in-memory record source.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use earnings_macro::app::create_app;
use earnings_macro::models::{
    Company, CompanyRecordSet, GuidanceDirection, InsightRecord, OverallSentiment, Sector,
    SubCategory,
};
use earnings_macro::services::company_directory::CompanyDirectory;
use earnings_macro::state::AppState;
use earnings_macro::store::{CachedSource, InMemorySource, JsonDirSource};

fn record(quarter: &str, capex: f64, revenue: f64, partners: &[&str]) -> InsightRecord {
    InsightRecord {
        capex_growth: Some(capex),
        revenue: Some(revenue),
        guidance_direction: GuidanceDirection::Raised,
        ai_investment_mentioned: true,
        overall_sentiment: OverallSentiment::Bullish,
        partnerships: partners.iter().map(|p| p.to_string()).collect(),
        ..InsightRecord::new(quarter)
    }
}

fn test_app() -> Router {
    let source = InMemorySource::new(vec![
        CompanyRecordSet::new(
            Company::new("MSFT", "Microsoft", Sector::Technology, SubCategory::Hyperscaler),
            vec![
                record("Q4 2024", 50.0, 65000.0, &["OpenAI", "AMD"]),
                record("Q3 2024", 40.0, 61000.0, &[]),
            ],
        ),
        CompanyRecordSet::new(
            Company::new("GOOGL", "Alphabet", Sector::Technology, SubCategory::Hyperscaler),
            vec![record("Q4 2024", 30.0, 88000.0, &["Open AI", "SEC"])],
        ),
        CompanyRecordSet::new(
            Company::new("NVDA", "NVIDIA", Sector::Semiconductors, SubCategory::AiChips),
            vec![record("Q3 2024", 10.0, 35000.0, &["TSMC"])],
        ),
    ]);
    create_app(AppState::new(CompanyDirectory::builtin(), source))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_macro_defaults_to_latest_quarter() {
    let (status, body) = get_json(test_app(), "/api/macro").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"]["quarter"], "Q4 2024");
    assert_eq!(body["analysis"]["companies"], json!(["GOOGL", "MSFT"]));
    assert_eq!(body["available_quarters"], json!(["Q4 2024", "Q3 2024"]));
    assert!(body["generated_at"].is_string());

    let network = body["analysis"]["partnership_network"].as_array().unwrap();
    assert_eq!(network.len(), 1);
    assert_eq!(network[0]["partner"], "OpenAI");
    assert_eq!(network[0]["mentions"], 2);
}

#[tokio::test]
async fn test_macro_for_requested_quarter() {
    let (status, body) = get_json(test_app(), "/api/macro?quarter=Q3%202024").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"]["quarter"], "Q3 2024");
    assert_eq!(body["analysis"]["companies"], json!(["MSFT", "NVDA"]));
    assert_eq!(body["analysis"]["sector_breakdown"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_macro_for_unknown_quarter_is_empty() {
    let (status, body) = get_json(test_app(), "/api/macro?quarter=Q1%201999").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"]["companies"], json!([]));
    assert_eq!(body["analysis"]["aggregate"]["average_capex_growth"], 0.0);
    assert_eq!(body["analysis"]["aggregate"]["overall_sentiment"], "neutral");
    assert_eq!(body["analysis"]["top_themes"], json!([]));
}

#[tokio::test]
async fn test_quarters_listing() {
    let (status, body) = get_json(test_app(), "/api/macro/quarters").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Q4 2024", "Q3 2024"]));
}

#[tokio::test]
async fn test_company_listing() {
    let (status, body) = get_json(test_app(), "/api/companies").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body.as_array().unwrap().len(),
        CompanyDirectory::builtin().len()
    );
}

#[tokio::test]
async fn test_comparison() {
    let (status, body) = get_json(test_app(), "/api/companies/msft/comparison").await;

    assert_eq!(status, StatusCode::OK);
    let comparison = &body["comparison"];
    assert_eq!(comparison["company"]["ticker"], "MSFT");
    assert_eq!(comparison["quarter"], "Q4 2024");
    assert_eq!(comparison["in_sub_category"]["total"], 2);
    // GOOGL out-earns MSFT
    assert_eq!(comparison["in_sub_category"]["rank"], 2);
}

#[tokio::test]
async fn test_comparison_not_found() {
    let (status, _) = get_json(test_app(), "/api/companies/ZZZZ/comparison").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // tracked, but no Q4 record
    let (status, _) = get_json(test_app(), "/api/companies/NVDA/comparison?quarter=Q4%202024").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_normalize_endpoint() {
    let (status, body) =
        get_json(test_app(), "/api/partners/normalize?name=Microsoft%20Corporation").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"raw": "Microsoft Corporation", "canonical": "Microsoft"}));

    let (_, body) = get_json(test_app(), "/api/partners/normalize?name=FDA").await;
    assert_eq!(body["canonical"], Value::Null);

    let (status, _) = get_json(test_app(), "/api/partners/normalize").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_audit_endpoint() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/partners/audit")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"names": ["MSFT", "Microsoft Corp", "various partners", "TSMC"]}).to_string(),
        ))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["kept"], 3);
    assert_eq!(body["discarded"], 1);
    assert_eq!(body["canonical_names"], json!(["Microsoft", "TSMC"]));
    assert_eq!(body["results"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_missing_data_dir_serves_empty_analysis() {
    let source = CachedSource::new(JsonDirSource::new("/nonexistent/earnings-macro/insights"), 300);
    let app = create_app(AppState::new(CompanyDirectory::builtin(), source));

    let (status, body) = get_json(app.clone(), "/api/macro").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"]["quarter"], "Unknown");
    assert_eq!(body["analysis"]["companies"], json!([]));
    assert_eq!(body["available_quarters"], json!([]));

    let (status, body) = get_json(app.clone(), "/api/macro/quarters").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = get_json(app, "/api/companies/MSFT/comparison").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
