//! Integration tests for `InventoryLoader` against published CSV exports.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made. Covers the happy path, every failure that must
//! turn into the fallback catalog, and TTL memoization.

use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vitrina_core::{
    default_catalog, ProductRecord, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BACKOFF_BASE_MS,
    PLACEHOLDER_IMAGE_URL,
};
use vitrina_loader::{
    CsvExportClient, GoogleSheetsConnector, InventoryLoader, LoadOutcome, LoaderError,
    LoaderOptions, SourceDescriptor,
};

const INVENTORY_CSV: &str = "id,nombre,precio,img\n1,A,12000,\n2,,5000,x\n";

/// 5-second timeout, descriptive UA, no retries.
fn test_client() -> CsvExportClient {
    CsvExportClient::new(5, "vitrina-test/0.1", 0, 0).expect("failed to build test client")
}

fn test_loader(options: LoaderOptions) -> InventoryLoader {
    let client = test_client();
    InventoryLoader::new(client.clone(), GoogleSheetsConnector::new(client), options)
}

fn csv_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/csv; charset=utf-8")
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn csv_export_rows_are_normalized_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/inventario.csv"))
        .respond_with(csv_response(INVENTORY_CSV))
        .mount(&server)
        .await;

    let loader = test_loader(LoaderOptions::default());
    let source = SourceDescriptor::CsvUrl(format!("{}/inventario.csv", server.uri()));
    let outcome = loader.load(&source).await;

    assert_eq!(
        outcome,
        LoadOutcome::Loaded(vec![ProductRecord::new(
            "1",
            "A",
            12000.0,
            PLACEHOLDER_IMAGE_URL
        )])
    );
}

#[tokio::test]
async fn aliased_headers_and_bom_are_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/export.csv"))
        .respond_with(csv_response(
            "\u{feff}Código,Producto,Price,Imagen\n001,Imán Souvenir,$12000,https://img/1.png\n",
        ))
        .mount(&server)
        .await;

    let loader = test_loader(LoaderOptions::default());
    let records = loader
        .load_records(&SourceDescriptor::CsvUrl(format!("{}/export.csv", server.uri())))
        .await;

    assert_eq!(
        records,
        vec![ProductRecord::new("001", "Imán Souvenir", 12000.0, "https://img/1.png")]
    );
}

#[tokio::test]
async fn colliding_name_headers_keep_first_non_blank_cell() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dup.csv"))
        .respond_with(csv_response("id,nombre,name,precio\n1,A,,5\n"))
        .mount(&server)
        .await;

    let loader = test_loader(LoaderOptions::default());
    let outcome = loader
        .load(&SourceDescriptor::CsvUrl(format!("{}/dup.csv", server.uri())))
        .await;

    assert_eq!(
        outcome,
        LoadOutcome::Loaded(vec![ProductRecord::new("1", "A", 5.0, PLACEHOLDER_IMAGE_URL)])
    );
}

#[tokio::test]
async fn google_sheet_is_read_through_gviz_export() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spreadsheets/d/SHEET42/gviz/tq"))
        .and(query_param("tqx", "out:csv"))
        .and(query_param("sheet", "Hoja1"))
        .respond_with(csv_response(INVENTORY_CSV))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client();
    let connector = GoogleSheetsConnector::with_base_url(client.clone(), &server.uri());
    let loader = InventoryLoader::new(client, connector, LoaderOptions::default());
    let source = SourceDescriptor::sheet(
        "https://docs.google.com/spreadsheets/d/SHEET42/edit#gid=0",
        Some("Hoja1"),
    );

    let outcome = loader.load(&source).await;
    assert!(!outcome.is_fallback(), "unexpected fallback: {outcome:?}");
    assert_eq!(outcome.records().len(), 1);
    assert_eq!(outcome.records()[0].name, "A");
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_serves_default_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let loader = test_loader(LoaderOptions::default());
    let outcome = loader
        .load(&SourceDescriptor::CsvUrl(format!("{}/gone.csv", server.uri())))
        .await;

    assert!(outcome.is_fallback());
    assert_eq!(outcome.records(), default_catalog().as_slice());
    assert!(
        outcome.fallback_reason().is_some_and(|r| r.contains("not found")),
        "reason: {:?}",
        outcome.fallback_reason()
    );
}

#[tokio::test]
async fn server_error_serves_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let loader = test_loader(LoaderOptions::default());
    let outcome = loader
        .load(&SourceDescriptor::CsvUrl(format!("{}/boom.csv", server.uri())))
        .await;

    assert!(outcome.is_fallback());
    assert_eq!(outcome.records().len(), default_catalog().len());
}

#[tokio::test]
async fn html_page_instead_of_csv_serves_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<html><body>Sign in</body></html>".to_vec(), "text/html"),
        )
        .mount(&server)
        .await;

    let loader = test_loader(LoaderOptions::default());
    let outcome = loader
        .load(&SourceDescriptor::CsvUrl(format!("{}/private", server.uri())))
        .await;

    assert!(outcome.is_fallback());
}

#[tokio::test]
async fn missing_name_column_serves_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(csv_response("id,precio\n1,100\n"))
        .mount(&server)
        .await;

    let loader = test_loader(LoaderOptions::default());
    let outcome = loader
        .load(&SourceDescriptor::CsvUrl(format!("{}/bad.csv", server.uri())))
        .await;

    assert!(outcome.is_fallback());
    assert!(outcome
        .fallback_reason()
        .is_some_and(|r| r.contains("nombre")));
}

#[tokio::test]
async fn empty_fallback_mode_yields_no_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let loader = test_loader(LoaderOptions {
        fallback: Vec::new(),
        ..LoaderOptions::default()
    });
    let outcome = loader
        .load(&SourceDescriptor::CsvUrl(format!("{}/x.csv", server.uri())))
        .await;

    assert!(outcome.is_fallback());
    assert!(outcome.records().is_empty());
}

#[tokio::test]
async fn google_connector_refuses_writes() {
    let loader = test_loader(LoaderOptions::default());
    let result = loader
        .update(&SourceDescriptor::sheet("SHEET42", None), &default_catalog())
        .await;

    assert!(
        matches!(
            result,
            Err(LoaderError::Unsupported {
                operation: "update",
                ..
            })
        ),
        "got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Memoization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fallback_within_ttl_does_not_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let loader = test_loader(LoaderOptions {
        ttl: Some(Duration::from_secs(600)),
        ..LoaderOptions::default()
    });
    let source = SourceDescriptor::CsvUrl(format!("{}/gone.csv", server.uri()));

    let first = loader.load(&source).await;
    let second = loader.load(&source).await;

    assert!(first.is_fallback());
    assert_eq!(first, second);
}

#[tokio::test]
async fn disabled_ttl_fetches_every_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(csv_response(INVENTORY_CSV))
        .expect(2)
        .mount(&server)
        .await;

    let loader = test_loader(LoaderOptions {
        ttl: None,
        ..LoaderOptions::default()
    });
    let source = SourceDescriptor::CsvUrl(format!("{}/inventario.csv", server.uri()));

    loader.load(&source).await;
    loader.load(&source).await;
}

#[tokio::test]
async fn invalidate_forces_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(csv_response(INVENTORY_CSV))
        .expect(2)
        .mount(&server)
        .await;

    let loader = test_loader(LoaderOptions::default());
    let source = SourceDescriptor::CsvUrl(format!("{}/inventario.csv", server.uri()));

    loader.load(&source).await;
    loader.load(&source).await;
    loader.invalidate(&source);
    loader.load(&source).await;
}

#[tokio::test]
async fn default_retry_policy_makes_one_request_per_failed_load() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = CsvExportClient::new(
        5,
        "vitrina-test/0.1",
        DEFAULT_MAX_RETRIES,
        DEFAULT_RETRY_BACKOFF_BASE_MS,
    )
    .expect("failed to build test client");
    let loader = InventoryLoader::new(
        client.clone(),
        GoogleSheetsConnector::new(client),
        LoaderOptions::default(),
    );
    let source = SourceDescriptor::CsvUrl(format!("{}/down.csv", server.uri()));

    let first = loader.load(&source).await;
    let second = loader.load(&source).await;

    assert!(first.is_fallback());
    assert_eq!(first, second);
    assert_eq!(server.received_requests().await.map_or(0, |r| r.len()), 1);
}
