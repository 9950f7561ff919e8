use polygon_api::{Client, Error, TickersQuery};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn get_tickers_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("tickers_page.json");

    Mock::given(method("GET"))
        .and(path("/v3/reference/tickers"))
        .and(query_param("market", "stocks"))
        .and(query_param("active", "true"))
        .and(query_param("order", "asc"))
        .and(query_param("limit", "1000"))
        .and(query_param("sort", "ticker"))
        .and(query_param("apiKey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key".to_string()).unwrap();
    let page = client.get_tickers(&TickersQuery::default()).await.unwrap();
    assert_eq!(page.len(), 3);
    assert!(page.next_url().is_some());
}

#[tokio::test]
async fn get_page_follows_authorized_cursor() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("tickers_last_page.json");

    Mock::given(method("GET"))
        .and(path("/v3/reference/tickers"))
        .and(query_param("cursor", "abc"))
        .and(query_param("apiKey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key".to_string()).unwrap();
    let next = format!("{}/v3/reference/tickers?cursor=abc", mock_server.uri());
    let url = client.authorize(&next).unwrap();
    let page = client.get_page(&url).await.unwrap();
    assert_eq!(page.len(), 1);
    assert!(page.next_url().is_none());
}

#[tokio::test]
async fn rate_limit_body_is_returned_not_raised() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("tickers_rate_limited.json");

    Mock::given(method("GET"))
        .and(path("/v3/reference/tickers"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key".to_string()).unwrap();
    let page = client.get_tickers(&TickersQuery::default()).await.unwrap();
    assert!(page.error_message().is_some());
}

#[tokio::test]
async fn rate_limit_body_with_429_is_returned_not_raised() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("tickers_rate_limited.json");

    Mock::given(method("GET"))
        .and(path("/v3/reference/tickers"))
        .respond_with(ResponseTemplate::new(429).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key".to_string()).unwrap();
    let page = client.get_tickers(&TickersQuery::default()).await.unwrap();
    assert!(page.error_message().is_some());
}

#[tokio::test]
async fn get_tickers_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/reference/tickers"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key".to_string()).unwrap();
    let result = client.get_tickers(&TickersQuery::default()).await;
    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected HttpStatus error, got {:?}", other.map(|p| p.len())),
    }
}

#[tokio::test]
async fn get_tickers_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/reference/tickers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key".to_string()).unwrap();
    let result = client.get_tickers(&TickersQuery::default()).await;
    assert!(matches!(result, Err(Error::Parse { .. })));
}

#[tokio::test]
async fn get_tickers_connection_refused() {
    // Nothing listens on port 1.
    let client = Client::with_base_url("http://127.0.0.1:1", "test-key".to_string()).unwrap();
    let result = client.get_tickers(&TickersQuery::default()).await;
    assert!(matches!(result, Err(Error::Transport(_))));
}
