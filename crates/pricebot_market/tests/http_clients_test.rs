//! CoinMarketCap and CoinGecko clients against a local HTTP stub.

use pricebot_error::{HistoryErrorKind, QuoteErrorKind};
use pricebot_market::{CoinGeckoClient, CoinMarketCapClient, FiatCurrency, HistorySource, QuoteSource};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One request as seen by the stub.
#[derive(Debug, Clone)]
struct Seen {
    target: String,
    headers: Vec<(String, String)>,
}

impl Seen {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

type Route = dyn Fn(&Seen) -> (u16, String) + Send + Sync;

/// Single-purpose HTTP/1.1 server answering each connection once.
struct Stub {
    base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Stub {
    async fn start(route: impl Fn(&Seen) -> (u16, String) + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let base_url = format!("http://{}", listener.local_addr().expect("addr"));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let route: Arc<Route> = Arc::new(route);

        let log = seen.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let route = route.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let _ = answer(stream, route, log).await;
                });
            }
        });

        Self { base_url, seen }
    }

    fn requests(&self) -> Vec<Seen> {
        self.seen.lock().expect("lock").clone()
    }
}

async fn answer(
    mut stream: TcpStream,
    route: Arc<Route>,
    log: Arc<Mutex<Vec<Seen>>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf).to_string();
    let mut lines = head.split("\r\n");
    let target = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string();
    let headers = lines
        .take_while(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    let seen = Seen { target, headers };

    let (status, body) = route(&seen);
    log.lock().expect("lock").push(seen);

    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn convert_param(target: &str) -> Option<FiatCurrency> {
    target
        .split(['?', '&'])
        .find_map(|pair| pair.strip_prefix("convert="))
        .and_then(|code| code.parse().ok())
}

fn quote_body(symbol: &str, currency: FiatCurrency, price: f64) -> String {
    format!(
        r#"{{"status": {{"error_code": 0}}, "data": {{"{symbol}": {{"name": "Bitcoin", "symbol": "{symbol}",
            "quote": {{"{code}": {{"price": {price}, "percent_change_1h": 0.5,
            "percent_change_24h": -1.2, "percent_change_30d": 10.3}}}}}}}}}}"#,
        symbol = symbol,
        code = currency.code(),
        price = price,
    )
}

fn cmc_client(stub: &Stub) -> CoinMarketCapClient {
    CoinMarketCapClient::new("test-key".to_string())
        .with_endpoint(format!("{}/v1/cryptocurrency/quotes/latest", stub.base_url))
}

#[tokio::test]
async fn test_quote_fetched_per_currency_with_api_key() {
    let stub = Stub::start(|seen| match convert_param(&seen.target) {
        Some(FiatCurrency::Usd) => (200, quote_body("BTC", FiatCurrency::Usd, 65000.12)),
        Some(FiatCurrency::Eur) => (200, quote_body("BTC", FiatCurrency::Eur, 60000.0)),
        Some(FiatCurrency::Gbp) => (200, quote_body("BTC", FiatCurrency::Gbp, 52000.0)),
        None => (404, "{}".to_string()),
    })
    .await;

    let record = cmc_client(&stub).fetch_quote("BTC").await.expect("quote");

    assert_eq!(record.name(), "Bitcoin");
    assert_eq!(record.price_in(FiatCurrency::Usd), Some(65000.12));
    assert_eq!(record.price_in(FiatCurrency::Eur), Some(60000.0));
    assert_eq!(record.price_in(FiatCurrency::Gbp), Some(52000.0));
    assert_eq!(record.changes().as_array(), [0.5, -1.2, 10.3]);

    let requests = stub.requests();
    assert_eq!(requests.len(), 3);
    for seen in &requests {
        assert!(seen.target.starts_with("/v1/cryptocurrency/quotes/latest?"));
        assert!(seen.target.contains("symbol=BTC"));
        assert_eq!(seen.header("X-CMC_PRO_API_KEY"), Some("test-key"));
    }
}

#[tokio::test]
async fn test_one_failed_currency_fails_whole_quote() {
    let stub = Stub::start(|seen| match convert_param(&seen.target) {
        Some(FiatCurrency::Usd) => (200, quote_body("BTC", FiatCurrency::Usd, 65000.12)),
        _ => (429, r#"{"status": {"error_code": 1008}}"#.to_string()),
    })
    .await;

    let err = cmc_client(&stub).fetch_quote("BTC").await.unwrap_err();

    assert_eq!(err.kind(), &QuoteErrorKind::RateLimited);
    // GBP is never requested once EUR fails.
    assert_eq!(stub.requests().len(), 2);
}

#[tokio::test]
async fn test_bad_request_is_invalid_symbol() {
    let stub = Stub::start(|_| (400, r#"{"status": {"error_code": 400}}"#.to_string())).await;

    let err = cmc_client(&stub).fetch_quote("B@D").await.unwrap_err();

    assert_eq!(err.kind(), &QuoteErrorKind::InvalidSymbol);
    assert_eq!(err.reply_text(), "Invalid symbol provided");
}

#[tokio::test]
async fn test_symbol_missing_from_data_is_unknown() {
    let stub = Stub::start(|_| (200, r#"{"data": {}}"#.to_string())).await;

    let err = cmc_client(&stub).fetch_quote("NOPE").await.unwrap_err();

    assert_eq!(err.kind(), &QuoteErrorKind::UnknownSymbol("NOPE".to_string()));
}

#[tokio::test]
async fn test_history_requests_slug_and_window() {
    let stub = Stub::start(|_| {
        (
            200,
            r#"{"prices": [[1700086400000, 410.5], [1700000000000, 400.25]]}"#.to_string(),
        )
    })
    .await;
    let client = CoinGeckoClient::new().with_base_url(format!("{}/api/v3/", stub.base_url));

    let series = client.fetch_history("Bitcoin Cash", 30).await.expect("history");

    assert_eq!(series.len(), 2);
    assert_eq!(series.latest().map(|p| p.price), Some(410.5));
    assert_eq!(
        stub.requests()[0].target,
        "/api/v3/coins/bitcoin-cash/market_chart?vs_currency=usd&days=30"
    );
}

#[tokio::test]
async fn test_history_not_found_is_unavailable() {
    let stub = Stub::start(|_| (404, r#"{"error": "coin not found"}"#.to_string())).await;
    let client = CoinGeckoClient::new().with_base_url(stub.base_url.clone());

    let err = client.fetch_history("Bitcoin Cash", 30).await.unwrap_err();
    assert_eq!(err.kind(), &HistoryErrorKind::Status(404));

    assert!(client.history_or_unavailable("Bitcoin Cash", 30).await.is_none());
    assert_eq!(stub.requests().len(), 2);
}

#[tokio::test]
async fn test_history_unparsable_body_is_unavailable() {
    let stub = Stub::start(|_| (200, "<html>maintenance</html>".to_string())).await;
    let client = CoinGeckoClient::new().with_base_url(stub.base_url.clone());

    assert!(client.history_or_unavailable("Bitcoin", 7).await.is_none());
}
