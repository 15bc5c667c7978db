use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use xrpqr::{CoinGeckoClient, FiatCurrency, PriceFeedOptions, RateSource};

/// Serve a single canned HTTP response and hand back the request line.
async fn serve_once(status: &'static str, body: &'static str) -> (SocketAddr, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");

        let mut buf = vec![0u8; 4096];
        let mut read = 0;
        loop {
            let n = stream.read(&mut buf[read..]).await.expect("read request");
            read += n;
            if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let request = String::from_utf8_lossy(&buf[..read]).to_string();

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        stream.shutdown().await.ok();

        request.lines().next().unwrap_or_default().to_string()
    });

    (addr, handle)
}

fn client_for(addr: SocketAddr) -> CoinGeckoClient {
    let options = PriceFeedOptions {
        base_url: format!("http://{addr}/api/v3"),
        timeout_secs: Some(5),
        ..PriceFeedOptions::default()
    };
    CoinGeckoClient::new(&options).expect("build client")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn fetches_price_with_lowercase_currency() {
    let (addr, server) = serve_once("200 OK", r#"{"ripple":{"usd":0.6123}}"#).await;

    let rate = client_for(addr)
        .fetch_rate(FiatCurrency::Usd)
        .await
        .expect("rate");

    assert_eq!(rate.value(), 0.6123);
    assert_eq!(rate.currency(), FiatCurrency::Usd);

    let request_line = server.await.expect("server task");
    assert!(
        request_line.starts_with("GET /api/v3/simple/price?"),
        "unexpected request: {request_line}"
    );
    assert!(request_line.contains("ids=ripple"), "{request_line}");
    assert!(request_line.contains("vs_currencies=usd"), "{request_line}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn error_status_is_unavailable() {
    let (addr, server) = serve_once("429 Too Many Requests", r#"{"status":{"error_code":429}}"#).await;

    let err = client_for(addr)
        .fetch_rate(FiatCurrency::Eur)
        .await
        .expect_err("429 must not yield a rate");

    assert_eq!(err.currency, FiatCurrency::Eur);
    assert!(err.reason.contains("429"), "{}", err.reason);
    server.await.expect("server task");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unexpected_body_is_unavailable() {
    let (addr, server) = serve_once("200 OK", r#"{"ripple":{}}"#).await;

    let err = client_for(addr)
        .fetch_rate(FiatCurrency::Eur)
        .await
        .expect_err("missing field must not yield a rate");

    assert!(err.reason.contains("ripple.eur"), "{}", err.reason);
    server.await.expect("server task");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn malformed_json_is_unavailable() {
    let (addr, server) = serve_once("200 OK", "<html>maintenance</html>").await;

    let err = client_for(addr)
        .fetch_rate(FiatCurrency::Usd)
        .await
        .expect_err("html must not yield a rate");

    assert!(err.reason.contains("JSON"), "{}", err.reason);
    server.await.expect("server task");
}

#[tokio::test]
async fn refused_connection_is_unavailable() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr")
    };

    let err = client_for(addr)
        .fetch_rate(FiatCurrency::Eur)
        .await
        .expect_err("nothing is listening");

    assert!(err.reason.starts_with("request failed"), "{}", err.reason);
}
