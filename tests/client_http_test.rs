use cez_hdo::config::HdoConfig;
use cez_hdo::schedule::{ScheduleClient, ScheduleState, Signal, TariffPeriod};
use chrono::{NaiveDate, NaiveDateTime};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;

const EAN: &str = "85918234567890";

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn config(base: &str) -> HdoConfig {
    HdoConfig {
        ean: EAN.to_string(),
        signal: Signal::A3b4dp01,
        base_url: format!("{}/casy-spinani", base),
        timeout_secs: 5,
        ..HdoConfig::default()
    }
}

fn body() -> String {
    json!({
        "data": {"signals": [
            {"signal": "a3b4dp01", "den": "Pondělí", "datum": "01.01.2024",
             "casy": "00:00-05:35; 06:30-08:55"}
        ]}
    })
    .to_string()
}

#[tokio::test]
async fn posts_ean_with_portal_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/casy-spinani")
        .match_query(Matcher::UrlEncoded(
            "path".into(),
            "switch-times/signals".into(),
        ))
        .match_header("content-type", "application/json")
        .match_header("origin", "https://dip.cezdistribuce.cz")
        .match_header(
            "referer",
            "https://dip.cezdistribuce.cz/irj/portal/anonymous/casy-spinani/",
        )
        .match_body(Matcher::Json(json!({ "ean": EAN })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body())
        .create_async()
        .await;

    let mut client = ScheduleClient::new(&config(&server.url()), chrono_tz::Europe::Prague);
    let state = client.get_data_at(at(7, 0)).await;

    assert!(!state.is_error());
    assert!(state.is_low_tariff());
    assert_eq!(state.current_period(), TariffPeriod::LowTariff);
    assert_eq!(state.next_switch(), Some(at(8, 55)));
    assert_eq!(state.today_switches().len(), 4);
    mock.assert_async().await;
}

#[tokio::test]
async fn cached_until_next_switch() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/casy-spinani")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body())
        .expect(1)
        .create_async()
        .await;

    let mut client = ScheduleClient::new(&config(&server.url()), chrono_tz::Europe::Prague);
    let first = client.get_data_at(at(7, 0)).await;
    let second = client.get_data_at(at(8, 30)).await;
    assert_eq!(first, second);
    mock.assert_async().await;
}

#[tokio::test]
async fn non_200_yields_error_state_then_retries() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/casy-spinani")
        .match_query(Matcher::Any)
        .with_status(503)
        .expect(2)
        .create_async()
        .await;

    let mut client = ScheduleClient::new(&config(&server.url()), chrono_tz::Europe::Prague);
    let state = client.get_data_at(at(7, 0)).await;
    assert!(state.is_error());
    assert!(state.is_low_tariff());
    assert_eq!(state.next_switch(), None);
    assert!(state.error_message().unwrap().contains("503"));

    // Error states do not gate the next call
    client.get_data_at(at(7, 0)).await;
    mock.assert_async().await;
}

#[tokio::test]
async fn malformed_json_yields_error_state() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/casy-spinani")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let mut client = ScheduleClient::new(&config(&server.url()), chrono_tz::Europe::Prague);
    let state = client.get_data_at(at(7, 0)).await;
    assert!(state.is_error());
    assert!(state.is_low_tariff());
    assert!(state.today_switches().is_empty());
    assert!(state.error_message().unwrap().contains("decode"));
}

#[tokio::test]
async fn unknown_signal_is_error_state() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/casy-spinani")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body())
        .create_async()
        .await;

    let mut cfg = config(&server.url());
    cfg.signal = Signal::A3b4dp06;
    let mut client = ScheduleClient::new(&cfg, chrono_tz::Europe::Prague);
    let state = client.get_data_at(at(7, 0)).await;
    assert_eq!(
        state,
        ScheduleState::error("Signal 'a3b4dp06' not found in API response")
    );
}

#[tokio::test]
async fn connection_refused_is_error_state() {
    // Nothing listens on the discard port
    let mut client = ScheduleClient::new(&config("http://127.0.0.1:9"), chrono_tz::Europe::Prague);
    let state = client.get_data_at(at(7, 0)).await;
    assert!(state.is_error());
    assert!(state.is_low_tariff());
    assert_eq!(state.current_period(), TariffPeriod::LowTariff);
}

#[tokio::test]
async fn silent_server_times_out_into_error_state() {
    // Accept connections but never answer
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            held.push(stream);
        }
    });

    let mut cfg = config(&format!("http://{}", addr));
    cfg.timeout_secs = 1;
    let mut client = ScheduleClient::new(&cfg, chrono_tz::Europe::Prague);

    let state = client.get_data_at(at(7, 0)).await;
    assert!(state.is_error());
    assert!(state.is_low_tariff());
    assert_eq!(state.next_switch(), None);
    assert!(state.error_message().unwrap().starts_with("Timeout error"));

    // Nothing was cached, so the next call goes out again
    let again = client.get_data_at(at(7, 0)).await;
    assert!(again.is_error());
    assert!(accepted.load(Ordering::SeqCst) >= 2);

    server.abort();
}

#[tokio::test]
async fn shutdown_releases_session() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/casy-spinani")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body())
        .create_async()
        .await;

    let mut client = ScheduleClient::new(&config(&server.url()), chrono_tz::Europe::Prague);
    assert!(!client.source().is_open());
    client.get_data_at(at(7, 0)).await;
    assert!(client.source().is_open());
    client.shutdown().await;
    assert!(!client.source().is_open());
}
