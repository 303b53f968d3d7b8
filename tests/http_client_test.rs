mod common;

use common::qcew_csv;
use mockito::Server;
use qcew_etl::config::SourceConfig;
use qcew_etl::source::{BackoffStrategy, QcewClient, RetryConfig, SliceKey, SliceSource};
use qcew_etl::Error;
use std::time::{Duration, Instant};

fn config_for(server: &Server, attempts: u32) -> SourceConfig {
    SourceConfig {
        base_url: server.url(),
        timeout: Duration::from_secs(5),
        throttle: Duration::ZERO,
        retry: RetryConfig::immediate(attempts),
    }
}

#[test]
fn test_fetch_parses_csv_body() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/2021/1/area/06000.csv")
        .with_status(200)
        .with_header("content-type", "text/csv")
        .with_body(qcew_csv(&["06000,0,23,54,0,2021,1,,1,500,510,520"]))
        .expect(1)
        .create();
    let client = QcewClient::new(&config_for(&server, 3)).unwrap();

    let slice = client.fetch(&SliceKey::new("CA", 2021, 1)).unwrap();

    assert_eq!(slice.len(), 1);
    assert_eq!(slice.column_index("industry_code"), Some(2));
    mock.assert();
}

#[test]
fn test_server_errors_are_retried() {
    let mut server = Server::new();
    let path = "/2020/3/area/48000.csv";
    let unavailable = server.mock("GET", path).with_status(503).expect(1).create();
    let internal = server.mock("GET", path).with_status(500).expect(1).create();
    let ok = server
        .mock("GET", path)
        .with_status(200)
        .with_body(qcew_csv(&["48000,0,62,54,0,2020,3,,1,1,2,3"]))
        .expect(1)
        .create();
    let client = QcewClient::new(&config_for(&server, 3)).unwrap();

    let slice = client.fetch(&SliceKey::new("TX", 2020, 3)).unwrap();

    assert_eq!(slice.len(), 1);
    unavailable.assert();
    internal.assert();
    ok.assert();
}

#[test]
fn test_exhausted_retries_return_last_status() {
    let mut server = Server::new();
    let path = "/2019/4/area/12000.csv";
    let internal = server.mock("GET", path).with_status(500).expect(1).create();
    let not_found = server.mock("GET", path).with_status(404).expect(1).create();
    let client = QcewClient::new(&config_for(&server, 2)).unwrap();

    let err = client.fetch(&SliceKey::new("FL", 2019, 4)).unwrap_err();

    match err {
        Error::HttpStatus(msg) => assert!(msg.contains("404"), "unexpected message: {msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
    internal.assert();
    not_found.assert();
}

#[test]
fn test_throttle_pauses_after_successful_fetch() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/2022/2/area/53000.csv")
        .with_status(200)
        .with_body(qcew_csv(&["53000,0,52,54,0,2022,2,,1,7,8,9"]))
        .expect(1)
        .create();
    let config = SourceConfig {
        throttle: Duration::from_millis(50),
        ..config_for(&server, 1)
    };
    let client = QcewClient::new(&config).unwrap();

    let started = Instant::now();
    client.fetch(&SliceKey::new("WA", 2022, 2)).unwrap();

    assert!(
        started.elapsed() >= Duration::from_millis(50),
        "fetch returned after {:?}",
        started.elapsed()
    );
    mock.assert();
}

#[test]
fn test_retry_waits_initial_delay_between_attempts() {
    let mut server = Server::new();
    let path = "/2018/1/area/08000.csv";
    let unavailable = server.mock("GET", path).with_status(503).expect(1).create();
    let ok = server
        .mock("GET", path)
        .with_status(200)
        .with_body(qcew_csv(&["08000,0,72,54,0,2018,1,,1,4,5,6"]))
        .expect(1)
        .create();
    let config = SourceConfig {
        retry: RetryConfig {
            attempts: 2,
            backoff: BackoffStrategy::Fixed,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
        },
        ..config_for(&server, 2)
    };
    let client = QcewClient::new(&config).unwrap();

    let started = Instant::now();
    let slice = client.fetch(&SliceKey::new("CO", 2018, 1)).unwrap();

    assert_eq!(slice.len(), 1);
    assert!(
        started.elapsed() >= Duration::from_millis(100),
        "retry finished after {:?}",
        started.elapsed()
    );
    unavailable.assert();
    ok.assert();
}

#[test]
fn test_unknown_state_never_hits_network() {
    let client = QcewClient::new(&SourceConfig::default()).unwrap();
    let err = client.fetch(&SliceKey::new("PR", 2020, 1)).unwrap_err();
    assert!(matches!(err, Error::UnknownState(_)));
}
