use elasticstat_core::cli::Mode;
use elasticstat_core::conf::{Config, StatsdConfig};
use elasticstat_core::sink::StatsdProtocol;
use elasticstat_core::source::MemoryFeed;
use integration_tests::harness::{Capture, bulk_request, run_over};
use pretty_assertions::assert_eq;
use std::net::UdpSocket;
use std::time::Duration;

fn feed() -> MemoryFeed {
    [
        Capture::get("/logs/_search").response_time(120).payload(),
        Capture::post("/_bulk")
            .body(bulk_request("logs", 4))
            .response_time(30)
            .respond(200, r#"{"took":1,"items":[]}"#)
            .payload(),
        Capture::get("/").response_time(1).payload(),
    ]
    .into_iter()
    .collect()
}

#[test]
fn every_request_is_printed_with_its_action() {
    // Act
    let run = run_over(Mode::UserActivity, feed(), &Config::default());

    // Assert
    assert_eq!(run.emitted, 3);

    let lines = run.lines();
    assert!(lines[0].contains(" GET search /logs/_search 0 "), "{}", lines[0]);
    assert!(lines[1].contains(" POST bulk /_bulk 4 "), "{}", lines[1]);
    assert!(lines[2].contains(" GET ? / 0 "), "{}", lines[2]);
    assert!(lines.iter().all(|line| line.ends_with("\"curl/8.4.0\"")));
}

#[test]
fn timings_are_sent_to_statsd() {
    // Arrange
    let statsd = UdpSocket::bind("127.0.0.1:0").unwrap();
    statsd
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let mut config = Config::default();
    config.sinks.statsd = Some(StatsdConfig {
        address: statsd.local_addr().unwrap().to_string(),
        protocol: StatsdProtocol::Udp,
    });

    // Act
    let run = run_over(Mode::UserActivity, feed(), &config);

    // Assert
    assert_eq!(run.emitted, 3);

    let mut received = Vec::new();
    let mut buf = [0u8; 512];
    for _ in 0..3 {
        let (len, _) = statsd.recv_from(&mut buf).unwrap();
        received.push(String::from_utf8_lossy(&buf[..len]).into_owned());
    }
    assert_eq!(
        received,
        vec![
            "action.search:120|ms\n",
            "action.bulk:30|ms\n",
            "action.unknown:1|ms\n",
        ]
    );
}
