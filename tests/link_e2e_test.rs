use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_test::assert_ok;

use reflexbit::adapter::{
    encode, run_link, LinkConfig, LinkError, LinkEvent, SerialLink, MAX_LINE_BYTES,
};
use reflexbit::types::{Command, Event, Level};

const STEP: Duration = Duration::from_secs(2);

async fn spawn_link(
    log_path: Option<String>,
) -> (
    SocketAddr,
    mpsc::Receiver<LinkEvent>,
    mpsc::UnboundedSender<String>,
) {
    let config = LinkConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_pending: 8,
        log_path,
    };
    let (event_tx, event_rx) = mpsc::channel::<LinkEvent>(8);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<String>();
    let (ready_tx, ready_rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = run_link(config, event_tx, out_rx, Some(ready_tx)).await;
    });

    let addr = tokio::time::timeout(STEP, ready_rx)
        .await
        .expect("link did not signal ready")
        .expect("ready channel dropped");
    (addr, event_rx, out_tx)
}

async fn next_event(rx: &mut mpsc::Receiver<LinkEvent>) -> LinkEvent {
    tokio::time::timeout(STEP, rx.recv())
        .await
        .expect("timed out waiting for link event")
        .expect("link event channel closed")
}

#[tokio::test]
async fn host_commands_are_decoded_and_replies_delivered() {
    let (addr, mut events, out_tx) = spawn_link(None).await;

    let stream = assert_ok!(TcpStream::connect(addr).await);
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();
    assert_eq!(next_event(&mut events).await, LinkEvent::Connected);

    // Garbage is dropped on the connection task; only commands come through.
    write_half
        .write_all(b"hello\nPING\r\nMEMORY:13\nMEMORY:12\nSTART\n")
        .await
        .unwrap();
    assert_eq!(next_event(&mut events).await, LinkEvent::Command(Command::Ping));
    assert_eq!(
        next_event(&mut events).await,
        LinkEvent::Command(Command::Memory(Level::new(12).unwrap()))
    );
    assert_eq!(next_event(&mut events).await, LinkEvent::Command(Command::Start));

    out_tx.send(encode(&Event::Pong)).unwrap();
    out_tx.send(encode(&Event::ReactionTime(231))).unwrap();
    let first = tokio::time::timeout(STEP, lines.next_line()).await.unwrap().unwrap();
    let second = tokio::time::timeout(STEP, lines.next_line()).await.unwrap().unwrap();
    assert_eq!(first.as_deref(), Some("PONG"));
    assert_eq!(second.as_deref(), Some("RT:231"));

    drop(write_half);
    drop(lines);
    assert_eq!(next_event(&mut events).await, LinkEvent::Disconnected);
}

#[tokio::test]
async fn invalid_utf8_and_overlong_lines_are_ignored() {
    let (addr, mut events, _out_tx) = spawn_link(None).await;

    let mut host = assert_ok!(TcpStream::connect(addr).await);
    assert_eq!(next_event(&mut events).await, LinkEvent::Connected);

    host.write_all(b"\xff\xfe\nPING\n").await.unwrap();
    assert_eq!(next_event(&mut events).await, LinkEvent::Command(Command::Ping));

    let mut long = vec![b'P'; MAX_LINE_BYTES + 10];
    long.extend_from_slice(b"\nSTART\n");
    host.write_all(&long).await.unwrap();
    assert_eq!(next_event(&mut events).await, LinkEvent::Command(Command::Start));
}

#[tokio::test]
async fn second_host_is_refused_while_paired() {
    let (addr, mut events, _out_tx) = spawn_link(None).await;

    let _first = assert_ok!(TcpStream::connect(addr).await);
    assert_eq!(next_event(&mut events).await, LinkEvent::Connected);

    let second = assert_ok!(TcpStream::connect(addr).await);
    let mut reader = BufReader::new(second);
    let mut buf = String::new();
    let read = tokio::time::timeout(STEP, reader.read_line(&mut buf))
        .await
        .expect("refused host was left open");
    assert!(matches!(read, Ok(0) | Err(_)));

    // No second Connected for the refused host.
    let extra = tokio::time::timeout(Duration::from_millis(100), events.recv()).await;
    assert!(extra.is_err());
}

#[tokio::test]
async fn host_can_reconnect_after_leaving() {
    let (addr, mut events, _out_tx) = spawn_link(None).await;

    let first = assert_ok!(TcpStream::connect(addr).await);
    assert_eq!(next_event(&mut events).await, LinkEvent::Connected);
    drop(first);
    assert_eq!(next_event(&mut events).await, LinkEvent::Disconnected);

    let mut again = assert_ok!(TcpStream::connect(addr).await);
    assert_eq!(next_event(&mut events).await, LinkEvent::Connected);
    again.write_all(b"PING\n").await.unwrap();
    assert_eq!(next_event(&mut events).await, LinkEvent::Command(Command::Ping));
}

#[tokio::test]
async fn wire_log_records_both_directions() {
    let path = std::env::temp_dir().join(format!("reflexbit-wire-{}.jsonl", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let (addr, mut events, out_tx) = spawn_link(Some(path.display().to_string())).await;

    let mut stream = assert_ok!(TcpStream::connect(addr).await);
    assert_eq!(next_event(&mut events).await, LinkEvent::Connected);
    stream.write_all(b"PING\n").await.unwrap();
    assert_eq!(next_event(&mut events).await, LinkEvent::Command(Command::Ping));
    out_tx.send(encode(&Event::Pong)).unwrap();

    let mut records = Vec::new();
    for _ in 0..40 {
        let text = std::fs::read_to_string(&path).unwrap_or_default();
        records = text
            .lines()
            .filter_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
            .collect();
        if records.len() >= 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    let _ = std::fs::remove_file(&path);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["dir"], "in");
    assert_eq!(records[0]["line"], "PING");
    assert_eq!(records[1]["dir"], "out");
    assert_eq!(records[1]["line"], "PONG");
}

#[test]
fn serial_link_rejects_bad_address() {
    let config = LinkConfig {
        host: "not an address".to_string(),
        ..LinkConfig::default()
    };
    assert!(matches!(
        SerialLink::start(config),
        Err(LinkError::InvalidAddress { .. })
    ));
}
