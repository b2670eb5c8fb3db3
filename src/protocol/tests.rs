use super::*;
use crate::constants::{FILENAME_FIELD_SIZE, SEARCH_RESULT_FIELD_SIZE, STATUS_FIELD_SIZE};
use tokio::net::TcpListener;

fn id(port: u16) -> PeerIdentity {
    PeerIdentity::new(port).unwrap()
}

#[test]
fn test_request_tag_bytes() {
    assert_eq!(RequestTag::from(b'1'), RequestTag::Register);
    assert_eq!(RequestTag::from(b'2'), RequestTag::Deregister);
    assert_eq!(RequestTag::from(b'3'), RequestTag::Search);
    assert_eq!(RequestTag::from(b'0'), RequestTag::Disconnect);
    assert_eq!(RequestTag::from(b'x'), RequestTag::Unknown(b'x'));

    assert_eq!(RequestTag::Search.as_byte(), b'3');
}

#[test]
fn test_identity_wire_format() {
    assert_eq!(id(9999).encode(), 9999i32.to_le_bytes());
    assert_eq!(PeerIdentity::decode(&55001i32.to_le_bytes()).unwrap(), id(55001));
}

#[test]
fn test_identity_out_of_range() {
    assert!(PeerIdentity::decode(&0i32.to_le_bytes()).is_err());
    assert!(PeerIdentity::decode(&(-4i32).to_le_bytes()).is_err());
    assert!(PeerIdentity::decode(&70000i32.to_le_bytes()).is_err());
    assert!(PeerIdentity::decode(&[1, 2]).is_err());
    assert!(PeerIdentity::new(0).is_none());
    assert!("abc".parse::<PeerIdentity>().is_err());
}

#[test]
fn test_filename_padding() {
    let name = FileName::new("a.txt").unwrap();
    let encoded = name.encode();

    assert_eq!(encoded.len(), FILENAME_FIELD_SIZE);
    assert_eq!(&encoded[..5], b"a.txt");
    assert!(encoded[5..].iter().all(|&b| b == 0));
    assert_eq!(FileName::decode(&encoded).unwrap(), name);
}

#[test]
fn test_filename_limits() {
    assert!(FileName::new("x".repeat(255)).is_ok());
    assert!(matches!(
        FileName::new("x".repeat(256)),
        Err(ProtocolError::NameTooLong(256))
    ));
    assert!(matches!(FileName::new(""), Err(ProtocolError::EmptyName)));
    assert!(FileName::new("a\0b").is_err());

    // a field with no terminator carries 256 bytes of name
    assert!(FileName::decode(&[b'x'; FILENAME_FIELD_SIZE]).is_err());
    assert!(FileName::decode(&[0xff, 0xfe, 0]).is_err());
}

#[test]
fn test_status_codes() {
    assert_eq!(FileStatus::NotFound.code(), -1);
    assert_eq!(FileStatus::StatFailed.code(), -2);

    let encoded = FileStatus::Size(1234).encode();
    assert_eq!(encoded.len(), STATUS_FIELD_SIZE);
    assert_eq!(&encoded[..4], b"1234");
    assert_eq!(FileStatus::decode(&encoded).unwrap(), FileStatus::Size(1234));

    assert_eq!(
        FileStatus::decode(&FileStatus::NotFound.encode()).unwrap(),
        FileStatus::NotFound
    );
    assert_eq!(FileStatus::decode(b"-2\0\0").unwrap(), FileStatus::StatFailed);
    assert!(FileStatus::decode(b"-7\0").is_err());
    assert!(FileStatus::decode(b"abc\0").is_err());
}

#[test]
fn test_search_result_format() {
    let encoded = encode_search_result(&[id(5001), id(5002), id(7)]);
    assert_eq!(encoded.len(), SEARCH_RESULT_FIELD_SIZE);
    assert_eq!(&encoded[..14], b"5001,5002,7\0\0\0");

    let decoded = decode_search_result(&encoded).unwrap();
    assert_eq!(decoded, vec![id(5001), id(5002), id(7)]);
}

#[test]
fn test_search_result_empty() {
    let encoded = encode_search_result(&[]);
    assert!(encoded.iter().all(|&b| b == 0));
    assert!(decode_search_result(&encoded).unwrap().is_empty());
}

#[test]
fn test_search_result_overflow_drops_whole_ids() {
    // 6 bytes per "65535," entry, far more than the field holds
    let peers: Vec<PeerIdentity> = (0..1000).map(|_| id(65535)).collect();
    let encoded = encode_search_result(&peers);

    assert_eq!(encoded.len(), SEARCH_RESULT_FIELD_SIZE);
    assert_eq!(encoded[SEARCH_RESULT_FIELD_SIZE - 1], 0);

    let decoded = decode_search_result(&encoded).unwrap();
    assert!(!decoded.is_empty());
    assert!(decoded.len() < peers.len());
    assert!(decoded.iter().all(|p| *p == id(65535)));
}

async fn socket_pair() -> (Transport, Transport) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (client, accepted) = tokio::join!(Transport::connect(addr), listener.accept());
    (client.unwrap(), Transport::new(accepted.unwrap().0))
}

#[tokio::test]
async fn test_transport_tracker_exchange() {
    let (mut client, mut server) = socket_pair().await;
    let name = FileName::new("a.txt").unwrap();

    client.send_identity(id(5001)).await.unwrap();
    client.send_request(RequestTag::Search, &name).await.unwrap();

    assert_eq!(server.receive_identity().await.unwrap(), id(5001));
    assert_eq!(server.receive_tag().await.unwrap(), RequestTag::Search);
    assert_eq!(server.receive_name().await.unwrap(), name);

    server.send_search_result(&[id(5002)]).await.unwrap();
    assert_eq!(client.receive_search_result().await.unwrap(), vec![id(5002)]);
}

#[tokio::test]
async fn test_transport_body_after_status() {
    let (mut client, mut server) = socket_pair().await;
    let content: Vec<u8> = (0..10_000).map(|i| (i % 251) as u8).collect();

    server
        .send_status(FileStatus::Size(content.len() as u64))
        .await
        .unwrap();
    server.send_body(&mut content.as_slice()).await.unwrap();
    drop(server);

    let status = client.receive_status().await.unwrap();
    assert_eq!(status, FileStatus::Size(content.len() as u64));

    let mut received = Vec::new();
    let n = client.receive_body(content.len() as u64, &mut received).await.unwrap();
    assert_eq!(n, content.len() as u64);
    assert_eq!(received, content);
}

#[tokio::test]
async fn test_transport_short_body_is_not_an_error() {
    let (mut client, mut server) = socket_pair().await;

    server.send_status(FileStatus::Size(100)).await.unwrap();
    server.send_body(&mut &b"only ten!!"[..]).await.unwrap();
    drop(server);

    client.receive_status().await.unwrap();
    let mut received = Vec::new();
    let n = client.receive_body(100, &mut received).await.unwrap();
    assert_eq!(n, 10);
    assert_eq!(received, b"only ten!!");
}

#[tokio::test]
async fn test_transport_closed_mid_field() {
    let (mut client, server) = socket_pair().await;
    drop(server);

    assert!(matches!(
        client.receive_tag().await,
        Err(ProtocolError::ConnectionClosed)
    ));
}
