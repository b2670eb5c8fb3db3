use super::*;
use crate::index::FileIndex;
use crate::protocol::{FileName, PeerIdentity, RequestTag, Transport};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

fn id(port: u16) -> PeerIdentity {
    PeerIdentity::new(port).unwrap()
}

fn name(s: &str) -> FileName {
    FileName::new(s).unwrap()
}

async fn start_server() -> (SocketAddr, Arc<FileIndex>) {
    let server = IndexServer::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    let index = server.index().clone();
    tokio::spawn(server.run());
    (addr, index)
}

async fn connect_as(addr: SocketAddr, port: u16) -> Transport {
    let mut transport = Transport::connect(addr).await.unwrap();
    transport.send_identity(id(port)).await.unwrap();
    transport
}

async fn search(transport: &mut Transport, file: &str) -> Vec<PeerIdentity> {
    transport
        .send_request(RequestTag::Search, &name(file))
        .await
        .unwrap();
    transport.receive_search_result().await.unwrap()
}

async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached");
}

#[tokio::test]
async fn test_register_search_deregister() {
    let (addr, _) = start_server().await;
    let mut peer = connect_as(addr, 7).await;

    peer.send_request(RequestTag::Register, &name("a.txt"))
        .await
        .unwrap();
    assert_eq!(search(&mut peer, "a.txt").await, vec![id(7)]);

    peer.send_request(RequestTag::Deregister, &name("a.txt"))
        .await
        .unwrap();
    assert!(search(&mut peer, "a.txt").await.is_empty());
}

#[tokio::test]
async fn test_search_sees_other_peers() {
    let (addr, _) = start_server().await;
    let mut a = connect_as(addr, 5001).await;
    let mut b = connect_as(addr, 5002).await;

    a.send_request(RequestTag::Register, &name("movie.mp4"))
        .await
        .unwrap();
    // a's own search orders after its register on the same connection
    assert_eq!(search(&mut a, "movie.mp4").await, vec![id(5001)]);

    b.send_request(RequestTag::Register, &name("movie.mp4"))
        .await
        .unwrap();
    assert_eq!(search(&mut b, "movie.mp4").await, vec![id(5001), id(5002)]);
}

#[tokio::test]
async fn test_disconnect_purges_peer() {
    let (addr, index) = start_server().await;
    let mut peer = connect_as(addr, 7).await;

    peer.send_request(RequestTag::Register, &name("a.txt"))
        .await
        .unwrap();
    peer.send_request(RequestTag::Register, &name("b.txt"))
        .await
        .unwrap();
    search(&mut peer, "a.txt").await;
    assert_eq!(index.file_count(), 2);

    peer.send_tag(RequestTag::Disconnect).await.unwrap();
    wait_until(|| index.is_empty()).await;
}

#[tokio::test]
async fn test_dropped_connection_purges_peer() {
    let (addr, index) = start_server().await;
    let mut peer = connect_as(addr, 7).await;
    let mut other = connect_as(addr, 8).await;

    peer.send_request(RequestTag::Register, &name("a.txt"))
        .await
        .unwrap();
    other
        .send_request(RequestTag::Register, &name("a.txt"))
        .await
        .unwrap();
    search(&mut peer, "a.txt").await;
    search(&mut other, "a.txt").await;

    drop(peer);
    wait_until(|| index.search("a.txt") == vec![id(8)]).await;
}

#[tokio::test]
async fn test_unknown_tag_is_disconnect() {
    let (addr, index) = start_server().await;
    let mut peer = connect_as(addr, 7).await;

    peer.send_request(RequestTag::Register, &name("a.txt"))
        .await
        .unwrap();
    search(&mut peer, "a.txt").await;

    peer.send_tag(RequestTag::Unknown(b'9')).await.unwrap();
    wait_until(|| index.is_empty()).await;
}

#[tokio::test]
async fn test_malformed_filename_ends_session() {
    let (addr, index) = start_server().await;
    let mut peer = connect_as(addr, 7).await;

    peer.send_request(RequestTag::Register, &name("a.txt"))
        .await
        .unwrap();
    search(&mut peer, "a.txt").await;

    // register tag followed by an all-zero (empty) filename field
    let mut stream = peer.into_inner();
    let mut frame = vec![b'1'];
    frame.extend_from_slice(&[0u8; 256]);
    stream.write_all(&frame).await.unwrap();

    wait_until(|| index.is_empty()).await;
}

#[tokio::test]
async fn test_unidentified_client_leaves_index_untouched() {
    let (addr, index) = start_server().await;
    index.register("keep.txt", id(42));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(&[1, 0]).await.unwrap();
    drop(stream);

    // a bogus identity also closes without cleanup
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(&0i32.to_le_bytes()).await.unwrap();
    drop(stream);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(index.search("keep.txt"), vec![id(42)]);
}

#[tokio::test]
async fn test_concurrent_peers_register_same_file() {
    let (addr, index) = start_server().await;

    let tasks = (1..=20u16).map(|port| async move {
        let mut peer = connect_as(addr, 6000 + port).await;
        peer.send_request(RequestTag::Register, &name("shared.iso"))
            .await
            .unwrap();
        // round trip so the register is applied before the task ends
        search(&mut peer, "shared.iso").await;
        peer
    });
    let peers = futures::future::join_all(tasks).await;

    let mut found = index.search("shared.iso");
    found.sort();
    let expected: Vec<_> = (1..=20u16).map(|p| id(6000 + p)).collect();
    assert_eq!(found, expected);

    drop(peers);
    wait_until(|| index.is_empty()).await;
}
