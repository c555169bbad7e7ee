mod common;

use iremind::{db::Database, start_server};

#[tokio::test]
async fn test_start_server_binds_random_port() {
    let db = Database::open(":memory:").await.unwrap();

    let (handle, addr) = start_server(common::test_config(db), 0).await.unwrap();

    assert_ne!(addr.port(), 0);
    assert!(tokio::net::TcpStream::connect(addr).await.is_ok());
    handle.abort();
}
