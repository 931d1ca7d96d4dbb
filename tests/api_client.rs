//! Integration tests for the HTTP client against a local one-shot server.
//!
//! Each test binds a listener on a loopback port, serves a single canned
//! HTTP/1.1 response, and drives a real service call through [`ApiClient`]
//! to check what comes out the other end.

use std::net::SocketAddr;

use serde_json::json;
use testresult::TestResult;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

use kirana::{
    api::{ApiClient, ApiError, HttpProductsService, ProductsService},
    config::Config,
    models::user::{AuthToken, Role, User},
    session::{Session, SessionStore},
};

fn product_body(name: &str) -> String {
    json!({
        "success": true,
        "message": "Product retrieved",
        "data": {
            "id": "p-1",
            "name": name,
            "price": 165.5,
            "stockQuantity": 40,
            "minStockLevel": 10,
            "unit": "bag",
            "status": "ACTIVE",
            "isLowStock": false,
            "isExpiringSoon": false,
            "createdAt": "2026-01-05T09:00:00Z",
            "updatedAt": "2026-01-05T09:00:00Z"
        }
    })
    .to_string()
}

async fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut request = Vec::new();
    let mut chunk = [0_u8; 1024];

    loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(count) => {
                request.extend_from_slice(chunk.get(..count).unwrap_or_default());

                if request.windows(4).any(|window| window == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }

    request
}

async fn respond(stream: &mut TcpStream, status_line: &str, body: &str) {
    let response = format!(
        "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len(),
    );

    stream.write_all(response.as_bytes()).await.ok();
    stream.shutdown().await.ok();
}

/// Serve one canned response on a fresh port and return the bound address.
async fn serve_once(status_line: &'static str, body: String) -> TestResult<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            read_request(&mut stream).await;
            respond(&mut stream, status_line, &body).await;
        }
    });

    Ok(addr)
}

fn service(addr: SocketAddr, session: SessionStore) -> Result<HttpProductsService, ApiError> {
    let config = Config {
        base_url: format!("http://{addr}"),
        session_file: session.path().to_path_buf(),
    };

    Ok(HttpProductsService::new(ApiClient::new(&config, session)?))
}

fn logged_in_session() -> Session {
    Session {
        token: AuthToken::new("jwt-for-tests"),
        user: User {
            id: "usr-001".to_string(),
            email: "owner@kirana.shop".to_string(),
            full_name: "Asha Patel".to_string(),
            role: Role::Owner,
            is_active: true,
        },
    }
}

#[tokio::test]
async fn payload_is_unwrapped_over_the_wire() -> TestResult {
    let dir = tempfile::tempdir()?;
    let addr = serve_once("HTTP/1.1 200 OK", product_body("Basmati Rice 1kg")).await?;

    let store = SessionStore::open(dir.path().join("session.json"))?;
    let products = service(addr, store)?;

    let product = products.by_barcode("8901030509").await?;

    assert_eq!(product.name, "Basmati Rice 1kg");

    Ok(())
}

#[tokio::test]
async fn bearer_token_is_attached_when_logged_in() -> TestResult {
    let dir = tempfile::tempdir()?;

    // Echo the Authorization header back as the product name.
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let request = read_request(&mut stream).await;
            let text = String::from_utf8_lossy(&request);

            let auth = text
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("authorization")
                        .then(|| value.trim().to_string())
                })
                .unwrap_or_default();

            respond(&mut stream, "HTTP/1.1 200 OK", &product_body(&auth)).await;
        }
    });

    let store = SessionStore::open(dir.path().join("session.json"))?;
    store.store(logged_in_session())?;

    let products = service(addr, store)?;
    let product = products.by_barcode("8901030509").await?;

    assert_eq!(product.name, "Bearer jwt-for-tests");

    Ok(())
}

#[tokio::test]
async fn backend_error_carries_the_body_message() -> TestResult {
    let dir = tempfile::tempdir()?;
    let body = json!({"success": false, "message": "Barcode already in use"}).to_string();
    let addr = serve_once("HTTP/1.1 409 Conflict", body).await?;

    let store = SessionStore::open(dir.path().join("session.json"))?;
    let products = service(addr, store)?;

    let result = products.by_barcode("8901030509").await;

    assert!(
        matches!(
            result,
            Err(ApiError::Status { status: 409, ref message }) if message == "Barcode already in use"
        ),
        "expected a 409 with the backend message, got {result:?}"
    );

    Ok(())
}

#[tokio::test]
async fn unauthorized_clears_the_saved_session() -> TestResult {
    let dir = tempfile::tempdir()?;
    let session_file = dir.path().join("session.json");
    let body = json!({"success": false, "message": "Token expired"}).to_string();
    let addr = serve_once("HTTP/1.1 401 Unauthorized", body).await?;

    let store = SessionStore::open(&session_file)?;
    store.store(logged_in_session())?;

    let products = service(addr, store.clone())?;
    let result = products.by_barcode("8901030509").await;

    assert!(
        matches!(result, Err(ApiError::Unauthorized)),
        "expected Unauthorized, got {result:?}"
    );
    assert!(!store.is_authenticated());
    assert!(!session_file.exists());

    Ok(())
}
