//! Tests de integración del servidor de archivos
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto efímero, con un
//! directorio raíz temporal, y le habla con sockets crudos, igual que lo
//! haría un cliente HTTP real. Al final pide el apagado y espera el
//! drenaje.

use file_server::config::Config;
use file_server::files::FileManager;
use file_server::server::{Server, ShutdownHandle};
use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

static NEXT_ROOT: AtomicUsize = AtomicUsize::new(0);

/// Servidor de test con su raíz temporal
struct TestServer {
    addr: SocketAddr,
    root: PathBuf,
    shutdown: ShutdownHandle,
    join: Option<thread::JoinHandle<()>>,
}

impl TestServer {
    /// Levanta un servidor sobre un directorio temporal vacío
    fn start() -> TestServer {
        let root = std::env::temp_dir().join(format!(
            "file_server_integration_{}_{}",
            std::process::id(),
            NEXT_ROOT.fetch_add(1, Ordering::SeqCst)
        ));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).expect("crear raíz temporal");

        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            root: root.to_string_lossy().into_owned(),
        };
        let handler = Arc::new(FileManager::new(&root));
        let mut server = Server::new(config, handler);
        let addr = server.bind().expect("bind");
        let shutdown = server.shutdown_handle().expect("shutdown handle");

        let join = thread::spawn(move || {
            server.run().expect("run");
        });

        TestServer {
            addr,
            root,
            shutdown,
            join: Some(join),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.shutdown();
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// Helper: envía un request crudo y retorna la response completa
fn send_request(addr: SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).expect("connect");

    // Configurar timeouts
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    stream
        .set_write_timeout(Some(Duration::from_secs(5)))
        .unwrap();

    stream.write_all(raw.as_bytes()).unwrap();
    stream.flush().unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

/// Helper: extrae el body de una response HTTP
fn extract_body(response: &str) -> &str {
    if let Some(pos) = response.find("\r\n\r\n") {
        &response[pos + 4..]
    } else {
        ""
    }
}

#[test]
fn test_put_then_get_roundtrip() {
    let server = TestServer::start();

    let put = send_request(
        server.addr,
        "PUT /saludo.txt HTTP/1.1\r\nHost: localhost\r\nContent-Length: 4\r\n\r\nhola",
    );
    assert!(put.contains("200 OK"), "PUT falló: {}", put);

    let get = send_request(server.addr, "GET /saludo.txt HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert!(get.contains("200 OK"));
    assert!(get.contains("Content-Type: application/octet-stream"));
    assert!(get.contains("Content-Disposition: attachment; filename=\"saludo.txt\""));
    assert_eq!(extract_body(&get), "hola");
}

#[test]
fn test_get_directory_listing() {
    let server = TestServer::start();
    fs::write(server.root.join("uno.txt"), b"1").unwrap();
    fs::create_dir(server.root.join("carpeta")).unwrap();
    fs::write(server.root.join("carpeta/dos.txt"), b"2").unwrap();

    let response = send_request(server.addr, "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");

    assert!(response.contains("200 OK"));
    assert!(response.contains("Content-Type: application/json; charset=utf-8"));
    let body = extract_body(&response);
    assert!(body.contains("\"uno.txt\""));
    assert!(body.contains("\"carpeta\""));
    assert!(body.contains("\"dos.txt\""));
    assert!(body.contains("\"directory\""));
}

#[test]
fn test_head_reports_file_metadata() {
    let server = TestServer::start();
    fs::write(server.root.join("datos.bin"), b"12345678").unwrap();

    let response = send_request(
        server.addr,
        "HEAD /datos.bin HTTP/1.1\r\nHost: localhost\r\n\r\n",
    );

    assert!(response.contains("200 OK"));
    assert!(response.contains("Content-Length: 8"));
    assert!(response.contains("File-Name: datos.bin"));
    assert_eq!(extract_body(&response), "");
}

#[test]
fn test_copy_then_delete() {
    let server = TestServer::start();
    fs::write(server.root.join("orig.txt"), b"contenido").unwrap();

    let copy = send_request(
        server.addr,
        "COPY /copia.txt HTTP/1.1\r\nHost: localhost\r\nX-Copy-From: /orig.txt\r\n\r\n",
    );
    assert!(copy.contains("200 Ok"), "COPY falló: {}", copy);
    assert_eq!(
        fs::read(server.root.join("copia.txt")).unwrap(),
        b"contenido"
    );

    let delete = send_request(
        server.addr,
        "DELETE /orig.txt HTTP/1.1\r\nHost: localhost\r\n\r\n",
    );
    assert!(delete.contains("200 Ok"));
    assert!(!server.root.join("orig.txt").exists());
}

#[test]
fn test_get_missing_file_is_404() {
    let server = TestServer::start();

    let response = send_request(
        server.addr,
        "GET /no-existe HTTP/1.1\r\nHost: localhost\r\n\r\n",
    );

    assert!(response.starts_with("HTTP/1.1 404 No such file\r\n"));
    assert_eq!(extract_body(&response), "No such file");
}

#[test]
fn test_unsupported_method_is_404() {
    let server = TestServer::start();

    let response = send_request(server.addr, "POST /x HTTP/1.1\r\nHost: localhost\r\n\r\n");

    assert!(response.starts_with("HTTP/1.1 404 Not found\r\n"));
}

#[test]
fn test_missing_host_is_400() {
    let server = TestServer::start();

    let response = send_request(server.addr, "GET / HTTP/1.1\r\n\r\n");

    assert!(response.starts_with("HTTP/1.1 400 Host header is missing\r\n"));
    assert_eq!(extract_body(&response), "Host header is missing");
}

#[test]
fn test_http_10_is_rejected_with_505() {
    let server = TestServer::start();

    let response = send_request(server.addr, "GET / HTTP/1.0\r\nHost: localhost\r\n\r\n");

    assert!(response.starts_with("HTTP/1.1 505 HTTP Version Not Supported\r\n"));
}

#[test]
fn test_malformed_request_line_is_400() {
    let server = TestServer::start();

    let response = send_request(server.addr, "GET /\r\nHost: localhost\r\n\r\n");

    assert!(response.starts_with("HTTP/1.1 400 Malformed request line\r\n"));
}

#[test]
fn test_concurrent_clients_get_their_own_files() {
    let server = TestServer::start();
    fs::write(server.root.join("a.txt"), b"AAA").unwrap();
    fs::write(server.root.join("b.txt"), b"BBB").unwrap();

    let addr = server.addr;
    let handle_a =
        thread::spawn(move || send_request(addr, "GET /a.txt HTTP/1.1\r\nHost: h\r\n\r\n"));
    let handle_b =
        thread::spawn(move || send_request(addr, "GET /b.txt HTTP/1.1\r\nHost: h\r\n\r\n"));

    let response_a = handle_a.join().unwrap();
    let response_b = handle_b.join().unwrap();

    assert_eq!(extract_body(&response_a), "AAA");
    assert_eq!(extract_body(&response_b), "BBB");
}

#[test]
fn test_multiple_requests_sequentially() {
    let server = TestServer::start();

    // Verificar que el servidor puede manejar varios requests seguidos
    for i in 0..5 {
        let put = send_request(
            server.addr,
            &format!(
                "PUT /f{}.txt HTTP/1.1\r\nHost: h\r\nContent-Length: 1\r\n\r\n{}",
                i, i
            ),
        );
        assert!(put.contains("200 OK"), "Request {} falló", i);
    }

    let listing = send_request(server.addr, "GET / HTTP/1.1\r\nHost: h\r\n\r\n");
    for i in 0..5 {
        assert!(extract_body(&listing).contains(&format!("f{}.txt", i)));
    }
}

#[test]
fn test_body_binary_roundtrip() {
    let server = TestServer::start();

    // Body binario con bytes altos: va y vuelve intacto
    let payload: Vec<u8> = vec![0x00, 0x01, 0xFE, 0xFF];
    let mut request = format!(
        "PUT /bin.dat HTTP/1.1\r\nHost: h\r\nContent-Length: {}\r\n\r\n",
        payload.len()
    )
    .into_bytes();
    request.extend_from_slice(&payload);

    let mut stream = TcpStream::connect(server.addr).unwrap();
    stream.write_all(&request).unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();
    assert!(String::from_utf8_lossy(&response).contains("200 OK"));

    assert_eq!(fs::read(server.root.join("bin.dat")).unwrap(), payload);
}
