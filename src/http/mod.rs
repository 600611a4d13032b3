//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Este módulo implementa el protocolo HTTP/1.1 desde cero, sin librerías
//! de alto nivel. Incluye:
//!
//! - Parsing de requests HTTP/1.1 con límites explícitos de tamaño
//! - Headers como multi-mapa ordenado (duplicados permitidos)
//! - Construcción y serialización de responses
//! - Errores de protocolo con status/reason/body
//!
//! ## Alcance del protocolo
//!
//! El servidor habla un subconjunto mínimo de HTTP/1.1:
//! - el largo del body viene siempre de `Content-Length` (sin chunked
//!   transfer encoding),
//! - la conexión se cierra después de cada respuesta (sin keep-alive),
//! - el header `Host` es obligatorio en todo request.

// Submódulos del módulo HTTP
pub mod error; // Errores de protocolo y de conexión
pub mod headers; // Multi-mapa ordenado de headers
pub mod request; // Parsing de HTTP requests
pub mod response; // Construcción de HTTP responses

// Re-exportamos los tipos principales para facilitar su uso
// Esto permite usar `http::Request` en vez de `http::request::Request`
pub use error::{HttpError, ServerError};
pub use headers::Headers;
pub use request::{Request, RequestUrl};
pub use response::Response;

/// Tamaño máximo en bytes de una línea (request line o header)
pub const MAX_LINE: usize = 64 * 1024;

/// Cantidad máxima de líneas de header por request
pub const MAX_HEADERS: usize = 100;
