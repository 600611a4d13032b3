//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Este módulo proporciona la API para construir respuestas HTTP/1.1 y
//! serializarlas a bytes para enviar al cliente.
//!
//! ## Formato de una respuesta HTTP/1.1
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: application/json; charset=utf-8\r\n
//! Content-Length: 13\r\n
//! \r\n
//! {"ok": true}
//! ```
//!
//! La serialización es de una sola pasada y preserva el orden: los headers
//! se escriben exactamente como los puso quien construyó la respuesta, sin
//! reordenar, sin deduplicar y sin calcular headers automáticos. El único
//! que agrega `Content-Length` es el builder [`Response::with_body`], en
//! nombre del caller, nunca el serializador.

use std::io::{self, Write};

/// Respuesta HTTP/1.1 completa
///
/// # Ejemplo de uso
///
/// ```
/// use file_server::http::Response;
///
/// let response = Response::new(200, "OK")
///     .with_header("Content-Type", "text/plain")
///     .with_body("Hello");
///
/// let bytes = response.to_bytes();
/// // bytes contiene "HTTP/1.1 200 OK\r\n...\r\n\r\nHello"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: u16,

    /// Reason phrase que acompaña al status ("OK", "No such file", ...)
    reason: String,

    /// Headers en el orden en que se van a escribir (duplicados permitidos)
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta, si lo hay
    body: Option<Vec<u8>>,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    pub fn new(status: u16, reason: &str) -> Self {
        Self {
            status,
            reason: reason.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Agrega un header al final de la lista
    ///
    /// No sobrescribe: agregar dos veces el mismo nombre produce dos
    /// entradas, en ese orden.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Establece el body desde un string y agrega su `Content-Length`
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::http::Response;
    ///
    /// let response = Response::new(200, "OK").with_body("hola");
    /// assert_eq!(response.headers(), &[("Content-Length".to_string(), "4".to_string())]);
    /// ```
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el body desde bytes y agrega su `Content-Length`
    ///
    /// Útil para respuestas binarias (archivos, por ejemplo).
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.headers
            .push(("Content-Length".to_string(), body.len().to_string()));
        self.body = Some(body);
        self
    }

    /// Serializa la respuesta a bytes
    ///
    /// Una sola pasada, en orden: status line, headers tal como están,
    /// línea en blanco y body (si hay). Llamarla dos veces produce
    /// exactamente los mismos bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();

        // 1. Status line: HTTP/1.1 200 OK\r\n
        let status_line = format!("HTTP/1.1 {} {}\r\n", self.status, self.reason);
        result.extend_from_slice(status_line.as_bytes());

        // 2. Headers, en el orden en que los puso el caller
        for (name, value) in &self.headers {
            let header_line = format!("{}: {}\r\n", name, value);
            result.extend_from_slice(header_line.as_bytes());
        }

        // 3. Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");

        // 4. Body tal cual, byte a byte
        if let Some(body) = &self.body {
            result.extend_from_slice(body);
        }

        result
    }

    /// Escribe la respuesta serializada en un writer
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    /// Código de estado de la respuesta
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Reason phrase de la respuesta
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Headers en orden de escritura
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Body de la respuesta, si lo hay
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}
