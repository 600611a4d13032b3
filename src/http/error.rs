//! # Errores del Protocolo HTTP
//! src/http/error.rs
//!
//! Este módulo define los dos niveles de error del servidor:
//!
//! - [`HttpError`]: un error de protocolo con status, reason y body opcional.
//!   Corta el procesamiento normal y se convierte directamente en una
//!   respuesta HTTP para el cliente.
//! - [`ServerError`]: el error que viaja por el camino parse → handler →
//!   respuesta. Distingue errores de protocolo, errores de transporte (I/O
//!   sobre el socket) y fallas no clasificadas, para que el mapeo a
//!   respuesta sea un único `match` en la frontera de la conexión.

use std::fmt;
use std::io;

/// Error de protocolo HTTP: el servidor se niega a seguir procesando
/// el request y responde con este status.
///
/// El reason phrase lleva el diagnóstico ("Malformed request line",
/// "Too many headers", etc.). Si no hay body explícito, la respuesta de
/// error usa el reason como body.
///
/// # Ejemplo
/// ```
/// use file_server::http::HttpError;
///
/// let err = HttpError::new(505, "HTTP Version Not Supported");
/// assert_eq!(err.status, 505);
/// assert_eq!(err.to_string(), "505 HTTP Version Not Supported");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    /// Código de estado HTTP (400, 494, 505, ...)
    pub status: u16,

    /// Reason phrase que acompaña al status
    pub reason: String,

    /// Texto opcional para el body de la respuesta de error
    pub body: Option<String>,
}

impl HttpError {
    /// Crea un error de protocolo sin body explícito
    pub fn new(status: u16, reason: &str) -> Self {
        Self {
            status,
            reason: reason.to_string(),
            body: None,
        }
    }

    /// Agrega un texto de body al error
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::http::HttpError;
    ///
    /// let err = HttpError::new(400, "Bad request").with_body("Missing parameter");
    /// assert_eq!(err.body.as_deref(), Some("Missing parameter"));
    /// ```
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.reason)
    }
}

impl std::error::Error for HttpError {}

/// Error durante el procesamiento de una conexión
///
/// Las tres variantes reflejan la política de propagación del servidor:
/// `Http` se responde con su propio status, `Io` con reset del peer se
/// abandona en silencio (el resto se responde 500), y `Other` siempre
/// se responde 500 con la descripción de la falla.
#[derive(Debug)]
pub enum ServerError {
    /// Error de protocolo con status explícito
    Http(HttpError),

    /// Error de transporte leyendo o escribiendo el socket
    Io(io::Error),

    /// Falla no clasificada durante el despacho
    Other(String),
}

impl ServerError {
    /// Indica si el error corresponde a un peer que cortó la conexión
    ///
    /// En ese caso no se intenta escribir ninguna respuesta: el peer ya no
    /// está del otro lado del socket.
    pub fn is_peer_reset(&self) -> bool {
        matches!(self, ServerError::Io(e) if e.kind() == io::ErrorKind::ConnectionReset)
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Http(e) => write!(f, "{}", e),
            ServerError::Io(e) => write!(f, "{}", e),
            ServerError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<HttpError> for ServerError {
    fn from(err: HttpError) -> Self {
        ServerError::Http(err)
    }
}

impl From<io::Error> for ServerError {
    fn from(err: io::Error) -> Self {
        ServerError::Io(err)
    }
}
