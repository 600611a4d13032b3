//! # Contrato del Handler
//! src/server/handler.rs
//!
//! El framework no sabe nada de la aplicación: delega cada request parseado
//! en un [`Handler`] y serializa lo que este devuelva. La aplicación decide
//! qué responder; el framework decide cómo llega al cable.

use crate::http::{Request, Response, ServerError};

/// Lógica de aplicación: de un request parseado a una respuesta
///
/// Un handler puede:
/// - devolver una [`Response`] (camino normal),
/// - devolver un [`crate::http::HttpError`] vía `ServerError::Http` para
///   responder un status específico (404, 400, ...),
/// - devolver cualquier otra falla (`Io`, `Other`), que el servidor mapea
///   a un 500 genérico.
///
/// El request llega por `&mut` porque leer el body lo consume del stream;
/// el préstamo además garantiza que el handler no puede retener el request
/// ni su stream más allá de la llamada (el worker cierra la conexión
/// apenas termina de responder).
///
/// # Ejemplo
/// ```
/// use file_server::http::{Request, Response, ServerError};
/// use file_server::server::Handler;
///
/// struct Hello;
///
/// impl Handler for Hello {
///     fn handle_request(&self, request: &mut Request) -> Result<Response, ServerError> {
///         Ok(Response::new(200, "OK").with_body(&format!("hola {}", request.path())))
///     }
/// }
/// ```
pub trait Handler: Send + Sync {
    /// Procesa un request y produce una respuesta o un error
    fn handle_request(&self, request: &mut Request) -> Result<Response, ServerError>;
}
