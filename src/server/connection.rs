//! # Worker de Conexión
//! src/server/connection.rs
//!
//! Procesamiento de una conexión aceptada, de punta a punta:
//!
//! ```text
//! Aceptada → Parseando → Despachando → Respondiendo → Cerrada
//! ```
//!
//! Cada conexión se procesa exactamente una vez, secuencialmente y con
//! I/O bloqueante, en su propio thread. Cualquier falla del camino
//! parse → handler → respuesta se recupera acá y se convierte en una
//! respuesta sobre esta misma conexión; nada se propaga al acceptor ni a
//! otras conexiones. La única excepción es el peer que corta la conexión:
//! en ese caso no hay a quién responderle y la conexión se abandona en
//! silencio.

use crate::http::{HttpError, Request, Response, ServerError};
use crate::server::handler::Handler;
use std::io::{BufReader, BufWriter, Write};
use std::net::{Shutdown, TcpStream};

/// Atiende una conexión completa y la cierra
///
/// No devuelve error: todo resultado posible ya fue respondido al cliente
/// (o el cliente ya no está).
pub(crate) fn serve_client(stream: TcpStream, handler: &dyn Handler) {
    match process(&stream, handler) {
        Ok(()) => {}
        Err(err) if err.is_peer_reset() => {
            // El peer cortó la conexión: no se intenta responder
        }
        Err(err) => send_error(&stream, &err),
    }

    // Cerrada: la conexión (y con ella el stream del body) se libera acá
    let _ = stream.shutdown(Shutdown::Both);
}

/// Camino feliz: parsear, despachar al handler y responder
fn process(stream: &TcpStream, handler: &dyn Handler) -> Result<(), ServerError> {
    // Parseando
    let reader = BufReader::new(stream.try_clone()?);
    let mut request = Request::parse(reader)?;

    // Despachando
    let response = handler.handle_request(&mut request)?;

    // Respondiendo
    send_response(stream, &response)
}

/// Serializa una respuesta sobre la conexión y cierra el lado de escritura
fn send_response(stream: &TcpStream, response: &Response) -> Result<(), ServerError> {
    let mut wfile = BufWriter::new(stream.try_clone()?);
    response.write_to(&mut wfile)?;
    wfile.flush()?;

    println!("   ✅ send {} {}", response.status(), response.reason());

    stream.shutdown(Shutdown::Write)?;
    Ok(())
}

/// Mapea un error a una respuesta y la envía
///
/// - Error de protocolo: su status y reason, con su body si lo trae o el
///   reason como body si no.
/// - Cualquier otra falla: 500 fijo con la descripción de la falla.
///
/// Si ni siquiera la respuesta de error se puede escribir, solo queda
/// registrarlo: el cliente no va a recibir nada.
fn send_error(stream: &TcpStream, err: &ServerError) {
    let response = build_error_response(err);
    if let Err(write_err) = send_response(stream, &response) {
        eprintln!("   ❌ No se pudo enviar la respuesta de error: {}", write_err);
    }
}

/// Construye la respuesta que corresponde a un error de procesamiento
fn build_error_response(err: &ServerError) -> Response {
    match err {
        ServerError::Http(HttpError {
            status,
            reason,
            body,
        }) => {
            let body = body.clone().unwrap_or_else(|| reason.clone());
            Response::new(*status, reason).with_body(&body)
        }
        unclassified => {
            Response::new(500, "Internal Server Error").with_body(&unclassified.to_string())
        }
    }
}
