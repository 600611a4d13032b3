//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Este módulo implementa el parsing de requests HTTP/1.1 sobre un stream
//! de bytes orientado a líneas, con límites explícitos de tamaño.
//!
//! ## Formato de un Request HTTP/1.1
//!
//! ```text
//! GET /carpeta/archivo.txt?modo=raw HTTP/1.1\r\n
//! Host: localhost:8003\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hola!
//! ```
//!
//! ## Reglas de parsing
//!
//! 1. **Request line**: exactamente 3 tokens (método, target, versión),
//!    máximo [`MAX_LINE`] bytes, versión obligatoria `HTTP/1.1`.
//! 2. **Headers**: líneas `Nombre: valor` hasta la línea vacía, máximo
//!    [`MAX_HEADERS`] líneas de [`MAX_LINE`] bytes cada una.
//! 3. **Host**: obligatorio; sin él el request se rechaza con 400.
//! 4. **Body**: NO se lee durante el parsing. Se lee bajo demanda con
//!    [`Request::body`], usando `Content-Length`.
//!
//! Las líneas se decodifican byte a byte (ISO-8859-1), así que cualquier
//! valor 0–255 es representable y el decode nunca falla.

use super::error::{HttpError, ServerError};
use super::headers::Headers;
use super::{MAX_HEADERS, MAX_LINE};
use percent_encoding::percent_decode_str;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::io::{BufRead, Read};

/// Request HTTP/1.1 parseado, dueño del stream de la conexión
///
/// El request pertenece al worker que atiende la conexión; el stream del
/// body vive lo que vive la conexión y no debe leerse después de cerrarla.
///
/// # Ejemplo
/// ```
/// use std::io::Cursor;
/// use file_server::http::Request;
///
/// let raw = b"GET /files?name=a.txt HTTP/1.1\r\nHost: localhost\r\n\r\n".to_vec();
/// let request = Request::parse(Cursor::new(raw)).unwrap();
///
/// assert_eq!(request.method(), "GET");
/// assert_eq!(request.path(), "/files");
/// assert_eq!(request.query().get("name"), Some(&vec!["a.txt".to_string()]));
/// ```
pub struct Request {
    /// Método HTTP tal como llegó (GET, PUT, COPY, ...)
    method: String,

    /// Request-target crudo de la request line
    target: String,

    /// Versión HTTP (siempre "HTTP/1.1" al llegar acá)
    version: String,

    /// Headers en orden de llegada, con duplicados
    headers: Headers,

    /// Stream de lectura de la conexión, para el body
    rfile: Box<dyn BufRead + Send>,

    /// Vista perezosa: target separado en path y query string
    url: OnceCell<RequestUrl>,

    /// Vista perezosa: query parameters parseados
    query: OnceCell<HashMap<String, Vec<String>>>,
}

/// Target de un request separado en sus componentes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    /// Path del recurso (antes del '?')
    pub path: String,

    /// Query string cruda (después del '?', sin el fragmento)
    pub query: String,
}

impl RequestUrl {
    /// Separa un request-target en path y query string
    ///
    /// El fragmento (`#...`) se descarta, como hace cualquier parser de URLs.
    fn parse(target: &str) -> RequestUrl {
        let without_fragment = match target.split_once('#') {
            Some((before, _)) => before,
            None => target,
        };

        match without_fragment.split_once('?') {
            Some((path, query)) => RequestUrl {
                path: path.to_string(),
                query: query.to_string(),
            },
            None => RequestUrl {
                path: without_fragment.to_string(),
                query: String::new(),
            },
        }
    }
}

impl Request {
    /// Parsea request line y headers desde un stream de lectura
    ///
    /// El stream queda dentro del `Request` para la lectura diferida del
    /// body. El body NO se consume acá.
    ///
    /// # Errores
    ///
    /// - `400 Request line is too long` / `400 Malformed request line`
    /// - `505 HTTP Version Not Supported`
    /// - `494 Request header too large` / `494 Too many headers`
    /// - `400 Host header is missing`
    /// - `ServerError::Io` si el socket falla durante la lectura
    pub fn parse<R>(reader: R) -> Result<Request, ServerError>
    where
        R: BufRead + Send + 'static,
    {
        let mut rfile: Box<dyn BufRead + Send> = Box::new(reader);

        let (method, target, version) = parse_request_line(&mut *rfile)?;
        let headers = parse_headers(&mut *rfile)?;

        if headers.get("Host").is_none() {
            return Err(HttpError::new(400, "Host header is missing").into());
        }

        Ok(Request {
            method,
            target,
            version,
            headers,
            rfile,
            url: OnceCell::new(),
            query: OnceCell::new(),
        })
    }

    /// Lee el body del request según `Content-Length`
    ///
    /// Devuelve `None` si el header no está presente (request sin body, que
    /// no es lo mismo que un body de cero bytes). Si está presente, lee
    /// exactamente esa cantidad de bytes del stream, bloqueando hasta
    /// tenerlos o hasta que la conexión falle.
    pub fn body(&mut self) -> Result<Option<Vec<u8>>, ServerError> {
        let size = match self.headers.get("Content-Length") {
            Some(value) => value,
            None => return Ok(None),
        };

        let size: usize = size
            .trim()
            .parse()
            .map_err(|_| HttpError::new(400, "Invalid Content-Length header"))?;

        let mut body = vec![0u8; size];
        self.rfile.read_exact(&mut body)?;
        Ok(Some(body))
    }

    // === Métodos públicos para acceder a los campos ===

    /// Método HTTP del request
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request-target crudo
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Headers del request
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Target separado en path y query (se calcula una sola vez)
    pub fn url(&self) -> &RequestUrl {
        self.url.get_or_init(|| RequestUrl::parse(&self.target))
    }

    /// Path del recurso pedido
    pub fn path(&self) -> &str {
        &self.url().path
    }

    /// Query parameters parseados (se calculan una sola vez)
    ///
    /// Cada clave mapea a la lista de valores con que apareció, ya
    /// decodificados (`%20`, `+`, etc.). Los pares con valor vacío se omiten.
    pub fn query(&self) -> &HashMap<String, Vec<String>> {
        self.query
            .get_or_init(|| parse_query_string(&self.url().query))
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("target", &self.target)
            .field("version", &self.version)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Lee una línea del stream, acotada a MAX_LINE + 1 bytes
///
/// Igual que un `readline(MAX_LINE + 1)`: si la línea real es más larga,
/// acá llega truncada con más de MAX_LINE bytes y el caller la rechaza.
fn read_limited_line(rfile: &mut (dyn BufRead + Send)) -> std::io::Result<Vec<u8>> {
    let mut line = Vec::new();
    let mut limited = (&mut *rfile).take(MAX_LINE as u64 + 1);
    limited.read_until(b'\n', &mut line)?;
    Ok(line)
}

/// Decodifica bytes como ISO-8859-1 (un byte, un carácter; nunca falla)
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Parsea la request line: `METHOD TARGET HTTP/1.1`
fn parse_request_line(
    rfile: &mut (dyn BufRead + Send),
) -> Result<(String, String, String), ServerError> {
    let raw = read_limited_line(rfile)?;
    if raw.len() > MAX_LINE {
        return Err(HttpError::new(400, "Request line is too long").into());
    }

    let line = decode_latin1(&raw);
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() != 3 {
        return Err(HttpError::new(400, "Malformed request line").into());
    }

    let (method, target, version) = (words[0], words[1], words[2]);
    if version != "HTTP/1.1" {
        return Err(HttpError::new(505, "HTTP Version Not Supported").into());
    }

    Ok((method.to_string(), target.to_string(), version.to_string()))
}

/// Acumula las líneas del bloque de headers hasta la línea vacía
fn parse_headers(rfile: &mut (dyn BufRead + Send)) -> Result<Headers, ServerError> {
    let mut lines: Vec<String> = Vec::new();

    loop {
        let raw = read_limited_line(rfile)?;
        if raw.len() > MAX_LINE {
            return Err(HttpError::new(494, "Request header too large").into());
        }

        // Línea vacía (o EOF): fin del bloque de headers
        if raw.is_empty() || raw == b"\r\n" || raw == b"\n" {
            break;
        }

        lines.push(decode_latin1(&raw));
        if lines.len() > MAX_HEADERS {
            return Err(HttpError::new(494, "Too many headers").into());
        }
    }

    Ok(Headers::parse(&lines))
}

/// Parsea una query string en un multi-mapa clave → lista de valores
///
/// Ejemplo: `"a=1&b=2&a=3"` → `{"a": ["1", "3"], "b": ["2"]}`
fn parse_query_string(query: &str) -> HashMap<String, Vec<String>> {
    let mut params: HashMap<String, Vec<String>> = HashMap::new();

    for pair in query.split('&') {
        let (key, value) = match pair.split_once('=') {
            Some(split) => split,
            None => continue,
        };
        if value.is_empty() {
            continue;
        }

        params
            .entry(url_decode(key))
            .or_default()
            .push(url_decode(value));
    }

    params
}

/// Decodifica un componente de query string (`+` y percent-encoding)
fn url_decode(s: &str) -> String {
    let with_spaces = s.replace('+', " ");
    percent_decode_str(&with_spaces)
        .decode_utf8_lossy()
        .into_owned()
}
