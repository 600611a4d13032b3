//! # Gestor de Archivos
//! src/files.rs
//!
//! El handler de aplicación: expone un directorio raíz por HTTP. Es lógica
//! de aplicación común y corriente sobre `std::fs`; el framework no sabe
//! nada de ella, solo ve el trait [`Handler`].
//!
//! ## Operaciones
//!
//! | Método   | Efecto                                                    |
//! |----------|-----------------------------------------------------------|
//! | `PUT`    | Escribe el body del request en el path (crea directorios) |
//! | `GET`    | Descarga un archivo, o lista un directorio como JSON      |
//! | `HEAD`   | Metadatos de un archivo (tamaño, fechas, nombre)          |
//! | `DELETE` | Borra un archivo o un directorio completo                 |
//! | `COPY`   | Copia el archivo indicado en `X-Copy-From` al path        |
//!
//! Cualquier otro método responde 404. Los paths con `..` se rechazan.

use crate::http::{HttpError, Request, Response, ServerError};
use crate::server::Handler;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Handler que sirve y administra archivos bajo un directorio raíz
pub struct FileManager {
    root: PathBuf,
}

/// Nodo del árbol JSON que describe un directorio
///
/// Formato: `{"name": ..., "type": "directory" | "file", "children": [...]}`
/// (el campo `children` solo aparece en directorios).
#[derive(Debug, Serialize)]
struct FsNode {
    name: String,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Vec<FsNode>>,
}

impl FsNode {
    /// Construye el árbol de un path, saltando las entradas ocultas
    fn from_path(path: &Path) -> std::io::Result<FsNode> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| ".".to_string());

        if path.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(path)?
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .map(|entry| entry.path())
                .filter(|child| !file_name_of(child).starts_with('.'))
                .collect();
            entries.sort();

            let mut children = Vec::new();
            for child in &entries {
                children.push(FsNode::from_path(child)?);
            }

            Ok(FsNode {
                name,
                kind: "directory",
                children: Some(children),
            })
        } else {
            Ok(FsNode {
                name,
                kind: "file",
                children: None,
            })
        }
    }
}

/// Nombre base de un path, como string
fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl FileManager {
    /// Crea el gestor sirviendo el directorio dado
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resuelve un path del request contra el directorio raíz
    ///
    /// Los paths con `..` se rechazan de plano.
    fn resolve(&self, request_path: &str) -> Result<PathBuf, ServerError> {
        if request_path.contains("..") {
            return Err(HttpError::new(400, "Invalid path").into());
        }
        Ok(self.root.join(request_path.trim_start_matches('/')))
    }

    /// PUT: escribe el body del request en el path
    fn put_file(&self, request: &mut Request, path: &Path) -> Result<Response, ServerError> {
        let body = match request.body()? {
            Some(body) => body,
            None => return Err(HttpError::new(400, "Request body is missing").into()),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, body)?;

        Ok(Response::new(200, "OK"))
    }

    /// GET: descarga un archivo o lista un directorio como JSON
    fn get_entry(&self, path: &Path) -> Result<Response, ServerError> {
        if path.is_file() {
            let contents = fs::read(path)?;
            let disposition = format!("attachment; filename=\"{}\"", file_name_of(path));

            Ok(Response::new(200, "OK")
                .with_header("Content-Type", "application/octet-stream")
                .with_header("Content-Disposition", &disposition)
                .with_body_bytes(contents))
        } else if path.exists() {
            let tree = FsNode::from_path(path)?;
            let json = serde_json::to_string_pretty(&tree)
                .map_err(|e| ServerError::Other(e.to_string()))?;

            Ok(Response::new(200, "OK")
                .with_header("Content-Type", "application/json; charset=utf-8")
                .with_body(&json))
        } else {
            Ok(Response::new(404, "No such file").with_body("No such file"))
        }
    }

    /// HEAD: metadatos de un archivo, sin body
    fn head_file(&self, path: &Path) -> Result<Response, ServerError> {
        if !path.is_file() {
            return Ok(Response::new(400, "Not a file"));
        }

        let metadata = fs::metadata(path)?;
        let mut response =
            Response::new(200, "OK").with_header("Content-Length", &metadata.len().to_string());

        // No todos los filesystems informan las fechas; si no están, los
        // headers simplemente no van
        if let Ok(modified) = metadata.modified() {
            response.add_header("Last-Modified", &http_date(modified));
        }
        if let Ok(created) = metadata.created() {
            response.add_header("Created", &http_date(created));
        }
        response.add_header("File-Name", &file_name_of(path));

        Ok(response)
    }

    /// DELETE: borra un archivo o un directorio completo
    fn delete_entry(&self, path: &Path) -> Result<Response, ServerError> {
        if path.is_file() {
            fs::remove_file(path)?;
            Ok(Response::new(200, "Ok"))
        } else if path.exists() {
            fs::remove_dir_all(path)?;
            Ok(Response::new(200, "Ok"))
        } else {
            Ok(Response::new(404, "No such file/folder").with_body("No such file/folder"))
        }
    }

    /// COPY: copia el archivo de `X-Copy-From` al path del request
    fn copy_file(&self, request: &Request, path: &Path) -> Result<Response, ServerError> {
        let source = match request.headers().get("X-Copy-From") {
            Some(from) => self.resolve(from)?,
            None => return Err(HttpError::new(400, "X-Copy-From header is missing").into()),
        };

        fs::copy(source, path)?;
        Ok(Response::new(200, "Ok"))
    }
}

impl Handler for FileManager {
    fn handle_request(&self, request: &mut Request) -> Result<Response, ServerError> {
        if request.path() == "/favicon.ico" {
            return Ok(Response::new(404, "Not Found"));
        }

        let method = request.method().to_string();
        let path = self.resolve(request.path())?;

        match method.as_str() {
            "PUT" => self.put_file(request, &path),
            "GET" => self.get_entry(&path),
            "HEAD" => self.head_file(&path),
            "DELETE" => self.delete_entry(&path),
            "COPY" => self.copy_file(request, &path),
            _ => Err(HttpError::new(404, "Not found").into()),
        }
    }
}

/// Formatea un instante como fecha HTTP (RFC 7231)
fn http_date(time: SystemTime) -> String {
    httpdate::fmt_http_date(time)
}
