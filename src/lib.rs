//! # File Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 concurrente implementado desde cero para demostrar
//! conceptos de sistemas operativos: concurrencia, sincronización y manejo
//! de recursos. Un thread por conexión, I/O bloqueante, apagado por
//! drenaje.
//!
//! ## Arquitectura
//!
//! El crate está dividido en módulos especializados:
//! - `http`: Parsing y serialización del protocolo HTTP/1.1, con límites
//! - `server`: Acceptor TCP, workers de conexión y registro para el apagado
//! - `files`: Handler de aplicación que administra archivos (GET, PUT,
//!   HEAD, DELETE, COPY)
//! - `config`: Configuración por CLI y variables de entorno
//!
//! El framework (`http` + `server`) no depende de la aplicación (`files`):
//! cualquier tipo que implemente [`server::Handler`] puede ir del otro
//! lado del servidor.
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use std::sync::Arc;
//! use file_server::config::Config;
//! use file_server::files::FileManager;
//! use file_server::server::Server;
//!
//! let config = Config::default();
//! let handler = Arc::new(FileManager::new("."));
//! let mut server = Server::new(config, handler);
//!
//! server.bind().expect("no se pudo abrir el puerto");
//! server.run().expect("error fatal del servidor");
//! ```

pub mod config;
pub mod files;
pub mod http;
pub mod server;
