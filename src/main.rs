//! # File Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor. Parsea la configuración, arma el gestor
//! de archivos y corre el servidor hasta que llegue Ctrl-C; en ese momento
//! deja de aceptar conexiones y espera a las que están en vuelo.

use file_server::config::Config;
use file_server::files::FileManager;
use file_server::server::Server;
use std::sync::Arc;

fn main() {
    println!("=================================");
    println!("  File Server HTTP/1.1");
    println!("  Principios de Sistemas Operativos");
    println!("=================================\n");

    // Configuración desde CLI y variables de entorno
    let config = Config::new();

    println!("⚙️  Configuración:");
    println!("   Puerto: {}", config.port);
    println!("   Host: {}", config.host);
    println!("   Raíz: {}", config.root);
    println!();

    // El handler de aplicación: el gestor de archivos sobre la raíz
    let handler = Arc::new(FileManager::new(&config.root));
    let mut server = Server::new(config, handler);

    if let Err(e) = server.bind() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }

    // Ctrl-C dispara el apagado ordenado: cerrar el socket de escucha y
    // drenar los workers en vuelo
    if let Some(handle) = server.shutdown_handle() {
        let result = ctrlc::set_handler(move || {
            println!("\n[*] Ctrl-C recibido, apagando...");
            handle.shutdown();
        });
        if let Err(e) = result {
            eprintln!("   ⚠️ No se pudo instalar el handler de Ctrl-C: {}", e);
        }
    }

    // Correr el servidor (esto bloquea hasta el apagado)
    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
