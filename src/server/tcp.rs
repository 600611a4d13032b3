//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! El acceptor del servidor: es dueño del socket de escucha, acepta
//! conexiones en un loop bloqueante y lanza un thread por conexión. No hay
//! pool ni límite de admisión: cada conexión aceptada recibe su propio
//! thread, que se registra en el [`WorkerRegistry`] compartido.
//!
//! Un fallo al aceptar o al crear el thread se registra y el loop sigue;
//! el acceptor solo termina cuando se pide el apagado. En ese momento
//! cierra el socket de escucha y espera (join) a todos los workers
//! registrados: el apagado es un drenaje, no una cancelación.

use crate::config::Config;
use crate::server::connection::serve_client;
use crate::server::handler::Handler;
use crate::server::registry::WorkerRegistry;
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Servidor HTTP/1.1 concurrente: un thread por conexión
///
/// # Ejemplo
/// ```no_run
/// use std::sync::Arc;
/// use file_server::config::Config;
/// use file_server::files::FileManager;
/// use file_server::server::Server;
///
/// let config = Config::default();
/// let handler = Arc::new(FileManager::new("."));
/// let mut server = Server::new(config, handler);
///
/// server.bind().expect("no se pudo abrir el puerto");
/// server.run().expect("error fatal del servidor");
/// ```
pub struct Server {
    config: Config,
    handler: Arc<dyn Handler>,
    workers: Arc<WorkerRegistry>,
    shutdown: Arc<AtomicBool>,
    listener: Option<TcpListener>,
    local_addr: Option<SocketAddr>,
    next_conn_id: u64,
}

/// Handle clonable para pedir el apagado del servidor desde otro thread
///
/// Marca el flag de apagado y despierta al acceptor (que está bloqueado en
/// `accept`) con una conexión de cortesía al propio socket.
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl ShutdownHandle {
    /// Pide el apagado: el acceptor deja de aceptar y drena los workers
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
        // Conexión de cortesía para desbloquear el accept; si falla es
        // porque el acceptor ya no está escuchando
        let _ = TcpStream::connect(self.addr);
    }
}

impl Server {
    /// Crea el servidor con su configuración y el handler de aplicación
    pub fn new(config: Config, handler: Arc<dyn Handler>) -> Self {
        Self {
            config,
            handler,
            workers: Arc::new(WorkerRegistry::new()),
            shutdown: Arc::new(AtomicBool::new(false)),
            listener: None,
            local_addr: None,
            next_conn_id: 0,
        }
    }

    /// Abre el socket de escucha y devuelve la dirección efectiva
    ///
    /// Con puerto 0 el sistema asigna uno libre; la dirección devuelta
    /// trae el puerto real.
    pub fn bind(&mut self) -> io::Result<SocketAddr> {
        let address = self.config.address();
        let listener = TcpListener::bind(&address)?;
        let local_addr = listener.local_addr()?;

        self.listener = Some(listener);
        self.local_addr = Some(local_addr);
        Ok(local_addr)
    }

    /// Handle para pedir el apagado; disponible después de [`Server::bind`]
    pub fn shutdown_handle(&self) -> Option<ShutdownHandle> {
        self.local_addr.map(|addr| ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            addr,
        })
    }

    /// Loop principal: aceptar, lanzar worker, repetir
    ///
    /// Bloquea hasta que un [`ShutdownHandle`] pida el apagado. Al salir
    /// del loop cierra el socket de escucha y espera a que terminen todos
    /// los workers en vuelo.
    pub fn run(&mut self) -> io::Result<()> {
        if self.listener.is_none() {
            self.bind()?;
        }

        println!(
            "[+] Servidor escuchando en {}",
            self.local_addr.map(|a| a.to_string()).unwrap_or_default()
        );
        println!("[*] Modo concurrente: un thread por conexion\n");

        {
            let listener = self.listener.as_ref().unwrap();

            for stream in listener.incoming() {
                if self.shutdown.load(Ordering::SeqCst) {
                    println!("[*] Apagado pedido: no se aceptan más conexiones");
                    break;
                }

                match stream {
                    Ok(stream) => {
                        let peer = stream
                            .peer_addr()
                            .map(|addr| addr.to_string())
                            .unwrap_or_else(|_| "unknown".to_string());
                        println!("   ✅ Nueva conexión desde: {}", peer);

                        let handler = Arc::clone(&self.handler);
                        let registry = Arc::clone(&self.workers);
                        let id = self.next_conn_id;
                        self.next_conn_id += 1;

                        let spawned = self.workers.spawn(id, move || {
                            serve_client(stream, handler.as_ref());
                            registry.deregister(id);
                        });
                        if let Err(e) = spawned {
                            eprintln!("   ❌ No se pudo crear el thread: {}", e);
                        }
                    }
                    Err(e) => {
                        eprintln!("   ❌ Error al aceptar conexión: {}", e);
                    }
                }
            }
        }

        // Cerrar el socket de escucha y drenar los workers en vuelo
        self.listener = None;
        self.local_addr = None;
        println!("[*] Esperando a los workers en vuelo...");
        self.workers.drain();
        println!("[*] Servidor detenido");

        Ok(())
    }
}
