//! # Registro de Workers
//! src/server/registry.rs
//!
//! Registro compartido de los threads que están atendiendo conexiones.
//! Es el único estado mutable compartido del servidor, protegido por un
//! mutex que solo se toma para operaciones O(1): registrar un worker al
//! aceptarlo y quitarlo cuando termina. Nunca se retiene el lock durante
//! I/O.
//!
//! Su único propósito es el apagado ordenado: al cerrar el socket de
//! escucha, el acceptor espera (join) a cada worker registrado hasta que
//! todos terminen. No hay cancelación: el drenaje espera la terminación
//! natural de cada conexión.

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

/// Registro de workers en vuelo, protegido por mutex
#[derive(Default)]
pub struct WorkerRegistry {
    workers: Mutex<HashMap<u64, JoinHandle<()>>>,
}

impl WorkerRegistry {
    /// Crea un registro vacío
    pub fn new() -> Self {
        Self {
            workers: Mutex::new(HashMap::new()),
        }
    }

    /// Lanza un worker y lo registra bajo el mismo lock
    ///
    /// Registrar y spawnear bajo el mismo lock cierra la carrera entre el
    /// acceptor que inserta y un worker tan rápido que intenta quitarse
    /// antes de estar insertado: `deregister` no puede entrar al mapa
    /// hasta que la inserción terminó.
    pub fn spawn(&self, id: u64, work: impl FnOnce() + Send + 'static) -> io::Result<()> {
        let mut workers = self.workers.lock().unwrap();
        let handle = thread::Builder::new()
            .name(format!("conn-{}", id))
            .spawn(work)?;
        workers.insert(id, handle);
        Ok(())
    }

    /// Quita un worker del registro (lo llama el propio worker al terminar)
    pub fn deregister(&self, id: u64) {
        self.workers.lock().unwrap().remove(&id);
    }

    /// Cantidad de workers registrados
    pub fn active(&self) -> usize {
        self.workers.lock().unwrap().len()
    }

    /// Espera a que terminen todos los workers registrados
    ///
    /// Saca los handles de a uno y hace join fuera del lock, para no
    /// bloquear a los workers que se están quitando solos mientras tanto.
    pub fn drain(&self) {
        loop {
            let handle = {
                let mut workers = self.workers.lock().unwrap();
                let id = workers.keys().next().copied();
                id.and_then(|id| workers.remove(&id))
            };

            match handle {
                Some(handle) => {
                    let _ = handle.join();
                }
                None => break,
            }
        }
    }
}
