//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto con un backlog configurable
//! 2. Acepta conexiones, acotadas por un pool de slots de tamaño fijo
//! 3. Lee y parsea requests HTTP de forma incremental
//! 4. Invoca el handler inyectado y escribe la respuesta
//!
//! El handler es la única costura con la lógica de aplicación: el
//! servidor no enruta ni conoce aplicaciones concretas.

pub mod pool;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use pool::SlotPool;
pub use tcp::{OnRequest, Server};
