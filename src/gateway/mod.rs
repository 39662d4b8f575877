//! # Gateway de Aplicaciones Síncrono
//! src/gateway/mod.rs
//!
//! Adaptador genérico entre el servidor y la lógica de aplicación: traduce
//! un request parseado (más las direcciones de la conexión) a un entorno
//! tipado, invoca la aplicación con la convención de dos fases
//! (declarar estado y headers, luego retornar trozos de body), y arma la
//! respuesta HTTP con el resultado.
//!
//! El servidor no depende de ningún framework: cualquier lógica que
//! implemente [`Application`] (una función alcanza) se puede hospedar con
//! [`application_handler`].

pub mod app;
pub mod environ;

// Re-exportar para facilitar el uso
pub use app::{application_handler, run_application, Application, GatewayError, StartResponse};
pub use environ::{Environ, GATEWAY_VERSION};
