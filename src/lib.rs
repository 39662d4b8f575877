//! # pegaso
//! src/lib.rs
//!
//! Servidor HTTP/1.1 concurrente implementado desde cero: parser
//! incremental del protocolo, pool acotado de workers, y un gateway
//! síncrono para hospedar lógica de aplicación genérica sin que el
//! servidor dependa de ningún framework.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: parsing incremental de requests, responses y status codes
//! - `server`: servidor TCP, pool de slots y manejo de conexiones
//! - `gateway`: adaptador request -> entorno -> aplicación -> respuesta
//! - `config`: configuración por CLI y variables de entorno
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use pegaso::config::Config;
//! use pegaso::http::{Response, StatusCode};
//! use pegaso::server::Server;
//! use std::sync::Arc;
//!
//! let config = Config::default();
//! let server = Server::new(&config, Arc::new(|_request, _peer| {
//!     Response::new(StatusCode::Ok).with_body("hola")
//! })).expect("Error al crear el servidor");
//!
//! server.run().expect("Error al correr el servidor");
//! ```

pub mod config;
pub mod gateway;
pub mod http;
pub mod server;
