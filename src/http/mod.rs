//! # Módulo HTTP
//!
//! Este módulo implementa el protocolo HTTP/1.1 desde cero, sin librerías
//! de alto nivel. Incluye:
//!
//! - Parsing incremental de requests (el request puede llegar en trozos
//!   de cualquier tamaño desde el socket)
//! - Construcción y serialización de responses
//! - Tabla de status codes
//!
//! ## Alcance del protocolo
//!
//! El servidor habla un subconjunto deliberadamente chico de HTTP/1.1:
//! - Métodos: GET, POST, PUT, PATCH, DELETE
//! - Bodies delimitados solo por `content-length` (sin chunked encoding)
//! - Sin keep-alive ni pipelining: toda respuesta lleva
//!   `connection: close` y la conexión se cierra después de responder
//!
//! ### Formato de Request
//!
//! ```text
//! POST /echo HTTP/1.1\r\n
//! content-length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! server: pegaso\r\n
//! connection: close\r\n
//! content-length: 5\r\n
//! \r\n
//! hello
//! ```

pub mod parser; // Parsing incremental de HTTP requests
pub mod request; // Modelo de datos de requests
pub mod response; // Construcción y serialización de responses
pub mod status; // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
// Esto permite usar `http::Request` en vez de `http::request::Request`
pub use parser::{ParseError, RequestParser};
pub use request::{Header, Method, Request};
pub use response::{Response, SERVER_NAME};
pub use status::StatusCode;
