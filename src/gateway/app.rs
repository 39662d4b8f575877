//! # Convención de Llamada en Dos Fases
//! src/gateway/app.rs
//!
//! La aplicación recibe el `Environ` y un `StartResponse`. Antes de
//! terminar de producir salida debe llamar `start` exactamente una vez
//! con la línea de estado y los headers; luego retorna sus trozos de
//! body, que el gateway concatena en una única respuesta HTTP.
//!
//! ## Ejemplo
//!
//! ```
//! use pegaso::gateway::{Application, Environ, GatewayError, StartResponse};
//!
//! fn hola(
//!     _environ: &mut Environ,
//!     start: &mut StartResponse,
//! ) -> Result<Vec<Vec<u8>>, GatewayError> {
//!     start.start("200 OK", vec![("content-type".to_string(), "text/plain".to_string())])?;
//!     Ok(vec![b"hola".to_vec()])
//! }
//! ```

use super::environ::Environ;
use crate::http::{Header, Request, Response, StatusCode};
use crate::server::OnRequest;
use std::net::SocketAddr;
use std::sync::Arc;

/// Violaciones del contrato del gateway por parte de la aplicación
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// La aplicación llamó `start` más de una vez
    StartedTwice,

    /// La aplicación terminó (o quiso escribir) sin haber llamado `start`
    NotStarted,
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::StartedTwice => write!(f, "`start` called twice."),
            GatewayError::NotStarted => write!(f, "`start` was never called."),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Primera fase de la respuesta: estado y headers declarados una sola vez
pub struct StartResponse {
    status: Option<String>,
    headers: Vec<Header>,
    /// Bytes escritos con `write`; van antes de los trozos retornados
    written: Vec<u8>,
}

impl StartResponse {
    fn new() -> Self {
        Self {
            status: None,
            headers: Vec::new(),
            written: Vec::new(),
        }
    }

    /// Declara la línea de estado ("200 OK") y los headers
    ///
    /// Debe llamarse exactamente una vez; la segunda llamada es un error.
    pub fn start(&mut self, status: &str, headers: Vec<Header>) -> Result<(), GatewayError> {
        if self.status.is_some() {
            return Err(GatewayError::StartedTwice);
        }

        self.status = Some(status.to_string());
        self.headers = headers;
        Ok(())
    }

    /// Escribe bytes de body de forma imperativa
    ///
    /// Solo es válido después de `start`. Los bytes escritos preceden a
    /// los trozos que la aplicación retorne.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, GatewayError> {
        if self.status.is_none() {
            return Err(GatewayError::NotStarted);
        }

        self.written.extend_from_slice(data);
        Ok(data.len())
    }
}

/// Una aplicación hospedable por el gateway
///
/// Implementada automáticamente por cualquier función o closure con la
/// firma correspondiente.
pub trait Application {
    /// Procesa el entorno y retorna los trozos de body
    fn call(
        &self,
        environ: &mut Environ,
        start: &mut StartResponse,
    ) -> Result<Vec<Vec<u8>>, GatewayError>;
}

impl<F> Application for F
where
    F: Fn(&mut Environ, &mut StartResponse) -> Result<Vec<Vec<u8>>, GatewayError>,
{
    fn call(
        &self,
        environ: &mut Environ,
        start: &mut StartResponse,
    ) -> Result<Vec<Vec<u8>>, GatewayError> {
        self(environ, start)
    }
}

/// Invoca la aplicación y arma la respuesta HTTP
///
/// El body final es lo escrito con `write` seguido de los trozos
/// retornados, concatenado; si queda vacío la respuesta va sin body.
/// Que la aplicación termine sin llamar `start` es una violación del
/// contrato, nunca un éxito silencioso.
pub fn run_application<A: Application>(
    app: &A,
    environ: &mut Environ,
) -> Result<Response, GatewayError> {
    let mut start = StartResponse::new();

    let chunks = app.call(environ, &mut start)?;

    let status = match start.status {
        Some(status) => status,
        None => return Err(GatewayError::NotStarted),
    };

    let mut body = start.written;
    for chunk in chunks {
        body.extend_from_slice(&chunk);
    }

    let mut response = Response::from_status_line(status);
    for (name, value) in start.headers {
        response.add_header(&name, &value);
    }

    if body.is_empty() {
        Ok(response)
    } else {
        Ok(response.with_body_bytes(body))
    }
}

/// Adapta una aplicación al handler que consume el servidor
///
/// `server_addr` es la dirección real en la que escucha el servidor (se
/// necesita para los campos de entorno `server_name`/`server_port`). Las
/// violaciones de contrato se loguean y se responden con un 500 genérico.
pub fn application_handler<A>(app: A, server_addr: SocketAddr) -> Arc<OnRequest>
where
    A: Application + Send + Sync + 'static,
{
    Arc::new(move |request: &Request, peer: SocketAddr| {
        let mut environ = Environ::new(request, peer, server_addr);

        match run_application(&app, &mut environ) {
            Ok(response) => response,
            Err(error) => {
                eprintln!("ERROR: {} - aplicación fuera de contrato: {}", peer, error);
                Response::new(StatusCode::InternalServerError)
            }
        }
    })
}
