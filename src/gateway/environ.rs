//! # Entorno de la Aplicación
//! src/gateway/environ.rs
//!
//! El `Environ` es el contrato de entrada del gateway: una estructura con
//! campos tipados fijos (método, direcciones, path/query, body legible)
//! más la lista abierta de headers del request bajo nombres canónicos
//! `HTTP_*`. Reemplaza al diccionario mutable ad hoc de los gateways
//! clásicos por campos explícitos.

use crate::http::{Header, Method, Request};
use std::io::{self, Cursor};
use std::net::SocketAddr;

/// Versión del contrato del gateway
pub const GATEWAY_VERSION: (u32, u32) = (1, 0);

/// Entorno que el gateway entrega a la aplicación
///
/// Se construye desde un request parseado más las direcciones de la
/// conexión. Los campos de capacidad (`multithread`, etc.) describen al
/// servidor que hospeda la aplicación: un thread por conexión, un solo
/// proceso, aplicación invocada muchas veces.
pub struct Environ {
    /// Versión del contrato (1, 0)
    pub version: (u32, u32),

    /// Esquema de la URL ("http"; el servidor no habla TLS)
    pub url_scheme: &'static str,

    /// Body del request, legible como stream (vacío si no hay body)
    pub input: Cursor<Vec<u8>>,

    /// Sumidero de errores de la aplicación (stderr por defecto)
    pub errors: Box<dyn io::Write + Send>,

    /// El servidor atiende conexiones en threads concurrentes
    pub multithread: bool,

    /// El servidor no reparte la aplicación entre procesos
    pub multiprocess: bool,

    /// La aplicación puede ser invocada muchas veces en el proceso
    pub run_once: bool,

    /// Método HTTP del request
    pub method: Method,

    /// URL cruda, tal como llegó en la status line
    pub raw_uri: String,

    /// Parte de path de la URL (antes del primer '?')
    pub path_info: String,

    /// Query string (después del primer '?'), si existe
    pub query_string: Option<String>,

    /// Dirección IP del peer
    pub remote_addr: String,

    /// Puerto del peer
    pub remote_port: u16,

    /// Dirección en la que escucha el servidor
    pub server_name: String,

    /// Puerto en el que escucha el servidor
    pub server_port: u16,

    /// Protocolo con el que responde el servidor
    pub server_protocol: &'static str,

    /// Largo del body: el valor del header si el cliente mandó uno
    /// numérico, si no el largo real del body
    pub content_length: Option<u64>,

    /// Headers del request bajo nombre canónico, en orden de llegada
    headers: Vec<Header>,
}

/// Transforma un nombre de header al canónico del gateway:
/// mayúsculas, '-' -> '_', prefijo `HTTP_`
///
/// El prefijo distingue headers del cliente de los campos propios del
/// entorno.
fn canonical_name(name: &str) -> String {
    format!("HTTP_{}", name.to_uppercase().replace('-', "_"))
}

impl Environ {
    /// Construye el entorno para un request y su conexión
    pub fn new(request: &Request, remote: SocketAddr, server: SocketAddr) -> Self {
        let body = request.body().unwrap_or(&[]).to_vec();

        let (path_info, query_string) = match request.url().split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (request.url().to_string(), None),
        };

        let headers: Vec<Header> = request
            .headers()
            .iter()
            .map(|(name, value)| (canonical_name(name), value.clone()))
            .collect();

        // El header declarado manda; si falta (o no es numérico) se usa el
        // largo real del body
        let content_length = if body.is_empty() {
            None
        } else {
            let declared = headers
                .iter()
                .find(|(name, _)| name == "HTTP_CONTENT_LENGTH")
                .and_then(|(_, value)| value.parse::<u64>().ok());
            Some(declared.unwrap_or(body.len() as u64))
        };

        Self {
            version: GATEWAY_VERSION,
            url_scheme: "http",
            input: Cursor::new(body),
            errors: Box::new(io::stderr()),
            multithread: true,
            multiprocess: false,
            run_once: false,
            method: request.method(),
            raw_uri: request.url().to_string(),
            path_info,
            query_string,
            remote_addr: remote.ip().to_string(),
            remote_port: remote.port(),
            server_name: server.ip().to_string(),
            server_port: server.port(),
            server_protocol: "HTTP/1.1",
            content_length,
            headers,
        }
    }

    /// Headers del request bajo nombre canónico, en orden
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Busca un header por su nombre canónico (`HTTP_HOST`)
    pub fn header(&self, canonical: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name == canonical)
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RequestParser;

    fn parse(raw: &[u8]) -> Request {
        let mut parser = RequestParser::new();
        parser.feed(raw).expect("feed");
        parser.into_request()
    }

    fn addrs() -> (SocketAddr, SocketAddr) {
        (
            "192.0.2.7:49152".parse().unwrap(),
            "127.0.0.1:8080".parse().unwrap(),
        )
    }

    #[test]
    fn test_environ_basic_fields() {
        let request = parse(b"GET /docs HTTP/1.1\r\n\r\n");
        let (remote, server) = addrs();
        let environ = Environ::new(&request, remote, server);

        assert_eq!(environ.version, (1, 0));
        assert_eq!(environ.url_scheme, "http");
        assert!(environ.multithread);
        assert!(!environ.multiprocess);
        assert!(!environ.run_once);
        assert_eq!(environ.method, Method::GET);
        assert_eq!(environ.raw_uri, "/docs");
        assert_eq!(environ.server_protocol, "HTTP/1.1");
    }

    #[test]
    fn test_environ_addressing() {
        let request = parse(b"GET / HTTP/1.1\r\n\r\n");
        let (remote, server) = addrs();
        let environ = Environ::new(&request, remote, server);

        assert_eq!(environ.remote_addr, "192.0.2.7");
        assert_eq!(environ.remote_port, 49152);
        assert_eq!(environ.server_name, "127.0.0.1");
        assert_eq!(environ.server_port, 8080);
    }

    #[test]
    fn test_path_and_query_split_on_first_question_mark() {
        let request = parse(b"GET /buscar?q=a?b&x=1 HTTP/1.1\r\n\r\n");
        let (remote, server) = addrs();
        let environ = Environ::new(&request, remote, server);

        assert_eq!(environ.raw_uri, "/buscar?q=a?b&x=1");
        assert_eq!(environ.path_info, "/buscar");
        assert_eq!(environ.query_string.as_deref(), Some("q=a?b&x=1"));
    }

    #[test]
    fn test_no_query_string() {
        let request = parse(b"GET /solo-path HTTP/1.1\r\n\r\n");
        let (remote, server) = addrs();
        let environ = Environ::new(&request, remote, server);

        assert_eq!(environ.path_info, "/solo-path");
        assert_eq!(environ.query_string, None);
    }

    #[test]
    fn test_canonical_header_names() {
        let request = parse(b"GET / HTTP/1.1\r\nHost: localhost\r\nX-Trace-Id: abc\r\n\r\n");
        let (remote, server) = addrs();
        let environ = Environ::new(&request, remote, server);

        assert_eq!(environ.header("HTTP_HOST"), Some("localhost"));
        assert_eq!(environ.header("HTTP_X_TRACE_ID"), Some("abc"));
        assert_eq!(environ.header("HTTP_MISSING"), None);

        // orden de llegada preservado
        let names: Vec<&str> = environ.headers().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["HTTP_HOST", "HTTP_X_TRACE_ID"]);
    }

    #[test]
    fn test_content_length_from_header() {
        let request = parse(b"POST / HTTP/1.1\r\ncontent-length: 5\r\n\r\nhello");
        let (remote, server) = addrs();
        let environ = Environ::new(&request, remote, server);

        assert_eq!(environ.content_length, Some(5));
    }

    #[test]
    fn test_content_length_absent_without_body() {
        let request = parse(b"GET / HTTP/1.1\r\n\r\n");
        let (remote, server) = addrs();
        let environ = Environ::new(&request, remote, server);

        assert_eq!(environ.content_length, None);
    }

    #[test]
    fn test_input_reads_body() {
        use std::io::Read;

        let request = parse(b"POST / HTTP/1.1\r\ncontent-length: 5\r\n\r\nhello");
        let (remote, server) = addrs();
        let mut environ = Environ::new(&request, remote, server);

        let mut body = Vec::new();
        environ.input.read_to_end(&mut body).unwrap();
        assert_eq!(body, b"hello");
    }

    #[test]
    fn test_input_empty_without_body() {
        use std::io::Read;

        let request = parse(b"GET / HTTP/1.1\r\n\r\n");
        let (remote, server) = addrs();
        let mut environ = Environ::new(&request, remote, server);

        let mut body = Vec::new();
        environ.input.read_to_end(&mut body).unwrap();
        assert!(body.is_empty());
    }
}
