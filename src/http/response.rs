//! # Construcción y Serialización de Respuestas HTTP
//! src/http/response.rs
//!
//! API para construir respuestas HTTP y convertirlas a bytes listos para
//! el socket. La serialización agrega los headers fijos del servidor y
//! calcula `content-length` cuando hay body y nadie lo declaró.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! server: pegaso\r\n
//! connection: close\r\n
//! content-type: text/plain\r\n
//! content-length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use pegaso::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("content-type", "text/plain")
//!     .with_body("hello");
//!
//! let bytes = response.to_bytes();
//! // `bytes` se escribe tal cual al socket
//! ```

use super::request::Header;
use super::status::StatusCode;

/// Nombre con el que el servidor se identifica en el header `server`
pub const SERVER_NAME: &str = "pegaso";

/// Representa una respuesta HTTP completa
///
/// La línea de estado se guarda como string (`"200 OK"`) porque las
/// aplicaciones del gateway pueden declarar cualquier status line; los
/// headers son una lista ordenada y el body es opcional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Línea de estado sin la versión: `"<código> <razón>"`
    status: String,

    /// Headers en el orden en que se agregaron
    headers: Vec<Header>,

    /// Cuerpo de la respuesta (None = sin body, ni content-length)
    body: Option<Vec<u8>>,
}

impl Response {
    /// Crea una respuesta vacía a partir de un código de la tabla
    ///
    /// # Ejemplo
    /// ```
    /// use pegaso::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::RequestTimeout);
    /// assert_eq!(response.status(), "408 Request Timeout");
    /// ```
    pub fn new(status: StatusCode) -> Self {
        Self::from_status_line(status.to_string())
    }

    /// Crea una respuesta a partir de una línea de estado arbitraria
    ///
    /// La usa el gateway, donde la aplicación entrega el status como
    /// string (`"200 OK"`).
    pub fn from_status_line(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Agrega un header (versión builder)
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Agrega un header a una respuesta existente
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Establece el body desde un string
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.as_bytes().to_vec());
        self
    }

    /// Establece el body desde bytes
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Obtiene la línea de estado ("200 OK")
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Obtiene los headers en orden
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Obtiene el body, si existe
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Serializa la respuesta al formato de cable HTTP/1.1
    ///
    /// Transformación pura sobre `&self`:
    /// 1. Status line: `HTTP/1.1 <status>\r\n`
    /// 2. Headers fijos: `server` y `connection: close` (el servidor nunca
    ///    reutiliza conexiones)
    /// 3. Headers de la respuesta, nombres en minúsculas
    /// 4. Si hay body y nadie declaró `content-length`, se calcula uno
    /// 5. Línea en blanco y, si existe, el body en crudo
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();

        result.extend_from_slice(format!("HTTP/1.1 {}\r\n", self.status).as_bytes());

        result.extend_from_slice(format!("server: {}\r\n", SERVER_NAME).as_bytes());
        result.extend_from_slice(b"connection: close\r\n");

        let mut has_content_length = false;
        for (name, value) in &self.headers {
            let name = name.to_lowercase();
            if name == "content-length" {
                has_content_length = true;
            }
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        match &self.body {
            None => result.extend_from_slice(b"\r\n"),
            Some(body) => {
                if !has_content_length {
                    result.extend_from_slice(
                        format!("content-length: {}\r\n", body.len()).as_bytes(),
                    );
                }
                result.extend_from_slice(b"\r\n");
                result.extend_from_slice(body);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_response() {
        let response = Response::new(StatusCode::Ok);
        assert_eq!(response.status(), "200 OK");
        assert!(response.headers().is_empty());
        assert_eq!(response.body(), None);
    }

    #[test]
    fn test_from_status_line() {
        let response = Response::from_status_line("418 I'm a teapot");
        assert_eq!(response.status(), "418 I'm a teapot");
    }

    #[test]
    fn test_to_bytes_basic() {
        let response = Response::new(StatusCode::Ok)
            .with_header("content-type", "text/plain")
            .with_body("Test");

        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("server: pegaso\r\n"));
        assert!(text.contains("connection: close\r\n"));
        assert!(text.contains("content-type: text/plain\r\n"));
        assert!(text.contains("content-length: 4\r\n"));
        assert!(text.ends_with("\r\n\r\nTest"));
    }

    #[test]
    fn test_no_body_has_no_content_length() {
        let response = Response::new(StatusCode::RequestTimeout);
        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert!(text.starts_with("HTTP/1.1 408 Request Timeout\r\n"));
        assert!(!text.contains("content-length"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_computed_content_length_appears_once() {
        let response = Response::new(StatusCode::Ok).with_body("hello");
        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert_eq!(text.matches("content-length:").count(), 1);
        assert!(text.contains("content-length: 5\r\n"));
    }

    #[test]
    fn test_explicit_content_length_not_duplicated() {
        let response = Response::new(StatusCode::Ok)
            .with_header("content-length", "5")
            .with_body("hello");
        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert_eq!(text.matches("content-length:").count(), 1);
    }

    #[test]
    fn test_header_names_lowercased_on_wire() {
        let response = Response::new(StatusCode::Ok).with_header("Content-Type", "text/plain");
        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert!(text.contains("content-type: text/plain\r\n"));
        assert!(!text.contains("Content-Type"));
    }

    #[test]
    fn test_header_order_preserved_on_wire() {
        let response = Response::new(StatusCode::Ok)
            .with_header("x-primero", "1")
            .with_header("x-segundo", "2");
        let text = String::from_utf8(response.to_bytes()).unwrap();

        let first = text.find("x-primero").unwrap();
        let second = text.find("x-segundo").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_binary_body() {
        let binary = vec![0x00, 0x01, 0x02, 0xFF];
        let response = Response::new(StatusCode::Ok).with_body_bytes(binary.clone());

        let bytes = response.to_bytes();
        assert!(bytes.ends_with(&binary));
        assert_eq!(response.body(), Some(&binary[..]));
    }
}
