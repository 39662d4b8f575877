//! # Modelo de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Tipos que representan un request HTTP/1.1 ya parseado. El parsing
//! incremental vive en `http::parser`; aquí solo está el modelo de datos.
//!
//! ## Formato de un Request HTTP/1.1
//!
//! ```text
//! POST /echo HTTP/1.1\r\n
//! host: localhost:8080\r\n
//! content-length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! Los headers se guardan como una lista ordenada de pares para preservar
//! el orden de llegada (un `HashMap` lo perdería). Los nombres se guardan
//! en minúsculas.

/// Un header HTTP: par (nombre, valor). El nombre siempre va en minúsculas.
pub type Header = (String, String);

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso
    POST,

    /// PUT - Reemplazar un recurso
    PUT,

    /// PATCH - Modificar parcialmente un recurso
    PATCH,

    /// DELETE - Eliminar un recurso
    DELETE,
}

impl Method {
    /// Parsea un método HTTP desde un string
    ///
    /// Retorna `None` si el método no pertenece al conjunto soportado.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "PATCH" => Some(Method::PATCH),
            "DELETE" => Some(Method::DELETE),
            _ => None,
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
        }
    }
}

/// Representa un request HTTP/1.1 completo e inmutable
///
/// Se construye únicamente desde `parser::RequestParser::into_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Método HTTP (GET, POST, PUT, PATCH, DELETE)
    method: Method,

    /// URL tal como llegó en la status line (siempre empieza con '/')
    url: String,

    /// Headers en orden de llegada, nombres en minúsculas
    headers: Vec<Header>,

    /// Body del request, si el cliente declaró `content-length`
    body: Option<Vec<u8>>,
}

impl Request {
    /// Construye un request ya validado. Solo lo usa el parser.
    pub(crate) fn new(
        method: Method,
        url: String,
        headers: Vec<Header>,
        body: Option<Vec<u8>>,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            body,
        }
    }

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene la URL del request (path + query string sin separar)
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Obtiene todos los headers, en orden de llegada
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Busca un header por nombre (en minúsculas)
    ///
    /// Si el header aparece varias veces retorna la primera ocurrencia.
    ///
    /// # Ejemplo
    /// ```
    /// use pegaso::http::RequestParser;
    ///
    /// let mut parser = RequestParser::new();
    /// parser.feed(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();
    /// let request = parser.into_request();
    ///
    /// assert_eq!(request.header("host"), Some("localhost"));
    /// assert_eq!(request.header("missing"), None);
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Obtiene el body del request, si existe
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> Request {
        Request::new(
            Method::POST,
            "/echo?x=1".to_string(),
            vec![
                ("host".to_string(), "localhost".to_string()),
                ("content-length".to_string(), "5".to_string()),
            ],
            Some(b"hello".to_vec()),
        )
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!(Method::from_str("GET"), Some(Method::GET));
        assert_eq!(Method::from_str("POST"), Some(Method::POST));
        assert_eq!(Method::from_str("PUT"), Some(Method::PUT));
        assert_eq!(Method::from_str("PATCH"), Some(Method::PATCH));
        assert_eq!(Method::from_str("DELETE"), Some(Method::DELETE));
        assert_eq!(Method::from_str("FOO"), None);
        assert_eq!(Method::from_str("get"), None); // case-sensitive
    }

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::GET.as_str(), "GET");
        assert_eq!(Method::DELETE.as_str(), "DELETE");
    }

    #[test]
    fn test_accessors() {
        let request = sample_request();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url(), "/echo?x=1");
        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.body(), Some(&b"hello"[..]));
    }

    #[test]
    fn test_header_lookup() {
        let request = sample_request();
        assert_eq!(request.header("host"), Some("localhost"));
        assert_eq!(request.header("content-length"), Some("5"));
        assert_eq!(request.header("x-missing"), None);
    }

    #[test]
    fn test_header_first_occurrence_wins_on_lookup() {
        let request = Request::new(
            Method::GET,
            "/".to_string(),
            vec![
                ("x-dup".to_string(), "uno".to_string()),
                ("x-dup".to_string(), "dos".to_string()),
            ],
            None,
        );
        assert_eq!(request.header("x-dup"), Some("uno"));
    }
}
