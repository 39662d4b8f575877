//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Tabla estática de códigos de estado que usa el servidor. Solo se
//! enumeran los códigos que el núcleo puede producir:
//!
//! - **2xx**: Éxito (200)
//! - **4xx**: Error del cliente (400, 408, 411)
//! - **5xx**: Error del servidor (500, 501, 505)

/// Códigos de estado HTTP que el servidor puede emitir
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 400 Bad Request - Request malformado
    BadRequest = 400,

    /// 408 Request Timeout - El cliente no envió el request a tiempo
    RequestTimeout = 408,

    /// 411 Length Required - Reservado en la tabla; el parser responde 400
    /// cuando falta `content-length` (ver DESIGN.md)
    LengthRequired = 411,

    /// 500 Internal Server Error - Error interno del servidor
    InternalServerError = 500,

    /// 501 Not Implemented - Método HTTP no soportado
    NotImplemented = 501,

    /// 505 HTTP Version Not Supported - Versión HTTP no soportada
    HttpVersionNotSupported = 505,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use pegaso::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use pegaso::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::RequestTimeout.reason_phrase(), "Request Timeout");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::RequestTimeout => "Request Timeout",
            StatusCode::LengthRequired => "Length Required",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::HttpVersionNotSupported => "HTTP Version Not Supported",
        }
    }
}

impl std::fmt::Display for StatusCode {
    /// Formatea el código como línea de estado: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_values() {
        assert_eq!(StatusCode::Ok.as_u16(), 200);
        assert_eq!(StatusCode::BadRequest.as_u16(), 400);
        assert_eq!(StatusCode::RequestTimeout.as_u16(), 408);
        assert_eq!(StatusCode::LengthRequired.as_u16(), 411);
        assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
        assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
        assert_eq!(StatusCode::HttpVersionNotSupported.as_u16(), 505);
    }

    #[test]
    fn test_reason_phrases() {
        assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
        assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
        assert_eq!(StatusCode::NotImplemented.reason_phrase(), "Not Implemented");
        assert_eq!(
            StatusCode::HttpVersionNotSupported.reason_phrase(),
            "HTTP Version Not Supported"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(StatusCode::Ok.to_string(), "200 OK");
        assert_eq!(StatusCode::RequestTimeout.to_string(), "408 Request Timeout");
        assert_eq!(
            StatusCode::InternalServerError.to_string(),
            "500 Internal Server Error"
        );
    }
}
