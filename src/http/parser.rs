//! # Parser Incremental de Requests HTTP/1.1
//! src/http/parser.rs
//!
//! Máquina de estados a nivel de bytes que consume el request por trozos
//! (`feed`), tal como llegan del socket. Los trozos pueden tener cualquier
//! tamaño, incluso un byte: una línea puede quedar repartida entre varias
//! llamadas y el parser la acumula hasta ver el terminador `\r\n`.
//!
//! ## Estados
//!
//! ```text
//! AwaitingStatusLine -> AwaitingHeaders -> AwaitingBody -> Completed
//!          \__________________|________________/
//!                             v
//!                          Errored
//! ```
//!
//! ## Contrato
//!
//! - `feed(chunk)` retorna `Ok(())` si consumió los bytes (puede faltar
//!   data) o `Err(ParseError)` con el status y mensaje a responder.
//! - El procesamiento es un loop explícito, nunca recursión: cada vuelta
//!   procesa exactamente una unidad lógica (status line, un header, o un
//!   trozo de body) hasta agotar el buffer o completar el request.
//! - `is_complete()` indica cuándo se puede llamar `into_request()`.
//!
//! ## Errores
//!
//! Los errores de formato del cliente producen 400/501/505. Superar los
//! límites de recursos (cantidad de headers, largo de línea) produce un
//! 500, distinto de los errores de formato.

use super::request::{Header, Method, Request};
use super::status::StatusCode;

/// Máximo de líneas de header por request antes de responder 500
const MAX_HEADERS: usize = 1000;

/// Máximo de bytes acumulados esperando el `\r\n` de una línea
const MAX_LINE_BYTES: usize = 8 * 1024;

/// Error estructurado de parsing: status a responder + mensaje
///
/// Es un resultado de control de flujo, no una condición fatal: el
/// servidor lo convierte en una respuesta de error y cierra la conexión.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    status: StatusCode,
    message: String,
}

impl ParseError {
    fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }

    /// Construye el error agregando el token ofensivo al mensaje:
    /// `mensaje: 'token'`
    fn with_token(status: StatusCode, message: &str, token: &[u8]) -> Self {
        Self {
            status,
            message: format!("{}: '{}'", message, String::from_utf8_lossy(token)),
        }
    }

    /// Status HTTP con el que se debe responder este error
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Mensaje legible (incluye el token ofensivo si lo hay)
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.status, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Estado interno de la máquina
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingStatusLine,
    AwaitingHeaders,
    AwaitingBody,
    Completed,
    Errored,
}

/// Parser incremental de un (1) request HTTP/1.1
///
/// # Ejemplo
/// ```
/// use pegaso::http::{Method, RequestParser};
///
/// let mut parser = RequestParser::new();
/// parser.feed(b"POST /echo HTTP/1.1\r\n").unwrap();
/// parser.feed(b"content-length: 5\r\n\r\nhel").unwrap();
/// assert!(!parser.is_complete());
///
/// parser.feed(b"lo").unwrap();
/// assert!(parser.is_complete());
///
/// let request = parser.into_request();
/// assert_eq!(request.method(), Method::POST);
/// assert_eq!(request.body(), Some(&b"hello"[..]));
/// ```
#[derive(Debug)]
pub struct RequestParser {
    state: State,
    /// Bytes pendientes: línea parcial o body aún no consumido
    buf: Vec<u8>,
    method: Option<Method>,
    url: Option<String>,
    headers: Vec<Header>,
    /// Largo de body declarado; la última ocurrencia del header gana
    content_length: Option<usize>,
    body: Vec<u8>,
}

impl RequestParser {
    /// Crea un parser vacío, listo para recibir la status line
    pub fn new() -> Self {
        Self {
            state: State::AwaitingStatusLine,
            buf: Vec::new(),
            method: None,
            url: None,
            headers: Vec::new(),
            content_length: None,
            body: Vec::new(),
        }
    }

    /// Alimenta el parser con un trozo de bytes del socket
    ///
    /// Retorna `Err` con el status y mensaje a responder si el request es
    /// inválido. Después de un error (o de completar) las llamadas
    /// siguientes no hacen nada.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), ParseError> {
        if matches!(self.state, State::Completed | State::Errored) {
            return Ok(());
        }

        self.buf.extend_from_slice(chunk);

        match self.process() {
            Ok(()) => Ok(()),
            Err(error) => {
                self.state = State::Errored;
                Err(error)
            }
        }
    }

    /// Indica si ya se recibió un request completo
    pub fn is_complete(&self) -> bool {
        self.state == State::Completed
    }

    /// Consume el parser y retorna el request completo
    ///
    /// # Panics
    ///
    /// Llamarlo antes de que `is_complete()` sea `true` es un error de
    /// programación y aborta con panic, no es un error recuperable.
    pub fn into_request(self) -> Request {
        assert!(
            self.is_complete(),
            "into_request() llamado antes de completar el parsing"
        );

        let body = if self.body.is_empty() {
            None
        } else {
            Some(self.body)
        };

        // method y url quedan asignados antes de salir de AwaitingStatusLine
        Request::new(
            self.method.expect("estado Completed sin método"),
            self.url.expect("estado Completed sin url"),
            self.headers,
            body,
        )
    }

    /// Loop principal: procesa unidades lógicas hasta agotar el buffer
    fn process(&mut self) -> Result<(), ParseError> {
        loop {
            match self.state {
                State::AwaitingStatusLine => {
                    let line = match self.take_line()? {
                        Some(line) => line,
                        None => return Ok(()),
                    };
                    self.parse_status_line(&line)?;
                    self.state = State::AwaitingHeaders;
                }
                State::AwaitingHeaders => {
                    let line = match self.take_line()? {
                        Some(line) => line,
                        None => return Ok(()),
                    };
                    if line.is_empty() {
                        self.end_of_headers()?;
                    } else {
                        self.parse_header(&line)?;
                    }
                }
                State::AwaitingBody => {
                    if self.buf.is_empty() {
                        return Ok(());
                    }
                    self.consume_body()?;
                }
                State::Completed | State::Errored => return Ok(()),
            }
        }
    }

    /// Extrae la próxima línea del buffer, sin el `\r\n`
    ///
    /// Retorna `Ok(None)` si todavía no llegó el terminador. Una línea que
    /// crece sin terminador más allá del límite es agotamiento de recursos.
    fn take_line(&mut self) -> Result<Option<Vec<u8>>, ParseError> {
        match self.buf.windows(2).position(|w| w == b"\r\n") {
            Some(pos) => {
                let line = self.buf[..pos].to_vec();
                self.buf.drain(..pos + 2);
                Ok(Some(line))
            }
            None => {
                if self.buf.len() > MAX_LINE_BYTES {
                    return Err(ParseError::new(
                        StatusCode::InternalServerError,
                        "Could not process a header line that long.",
                    ));
                }
                Ok(None)
            }
        }
    }

    /// Parsea la status line: `METHOD URL VERSION`
    fn parse_status_line(&mut self, line: &[u8]) -> Result<(), ParseError> {
        let tokens: Vec<&[u8]> = line.split(|&b| b == b' ').collect();

        if tokens.len() != 3 {
            return Err(ParseError::new(StatusCode::BadRequest, "Invalid status line."));
        }

        let method_raw = std::str::from_utf8(tokens[0]).map_err(|_| {
            ParseError::with_token(StatusCode::BadRequest, "Invalid status line", tokens[0])
        })?;
        let method = Method::from_str(method_raw).ok_or_else(|| {
            ParseError::with_token(
                StatusCode::NotImplemented,
                "Unsupported HTTP method",
                tokens[0],
            )
        })?;
        self.method = Some(method);

        let url = std::str::from_utf8(tokens[1]).map_err(|_| {
            ParseError::with_token(StatusCode::BadRequest, "Invalid path", tokens[1])
        })?;
        if !url.starts_with('/') {
            return Err(ParseError::with_token(
                StatusCode::BadRequest,
                "Invalid path",
                tokens[1],
            ));
        }
        self.url = Some(url.to_string());

        let version = tokens[2];
        let supported = version.starts_with(b"HTTP/1.")
            && matches!(version.last(), Some(b'0') | Some(b'1'));
        if !supported {
            return Err(ParseError::with_token(
                StatusCode::HttpVersionNotSupported,
                "Unsupported HTTP protocol version",
                version,
            ));
        }

        Ok(())
    }

    /// Parsea una línea de header: `nombre: valor`
    fn parse_header(&mut self, line: &[u8]) -> Result<(), ParseError> {
        if self.headers.len() >= MAX_HEADERS {
            return Err(ParseError::new(
                StatusCode::InternalServerError,
                "Could not process that many headers.",
            ));
        }

        let colon = line.iter().position(|&b| b == b':').ok_or_else(|| {
            ParseError::with_token(StatusCode::BadRequest, "Invalid header", line)
        })?;

        let name_raw = &line[..colon];
        let value_raw = &line[colon + 1..];

        let name = std::str::from_utf8(name_raw)
            .map_err(|_| {
                ParseError::with_token(StatusCode::BadRequest, "Invalid header", line)
            })?
            .to_lowercase();

        if name.contains(' ') {
            return Err(ParseError::with_token(
                StatusCode::BadRequest,
                "Header names cannot have spaces",
                name.as_bytes(),
            ));
        }

        let value = std::str::from_utf8(value_raw)
            .map_err(|_| {
                ParseError::with_token(StatusCode::BadRequest, "Invalid header", line)
            })?
            .trim_matches(' ')
            .to_string();

        if name == "content-length" {
            let numeric = !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit());
            let length = if numeric { value.parse::<usize>().ok() } else { None };

            match length {
                Some(length) => self.content_length = Some(length),
                None => {
                    return Err(ParseError::with_token(
                        StatusCode::BadRequest,
                        "Invalid \"Content-Length\" value",
                        value.as_bytes(),
                    ));
                }
            }
        }

        self.headers.push((name, value));
        Ok(())
    }

    /// Maneja la línea en blanco que cierra la sección de headers
    fn end_of_headers(&mut self) -> Result<(), ParseError> {
        match self.content_length {
            // Sin content-length el request termina acá, sin body. Bytes
            // extra después de la línea en blanco son body no declarado.
            None => {
                if !self.buf.is_empty() {
                    return Err(ParseError::new(
                        StatusCode::BadRequest,
                        "\"Content-Length\" header required.",
                    ));
                }
                self.state = State::Completed;
            }
            Some(0) => {
                self.buf.clear();
                self.state = State::Completed;
            }
            Some(_) => {
                self.state = State::AwaitingBody;
            }
        }
        Ok(())
    }

    /// Acumula bytes de body hasta alcanzar el `content-length` declarado
    ///
    /// Los bytes que exceden el largo declarado se descartan: sin
    /// pipelining no hay un request posterior que pueda consumirlos.
    fn consume_body(&mut self) -> Result<(), ParseError> {
        let content_length = match self.content_length {
            Some(length) => length,
            None => {
                return Err(ParseError::new(
                    StatusCode::BadRequest,
                    "\"Content-Length\" header required.",
                ));
            }
        };

        let left = content_length - self.body.len();
        let take = left.min(self.buf.len());

        self.body.extend_from_slice(&self.buf[..take]);
        self.buf.clear();

        if self.body.len() == content_length {
            self.state = State::Completed;
        }

        Ok(())
    }
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}
