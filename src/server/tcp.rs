//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Servidor que acepta conexiones TCP y maneja cada una en su propio
//! thread, con la concurrencia acotada por un `SlotPool` de tamaño fijo.
//! El handler de requests se inyecta en la construcción: el servidor no
//! conoce ninguna aplicación concreta.
//!
//! ## Ciclo de vida de una conexión
//!
//! 1. El accept loop toma un slot libre (espera bloqueante) y acepta
//! 2. El worker lee trozos del socket y alimenta el parser hasta que el
//!    request se completa, falla, o vence el timeout de lectura
//! 3. Se invoca el handler (o se sintetiza la respuesta de error)
//! 4. Se serializa y escribe la respuesta, se cierra el socket y se
//!    devuelve el slot -- esto último pasa en todos los caminos de salida,
//!    incluso si el handler hace panic

use crate::config::Config;
use crate::http::{Request, RequestParser, Response, StatusCode};
use crate::server::pool::SlotPool;
use socket2::{Domain, Protocol, Socket, Type};
use std::io::{self, Read, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Handler inyectado: recibe el request y la dirección del peer,
/// retorna la respuesta. Es la costura para toda la lógica de aplicación.
pub type OnRequest = dyn Fn(&Request, SocketAddr) -> Response + Send + Sync;

/// Tamaño de los trozos que se leen del socket
const READ_CHUNK: usize = 1024;

/// Plazo de gracia para que los workers terminen durante el shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Devuelve el slot al pool cuando el worker termina, incluso por panic
struct SlotGuard {
    slots: Arc<SlotPool>,
    slot: usize,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.slots.release(self.slot);
    }
}

/// Servidor HTTP/1.1 concurrente con pool de workers acotado
///
/// # Ejemplo
/// ```no_run
/// use pegaso::config::Config;
/// use pegaso::http::{Response, StatusCode};
/// use pegaso::server::Server;
/// use std::sync::Arc;
///
/// let config = Config::default();
/// let server = Server::new(&config, Arc::new(|_request, _peer| {
///     Response::new(StatusCode::Ok).with_body("hola")
/// })).expect("bind");
///
/// server.run().expect("run");
/// ```
pub struct Server {
    /// Dirección local real (útil con puerto 0)
    addr: SocketAddr,
    on_request: Arc<OnRequest>,
    read_timeout: Duration,
    listener: TcpListener,
    slots: Arc<SlotPool>,
    /// JoinHandle del worker que ocupa cada slot
    handles: Mutex<Vec<Option<JoinHandle<()>>>>,
    running: AtomicBool,
}

impl Server {
    /// Crea el servidor: resuelve la dirección, hace bind y listen
    ///
    /// El socket se configura con `SO_REUSEADDR` y el backlog de la
    /// configuración (negativo = default del sistema). El accept loop no
    /// arranca hasta llamar a `run()`.
    pub fn new(config: &Config, on_request: Arc<OnRequest>) -> io::Result<Self> {
        let addr = config
            .address()
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("no se pudo resolver '{}'", config.address()),
                )
            })?;

        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        socket.listen(config.effective_backlog().unwrap_or(128))?;

        let listener: TcpListener = socket.into();
        let addr = listener.local_addr()?;

        let workers = config.effective_workers();

        Ok(Self {
            addr,
            on_request,
            read_timeout: config.read_timeout(),
            listener,
            slots: Arc::new(SlotPool::new(workers)),
            handles: Mutex::new((0..workers).map(|_| None).collect()),
            running: AtomicBool::new(false),
        })
    }

    /// Dirección local a la que quedó ligado el servidor
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Corre el accept loop hasta que alguien llame a `stop()`
    ///
    /// Cada conexión aceptada ocupa un slot del pool y corre en su propio
    /// thread. Con todos los slots ocupados el loop se bloquea antes del
    /// `accept`, y las conexiones en exceso quedan en el backlog del
    /// sistema operativo.
    pub fn run(&self) -> io::Result<()> {
        self.running.store(true, Ordering::SeqCst);

        println!(
            "[+] Servidor escuchando en {} ({} workers)",
            self.addr,
            self.slots.capacity()
        );

        loop {
            // Primero el slot: no se acepta nada sin capacidad para atenderlo
            let slot = self.slots.acquire();

            if !self.running.load(Ordering::SeqCst) {
                self.slots.release(slot);
                break;
            }

            match self.listener.accept() {
                Ok((stream, peer)) => {
                    if !self.running.load(Ordering::SeqCst) {
                        // conexión de despertar de stop()
                        self.slots.release(slot);
                        break;
                    }

                    let on_request = Arc::clone(&self.on_request);
                    let slots = Arc::clone(&self.slots);
                    let read_timeout = self.read_timeout;

                    let handle = thread::spawn(move || {
                        let _guard = SlotGuard { slots, slot };

                        if let Err(e) =
                            Server::handle_connection(stream, peer, &*on_request, read_timeout)
                        {
                            eprintln!("ERROR: {} - error de socket: {}", peer, e);
                        }
                    });

                    // Solo el accept loop escribe acá; un handle viejo en el
                    // mismo slot ya terminó (su worker devolvió el slot)
                    self.handles.lock().unwrap()[slot] = Some(handle);
                }
                Err(e) => {
                    self.slots.release(slot);
                    if !self.running.load(Ordering::SeqCst) {
                        break;
                    }
                    eprintln!("ERROR: fallo al aceptar conexión: {}", e);
                }
            }
        }

        self.join_workers();
        Ok(())
    }

    /// Detiene el servidor: corta el accept loop y espera a los workers
    ///
    /// Las conexiones ya aceptadas no se interrumpen; tienen el plazo de
    /// gracia del shutdown para terminar solas.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);

        // Conexión dummy para despertar al accept loop bloqueado
        let mut wake = self.addr;
        if wake.ip().is_unspecified() {
            match wake.ip() {
                IpAddr::V4(_) => wake.set_ip(IpAddr::V4(Ipv4Addr::LOCALHOST)),
                IpAddr::V6(_) => wake.set_ip(IpAddr::V6(Ipv6Addr::LOCALHOST)),
            }
        }
        let _ = TcpStream::connect(wake);
    }

    /// Espera a que todos los workers devuelvan su slot
    ///
    /// # Panics
    ///
    /// Un worker que no termina dentro del plazo de gracia es un error de
    /// programación (un handler colgado): se aborta ruidosamente en vez de
    /// ignorarlo.
    fn join_workers(&self) {
        if !self.slots.wait_all_free(SHUTDOWN_GRACE) {
            panic!(
                "shutdown: hay workers que no terminaron dentro del plazo de gracia de {:?}",
                SHUTDOWN_GRACE
            );
        }

        for handle in self.handles.lock().unwrap().iter_mut() {
            if let Some(handle) = handle.take() {
                let _ = handle.join();
            }
        }
    }

    /// Maneja una conexión: lee, parsea, invoca el handler y responde
    ///
    /// El socket se cierra al salir (drop del stream) y el slot lo
    /// devuelve el `SlotGuard` del thread, en todos los caminos.
    fn handle_connection(
        mut stream: TcpStream,
        peer: SocketAddr,
        on_request: &OnRequest,
        read_timeout: Duration,
    ) -> io::Result<()> {
        stream.set_read_timeout(Some(read_timeout))?;

        let mut parser = RequestParser::new();
        let mut early: Option<Response> = None;
        let mut buf = [0u8; READ_CHUNK];

        while !parser.is_complete() {
            let read = match stream.read(&mut buf) {
                Ok(n) => n,
                Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                    early = Some(Response::new(StatusCode::RequestTimeout));
                    break;
                }
                Err(e) => return Err(e),
            };

            if read == 0 {
                // El peer cerró antes de completar el request
                early = Some(
                    Response::new(StatusCode::BadRequest).with_body("Empty package received.\n"),
                );
                break;
            }

            if let Err(error) = parser.feed(&buf[..read]) {
                let mut message = error.message().to_string();
                if !message.ends_with('\n') {
                    message.push('\n');
                }
                early = Some(
                    Response::from_status_line(error.status().to_string()).with_body(&message),
                );
                break;
            }
        }

        let response = match early {
            Some(response) => {
                Self::log_client_error(peer, &response);
                response
            }
            None => {
                let request = parser.into_request();

                match catch_unwind(AssertUnwindSafe(|| on_request(&request, peer))) {
                    Ok(response) => {
                        Self::log_client(peer, &request, &response);
                        response
                    }
                    Err(_) => {
                        eprintln!("ERROR: {} - el handler abortó con panic", peer);
                        Response::new(StatusCode::InternalServerError)
                    }
                }
            }
        };

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        Ok(())
    }

    fn log_client(peer: SocketAddr, request: &Request, response: &Response) {
        println!(
            "INFO: {} - \"{} {} HTTP/1.1\" {}",
            peer,
            request.method().as_str(),
            request.url(),
            response.status()
        );
    }

    fn log_client_error(peer: SocketAddr, response: &Response) {
        let mut log = format!("ERROR: {} - {}", peer, response.status());

        if let Some(body) = response.body() {
            log.push_str(" - ");
            log.push_str(String::from_utf8_lossy(body).trim_end());
        }

        println!("{}", log);
    }
}
