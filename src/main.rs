//! # pegaso - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor. Arma la configuración desde CLI/env y
//! sirve la aplicación echo de demostración a través del gateway.

use pegaso::config::Config;
use pegaso::gateway::{application_handler, Environ, GatewayError, StartResponse};
use pegaso::http::Method;
use pegaso::server::Server;
use std::io::Read;
use std::net::ToSocketAddrs;

/// Aplicación echo de demostración
///
/// GET (o cualquier request sin body): `200 OK` sin body. Con body: lo
/// devuelve tal cual, como `text/plain`.
fn echo_app(
    environ: &mut Environ,
    start: &mut StartResponse,
) -> Result<Vec<Vec<u8>>, GatewayError> {
    if environ.method == Method::GET {
        start.start("200 OK", Vec::new())?;
        return Ok(Vec::new());
    }

    let mut body = Vec::new();
    if environ.input.read_to_end(&mut body).is_err() {
        body.clear();
    }

    if body.is_empty() {
        start.start("200 OK", Vec::new())?;
        return Ok(Vec::new());
    }

    let headers = vec![
        ("content-length".to_string(), body.len().to_string()),
        ("content-type".to_string(), "text/plain".to_string()),
    ];
    start.start("200 OK", headers)?;

    Ok(vec![body])
}

fn main() {
    println!("=================================");
    println!("  pegaso HTTP/1.1 Server");
    println!("=================================\n");

    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(1);
    }

    config.print_summary();

    // Dirección configurada del servidor, para los campos
    // server_name/server_port del entorno del gateway
    let server_addr = match config.address().to_socket_addrs() {
        Ok(mut addrs) => match addrs.next() {
            Some(addr) => addr,
            None => {
                eprintln!("💥 Dirección inválida: {}", config.address());
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("💥 Dirección inválida: {} ({})", config.address(), e);
            std::process::exit(1);
        }
    };

    let server = match Server::new(&config, application_handler(echo_app, server_addr)) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("💥 Error al crear el servidor: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
