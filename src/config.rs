//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor HTTP con soporte para argumentos CLI y
//! variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./pegaso --host 0.0.0.0 --port 8080 --workers 8 --backlog 1024
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! PEGASO_PORT=8080 PEGASO_WORKERS=8 ./pegaso
//! ```

use clap::Parser;
use std::time::Duration;

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "pegaso")]
#[command(about = "Servidor HTTP/1.1 concurrente con gateway de aplicaciones")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Host/IP en el que escucha el servidor
    #[arg(long, default_value = "0.0.0.0", env = "PEGASO_HOST")]
    pub host: String,

    /// Puerto en el que escucha (0 = puerto efímero)
    #[arg(short, long, default_value = "8080", env = "PEGASO_PORT")]
    pub port: u16,

    /// Máximo de conexiones atendidas en simultáneo
    /// (0 = 2 x CPUs disponibles)
    #[arg(long, default_value = "0", env = "PEGASO_WORKERS")]
    pub workers: usize,

    /// Backlog del socket: conexiones pendientes antes de que el sistema
    /// rechace nuevas (negativo = default del sistema)
    #[arg(long, default_value = "1024", env = "PEGASO_BACKLOG")]
    pub backlog: i64,

    /// Timeout de lectura por conexión, en milisegundos
    #[arg(long = "read-timeout", default_value = "5000", env = "PEGASO_READ_TIMEOUT")]
    pub read_timeout_ms: u64,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use pegaso::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Cantidad efectiva de workers (resuelve el 0 = automático)
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get() * 2
        } else {
            self.workers
        }
    }

    /// Backlog efectivo (`None` = que elija el sistema)
    pub fn effective_backlog(&self) -> Option<i32> {
        if self.backlog < 0 {
            None
        } else {
            Some(self.backlog.min(i32::MAX as i64) as i32)
        }
    }

    /// Timeout de lectura como `Duration`
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.read_timeout_ms == 0 {
            return Err("Read timeout must be > 0".to_string());
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("⚙️  Configuración:");
        println!("   Dirección:    {}", self.address());
        println!("   Workers:      {}", self.effective_workers());
        match self.effective_backlog() {
            Some(backlog) => println!("   Backlog:      {}", backlog),
            None => println!("   Backlog:      (default del sistema)"),
        }
        println!("   Read timeout: {} ms", self.read_timeout_ms);
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: 0,
            backlog: 1024,
            read_timeout_ms: 5_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.workers, 0);
        assert_eq!(config.backlog, 1024);
        assert_eq!(config.read_timeout_ms, 5_000);
    }

    #[test]
    fn test_address() {
        let config = Config::default();
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_effective_workers_auto() {
        let config = Config::default();
        assert_eq!(config.effective_workers(), num_cpus::get() * 2);
    }

    #[test]
    fn test_effective_workers_explicit() {
        let mut config = Config::default();
        config.workers = 3;
        assert_eq!(config.effective_workers(), 3);
    }

    #[test]
    fn test_effective_backlog() {
        let mut config = Config::default();
        assert_eq!(config.effective_backlog(), Some(1024));

        config.backlog = -1;
        assert_eq!(config.effective_backlog(), None);

        config.backlog = 0;
        assert_eq!(config.effective_backlog(), Some(0));
    }

    #[test]
    fn test_read_timeout() {
        let mut config = Config::default();
        config.read_timeout_ms = 250;
        assert_eq!(config.read_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_validate_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_read_timeout() {
        let mut config = Config::default();
        config.read_timeout_ms = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Read timeout"));
    }

    #[test]
    fn test_config_print_summary() {
        let config = Config::default();
        // Should not panic
        config.print_summary();
    }
}
