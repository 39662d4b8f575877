//! # Pool de Slots de Workers
//! src/server/pool.rs
//!
//! Conjunto de índices libres de tamaño fijo que acota la concurrencia del
//! servidor: el accept loop toma un slot antes de aceptar una conexión y
//! el worker lo devuelve al terminar. Es el único estado compartido entre
//! el accept loop y los workers.
//!
//! La espera por un slot libre es bloqueante (Condvar), nunca busy-wait.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Pool de slots thread-safe con espera bloqueante
pub struct SlotPool {
    /// Índices actualmente libres
    free: Mutex<Vec<usize>>,

    /// Notifica tanto a `acquire` como a `wait_all_free`
    condvar: Condvar,

    /// Cantidad total de slots
    capacity: usize,
}

impl SlotPool {
    /// Crea un pool con todos los slots `0..capacity` libres
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "el pool necesita al menos un slot");
        Self {
            free: Mutex::new((0..capacity).collect()),
            condvar: Condvar::new(),
            capacity,
        }
    }

    /// Toma un slot libre, bloqueando hasta que haya uno
    pub fn acquire(&self) -> usize {
        let mut free = self.free.lock().unwrap();

        loop {
            if let Some(slot) = free.pop() {
                return slot;
            }

            // Esperar a que algún worker devuelva su slot
            free = self.condvar.wait(free).unwrap();
        }
    }

    /// Devuelve un slot al pool y despierta a quien espere
    pub fn release(&self, slot: usize) {
        let mut free = self.free.lock().unwrap();
        debug_assert!(slot < self.capacity);
        debug_assert!(!free.contains(&slot), "slot devuelto dos veces");
        free.push(slot);

        // notify_all: pueden estar esperando acquire() y wait_all_free()
        self.condvar.notify_all();
    }

    /// Espera a que todos los slots estén libres (shutdown)
    ///
    /// Retorna `true` si todos los workers devolvieron su slot dentro del
    /// plazo, `false` si el plazo venció con workers todavía activos.
    pub fn wait_all_free(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut free = self.free.lock().unwrap();

        while free.len() < self.capacity {
            let left = match deadline.checked_duration_since(Instant::now()) {
                Some(left) => left,
                None => return false,
            };

            let (guard, result) = self.condvar.wait_timeout(free, left).unwrap();
            free = guard;

            if result.timed_out() && free.len() < self.capacity {
                return false;
            }
        }

        true
    }

    /// Cantidad de slots actualmente libres
    pub fn free_count(&self) -> usize {
        self.free.lock().unwrap().len()
    }

    /// Cantidad total de slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_pool_all_free() {
        let pool = SlotPool::new(4);
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.free_count(), 4);
    }

    #[test]
    #[should_panic(expected = "al menos un slot")]
    fn test_zero_capacity_panics() {
        let _ = SlotPool::new(0);
    }

    #[test]
    fn test_acquire_release() {
        let pool = SlotPool::new(2);

        let a = pool.acquire();
        let b = pool.acquire();
        assert_ne!(a, b);
        assert_eq!(pool.free_count(), 0);

        pool.release(a);
        assert_eq!(pool.free_count(), 1);
        pool.release(b);
        assert_eq!(pool.free_count(), 2);
    }

    #[test]
    fn test_acquire_blocks_until_release() {
        let pool = Arc::new(SlotPool::new(1));
        let slot = pool.acquire();

        let waiter = thread::spawn({
            let pool = Arc::clone(&pool);
            move || pool.acquire()
        });

        // El waiter debe seguir bloqueado mientras el slot esté tomado
        thread::sleep(Duration::from_millis(100));
        assert!(!waiter.is_finished());

        pool.release(slot);
        let reacquired = waiter.join().unwrap();
        assert_eq!(reacquired, slot);
    }

    #[test]
    fn test_wait_all_free_immediate() {
        let pool = SlotPool::new(3);
        assert!(pool.wait_all_free(Duration::from_millis(10)));
    }

    #[test]
    fn test_wait_all_free_times_out() {
        let pool = SlotPool::new(1);
        let _slot = pool.acquire();
        assert!(!pool.wait_all_free(Duration::from_millis(100)));
    }

    #[test]
    fn test_wait_all_free_wakes_on_release() {
        let pool = Arc::new(SlotPool::new(1));
        let slot = pool.acquire();

        let releaser = thread::spawn({
            let pool = Arc::clone(&pool);
            move || {
                thread::sleep(Duration::from_millis(100));
                pool.release(slot);
            }
        });

        assert!(pool.wait_all_free(Duration::from_secs(5)));
        releaser.join().unwrap();
    }
}
