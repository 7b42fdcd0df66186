use std::collections::VecDeque;
use std::net::TcpStream;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

/// Fixed-size pool of worker threads, each blocking in turn on a shared
/// condition variable until a connection is queued. One worker owns one
/// connection for its entire lifetime — there is no per-connection task
/// handed off mid-flight, matching the collaborator's goroutine-pool
/// design (`sync.Mutex` + `sync.Cond` rather than a channel), since the
/// pool itself is the only piece of state ever shared across workers.
struct Shared {
    queue: VecDeque<TcpStream>,
    started: bool,
    stopping: bool,
}

/// Errors surfaced by [`Pool::start`]/[`Pool::stop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    AlreadyStarted,
    NotStarted,
}

impl std::fmt::Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolError::AlreadyStarted => write!(f, "pool already started"),
            PoolError::NotStarted => write!(f, "pool not started"),
        }
    }
}

impl std::error::Error for PoolError {}

pub struct Pool {
    state: Arc<(Mutex<Shared>, Condvar)>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    size: usize,
}

impl Pool {
    pub fn new(size: usize) -> Pool {
        Pool {
            state: Arc::new((
                Mutex::new(Shared {
                    queue: VecDeque::new(),
                    started: false,
                    stopping: false,
                }),
                Condvar::new(),
            )),
            workers: Mutex::new(Vec::new()),
            size,
        }
    }

    /// Spawns `size` worker threads, each running `handle` to completion
    /// for every connection it dequeues. Fails with [`PoolError::AlreadyStarted`]
    /// without spawning anything if the pool is already running.
    pub fn start<F>(&self, handle: F) -> Result<(), PoolError>
    where
        F: Fn(TcpStream) + Send + Sync + 'static,
    {
        let mut guard = self.state.0.lock().unwrap();
        if guard.started {
            return Err(PoolError::AlreadyStarted);
        }
        guard.started = true;
        drop(guard);

        let handle = Arc::new(handle);
        let mut workers = self.workers.lock().unwrap();
        for _ in 0..self.size {
            let state = Arc::clone(&self.state);
            let handle = Arc::clone(&handle);
            workers.push(std::thread::spawn(move || worker_loop(state, handle)));
        }
        Ok(())
    }

    /// Enqueues `conn` for the next idle worker, waking exactly one.
    pub fn submit(&self, conn: TcpStream) {
        let (lock, cvar) = &*self.state;
        let mut guard = lock.lock().unwrap();
        guard.queue.push_back(conn);
        cvar.notify_one();
    }

    /// Signals every worker to exit once its current connection (if any)
    /// finishes, wakes them all, then blocks until each has joined. Fails
    /// with [`PoolError::NotStarted`] if the pool isn't currently running.
    pub fn stop(&self) -> Result<(), PoolError> {
        {
            let (lock, cvar) = &*self.state;
            let mut guard = lock.lock().unwrap();
            if !guard.started {
                return Err(PoolError::NotStarted);
            }
            guard.stopping = true;
            // Drop every connection still sitting in the queue — nothing
            // will ever dequeue them once workers observe `stopping`.
            guard.queue.clear();
            cvar.notify_all();
        }
        let mut workers = self.workers.lock().unwrap();
        for w in workers.drain(..) {
            let _ = w.join();
        }

        let mut guard = self.state.0.lock().unwrap();
        guard.started = false;
        guard.stopping = false;
        Ok(())
    }
}

fn worker_loop<F>(state: Arc<(Mutex<Shared>, Condvar)>, handle: Arc<F>)
where
    F: Fn(TcpStream) + Send + Sync + 'static,
{
    let (lock, cvar) = &*state;
    loop {
        let conn = {
            let mut guard = lock.lock().unwrap();
            loop {
                if let Some(conn) = guard.queue.pop_front() {
                    break Some(conn);
                }
                if guard.stopping {
                    break None;
                }
                guard = cvar.wait(guard).unwrap();
            }
        };
        match conn {
            Some(conn) => handle(conn),
            None => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::time::Duration;

    fn local_stream() -> TcpStream {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).unwrap();
        let _ = listener.accept().unwrap();
        client
    }

    #[test]
    fn starting_twice_fails_without_spawning_duplicate_workers() {
        let pool = Pool::new(2);
        assert!(pool.start(|_| {}).is_ok());
        assert_eq!(pool.start(|_| {}).unwrap_err(), PoolError::AlreadyStarted);
        assert_eq!(pool.workers.lock().unwrap().len(), 2);
        assert!(pool.stop().is_ok());
    }

    #[test]
    fn stop_without_start_fails() {
        let pool = Pool::new(1);
        assert_eq!(pool.stop().unwrap_err(), PoolError::NotStarted);
    }

    #[test]
    fn dispatches_queued_connections_to_workers() {
        let count = Arc::new(AtomicUsize::new(0));
        let pool = Pool::new(3);
        let counted = Arc::clone(&count);
        pool.start(move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        for _ in 0..5 {
            pool.submit(local_stream());
        }

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while count.load(Ordering::SeqCst) < 5 && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(count.load(Ordering::SeqCst), 5);
        pool.stop().unwrap();
    }

    #[test]
    fn stop_lets_idle_workers_exit_cleanly() {
        let barrier = Arc::new(Barrier::new(1));
        let _ = barrier;
        let pool = Pool::new(4);
        pool.start(|_| {});
        pool.stop();
        assert!(pool.workers.lock().unwrap().is_empty());
    }
}
