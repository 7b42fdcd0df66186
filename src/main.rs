use std::io::BufRead;
use std::net::TcpListener;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use respd::command::register_builtins;
use respd::config::Config;
use respd::db::InMemoryDatabaseManager;
use respd::dispatcher::Dispatcher;
use respd::pool::Pool;
use respd::uuid::TimeCounterGenerator;

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::new();

    let mut dispatcher = Dispatcher::new();
    register_builtins(&mut dispatcher);
    let dispatcher = Arc::new(dispatcher);

    let manager: Arc<dyn respd::db::DatabaseManager> = Arc::new(InMemoryDatabaseManager::new(
        Box::new(TimeCounterGenerator::new()),
    ));

    let listener = TcpListener::bind(&config.host)
        .with_context(|| format!("failed to bind {}", config.host))?;
    info!("listening on {}", config.host);

    let pool = Arc::new(Pool::new(config.workers));
    let read_timeout = config.read_timeout;
    let write_timeout = config.write_timeout;
    let require_pass = config.require_pass.clone();
    {
        let dispatcher = Arc::clone(&dispatcher);
        let manager = Arc::clone(&manager);
        pool.start(move |stream| {
            respd::connection::serve(
                stream,
                dispatcher.as_ref(),
                manager.as_ref(),
                read_timeout,
                write_timeout,
                require_pass.as_deref(),
            );
        })
        .context("failed to start worker pool")?;
    }

    let accept_pool = Arc::clone(&pool);
    let accept_handle = std::thread::spawn(move || {
        for conn in listener.incoming() {
            match conn {
                Ok(stream) => accept_pool.submit(stream),
                Err(e) => log::warn!("accept failed: {}", e),
            }
        }
    });

    println!("Server started");

    let stdin = std::io::stdin();
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;

    if let Err(e) = pool.stop() {
        log::warn!("failed to stop worker pool: {}", e);
    }
    drop(accept_handle);

    Ok(())
}