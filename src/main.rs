use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use course_registry::config::{AppState, Config};
use course_registry::store::CourseStore;
use course_registry::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // Worker thread count follows server.workers, defaulting to CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        if workers == 0 {
            return Err("server.workers must be greater than 0".into());
        }
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    let state = Arc::new(AppState::new(&cfg, CourseStore::new()));
    let active_connections = Arc::new(AtomicUsize::new(0));

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    logger::log_server_start(&addr, &cfg);

    server::run_server_loop(listener, state, active_connections, signals).await;

    tracing::info!("Server stopped");
    Ok(())
}
