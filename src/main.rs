use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod relay;
mod server;

/// Config file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: config file path without extension
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Build the Tokio runtime, honoring the configured worker count
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("Using {workers} worker threads"));
    } else {
        logger::log_info("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    if !cfg.upstream.is_complete() {
        logger::log_warning(&format!(
            "Upstream credentials incomplete; every relay call will fail until {}, {} and {} are set",
            config::HOST_ENV,
            config::USER_ENV,
            config::PASS_ENV
        ));
    }

    let state = Arc::new(config::AppState::new(&cfg)?);
    server::signal::start_signal_handler(Arc::clone(&state.shutdown_signal))?;

    logger::log_server_start(&addr, &cfg);
    server::run_server_loop(listener, state).await;
    logger::log_info("Server stopped");

    Ok(())
}
