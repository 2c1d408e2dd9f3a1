mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument names the config file (without extension)
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config".to_string());
    let cfg = config::Config::load_from(&config_path)?;

    // Size the Tokio runtime from the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        println!("[CONFIG] Using {workers} worker threads");
    } else {
        println!("[CONFIG] Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(server::run(cfg))
}
