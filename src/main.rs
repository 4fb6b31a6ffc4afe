use devserve::config::{self, Config};
use devserve::{handler, logger, server, DevServer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg.logging)?;

    // Build the Tokio runtime, worker count from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_debug(&format!("[Config] Using {workers} worker threads"));
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, config_path))
}

async fn async_main(cfg: Config, config_path: String) -> Result<(), Box<dyn std::error::Error>> {
    let router = handler::dev_router()?;
    let server = DevServer::new(cfg.server_config(), router, &cfg.logging);
    let listener = server.bind().await?;

    server::signal::start_signal_handler(server.state(), config_path);

    // The standalone binary serves an existing build, so it is ready at once
    let url = server.url().await;
    tokio::spawn(async move {
        server::announce_when_ready(std::future::ready(Ok::<(), String>(())), &url).await;
    });

    server.run(listener).await?;
    Ok(())
}
