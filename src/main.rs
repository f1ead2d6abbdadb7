//! Service Restarter - periodically restarts a managed service
//!
//! This is the main entry point for the service-restarter application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use service_restarter::{
    api::create_router,
    config::Config,
    display::terminal_display_task,
    services::SystemServiceControl,
    state::AppState,
    tasks::{countdown_task, scheduler_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr; stdout belongs to the countdown display
    tracing_subscriber::fmt()
        .with_env_filter(format!("service_restarter={},tower_http=info", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    let policy = match config.policy() {
        Ok(policy) => policy,
        Err(e) => {
            error!("Error: {}", e);
            std::process::exit(1);
        }
    };

    info!("Service Restarter started");
    info!("Service: {}", policy.service_name());
    info!("Restart Interval: {} minutes", config.interval);
    info!("Hold Time: {} seconds", config.hold);

    let manager = config.manager();
    if let Err(e) = manager.check_available().await {
        error!("{}", e);
        std::process::exit(1);
    }

    let (state, restart_rx) = AppState::new(policy, config.host.clone(), config.port);
    let state = Arc::new(state);
    let control = Arc::new(SystemServiceControl::new(manager));

    // Start the restart scheduler
    let scheduler = tokio::spawn(scheduler_task(Arc::clone(&state), control, restart_rx));

    // Start the countdown presenter
    let presenter = tokio::spawn(countdown_task(
        state.policy().service_name().to_string(),
        state.subscribe_baseline(),
        Arc::new(state.display().clone()),
        state.shutdown().clone(),
    ));

    // Display failures never reach the scheduler; the core just runs headless
    let terminal = if config.headless {
        info!("Headless mode, terminal display disabled");
        None
    } else {
        let service_name = state.policy().service_name().to_string();
        let display_rx = state.display().subscribe();
        let shutdown = state.shutdown().clone();
        Some(tokio::spawn(async move {
            if let Err(e) = terminal_display_task(service_name, display_rx, shutdown).await {
                warn!("Display unavailable, continuing headless: {}", e);
            }
        }))
    };

    let app = create_router(Arc::clone(&state));
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Control API running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /restart - Restart the service now");
    info!("  POST /stop    - Stop the restarter");
    info!("  GET  /status  - Countdown and last restart outcome");
    info!("  GET  /health  - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
        _ = state.shutdown().wait() => {
            info!("Stop requested through the API");
        }
    }

    // A restart already underway completes before the scheduler exits
    state.request_stop();
    if let Err(e) = scheduler.await {
        error!("Scheduler task failed: {}", e);
    }
    if let Err(e) = presenter.await {
        error!("Countdown task failed: {}", e);
    }
    if let Some(terminal) = terminal {
        if let Err(e) = terminal.await {
            error!("Terminal display task failed: {}", e);
        }
    }

    info!("Service Restarter shutdown complete");
    Ok(())
}
