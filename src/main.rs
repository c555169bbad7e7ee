use clap::Parser;
use iremind::cli::{
    Args, build_config, build_hasher, init_logging, load_jwt_secret, open_database,
    validate_cors_origin,
};
use iremind::run_server;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    let jwt_secret = load_jwt_secret(&args.jwt_secret);

    let Some(cors_origin) = validate_cors_origin(&args.cors_origin) else {
        std::process::exit(1);
    };

    let Some(hasher) = build_hasher(args.hash_memory_kib, args.hash_iterations) else {
        std::process::exit(1);
    };

    let Some(db) = open_database(&args.database).await else {
        std::process::exit(1);
    };

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    match listener.local_addr() {
        Ok(local_addr) => info!(address = %local_addr, "Listening"),
        Err(_) => info!(address = %addr, "Listening"),
    }

    let config = build_config(db.clone(), jwt_secret, cors_origin, hasher);

    let result = run_server(config, listener, shutdown_signal()).await;
    db.close().await;

    if let Err(e) = result {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down");
}
