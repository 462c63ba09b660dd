//! # Shutdown signal for the satellite hosts.
//!
//! [`wait_for_shutdown_signal`] completes when the process is asked to stop:
//! Ctrl-C everywhere, plus `SIGTERM` on unix (the stop signal container
//! orchestrators send). The binaries hand it to
//! `axum::serve(...).with_graceful_shutdown`, so in-flight bus deliveries are
//! answered before the listener closes.
//!
//! A failed handler registration is logged and that signal source stays
//! pending; the process then stops via the other source (or a hard kill).

use tracing::{error, info};

/// Completes when the host should stop accepting deliveries.
pub async fn wait_for_shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("interrupt handler failed: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(err) => {
                error!("terminate handler failed: {err}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => info!("interrupt received, draining in-flight deliveries"),
        _ = terminate => info!("terminate received, draining in-flight deliveries"),
    }
}
