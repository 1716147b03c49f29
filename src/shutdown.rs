use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;

/// Install a shutdown handler that listens for SIGTERM and SIGINT.
///
/// Returns a `CancellationToken` that is cancelled when either signal is received.
/// Pass it to [`Dispatcher::with_cancellation`](crate::scheduler::Dispatcher::with_cancellation)
/// so a run stops taking new jobs and drains the ones in flight.
pub fn install_shutdown_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let (mut sigterm, mut sigint) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(error = %e, "Failed to install signal handlers, shutdown signals ignored");
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, draining in-flight jobs");
            }
            _ = sigint.recv() => {
                tracing::info!("Received SIGINT, draining in-flight jobs");
            }
        }

        token_clone.cancel();
    });

    token
}
