//! Command handlers for the BeamWatch CLI.

pub mod monitor;
pub mod record;

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Create a shutdown token cancelled by Ctrl-C.
///
/// Must be called from within a tokio runtime.
pub(crate) fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            signal_token.cancel();
        }
    });
    token
}
