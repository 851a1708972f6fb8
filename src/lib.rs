//! Shelf application library
//!
//! Wires the book catalog module into the Shelf kernel and HTTP facade.

pub mod modules;

use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Build a registry holding every application module
pub fn build_registry(settings: &Settings) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings);
    registry
}

/// Run the full module lifecycle around the HTTP server until a shutdown signal arrives
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let registry = build_registry(settings);
    let ctx = InitCtx { settings };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served =
        shelf_http::start_server(&registry, settings, shelf_http::shutdown_signal()).await;

    // Modules are stopped even when the server failed.
    let stopped = registry.stop_modules().await;
    settle_shutdown(served, stopped)
}

/// Combine the server outcome with the module shutdown outcome.
///
/// A server failure wins; a stop failure that accompanies it is logged so neither is lost.
fn settle_shutdown(
    served: anyhow::Result<()>,
    stopped: anyhow::Result<()>,
) -> anyhow::Result<()> {
    match (served, stopped) {
        (Ok(()), stopped) => stopped,
        (Err(server_error), Ok(())) => Err(server_error),
        (Err(server_error), Err(stop_error)) => {
            tracing::error!(error = ?stop_error, "module shutdown failed after server error");
            Err(server_error)
        }
    }
}
