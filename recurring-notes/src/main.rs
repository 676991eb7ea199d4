mod config;

mod app;
mod auth;
mod ctx;
mod db;
mod errors;
mod notes;
mod openapi;
mod recurrence;
mod shared;
mod state;
mod users;

use std::net::SocketAddr;

use aide::axum::ApiRouter;
use app::AppParams;
pub use config::config;
pub use db::{init_db, DB};
pub use errors::{Error, Result};
use shared::tracing::{add_tracing_layer, setup_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> errors::Result<()> {
    let config = config();

    setup_tracing(config.log_json, config.tokio_console);

    let conn = init_db().await?;

    let (app, _) = app::create(AppParams {
        db: conn,
        router: |state| {
            ApiRouter::new()
                .merge(auth::router(state.clone()))
                .merge(notes::router(state))
        },
    })
    .await?;

    let app = add_tracing_layer(app);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|e| Error::Unexpected(format!("failed to bind {}:{}: {e}", config.host, config.port)))?;

    if let Ok(addr) = listener.local_addr() {
        tracing::info!("listening on http://{addr}, anchor policy {:?}", config.anchor_policy);
    }

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|e| Error::Unexpected(e.to_string()))?;

    Ok(())
}
