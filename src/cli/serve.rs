//! `pagefetch serve` handler.

use anyhow::Result;

use pagefetch::config::Config;

/// Run the `/fetch` HTTP service until Ctrl-C.
#[cfg(feature = "server")]
pub(crate) async fn cmd_serve(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    pagefetch::log_component!(
        info,
        "server",
        "Starting fetch service",
        allow_private = config.security.allow_private,
        cache_capacity = config.cache.capacity,
    );
    pagefetch::server::run_server(&config).await
}

#[cfg(not(feature = "server"))]
pub(crate) async fn cmd_serve(
    _config: Config,
    _host: Option<String>,
    _port: Option<u16>,
) -> Result<()> {
    anyhow::bail!("pagefetch was built without the `server` feature")
}
