use ferrous_lookup_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// Logged once the subscriber exists.
pub fn log_config(config_path: Option<&str>, config: &Config) {
    info!(
        config_file = config_path.unwrap_or("default"),
        store_backend = %config.store.backend,
        upstreams = ?config.resolver.upstream_servers,
        negative_ttl = config.cache.negative_ttl_secs,
        "Configuration loaded"
    );
}
