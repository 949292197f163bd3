use std::process::ExitCode;

use author_photo_cache::{SyncConfig, SyncRequest, SyncService};
use tower::Service;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SyncConfig::default();
    let username = config.resolve_username();
    let cache_path = config.cache_path.clone();
    info!("Updating author photos for {}", username);

    let mut service = SyncService::new();

    match service
        .call(SyncRequest::new(username).with_config(config))
        .await
    {
        Ok(_) => {
            info!("Updated {}", cache_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            // キャッシュの読み書きに失敗した場合のみ
            error!("Aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
