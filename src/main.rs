use attendance_register::remote::{FolderDrive, RemoteDrive};
use attendance_register::storage::{FileStore, KeyValueStore};
use attendance_register::{router, AppState, AttendanceStore, Config};
use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    fs::create_dir_all(&config.data_dir).await?;

    let backend: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.data_dir));
    let store = AttendanceStore::load(backend, config.range).await;

    let drive = config.remote_dir.as_ref().map(|dir| {
        info!(dir = %dir.display(), "remote drive enabled");
        Arc::new(FolderDrive::new(dir)) as Arc<dyn RemoteDrive>
    });

    let app = router(AppState::new(store, drive));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
