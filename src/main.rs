use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use dealership_api::config::EnvironmentConfig;
use dealership_api::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚗 Dealership API - Registros de vehículos");
    info!("==========================================");
    info!("🌍 Entorno: {}", config.environment);
    if let Some(warning) = config.cors_warning() {
        warn!("⚠️ {}", warning);
    }

    // Postgres y Firebase se inicializan en la primera petición
    let app_state = AppState::from_env(config.clone());
    let app = create_router(app_state);

    info!("🌐 Servidor iniciando en {}", config.server_url());
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /health - Health check");
    info!("🚗 Endpoints - Vehicles (Bearer token de Firebase):");
    info!("   GET    /api/vehicles - Listar vehículos (?status= opcional)");
    info!("   GET    /api/vehicles?id=<id> - Obtener vehículo");
    info!("   POST   /api/vehicles - Crear o actualizar vehículo");
    info!("   DELETE /api/vehicles?id=<id> - Eliminar vehículo");

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
