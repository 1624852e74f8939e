use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use dotenvy::dotenv;

use driver_settlement::config::{DatabaseConfig, EnvironmentConfig};
use driver_settlement::database::DatabaseConnection;
use driver_settlement::repositories::PgSettlementRepository;
use driver_settlement::routes::create_app_router;
use driver_settlement::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("🚚 Driver Settlement Service");
    info!("================================================");
    info!("🌍 Entorno: {}", config.environment);

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new(&DatabaseConfig::from_env()?).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {:#}", e);
            return Err(e);
        }
    };

    if config.run_migrations {
        db_connection.run_migrations().await?;
    }

    let ledger = Arc::new(PgSettlementRepository::new(db_connection.pool().clone()));
    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app_router(AppState::new(ledger, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("   POST /api/settlements/preview - Previsualizar liquidación");
    info!("   POST /api/settlements - Procesar liquidación");
    info!("   GET  /api/settlements - Historial de liquidaciones");
    info!("   GET  /api/settlements/eligible/:driver_id - Viajes pendientes");
    info!("   GET  /api/dashboard - Totales pendientes de la flota");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Servidor terminó con error: {}", e);
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
            Ok(mut stream) => {
                stream.recv().await;
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
