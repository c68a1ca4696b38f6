//! Shift Planner HTTP server.

use std::sync::Arc;

use shift_planner::adapters::http::{app_router, PlanningHandlers, PlanningPorts};
use shift_planner::adapters::postgres::{
    run_migrations, PostgresMemberDirectory, PostgresPlanningRepository,
};
use shift_planner::adapters::events::BackgroundHandler;
use shift_planner::adapters::{
    EmailNotificationSender, InMemoryEventBus, LogNotificationSender, TextPlanningExporter,
};
use shift_planner::application::handlers::NotifyAssignedMemberHandler;
use shift_planner::config::AppConfig;
use shift_planner::ports::{EventSubscriber, NotificationSender, PlanningRepository};
use shift_planner::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    telemetry::init_tracing(&config.server)?;

    tracing::info!(
        environment = ?config.server.environment,
        notification_mode = ?config.notification.mode,
        "Starting Shift Planner"
    );

    // Database
    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let repository: Arc<dyn PlanningRepository> =
        Arc::new(PostgresPlanningRepository::new(pool.clone()));
    let directory = Arc::new(PostgresMemberDirectory::new(pool));
    let bus = Arc::new(InMemoryEventBus::new());

    // Notifications
    let sender: Arc<dyn NotificationSender> = match (&config.email, config.notification.enabled) {
        (_, false) => {
            tracing::warn!("Notifications are disabled; requested sends are recorded as failed");
            Arc::new(LogNotificationSender::disabled())
        }
        (Some(email), true) => Arc::new(EmailNotificationSender::new(email)?),
        (None, true) => {
            tracing::warn!("No email provider configured; notifications are only logged");
            Arc::new(LogNotificationSender::new())
        }
    };

    let deferred = config.notification.is_deferred();
    if deferred {
        let notifier = NotifyAssignedMemberHandler::new(
            repository.clone(),
            sender.clone(),
            bus.clone(),
        );
        bus.subscribe(
            NotifyAssignedMemberHandler::EVENT_TYPE,
            Arc::new(BackgroundHandler::new(notifier)),
        );
    }

    let handlers = PlanningHandlers::new(PlanningPorts {
        repository,
        directory,
        sender,
        publisher: bus,
        exporter: Arc::new(TextPlanningExporter::new()),
        deferred_notifications: deferred,
    });

    let app = app_router(handlers, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
