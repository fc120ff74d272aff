use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

use leave_notifier::config::Config;
use leave_notifier::db::{ensure_schema, init_db};
use leave_notifier::docs::ApiDoc;
use leave_notifier::mail::SmtpMailer;
use leave_notifier::routes::{self, Limiters};
use leave_notifier::store::MySqlLeaveStore;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Leave notifier is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(addr = %config.server_addr, "Server starting...");

    let pool = init_db(&config.database_url, config.db_max_connections).await?;
    ensure_schema(&pool).await?;

    let store = Data::new(MySqlLeaveStore::new(pool));
    let mailer = Data::new(SmtpMailer::new(&config.smtp)?);
    let import_settings = Data::new(config.import.clone());
    let notify_settings = Data::new(config.notify.clone());
    let limiters = Limiters::new(config.rate_import_per_min, config.rate_notify_per_min);
    let api_prefix = config.api_prefix.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard so JS/CSS assets match
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(store.clone())
            .app_data(mailer.clone())
            .app_data(import_settings.clone())
            .app_data(notify_settings.clone())
            .service(index)
            .configure(|cfg| {
                routes::configure::<MySqlLeaveStore, SmtpMailer>(cfg, &api_prefix, &limiters)
            })
    })
    .bind(&config.server_addr)?
    .run()
    .await?;

    Ok(())
}
