use std::sync::Arc;
use std::{future::Future, pin::Pin};

use actix_web::{
    http::uri::Builder,
    middleware::Logger,
    web::{self, ServiceConfig},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use anyhow::Context;
use futures::future::select_all;
use prometheus::{Registry, TextEncoder};
use tokio::signal;

use crate::tracing::init_tracing;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

const DEFAULT_BIND_ADDR: &str = "[::1]:9010";

const ENDPOINTS: [&str; 4] = ["/health/live", "/health/ready", "/health/startup", "/metrics"];

type Task = Pin<Box<dyn Future<Output = anyhow::Result<()>>>>;

/// Infrastructure
#[derive(Clone, Debug, clap::Args)]
#[command(rename_all_env = "SCREAMING_SNAKE_CASE", next_help_heading = "Infrastructure")]
pub struct InfrastructureConfig {
    /// Enable the infrastructure endpoint
    #[arg(env, long)]
    pub infrastructure_enabled: bool,
    /// Bind addresses of the infrastructure endpoint
    #[arg(long, env, default_value_t = DEFAULT_BIND_ADDR.into())]
    pub infrastructure_bind: String,
    /// Number of workers
    #[arg(long, env, default_value = "1")]
    pub infrastructure_workers: usize,
    /// Enable tracing
    #[arg(long, env)]
    pub enable_tracing: bool,
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            infrastructure_enabled: false,
            infrastructure_bind: DEFAULT_BIND_ADDR.into(),
            infrastructure_workers: 1,
            enable_tracing: false,
        }
    }
}

async fn index(req: HttpRequest) -> HttpResponse {
    let conn = req.connection_info();

    let apis = ENDPOINTS
        .into_iter()
        .filter_map(|api| {
            Builder::new()
                .authority(conn.host())
                .scheme(conn.scheme())
                .path_and_query(api)
                .build()
                .ok()
                .map(|uri| uri.to_string())
        })
        .collect::<Vec<_>>();

    HttpResponse::Ok().json(apis)
}

async fn health() -> impl Responder {
    HttpResponse::Ok()
}

async fn export_metrics(metrics: web::Data<Arc<Metrics>>) -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = metrics.registry().gather();
    match encoder.encode_to_string(&metric_families) {
        Ok(data) => HttpResponse::Ok().content_type("text/plain").body(data),
        Err(e) => HttpResponse::InternalServerError().body(format!("Error retrieving metrics: {:?}", e)),
    }
}

/// Mount the health and metrics endpoints.
pub fn configure(metrics: Arc<Metrics>, svc: &mut ServiceConfig) {
    svc.app_data(web::Data::new(metrics))
        .service(web::resource("/").to(index))
        .service(
            web::scope("/health")
                .service(web::resource("/live").to(health))
                .service(web::resource("/ready").to(health))
                .service(web::resource("/startup").to(health)),
        )
        .service(web::resource("/metrics").to(export_metrics));
}

/// Process wide runtime support: logging, signal handling and the infrastructure endpoint.
pub struct Infrastructure {
    config: InfrastructureConfig,
    metrics: Arc<Metrics>,
}

impl From<InfrastructureConfig> for Infrastructure {
    fn from(config: InfrastructureConfig) -> Self {
        Self {
            config,
            metrics: Default::default(),
        }
    }
}

impl Infrastructure {
    async fn start_internal(self) -> anyhow::Result<Task> {
        if !self.config.infrastructure_enabled {
            log::info!("Infrastructure endpoint is disabled");
            return Ok(Box::pin(futures::future::pending::<anyhow::Result<()>>()));
        }

        log::info!("Setting up infrastructure endpoint");

        let metrics = self.metrics.clone();
        let mut http = HttpServer::new(move || {
            let metrics = metrics.clone();
            App::new()
                .wrap(Logger::default())
                .configure(|svc| configure(metrics, svc))
        });

        if self.config.infrastructure_workers > 0 {
            http = http.workers(self.config.infrastructure_workers);
        }

        http = http
            .bind(&self.config.infrastructure_bind)
            .context("Failed to bind infrastructure endpoint")?;

        Ok(Box::pin(async move {
            log::info!("Running infrastructure endpoint on:");
            for (addr, scheme) in http.addrs_with_scheme() {
                log::info!("   {scheme}://{addr}");
            }
            http.run().await.context("Failed to run infrastructure endpoint")?;
            Ok::<_, anyhow::Error>(())
        }))
    }

    /// Run `main` until it completes, the infrastructure endpoint fails, or the process is asked
    /// to terminate.
    ///
    /// `id` is the service name reported to the tracing backend.
    pub async fn run<F, Fut>(self, id: &str, main: F) -> anyhow::Result<()>
    where
        F: FnOnce(Arc<Metrics>) -> Fut,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        init_tracing(id, self.config.enable_tracing.into());
        let main = Box::pin(main(self.metrics.clone())) as Task;
        let runner = self.start_internal().await?;
        let sigint = Box::pin(async { signal::ctrl_c().await.context("termination failed") }) as Task;

        #[allow(unused_mut)]
        let mut tasks = vec![runner, main, sigint];

        #[cfg(unix)]
        {
            let sigterm = Box::pin(async {
                signal(SignalKind::terminate())?.recv().await;
                log::info!("Received SIGTERM, shutting down");
                Ok::<_, anyhow::Error>(())
            }) as Task;
            tasks.push(sigterm);
        }

        let (result, _index, _others) = select_all(tasks).await;
        result
    }
}

/// Shared metrics registry, handed to the application so it can register its own metrics.
#[derive(Default)]
pub struct Metrics {
    registry: Registry,
}

impl Metrics {
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
