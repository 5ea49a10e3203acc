use std::num::NonZeroUsize;
use std::process::ExitCode;
use std::sync::Arc;

use actix_web::web;
use scour_infrastructure::app::http::{HttpServerBuilder, HttpServerConfig};
use scour_infrastructure::{Infrastructure, InfrastructureConfig};

pub mod backend;
pub mod loader;
pub mod server;

mod endpoints;
mod error;

pub use error::Error;

use crate::backend::HttpSearchBackend;
use crate::loader::{LoaderConfig, SearchPageLoader};
use crate::server::AppState;

pub const DEFAULT_SEARCH_URL: &str = "http://localhost:8080/search";

#[derive(clap::Args, Debug)]
#[command(about = "Run the search page server", args_conflicts_with_subcommands = true)]
pub struct Run {
    /// The search service endpoint, receiving the paginated queries
    #[arg(long, env = "SEARCH_URL", default_value = DEFAULT_SEARCH_URL)]
    pub search_url: reqwest::Url,

    /// Number of results per page
    #[arg(long, env = "PAGE_SIZE", default_value = "10")]
    pub page_size: NonZeroUsize,

    #[command(flatten)]
    pub http: HttpServerConfig,

    #[command(flatten)]
    pub infra: InfrastructureConfig,
}

impl Run {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        Infrastructure::from(self.infra.clone())
            .run("search-page", |metrics| async move {
                let state = self.state()?;
                let version = scour_version::version!();

                log::info!(
                    "Forwarding searches to {} ({} results per page)",
                    self.search_url,
                    self.page_size
                );

                HttpServerBuilder::try_from(self.http)?
                    .metrics(metrics.registry().clone(), "search_page")
                    .configure(move |svc| {
                        server::configure(state.clone(), svc);
                        scour_version::version::configure(version.clone(), svc);
                    })
                    .run()
                    .await
            })
            .await?;

        Ok(ExitCode::SUCCESS)
    }

    fn state(&self) -> anyhow::Result<web::Data<AppState>> {
        let client = reqwest::Client::builder().build()?;
        let backend = HttpSearchBackend::new(client, self.search_url.clone());
        let loader = SearchPageLoader::new(LoaderConfig {
            limit: self.page_size.get(),
        });

        Ok(web::Data::new(AppState::new(loader, Arc::new(backend))))
    }
}
