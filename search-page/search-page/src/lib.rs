use std::process::ExitCode;

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Serve the search results page
    Api(search_page_api::Run),
}

impl Command {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self {
            Self::Api(run) => run.run().await,
        }
    }
}
