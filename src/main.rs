mod config;
mod graphql;
mod http;
mod logger;
mod merge;
mod metrics;
mod persist;
mod scheduler;

use anyhow::{Context, Result};
use config::Config;
use graphql::GraphqlClient;
use persist::Persister;
use scheduler::RunOptions;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logger::init()?;

    log::info!("Starting");
    let config = Config::load().context("Cannot load configuration")?;

    let transport = Arc::new(GraphqlClient::new(config.endpoint(), &config.token));

    let organizations = match &config.org_list {
        Some(orgs) => {
            log::info!("Using {} organizations from ORG_LIST", orgs.len());
            orgs.to_owned()
        }
        None => metrics::list_organizations(transport.as_ref()).await,
    };

    let persister = Arc::new(Persister::new(&config.output_dir));
    let options = RunOptions {
        depth: config.depth,
        concurrency: config.concurrency,
    };

    log::info!(
        "Processing {} organizations, {} at a time",
        organizations.len(),
        options.concurrency
    );
    let summary = scheduler::run(transport, Arc::clone(&persister), organizations, &options).await;

    log::info!(
        "Finished: {} succeeded, {} failed, {} skipped, {} repositories written, {} writes failed",
        summary.succeeded(),
        summary.failed(),
        summary.skipped(),
        summary.repositories_written(),
        summary.failed_writes()
    );
    for report in &summary.reports {
        if let scheduler::OrgStatus::Failed(cause) = &report.status {
            log::warn!("{} failed: {}", report.login, cause);
        }
    }

    log::info!("Merging into {}", config.output_file.display());
    if let Err(err) = merge::merge(&config.output_file, persister.output_dir()).await {
        log::error!("Cannot merge results: {:#}", anyhow::Error::from(err));
    }

    Ok(())
}
