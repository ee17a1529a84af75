use crate::{
    graphql::Transport,
    metrics::{self, RateLimit},
    persist::Persister,
};
use itertools::Itertools;
use std::{collections::HashMap, sync::Arc};
use tokio::{
    sync::Semaphore,
    task::{Id, JoinSet},
};

pub const DENY_LIST: [&str; 3] = ["github-enterprise", "actions", "github"];

pub fn is_denied(login: &str) -> bool {
    DENY_LIST.contains(&login)
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub depth: u8,
    pub concurrency: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrgStatus {
    Skipped,
    Succeeded {
        written: usize,
        failed_writes: usize,
        rate_limit: Option<RateLimit>,
    },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrgReport {
    pub login: String,
    pub status: OrgStatus,
}

impl OrgReport {
    fn failed(login: impl Into<String>, cause: impl Into<String>) -> Self {
        OrgReport {
            login: login.into(),
            status: OrgStatus::Failed(cause.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<OrgReport>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.count(|status| matches!(status, OrgStatus::Succeeded { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, OrgStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, OrgStatus::Skipped))
    }

    pub fn repositories_written(&self) -> usize {
        self.reports
            .iter()
            .map(|report| match report.status {
                OrgStatus::Succeeded { written, .. } => written,
                _ => 0,
            })
            .sum()
    }

    pub fn failed_writes(&self) -> usize {
        self.reports
            .iter()
            .map(|report| match report.status {
                OrgStatus::Succeeded { failed_writes, .. } => failed_writes,
                _ => 0,
            })
            .sum()
    }

    fn count(&self, predicate: impl Fn(&OrgStatus) -> bool) -> usize {
        self.reports
            .iter()
            .filter(|report| predicate(&report.status))
            .count()
    }
}

pub async fn run<T>(
    transport: Arc<T>,
    persister: Arc<Persister>,
    organizations: Vec<String>,
    options: &RunOptions,
) -> RunSummary
where
    T: Transport + 'static,
{
    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let mut tasks = JoinSet::new();
    let mut dispatched: HashMap<Id, String> = HashMap::new();
    let mut summary = RunSummary {
        reports: Vec::with_capacity(organizations.len()),
    };

    for login in organizations {
        if is_denied(&login) {
            log::info!("skipping {}", login);
            summary.reports.push(OrgReport {
                login,
                status: OrgStatus::Skipped,
            });
            continue;
        }

        let transport = Arc::clone(&transport);
        let persister = Arc::clone(&persister);
        let semaphore = Arc::clone(&semaphore);
        let depth = options.depth;
        let task_login = login.clone();

        let handle = tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return OrgReport::failed(task_login, "Semaphore closed unexpectedly"),
            };

            process_org(transport.as_ref(), &persister, task_login, depth).await
        });
        dispatched.insert(handle.id(), login);
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(report) => summary.reports.push(report),
            Err(err) => {
                let login = dispatched
                    .remove(&err.id())
                    .unwrap_or_else(|| "<unknown>".to_owned());
                log::error!("Task for {} panicked: {}", login, err);
                summary
                    .reports
                    .push(OrgReport::failed(login, format!("Task panic: {}", err)));
            }
        }
    }

    summary
}

async fn process_org<T>(
    transport: &T,
    persister: &Persister,
    login: String,
    depth: u8,
) -> OrgReport
where
    T: Transport + ?Sized,
{
    let fetched = match metrics::fetch_org_metrics(transport, &login, depth).await {
        Ok(fetched) => fetched,
        Err(err) => return OrgReport::failed(login, err.to_string()),
    };

    let total = fetched.repositories.len();
    log::info!("{}: {} repositories", fetched.organization_login, total);
    let mut written = 0;
    let mut failed_writes = fetched.malformed;

    for (index, repo) in fetched.repositories.iter().enumerate() {
        log::info!("[{}/{}]: Processing {}", index + 1, total, repo.name_with_owner);
        log::debug!(
            "{} languages: {}",
            repo.name_with_owner,
            repo.languages
                .sizes()
                .map(|(name, size)| format!("{}={}", name, size))
                .join(", ")
        );

        match persister.persist(repo).await {
            Ok(_) => written += 1,
            Err(err) => {
                log::error!("Failed to persist {}: {}", repo.name_with_owner, err);
                failed_writes += 1;
            }
        }
    }

    OrgReport {
        login,
        status: OrgStatus::Succeeded {
            written,
            failed_writes,
            rate_limit: fetched.rate_limit,
        },
    }
}
