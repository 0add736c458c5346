pub mod config;
pub mod guard;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod terminal;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ClientConfig, Credentials};
use crate::scheduler::HttpScheduler;

pub use guard::{GuardTiming, SubmissionGuard, SubmissionTicket};
pub use scheduler::{Scheduler, SchedulerError};
pub use session::{Advance, StudySession};
pub use state::SessionState;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env()?;

    tracing::info!("Using study API at {}", config.api_url);
    let scheduler = match config.credentials {
        Credentials::Token(token) => HttpScheduler::new(&config.api_url, Some(token)),
        Credentials::Login { username, password } => {
            let scheduler = HttpScheduler::new(&config.api_url, None);
            scheduler.login(&username, &password).await?;
            scheduler
        }
    };
    let scheduler = Arc::new(scheduler);

    let session = StudySession::new(scheduler.clone(), config.timing);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());

    terminal::run_loop(&session, &scheduler, stdin).await
}
