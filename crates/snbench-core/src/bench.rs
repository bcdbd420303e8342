//! Benchmark loop
//!
//! Iterations run strictly one after another. Within an iteration only the
//! sign-in and the upload call are timed; generating and encrypting the
//! batch happen outside the measured window.

use std::time::Instant;

use snbench_sync::{Credentials, Session, SyncService};
use tracing::info;

use crate::codec::encrypt_all;
use crate::config::BenchConfig;
use crate::generator::generate_batch;
use crate::purge::purge;
use crate::report::{OperationKind, Report};
use crate::session::SessionProvider;
use crate::{CoreError, Result};

pub struct Benchmark<'a, S: SyncService + ?Sized> {
    service: &'a S,
    sessions: SessionProvider<'a, S>,
    config: BenchConfig,
}

impl<'a, S: SyncService + ?Sized> Benchmark<'a, S> {
    pub fn new(service: &'a S, credentials: Credentials, config: BenchConfig) -> Self {
        Self {
            service,
            sessions: SessionProvider::new(service, credentials),
            config,
        }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Run every iteration. The first failure of any kind ends the run and
    /// is returned; nothing is retried.
    pub async fn run(&self) -> Result<Report> {
        self.config.validate()?;
        let mut report = Report::default();

        if self.config.purge_before_tests {
            info!("running initial purge");
            let session = self.sessions.authenticate().await?;
            let deleted = self.purge(&session).await?;
            report.add_purged(deleted);
        }

        for iteration in 1..=self.config.iterations {
            info!(iteration, "starting iteration");

            let start = Instant::now();
            let session = self.sessions.authenticate().await?;
            let elapsed = start.elapsed();
            info!(?elapsed, "auth time");
            report.record(OperationKind::Auth, elapsed);

            let items = generate_batch(self.config.batch_size);
            let encrypted = encrypt_all(&items, session.keys())?;

            let start = Instant::now();
            self.service
                .put_items(&session, &encrypted)
                .await
                .map_err(CoreError::Transport)?;
            let elapsed = start.elapsed();
            info!(?elapsed, items = encrypted.len(), "put time");
            report.record(OperationKind::Put, elapsed);

            if self.config.purge_post_iteration {
                let deleted = self.purge(&session).await?;
                report.add_purged(deleted);
            }
        }

        Ok(report)
    }

    async fn purge(&self, session: &Session) -> Result<usize> {
        purge(self.service, session, &self.config.purge_filters).await
    }
}
