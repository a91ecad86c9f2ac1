//! Periodic automation: the weekly zombie sweep and the daily stats refresh.

mod loop_worker;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Local;
use log::info;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::manager::TabManager;
use crate::utils::time::next_friday_5pm;

use loop_worker::automation_loop;

pub struct AutomationScheduler {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl Default for AutomationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AutomationScheduler {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Spawn the automation loop. The first sweep lands on the next Friday 17:00 local time.
    pub fn start(&mut self, manager: Arc<TabManager>) -> Result<()> {
        let now = Local::now().fixed_offset();
        let first_sweep = next_friday_5pm(&now);
        let delay = (first_sweep - now)
            .to_std()
            .unwrap_or(Duration::ZERO);
        info!("first zombie sweep scheduled for {}", first_sweep.to_rfc3339());
        self.start_with_delay(manager, delay)
    }

    pub fn start_with_delay(
        &mut self,
        manager: Arc<TabManager>,
        weekly_first_delay: Duration,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("automation already running");
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(automation_loop(
            manager,
            weekly_first_delay,
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("automation loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}
