use crate::{
    github::{Payload, PullRequestEvent, PullRequestEventAction},
    listener::{Listener, PullRequestKind},
};
use anyhow::Context;
use log::{debug, info};

/// Picks up pull requests as they are opened (or reopened) and logs a triage
/// line for each.
#[derive(Debug, Default)]
pub struct AutomaticPr;

impl AutomaticPr {
    pub const NAME: &'static str = "automatic-pr";

    fn wants(event: &PullRequestEvent) -> bool {
        matches!(
            event.action,
            PullRequestEventAction::Opened | PullRequestEventAction::Reopened
        )
    }
}

#[async_trait::async_trait]
impl Listener<PullRequestKind> for AutomaticPr {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn process(&self, payload: &Payload) -> anyhow::Result<()> {
        let event: PullRequestEvent = payload
            .json()
            .context("pull_request payload could not be deserialized")?;

        if !Self::wants(&event) {
            debug!("#{}: ignoring action {:?}", event.number, event.action);
            return Ok(());
        }

        let pr = &event.pull_request;
        let repo = event
            .repository
            .as_ref()
            .map(|r| r.full_name.as_str())
            .unwrap_or("<unknown repo>");
        info!(
            "{}#{}: \"{}\" by {} ({} -> {}){}",
            repo,
            event.number,
            pr.title,
            pr.user.login,
            pr.head.git_ref,
            pr.base.git_ref,
            if pr.draft { " [draft]" } else { "" },
        );

        Ok(())
    }
}
