use crate::{
    github::{Commit, Payload, PushEvent},
    listener::{Listener, PushKind},
};
use anyhow::Context;
use log::{debug, info, warn};

const SIGN_OFF_TRAILER: &str = "Signed-off-by:";

/// Checks that every pushed commit carries a Developer Certificate of Origin
/// sign-off, i.e. a `Signed-off-by: Name <email>` line.
#[derive(Debug, Default)]
pub struct DcoCheck;

impl DcoCheck {
    pub const NAME: &'static str = "dco";
}

/// Returns true if `message` contains a well formed sign-off line.
pub fn has_sign_off(message: &str) -> bool {
    message.lines().any(|line| {
        let line = line.trim();
        if !line.starts_with(SIGN_OFF_TRAILER) {
            return false;
        }
        let identity = line[SIGN_OFF_TRAILER.len()..].trim();
        match (identity.find('<'), identity.strip_suffix('>')) {
            (Some(open), Some(rest)) => {
                let name = identity[..open].trim();
                let email = &rest[open + 1..];
                !name.is_empty() && email.contains('@')
            }
            _ => false,
        }
    })
}

pub fn unsigned_commits(push: &PushEvent) -> Vec<&Commit> {
    push.commits
        .iter()
        .filter(|commit| !has_sign_off(&commit.message))
        .collect()
}

#[async_trait::async_trait]
impl Listener<PushKind> for DcoCheck {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn process(&self, payload: &Payload) -> anyhow::Result<()> {
        let push: PushEvent = payload
            .json()
            .context("push payload could not be deserialized")?;

        if push.deleted || push.commits.is_empty() {
            debug!("{}: no commits to check", push.git_ref);
            return Ok(());
        }

        let unsigned = unsigned_commits(&push);
        for commit in &unsigned {
            warn!(
                "{}: commit {} by {} <{}> is missing a DCO sign-off",
                push.git_ref,
                commit.short_id(),
                commit.author.name,
                commit.author.email,
            );
        }

        info!(
            "{}: {}/{} commits signed off",
            push.git_ref,
            push.commits.len() - unsigned.len(),
            push.commits.len()
        );

        Ok(())
    }
}
