//! Typed views over the webhook payloads the default listeners read.
//!
//! Only the fields the listeners use are modelled; serde skips the rest, so
//! these stay valid as GitHub adds fields to its payloads.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CommitRef {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub user: User,
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    pub base: CommitRef,
    pub head: CommitRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
/// The action that was performed on the pull request. Values GitHub adds later
/// land in `Other` instead of failing the parse.
pub enum PullRequestEventAction {
    Assigned,
    Unassigned,
    Labeled,
    Unlabeled,
    Opened,
    Edited,
    Closed,
    Reopened,
    Synchronize,
    ReadyForReview,
    ReviewRequested,
    ReviewRequestRemoved,
    Locked,
    Unlocked,
    #[serde(other)]
    Other,
}

/// GitHub API docs: https://developer.github.com/v3/activity/events/types/#pullrequestevent
#[derive(Clone, Debug, Deserialize)]
pub struct PullRequestEvent {
    pub action: PullRequestEventAction,
    pub number: u64,
    pub pull_request: PullRequest,
    pub repository: Option<Repository>,
    pub sender: Option<User>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
    pub username: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Commit {
    pub id: String,
    pub message: String,
    pub author: CommitAuthor,
    #[serde(default)]
    pub distinct: bool,
}

impl Commit {
    pub fn short_id(&self) -> &str {
        self.id.get(..7).unwrap_or(&self.id)
    }
}

/// GitHub API docs: https://developer.github.com/v3/activity/events/types/#pushevent
#[derive(Clone, Debug, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "ref")]
    pub git_ref: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub commits: Vec<Commit>,
    pub repository: Option<Repository>,
}

#[cfg(test)]
mod test {
    use super::{PullRequestEvent, PullRequestEventAction, PushEvent};

    #[test]
    fn pull_request_event() {
        const JSON: &str = r#"{
            "action": "opened",
            "number": 7,
            "pull_request": {
                "number": 7,
                "title": "Add a thing",
                "user": { "login": "octocat", "id": 1 },
                "body": null,
                "base": { "ref": "master", "sha": "aaaaaaa" },
                "head": { "ref": "feature", "sha": "bbbbbbb" }
            },
            "repository": { "name": "hello", "full_name": "octocat/hello" }
        }"#;
        let event: PullRequestEvent = serde_json::from_str(JSON).unwrap();
        assert_eq!(event.action, PullRequestEventAction::Opened);
        assert_eq!(event.pull_request.user.login, "octocat");
        assert!(!event.pull_request.draft);
    }

    #[test]
    fn unknown_pull_request_action() {
        const JSON: &str = r#"{
            "action": "converted_to_draft",
            "number": 7,
            "pull_request": {
                "number": 7,
                "title": "t",
                "user": { "login": "octocat" },
                "base": { "ref": "master", "sha": "a" },
                "head": { "ref": "feature", "sha": "b" }
            }
        }"#;
        let event: PullRequestEvent = serde_json::from_str(JSON).unwrap();
        assert_eq!(event.action, PullRequestEventAction::Other);
    }

    #[test]
    fn push_event() {
        const JSON: &str = r#"{
            "ref": "refs/heads/master",
            "commits": [{
                "id": "0123456789abcdef",
                "message": "Fix it\n\nSigned-off-by: Mona <mona@example.com>",
                "author": { "name": "Mona", "email": "mona@example.com" }
            }]
        }"#;
        let push: PushEvent = serde_json::from_str(JSON).unwrap();
        assert_eq!(push.commits.len(), 1);
        assert_eq!(push.commits[0].short_id(), "0123456");
        assert!(!push.deleted);
    }
}
