// src/github/extract.rs
// =============================================================================
// Turns paginated API responses into Repository and Commit records.
//
// Calls made per run:
// - 1 listing of the user's repositories (however many pages)
// - per repository: 1 listing of commits authored by the user
// - per commit: 1 detail request to get additions/deletions
// =============================================================================

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use super::config::PER_PAGE;
use super::error::GitHubError;
use super::fetch::Fetcher;
use crate::records::{self, Commit, Repository};

// Which repositories `/users/{user}/repos` should list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepoType {
    /// Repositories the user owns
    #[default]
    Owner,
    /// Owned repositories plus ones the user is a member of
    All,
    /// Only repositories the user is a member of
    Member,
}

impl RepoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoType::Owner => "owner",
            RepoType::All => "all",
            RepoType::Member => "member",
        }
    }
}

impl FromStr for RepoType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(RepoType::Owner),
            "all" => Ok(RepoType::All),
            "member" => Ok(RepoType::Member),
            other => Err(format!(
                "unknown repository type '{}' (expected owner, all or member)",
                other
            )),
        }
    }
}

impl fmt::Display for RepoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Extractor {
    fetcher: Fetcher,
    user: String,
}

impl Extractor {
    pub fn new(fetcher: Fetcher, user: impl Into<String>) -> Self {
        Self {
            fetcher,
            user: user.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Lists the user's repositories
    pub async fn get_repos(&self, repo_type: RepoType) -> Result<Vec<Repository>, GitHubError> {
        let mut url = self.fetcher.endpoint(&["users", self.user.as_str(), "repos"])?;
        url.query_pairs_mut()
            .append_pair("type", repo_type.as_str())
            .append_pair("per_page", &PER_PAGE.to_string());

        let items = self.fetcher.fetch(url.clone()).await?.into_list(&url)?;

        let repos = items
            .into_iter()
            .map(Repository::from_json)
            .collect::<Result<Vec<_>, _>>()?;

        info!(user = %self.user, count = repos.len(), "listed repositories");
        Ok(repos)
    }

    /// Lists the commits the user authored in `repo`, with line stats
    ///
    /// One detail request is made per commit in the listing.
    pub async fn get_commits(&self, repo: &Repository) -> Result<Vec<Commit>, GitHubError> {
        let owner = repo.owner.as_deref().unwrap_or(self.user.as_str());

        let mut url = self
            .fetcher
            .endpoint(&["repos", owner, repo.name.as_str(), "commits"])?;
        url.query_pairs_mut()
            .append_pair("author", &self.user)
            .append_pair("per_page", &PER_PAGE.to_string());

        let summaries = self.fetcher.fetch(url.clone()).await?.into_list(&url)?;
        debug!(repo = %repo.name, count = summaries.len(), "listed commit summaries");

        let mut commits = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let sha = records::commit_sha(summary)?;
            commits.push(self.get_commit(owner, &repo.name, &sha).await?);
        }

        info!(repo = %repo.name, count = commits.len(), "fetched commits");
        Ok(commits)
    }

    /// Fetches one commit's details
    pub async fn get_commit(
        &self,
        owner: &str,
        repo_name: &str,
        sha: &str,
    ) -> Result<Commit, GitHubError> {
        let url = self
            .fetcher
            .endpoint(&["repos", owner, repo_name, "commits", sha])?;

        let detail = self.fetcher.fetch(url.clone()).await?.into_object(&url)?;
        let commit = Commit::from_json(repo_name, detail, &self.fetcher.config().timestamp_format)?;
        Ok(commit)
    }
}
