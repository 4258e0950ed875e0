// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (RUST_LOG controls how chatty it is)
// 2. Work out the username, token and repository type (flags or prompts)
// 3. List the user's repositories, then every commit they authored in each
// 4. Write everything to two CSV files
// 5. Exit with a proper code (0 = success, 2 = error)
//
// Nothing is written until every request has succeeded: a failure part way
// through aborts the run and leaves no partial export behind.
//
// Rust concepts used:
// - async/await: reqwest is async, so we drive it with tokio
// - Result<T, E>: For error handling (T = success type, E = error type)
// - anyhow::Context: Adds "what were we doing" to errors as they bubble up
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing and prompts
mod export; // src/export/ - CSV output
mod github; // src/github/ - GitHub API client
mod records; // src/records/ - Repository and Commit types

use std::io;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use github::{Extractor, Fetcher, GitHubConfig, RepoType};
use records::{Commit, Repository};

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so they never mix with prompts on stdout
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let input = {
        let stdin = io::stdin();
        let mut stdin = stdin.lock();
        cli.resolve_input(&mut stdin, &mut io::stdout())?
    };

    let config = GitHubConfig::new(cli.api_url.clone()).with_token(input.token.clone());
    info!(
        user = %input.user,
        repo_type = %input.repo_type,
        authenticated = config.is_authenticated(),
        "starting extraction"
    );

    let fetcher = Fetcher::new(config).context("failed to set up the GitHub client")?;
    let extractor = Extractor::new(fetcher, input.user.clone());

    let (repos, commits) = extract_all(&extractor, input.repo_type).await?;

    let today = Local::now().date_naive();
    let repo_path = export::export_to_csv(&repos, extractor.user(), &cli.output_dir, today)
        .context("failed to export repositories")?;
    let commit_path = export::export_to_csv(&commits, extractor.user(), &cli.output_dir, today)
        .context("failed to export commits")?;

    println!();
    println!("📊 Summary:");
    println!("   📦 Repositories: {} -> {}", repos.len(), repo_path.display());
    println!("   📝 Commits: {} -> {}", commits.len(), commit_path.display());

    Ok(())
}

// Collects every repository and every commit the user authored in them
//
// Requests run one after another: the repo listing first, then for each
// repository its commit listing followed by one detail call per commit.
async fn extract_all(
    extractor: &Extractor,
    repo_type: RepoType,
) -> Result<(Vec<Repository>, Vec<Commit>)> {
    println!("Requesting repo data...");
    let repos = extractor
        .get_repos(repo_type)
        .await
        .with_context(|| format!("failed to list repositories for {}", extractor.user()))?;
    println!("📦 Found {} repositor{}", repos.len(), if repos.len() == 1 { "y" } else { "ies" });

    let mut commits = Vec::new();
    for (index, repo) in repos.iter().enumerate() {
        println!("   [{}/{}] Requesting commits for {}...", index + 1, repos.len(), repo.name);

        let repo_commits = extractor
            .get_commits(repo)
            .await
            .with_context(|| format!("failed to fetch commits for repository {}", repo.name))?;

        println!("         {} commit(s)", repo_commits.len());
        commits.extend(repo_commits);
    }

    Ok((repos, commits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn extractor_for(server: &MockServer) -> Extractor {
        let config = GitHubConfig::new(Url::parse(&server.uri()).unwrap());
        Extractor::new(Fetcher::new(config).unwrap(), "mona")
    }

    async fn mount_repos(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/users/mona/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "alpha", "html_url": "https://github.com/mona/alpha", "default_branch": "main"},
                {"id": 2, "name": "beta", "html_url": "https://github.com/mona/beta", "default_branch": "main"}
            ])))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_extract_all() {
        let server = MockServer::start().await;
        mount_repos(&server).await;

        Mock::given(method("GET"))
            .and(path("/repos/mona/alpha/commits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"sha": "a1"}])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/repos/mona/alpha/commits/a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sha": "a1",
                "commit": {
                    "author": {"name": "Mona", "email": "mona@example.com", "date": "2022-03-04T05:06:07Z"},
                    "message": "init"
                },
                "stats": {"additions": 12, "deletions": 0},
                "html_url": "https://github.com/mona/alpha/commit/a1"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/repos/mona/beta/commits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let (repos, commits) = extract_all(&extractor_for(&server), RepoType::Owner)
            .await
            .unwrap();

        assert_eq!(repos.len(), 2);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].repository, "alpha");
        assert_eq!(commits[0].additions, 12);
    }

    #[tokio::test]
    async fn test_extract_all_names_failing_repository() {
        let server = MockServer::start().await;
        mount_repos(&server).await;

        Mock::given(method("GET"))
            .and(path("/repos/mona/alpha/commits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/repos/mona/beta/commits"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "API rate limit exceeded for 127.0.0.1."
            })))
            .mount(&server)
            .await;

        let err = extract_all(&extractor_for(&server), RepoType::Owner)
            .await
            .unwrap_err();
        let rendered = format!("{:#}", err);

        assert!(rendered.contains("failed to fetch commits for repository beta"));
        assert!(rendered.contains("API rate limit exceeded"));
    }
}
