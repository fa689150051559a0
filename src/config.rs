//! Environment-derived configuration.
//!
//! All ambient settings are gathered here once at startup and carried in the
//! application state instead of being read from the environment ad hoc.

use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_file: PathBuf,
    pub upload_dir: PathBuf,
    pub admin_username: String,
    pub admin_password: String,
    pub github: Option<GithubConfig>,
}

/// Settings for the GitHub-backed catalog mirror. Absent unless both a token
/// and a repository are configured.
#[derive(Clone, Debug)]
pub struct GithubConfig {
    pub token: String,
    pub repo: String,
    pub path: String,
    pub branch: String,
}

impl Config {
    pub fn from_env() -> Self {
        let github = match (env("GITHUB_TOKEN"), env("GITHUB_REPO")) {
            (Some(token), Some(repo)) => Some(GithubConfig {
                token,
                repo,
                path: env("PRODUCTS_PATH").unwrap_or_else(|| "products.json".into()),
                branch: env("BRANCH").unwrap_or_else(|| "main".into()),
            }),
            _ => None,
        };
        Self {
            port: env("PORT").and_then(|p| p.parse().ok()).unwrap_or(3000),
            database_file: env("DATABASE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| "database.json".into()),
            upload_dir: env("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| "uploads".into()),
            admin_username: env("ADMIN_USERNAME").unwrap_or_else(|| "admin".into()),
            admin_password: env("ADMIN_PASSWORD").unwrap_or_else(|| "admin123".into()),
            github,
        }
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
