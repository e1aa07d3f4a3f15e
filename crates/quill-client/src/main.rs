mod commands;

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

use quill_types::api::{CreateBlogRequest, CreateCommentRequest, ErrorBody};
use quill_types::models::Account;

use crate::commands::{Command, USAGE};

#[derive(Debug, Parser)]
#[command(name = "quill-client", about = "Post blogs and comments from the terminal")]
struct Cli {
    /// Base URL of the JSON API
    #[arg(long, env = "QUILL_API_URL", default_value = "http://127.0.0.1:3000/api")]
    url: String,
}

struct Session {
    http: reqwest::Client,
    base: String,
    account_id: i64,
    username: String,
    password: String,
}

impl Session {
    async fn post_blog(&self, title: String, content: String) -> Result<()> {
        let body = CreateBlogRequest {
            title: Some(title),
            content: Some(content),
            author_id: Some(self.account_id),
        };
        let res = self
            .http
            .post(format!("{}/blogs", self.base))
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await?;
        debug!(status = %res.status(), "posted blog");
        if !res.status().is_success() {
            bail!("Error in posting blog");
        }
        Ok(())
    }

    async fn post_comment(&self, blog_id: i64, content: String) -> Result<()> {
        let body = CreateCommentRequest {
            blog_id: Some(blog_id),
            author_id: Some(self.account_id),
            content: Some(content),
        };
        let res = self
            .http
            .post(format!("{}/comments", self.base))
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await?;
        debug!(status = %res.status(), "posted comment");
        if !res.status().is_success() {
            bail!("Error in posting comment");
        }
        Ok(())
    }
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    lines
        .next_line()
        .await?
        .context("unexpected end of input")
}

/// Check the credentials up front so a bad password fails here, not on the
/// first post.
async fn log_in(http: &reqwest::Client, base: &str, username: &str, password: &str) -> Result<Account> {
    let res = http
        .post(format!("{base}/login"))
        .basic_auth(username, Some(password))
        .send()
        .await?;
    debug!(status = %res.status(), "logged in");
    if !res.status().is_success() {
        let body: ErrorBody = res.json().await.context("unexpected login response")?;
        bail!(body.error);
    }
    Ok(res.json().await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base = cli.url.trim_end_matches('/').to_string();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Log in: ");
    let username = prompt(&mut lines, "Username: ").await?;
    let password = prompt(&mut lines, "Password: ").await?;

    let http = reqwest::Client::new();
    let account = log_in(&http, &base, &username, &password).await?;

    let session = Session {
        http,
        base,
        account_id: account.id,
        username,
        password,
    };

    println!("{USAGE}");

    while let Some(line) = lines.next_line().await? {
        match commands::parse(&line) {
            Some(Command::Quit) => break,
            Some(Command::PostBlog) => {
                let title = prompt(&mut lines, "Title: ").await?;
                let content = prompt(&mut lines, "Content: ").await?;
                session.post_blog(title, content).await?;
                println!("Posting Blog Successfully!");
            }
            Some(Command::PostComment { blog_id }) => {
                let content = prompt(&mut lines, "Content: ").await?;
                session.post_comment(blog_id, content).await?;
                println!("Posting Comment Successfully!");
            }
            None => bail!("Usage:\n{USAGE}"),
        }
    }

    Ok(())
}
