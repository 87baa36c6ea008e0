use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use serde_json::Value;
use std::io::{self, Write};
use std::process;
use std::sync::Arc;

use talabia::cli::{Args, Command};
use talabia::config::Config;
use talabia::list::{ListClient, ListQuery, PageRequest};
use talabia::session::{FilesystemSessionStorage, SessionStore};
use talabia::ui::{display_body, display_error, display_json, display_session, display_success};
use talabia::{logging, ApiRequest, AuthenticatedClient, LoginRedirect, ReqwestTransport};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            display_error(&format!("{:#}", e));
            process::exit(1);
        }
    };

    logging::init(config.verbose);
    tracing::debug!(api_url = %config.api_url, session_dir = %config.session_dir.display(), "configuration loaded");

    if let Err(e) = run(args.command, &config).await {
        display_error(&format!("{:#}", e));
        process::exit(1);
    }
}

async fn run(command: Command, config: &Config) -> Result<()> {
    let storage = Arc::new(FilesystemSessionStorage::new(&config.session_dir));
    let store = Arc::new(SessionStore::new(storage));
    let transport = Arc::new(ReqwestTransport::new(
        &config.api_url,
        config.request_timeout,
    )?);
    let client = AuthenticatedClient::new(transport, store.clone(), Arc::new(LoginRedirect));

    match command {
        Command::Login { phone, otp } => {
            let otp = match otp {
                Some(otp) => otp,
                None => {
                    client.send_otp(&phone).await?;
                    display_success(&format!("A one-time code was sent to {}", phone));
                    prompt("Code: ")?
                }
            };
            let session = client.login(&phone, otp.trim()).await?;
            display_success("Logged in");
            display_session(&session);
        }
        Command::ResendOtp { phone } => {
            client.resend_otp(&phone).await?;
            display_success(&format!("A new code was sent to {}", phone));
        }
        Command::Logout => {
            if store.get_current().is_none() {
                println!("{}", "Not logged in".dimmed());
                return Ok(());
            }
            client.logout().await;
        }
        Command::Whoami => match store.get_current() {
            Some(session) => display_session(&session),
            None => println!("{}", "Not logged in".dimmed()),
        },
        Command::Refresh => {
            client.refresh().await?;
            display_success("Session refreshed");
        }
        Command::Get { path } => {
            let response = client.send(ApiRequest::get(path)).await?;
            display_body(&response.body);
        }
        Command::Delete { path } => {
            let response = client.delete(&path).await?;
            display_body(&response.body);
        }
        Command::Post { path, data } => {
            let request = with_body(ApiRequest::post(path), data.as_deref())?;
            let response = client.send(request).await?;
            display_body(&response.body);
        }
        Command::Put { path, data } => {
            let request = with_body(ApiRequest::put(path), data.as_deref())?;
            let response = client.send(request).await?;
            display_body(&response.body);
        }
        Command::List {
            resource,
            first,
            rows,
            search,
        } => {
            let lists = ListClient::new(client, config.list_timeout);
            let mut query = ListQuery::new(PageRequest::from_offset(first, rows));
            if let Some(search) = search {
                query = query.with_search(search);
            }
            let page = lists.fetch(&resource, &query).await?;
            display_json(&page);
        }
    }

    Ok(())
}

fn with_body(request: ApiRequest, data: Option<&str>) -> Result<ApiRequest> {
    match data {
        Some(data) => {
            let body: Value = serde_json::from_str(data).context("Invalid JSON in --data")?;
            Ok(request.json(&body)?)
        }
        None => Ok(request),
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.cyan());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    let line = line.trim().to_string();
    if line.is_empty() {
        anyhow::bail!("No code entered");
    }
    Ok(line)
}
