//! Terminal client for a running feature board server.

use std::fmt::Write as _;

use anyhow::{Context, Result, anyhow, bail};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    cli::{ListArgs, SubmitArgs, VoteArgs},
    model::{FeatureRequest, VoteDirection, rank},
    routes::{CreateFeatureRequest, VoteOutcome},
};

/// Thin wrapper around the board's JSON API.
#[derive(Clone)]
pub struct BoardClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl BoardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetches a product's requests in store order.
    pub async fn list(&self, product_id: &str) -> Result<Vec<FeatureRequest>> {
        let response = self
            .http
            .get(self.url("/feature-requests"))
            .query(&[("productId", product_id)])
            .send()
            .await
            .context("failed to reach feature board")?;
        decode(response).await
    }

    pub async fn submit(
        &self,
        title: &str,
        description: &str,
        product_id: &str,
    ) -> Result<FeatureRequest> {
        let body = CreateFeatureRequest {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            product_id: Some(product_id.to_string()),
        };
        let response = self
            .http
            .post(self.url("/feature-requests"))
            .json(&body)
            .send()
            .await
            .context("failed to reach feature board")?;
        decode(response).await
    }

    /// Returns the vote count after the server applied the vote.
    pub async fn vote(&self, id: &str, direction: VoteDirection) -> Result<i64> {
        let response = self
            .http
            .post(self.url(&format!("/feature-requests/{id}/vote")))
            .json(&serde_json::json!({ "direction": direction }))
            .send()
            .await
            .context("failed to reach feature board")?;
        let outcome: VoteOutcome = decode(response).await?;
        Ok(outcome.votes)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    debug!(%status, url = %response.url(), "feature board responded");

    if status.is_success() {
        return response
            .json()
            .await
            .context("failed to decode feature board response");
    }

    Err(anyhow!(error_message(status, response.json::<ErrorBody>().await.ok())))
}

fn error_message(status: StatusCode, body: Option<ErrorBody>) -> String {
    match body {
        Some(body) => body.error,
        None => format!("request failed with status {status}"),
    }
}

pub async fn list(args: ListArgs) -> Result<()> {
    let client = BoardClient::new(args.server.server);
    let requests = client.list(&args.product).await?;
    print!("{}", render_board(requests));
    Ok(())
}

pub async fn submit(args: SubmitArgs) -> Result<()> {
    if args.title.trim().is_empty() {
        bail!("Title is required");
    }

    let client = BoardClient::new(args.server.server);
    let request = client
        .submit(&args.title, &args.description, &args.product)
        .await?;
    println!("Feature request submitted successfully ({})", request.id);
    Ok(())
}

pub async fn vote(args: VoteArgs) -> Result<()> {
    let client = BoardClient::new(args.server.server);
    let votes = client.vote(&args.id, args.direction.into()).await?;
    println!("{} now has {votes} votes", args.id);
    Ok(())
}

/// Renders requests ranked by votes, one block per request.
pub fn render_board(mut requests: Vec<FeatureRequest>) -> String {
    if requests.is_empty() {
        return "No feature requests yet.\n".to_string();
    }

    rank(&mut requests);

    let mut out = String::new();
    for request in &requests {
        let _ = writeln!(
            out,
            "{:>5}  {} [{}]",
            request.votes, request.title, request.status
        );
        if !request.description.is_empty() {
            let _ = writeln!(out, "       {}", request.description);
        }
        let _ = writeln!(
            out,
            "       Submitted on {}  id: {}",
            request.created_at.format("%Y-%m-%d"),
            request.id
        );
    }
    out
}
