use anyhow::{Context, Result, anyhow};
use reqwest::redirect;
use tracing::info;

use crate::config::Config;
use crate::models::ParseResult;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";
const MAX_REDIRECTS: usize = 10;

pub fn client(config: &Config) -> Result<reqwest::blocking::Client, reqwest::Error> {
    let redirect_policy = redirect::Policy::custom(|attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error(format!("Too many redirects (>{MAX_REDIRECTS})"))
        } else {
            attempt.follow()
        }
    });

    reqwest::blocking::Client::builder()
        .redirect(redirect_policy)
        .user_agent(
            config
                .source
                .user_agent
                .as_deref()
                .unwrap_or(DEFAULT_USER_AGENT),
        )
        .build()
}

/// Fetches the page configured for `category` and extracts its offers.
pub fn fetch_category(config: &Config, category: &str) -> Result<ParseResult> {
    let url = config
        .url_for(category)
        .ok_or_else(|| anyhow!("unknown category {category:?}"))?;
    info!(category, %url, "fetching category page");

    let response = client(config)?
        .get(&url)
        .send()
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()?;

    Ok(crate::parse_from_response(category, response)?)
}
