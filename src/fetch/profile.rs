// src/fetch/profile.rs

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use super::{get_text_with_retry, Retry};

static DOCUMENT_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"a[title="Read the document"][href]"#)
        .expect("document link selector should parse")
});
static LINK_NAME: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.ep_name").expect("name selector should parse"));

const ORIGINAL_DECLARATION: &str = "Original declaration";

/// The declarations tab of a member's profile.
pub fn declarations_url(base: &Url, id: &str) -> Result<Url> {
    base.join(&format!("/meps/en/{}/slug/declarations", id))
        .with_context(|| format!("building declarations URL for {}", id))
}

/// Link to the original financial declaration PDF, if the member filed one.
/// Later amendments are listed too; only the original is taken.
pub fn find_declaration_pdf(html: &str, page_url: &Url) -> Option<Url> {
    let doc = Html::parse_document(html);
    doc.select(&DOCUMENT_LINK)
        .find(|a| {
            a.select(&LINK_NAME).any(|span| {
                span.text()
                    .collect::<String>()
                    .trim_start()
                    .starts_with(ORIGINAL_DECLARATION)
            })
        })
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| page_url.join(href).ok())
}

/// Look up the declaration PDF for member `id`. `Ok(None)` when none is published.
#[instrument(level = "debug", skip(client, base, retry))]
pub async fn fetch_declaration_pdf_url(
    client: &Client,
    base: &Url,
    id: &str,
    retry: Retry,
) -> Result<Option<Url>> {
    let url = declarations_url(base, id)?;
    let html = get_text_with_retry(client, &url, retry)
        .await
        .with_context(|| format!("fetching declarations page of {}", id))?;
    let pdf = find_declaration_pdf(&html, &url);
    debug!(pdf = ?pdf.as_ref().map(Url::as_str), "declaration link");
    Ok(pdf)
}
