// src/fetch/index.rs

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{info, instrument, warn};
use url::Url;

use super::{get_text_with_retry, Retry};
use crate::declaration::Legislator;

static MEMBER: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("li.single-member-container").expect("member selector should parse")
});
static LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("link selector should parse"));
static NAME: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.member-name").expect("name selector should parse"));
static GROUP: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.ep-layout_group").expect("group selector should parse"));
static COUNTRY: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.ep-layout_country").expect("country selector should parse")
});
static PARTY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.ep-layout_party").expect("party selector should parse"));
static TRAILING_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+$").expect("id pattern should compile"));

/// The full member list, all terms collapsed into one page.
pub fn index_url(base: &Url) -> Result<Url> {
    base.join("/meps/en/full-list/all")
        .with_context(|| format!("building index URL from {}", base))
}

/// Member id at the end of a profile link, e.g. `.../meps/en/124831`.
pub fn member_id_from_href(href: &str) -> Option<String> {
    let href = href.trim_end_matches('/');
    TRAILING_ID.find(href).map(|m| m.as_str().to_string())
}

fn text_of(item: &ElementRef<'_>, sel: &Selector) -> String {
    item.select(sel)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Pull every listed member out of the index page. Declarations are left empty.
pub fn parse_index(html: &str) -> Vec<Legislator> {
    let doc = Html::parse_document(html);
    doc.select(&MEMBER)
        .filter_map(|item| {
            let href = item
                .select(&LINK)
                .next()
                .and_then(|a| a.value().attr("href"));
            let Some(id) = href.and_then(member_id_from_href) else {
                warn!(?href, "member entry without id, skipping");
                return None;
            };
            Some(Legislator {
                id,
                full_name: text_of(&item, &NAME),
                group: text_of(&item, &GROUP),
                country: text_of(&item, &COUNTRY),
                party: text_of(&item, &PARTY),
                declaration: None,
            })
        })
        .collect()
}

/// Download and parse the member index.
#[instrument(level = "info", skip_all, fields(base = %base))]
pub async fn fetch_index(client: &Client, base: &Url, retry: Retry) -> Result<Vec<Legislator>> {
    let url = index_url(base)?;
    let html = get_text_with_retry(client, &url, retry)
        .await
        .context("fetching member index")?;
    let members = parse_index(&html);
    info!(count = members.len(), "members listed");
    Ok(members)
}
