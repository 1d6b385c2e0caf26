// src/pipeline.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use tokio::{
    fs,
    sync::{mpsc, Semaphore},
    time::Instant,
};
use tracing::{error, info, instrument, warn};

use crate::{
    config::Config,
    declaration::{parse_declaration, Declaration, Legislator},
    detect::TableDetector,
    fetch::{index::fetch_index, pdf::download_declaration, profile::fetch_declaration_pdf_url},
    store::{Store, INDEX_ID},
};

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub members: usize,
    pub declarations: usize,
    pub without_declaration: usize,
    pub failed: usize,
    pub resumed: usize,
}

enum Outcome {
    Parsed(Declaration),
    NoDeclaration,
    Failed,
}

/// Fetch, download, detect and classify one member's declaration.
/// `Ok(None)` means the member has not published one.
#[instrument(level = "info", skip_all, fields(id = %member.id))]
pub async fn scrape_declaration(
    client: &Client,
    detector: Arc<dyn TableDetector>,
    config: &Config,
    member: &Legislator,
) -> Result<Option<Declaration>> {
    let Some(pdf_url) =
        fetch_declaration_pdf_url(client, &config.base_url, &member.id, config.retry).await?
    else {
        return Ok(None);
    };

    let start = Instant::now();
    let pdf = download_declaration(client, &pdf_url, &config.raw_dir, &member.id).await?;
    info!(pdf = %pdf.display(), elapsed = ?start.elapsed(), "downloaded");

    // detection shells out and classification is CPU-bound; keep both off the runtime
    let parsed = tokio::task::spawn_blocking({
        let pdf = pdf.clone();
        let template = config.template.clone();
        move || -> Result<Declaration> {
            let tables = detector.detect(&pdf)?;
            Ok(parse_declaration(&tables, &template)?)
        }
    })
    .await
    .context("detector task panicked")?;

    if !config.keep_pdfs {
        if let Err(e) = fs::remove_file(&pdf).await {
            warn!(pdf = %pdf.display(), error = %e, "failed to delete pdf");
        }
    }

    parsed
        .with_context(|| format!("parsing {}", pdf.display()))
        .map(Some)
}

/// Scrape every listed member and write one record each, then the index.
///
/// A member whose document fails is written with no declaration and the run
/// carries on; only index, store and runtime failures abort.
pub async fn run(
    client: &Client,
    detector: Arc<dyn TableDetector>,
    config: &Config,
) -> Result<Summary> {
    let store = Store::new(&config.data_dir)?;
    fs::create_dir_all(&config.raw_dir)
        .await
        .with_context(|| format!("creating {}", config.raw_dir.display()))?;

    let mut members = fetch_index(client, &config.base_url, config.retry).await?;
    if config.skip > 0 {
        info!(skip = config.skip, "skipping leading members");
        members = members.split_off(config.skip.min(members.len()));
    }

    let done: HashSet<String> = if config.resume {
        store.written_ids()?
    } else {
        HashSet::new()
    };

    let mut summary = Summary {
        members: members.len(),
        ..Summary::default()
    };
    let mut finished: HashMap<String, Option<Declaration>> = HashMap::new();

    let (tx, mut rx) = mpsc::channel::<(String, Outcome)>(100);
    let sem = Arc::new(Semaphore::new(config.concurrency.max(1)));
    let mut handles = Vec::with_capacity(members.len());

    for member in &members {
        if done.contains(&member.id) {
            match store.read::<Legislator>(&member.id) {
                Ok(previous) => {
                    summary.resumed += 1;
                    finished.insert(member.id.clone(), previous.declaration);
                    continue;
                }
                Err(e) => warn!(id = %member.id, error = %e, "unreadable record, refetching"),
            }
        }

        let client = client.clone();
        let detector = Arc::clone(&detector);
        let config = config.clone();
        let member = member.clone();
        let tx = tx.clone();
        let sem = sem.clone();

        handles.push(tokio::spawn(async move {
            let _permit = match sem.acquire().await {
                Ok(p) => p,
                Err(_) => return,
            };
            let outcome = match scrape_declaration(&client, detector, &config, &member).await {
                Ok(Some(declaration)) => Outcome::Parsed(declaration),
                Ok(None) => Outcome::NoDeclaration,
                Err(e) => {
                    error!(id = %member.id, "declaration failed: {:#}", e);
                    Outcome::Failed
                }
            };
            let _ = tx.send((member.id, outcome)).await;
        }));
    }
    // drop the original sender so `rx.recv()` ends once every member reported back
    drop(tx);

    let by_id: HashMap<&str, &Legislator> = members.iter().map(|m| (m.id.as_str(), m)).collect();
    while let Some((id, outcome)) = rx.recv().await {
        let declaration = match outcome {
            Outcome::Parsed(d) => {
                summary.declarations += 1;
                Some(d)
            }
            Outcome::NoDeclaration => {
                summary.without_declaration += 1;
                None
            }
            Outcome::Failed => {
                summary.failed += 1;
                None
            }
        };
        if let Some(member) = by_id.get(id.as_str()) {
            let record = Legislator {
                declaration: declaration.clone(),
                ..(*member).clone()
            };
            store.write(&id, &record)?;
            info!("\u{2713} {}", record.full_name);
        }
        finished.insert(id, declaration);
    }

    for h in handles {
        let _ = h.await;
    }

    let index: Vec<Legislator> = members
        .into_iter()
        .map(|mut m| {
            m.declaration = finished.remove(&m.id).flatten();
            m
        })
        .collect();
    store.write(INDEX_ID, &index)?;

    info!(?summary, "all done");
    Ok(summary)
}
