// src/fetch/pdf.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use url::Url;

/// Download the declaration PDF to `<dest_dir>/<id>.pdf` and return that path.
pub async fn download_declaration(
    client: &Client,
    url: &Url,
    dest_dir: impl AsRef<Path>,
    id: &str,
) -> Result<PathBuf> {
    let dest_dir = dest_dir.as_ref();
    fs::create_dir_all(dest_dir)
        .await
        .with_context(|| format!("creating {}", dest_dir.display()))?;
    let dest_path = dest_dir.join(format!("{}.pdf", id));

    let resp = client
        .get(url.as_str())
        .send()
        .await
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?;
    let bytes = resp.bytes().await?;
    fs::write(&dest_path, &bytes)
        .await
        .with_context(|| format!("writing {}", dest_path.display()))?;

    Ok(dest_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn saves_under_member_id() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mepdif/42_DFI.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 test".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir()?;
        let url = Url::parse(&format!("{}/mepdif/42_DFI.pdf", server.uri()))?;
        let saved = download_declaration(&Client::new(), &url, dir.path().join("raw"), "42").await?;

        assert_eq!(saved, dir.path().join("raw").join("42.pdf"));
        assert_eq!(std::fs::read(&saved)?, b"%PDF-1.4 test");
        Ok(())
    }

    #[tokio::test]
    async fn http_error_is_reported() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir()?;
        let url = Url::parse(&format!("{}/missing.pdf", server.uri()))?;
        assert!(download_declaration(&Client::new(), &url, dir.path(), "7")
            .await
            .is_err());
        assert!(!dir.path().join("7.pdf").exists());
        Ok(())
    }
}
