//! Project list download.

use gloo_net::http::Request;

use crate::error::{Result, SiteError};
use crate::project::Catalog;

/// Fetch and validate the project list at `url`. Not retried.
pub async fn fetch_catalog(url: &str) -> Result<Catalog> {
    let resp = Request::get(url).send().await.map_err(to_fetch_err)?;
    if !resp.ok() {
        return Err(SiteError::Fetch(format!(
            "{url}: HTTP {} {}",
            resp.status(),
            resp.status_text()
        )));
    }
    let text = resp.text().await.map_err(to_fetch_err)?;
    let catalog = Catalog::from_json(&text)?;
    log::debug!("fetched {} projects from {url}", catalog.len());
    Ok(catalog)
}

fn to_fetch_err<E: core::fmt::Display>(e: E) -> SiteError {
    SiteError::Fetch(e.to_string())
}
