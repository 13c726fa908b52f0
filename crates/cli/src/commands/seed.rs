//! Seed the `beaches` table.
//!
//! Beaches come either from a YAML file or from the forecast provider's
//! public spot listing. Existing slugs have their name and `last_updated`
//! refreshed; nothing is deleted.
//!
//! # Usage
//!
//! ```bash
//! # Scrape the public listing
//! surf-cli seed beaches
//!
//! # Load from a file
//! surf-cli seed beaches --file beaches.yaml
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use regex::{Captures, Regex};
use surf_bot_core::BeachSlug;
use surf_bot_store::{BeachRepository, NewBeach};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::error::CliError;

/// Public "all spots" page of the forecast provider.
pub const DEFAULT_LISTING_URL: &str = "https://gosurf.co.il/surf-spots";

/// Path marker of a spot link; the slug is the segment that follows.
const FORECAST_PATH: &str = "/forecast/";

/// Seed beaches from `file`, or from the listing at `url` if no file is
/// given.
///
/// # Errors
///
/// Returns `CliError::NoBeaches` if the source yields nothing, and other
/// `CliError` variants if reading, fetching or writing fails. On error no
/// beach is written.
pub async fn beaches(file: Option<&Path>, url: &str) -> Result<(), CliError> {
    let (source, beaches) = match file {
        Some(path) => (path.display().to_string(), load_file(path).await?),
        None => (url.to_owned(), fetch_listing(url).await?),
    };

    let beaches = dedup_by_slug(beaches);
    if beaches.is_empty() {
        return Err(CliError::NoBeaches(source));
    }
    info!(count = beaches.len(), %source, "Loaded beaches");

    let pool = DatabaseConfig::from_env()?.connect().await?;
    let written = BeachRepository::new(&pool).upsert_many(&beaches).await?;

    info!(written, "Seeding complete!");
    Ok(())
}

async fn load_file(path: &Path) -> Result<Vec<NewBeach>, CliError> {
    info!(path = %path.display(), "Loading beaches from file");
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(serde_yaml::from_str(&content)?)
}

async fn fetch_listing(url: &str) -> Result<Vec<NewBeach>, CliError> {
    info!(%url, "Fetching beach listing");
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let html = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_beach_listing(&html).ok_or_else(|| CliError::MissingListing(url.to_owned()))
}

/// Opening tag of a spot listing block, `<div class="fw spots_a">`.
static CONTAINER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div\b[^>]*?\bclass\s*=\s*["']\s*fw\s+spots_a\s*["'][^>]*>"#)
        .expect("Invalid regex")
});

/// Opening or closing `div` tag; group 1 is `/` for a closing tag.
static DIV_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(/?)div\b[^>]*>").expect("Invalid regex"));

/// Matches `<a ... href="..." ...>text</a>`, capturing the href and the
/// inner HTML.
static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a\s*>"#)
        .expect("Invalid regex")
});

/// Matches any tag, for stripping markup out of link text.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

/// Matches a decimal or hexadecimal character reference.
static NUMERIC_ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));").expect("Invalid regex")
});

/// Inner HTML of every listing block, in page order.
///
/// A block runs to its matching `</div>`, or to the end of the page if it
/// is never closed.
fn listing_blocks(html: &str) -> Vec<&str> {
    CONTAINER_RE
        .find_iter(html)
        .filter_map(|open| {
            let rest = html.get(open.end()..)?;
            let mut depth = 1_usize;
            let end = DIV_TAG_RE
                .captures_iter(rest)
                .find_map(|tag| {
                    let whole = tag.get(0)?;
                    if tag.get(1).is_some_and(|m| !m.as_str().is_empty()) {
                        depth -= 1;
                    } else {
                        depth += 1;
                    }
                    (depth == 0).then_some(whole.start())
                })
                .unwrap_or(rest.len());
            rest.get(..end)
        })
        .collect()
}

/// Extract beaches from the spot listing page.
///
/// Only anchors inside `<div class="fw spots_a">` blocks count. Each one
/// whose `href` contains `/forecast/` is a spot: the slug is what follows
/// that marker with surrounding slashes removed, and the name is the link
/// text. Links with an invalid slug or no text are skipped.
///
/// Returns `None` if the page has no listing block.
#[must_use]
pub fn parse_beach_listing(html: &str) -> Option<Vec<NewBeach>> {
    let blocks = listing_blocks(html);
    if blocks.is_empty() {
        return None;
    }

    let mut beaches = Vec::new();
    for caps in blocks.iter().flat_map(|block| ANCHOR_RE.captures_iter(block)) {
        let (Some(href), Some(inner)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let Some((_, rest)) = href.as_str().split_once(FORECAST_PATH) else {
            continue;
        };

        let raw_slug = rest.trim_matches('/');
        let slug = match BeachSlug::parse(raw_slug) {
            Ok(slug) => slug,
            Err(e) => {
                warn!(slug = raw_slug, error = %e, "Skipping spot with invalid slug");
                continue;
            }
        };

        let name = decode_entities(TAG_RE.replace_all(inner.as_str(), "").trim());
        if name.is_empty() {
            warn!(%slug, "Skipping spot without a name");
            continue;
        }

        beaches.push(NewBeach { slug, name });
    }

    Some(beaches)
}

/// Keep the first beach for each slug, preserving order.
fn dedup_by_slug(beaches: Vec<NewBeach>) -> Vec<NewBeach> {
    let mut seen = HashSet::new();
    beaches
        .into_iter()
        .filter(|b| seen.insert(b.slug.clone()))
        .collect()
}

/// Decode character references and the named entities that appear in spot
/// names. `&amp;` goes last so `&amp;lt;` stays `&lt;`.
fn decode_entities(text: &str) -> String {
    let named = text
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">");
    NUMERIC_ENTITY_RE
        .replace_all(&named, |caps: &Captures| {
            let code = match (caps.get(1), caps.get(2)) {
                (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                (None, Some(dec)) => dec.as_str().parse().ok(),
                (None, None) => None,
            };
            code.and_then(char::from_u32).map_or_else(
                || caps.get(0).map_or_else(String::new, |m| m.as_str().to_owned()),
                String::from,
            )
        })
        .replace("&amp;", "&")
}
