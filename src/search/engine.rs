//! Candidate narrowing, relevance and pagination

use super::types::{SearchQuery, SearchResponse, SearchResult};
use crate::crawler::extract_title;
use crate::lemma::{build_snippet, LemmaFinder};
use crate::state::SiteStatus;
use crate::storage::{LemmaRecord, SiteRecord, Storage};
use crate::{Result, SearchEngineError};
use std::collections::HashMap;

/// A page that holds every query lemma of its site
#[derive(Debug)]
struct Candidate<'a> {
    site: &'a SiteRecord,
    page_id: i64,
    absolute: f64,
}

/// Runs a query against the index
///
/// Fails with `EmptyQuery` for a blank query and `SiteNotIndexed` if the
/// site filter names a stored site that is not `INDEXED`. A filter naming
/// no stored site searches every indexed site. A query whose lemmas cannot
/// all be found yields an empty response.
pub fn search<S: Storage + ?Sized>(
    storage: &S,
    finder: &LemmaFinder,
    query: &SearchQuery,
) -> Result<SearchResponse> {
    if query.text.trim().is_empty() {
        return Err(SearchEngineError::EmptyQuery);
    }

    let sites = resolve_sites(storage, query.site.as_deref())?;

    let lemmas = finder.lemma_set(&query.text);
    if lemmas.is_empty() {
        tracing::debug!("Query '{}' has no content words", query.text);
        return Ok(SearchResponse::empty());
    }

    let mut rows: Vec<LemmaRecord> = Vec::new();
    for lemma in &lemmas {
        let mut found = false;
        for site in &sites {
            if let Some(row) = storage.find_lemma(site.id, lemma)? {
                rows.push(row);
                found = true;
            }
        }
        if !found {
            tracing::debug!("Lemma '{}' is not in the index", lemma);
            return Ok(SearchResponse::empty());
        }
    }

    // Rarest lemma first keeps the candidate set small.
    rows.sort_by_key(|row| row.frequency);

    let mut candidates = Vec::new();
    for site in &sites {
        let site_rows: Vec<&LemmaRecord> = rows.iter().filter(|r| r.site_id == site.id).collect();
        if site_rows.len() < lemmas.len() {
            continue;
        }
        candidates.extend(narrow_site(storage, site, &site_rows)?);
    }

    let max = candidates
        .iter()
        .map(|c| c.absolute)
        .fold(0.0_f64, f64::max);

    let mut ranked: Vec<(Candidate, f64)> = candidates
        .into_iter()
        .map(|c| {
            let relevance = if max > 0.0 { c.absolute / max } else { 0.0 };
            (c, relevance)
        })
        .collect();

    // Stable, so equal relevance keeps site and page order.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let total = ranked.len();
    let mut results = Vec::new();
    for (candidate, relevance) in ranked.into_iter().skip(query.offset).take(query.limit) {
        let page = storage.get_page(candidate.page_id)?;
        results.push(SearchResult {
            site: candidate.site.url.clone(),
            site_name: candidate.site.name.clone(),
            uri: page.path,
            title: extract_title(&page.content).unwrap_or_default(),
            snippet: build_snippet(finder, &page.content, &lemmas),
            relevance,
        });
    }

    Ok(SearchResponse { total, results })
}

/// Returns the sites a query runs against
fn resolve_sites<S: Storage + ?Sized>(storage: &S, filter: Option<&str>) -> Result<Vec<SiteRecord>> {
    match filter {
        Some(url) => {
            let url = url.trim_end_matches('/');
            match storage.find_site_by_url(url)? {
                Some(site) if !site.status.is_searchable() => {
                    Err(SearchEngineError::SiteNotIndexed(site.url))
                }
                Some(site) => Ok(vec![site]),
                None => {
                    tracing::debug!("No stored site {}, searching all indexed sites", url);
                    Ok(storage.sites_with_status(SiteStatus::Indexed)?)
                }
            }
        }
        None => Ok(storage.sites_with_status(SiteStatus::Indexed)?),
    }
}

/// Intersects the pages of one site holding every lemma in `rows`
///
/// Candidates start from the rarest lemma's pages in page order and
/// accumulate the rank of each lemma they hold.
fn narrow_site<'a, S: Storage + ?Sized>(
    storage: &S,
    site: &'a SiteRecord,
    rows: &[&LemmaRecord],
) -> Result<Vec<Candidate<'a>>> {
    let Some((first, rest)) = rows.split_first() else {
        return Ok(Vec::new());
    };

    let mut candidates: Vec<Candidate> = storage
        .find_index_entries_by_lemma(first.id)?
        .into_iter()
        .map(|entry| Candidate {
            site,
            page_id: entry.page_id,
            absolute: entry.rank,
        })
        .collect();
    candidates.sort_by_key(|c| c.page_id);

    for row in rest {
        if candidates.is_empty() {
            break;
        }

        let ranks: HashMap<i64, f64> = storage
            .find_index_entries_by_lemma(row.id)?
            .into_iter()
            .map(|entry| (entry.page_id, entry.rank))
            .collect();

        candidates.retain_mut(|c| match ranks.get(&c.page_id) {
            Some(rank) => {
                c.absolute += rank;
                true
            }
            None => false,
        });
    }

    Ok(candidates)
}
