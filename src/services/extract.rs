//! Headline and article-body heuristics for the pages we probe.
//!
//! Everything here is synchronous and works on an already downloaded HTML
//! string, so the parsed document never lives across an `.await`.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::models::{Candidate, SourceDescriptor, Strategy};
use crate::text::normalize;

pub const MAX_CANDIDATES_PER_SOURCE: usize = 10;
const LINKS_PER_SELECTOR: usize = 10;

const MIN_ARTICLE_CHARS: usize = 200;
const MIN_PAGE_CHARS: usize = 100;

/// Terms a search-result link must mention to be considered.
const AI_TERMS: &[&str] = &["ai", "artificial intelligence", "machine learning", "chatgpt", "openai"];

/// Broader filter for generic headline lists.
const AI_TECH_TERMS: &[&str] = &[
    "ai",
    "artificial intelligence",
    "machine learning",
    "chatgpt",
    "openai",
    "tech",
    "robot",
    "automation",
];

const GENERIC_HEADLINE_SELECTORS: &[&str] = &[
    "article h2 a",
    "article h3 a",
    "article .title a",
    ".post-title a",
    ".entry-title a",
    ".headline a",
    "h2 a",
    "h3 a",
    ".story-headline a",
    "[data-testid*=\"headline\"] a",
    ".title a",
];

const ARTICLE_BODY_SELECTORS: &[&str] = &[
    "article .content",
    "article .post-content",
    ".article-content",
    ".post-body",
    ".entry-content",
    "main article",
    ".story-body",
    "[data-module=\"ArticleBody\"]",
    "[class*=\"article-body\"]",
    ".article-wrap",
    ".post-content-body",
    "main",
];

const EXCLUDED_SEARCH_HOSTS: &[&str] = &["google.com", "youtube.com"];

/// Pull headline candidates out of a listing page.
pub fn listing_candidates(html: &str, page_url: &Url, source: &SourceDescriptor) -> Vec<Candidate> {
    let document = Html::parse_document(html);

    let links = match source.strategy {
        Strategy::GoogleNews => google_news_links(&document, page_url),
        Strategy::TechCrunch => techcrunch_links(&document, page_url),
        Strategy::GoogleSearch => google_search_links(&document, page_url),
        Strategy::Generic | Strategy::Fallback => generic_links(&document, page_url),
    };

    let mut candidates: Vec<Candidate> = Vec::new();
    for (title, url) in links {
        if candidates.iter().any(|c| c.url == url.as_str()) {
            continue;
        }
        candidates.push(Candidate::new(title, url, &source.name));
        if candidates.len() >= MAX_CANDIDATES_PER_SOURCE {
            break;
        }
    }
    candidates
}

/// Best-effort readable text of an article page.
pub fn article_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for pattern in ARTICLE_BODY_SELECTORS {
        let Ok(selector) = Selector::parse(pattern) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = element_text(element);
            if text.chars().count() > MIN_ARTICLE_CHARS {
                return Some(text);
            }
        }
    }

    let text = match html2text::from_read(html.as_bytes(), 80) {
        Ok(t) => normalize(&t),
        Err(e) => {
            tracing::debug!("Failed to convert HTML to text: {}", e);
            return None;
        }
    };

    if text.chars().count() > MIN_PAGE_CHARS {
        Some(text)
    } else {
        tracing::debug!("Extracted content too short ({} chars)", text.chars().count());
        None
    }
}

fn google_news_links(document: &Html, page_url: &Url) -> Vec<(String, Url)> {
    let (Ok(blocks), Ok(heading), Ok(link)) = (
        Selector::parse("article, [data-n-tid]"),
        Selector::parse("h3, h4, [role=\"heading\"]"),
        Selector::parse("a[href]"),
    ) else {
        return Vec::new();
    };

    document
        .select(&blocks)
        .filter_map(|block| {
            let title = element_text(block.select(&heading).next()?);
            let href = block.select(&link).next()?.value().attr("href")?;
            let url = resolve(page_url, href)?;
            (title.chars().count() > 10).then_some((title, url))
        })
        .collect()
}

fn techcrunch_links(document: &Html, page_url: &Url) -> Vec<(String, Url)> {
    let (Ok(blocks), Ok(link)) = (
        Selector::parse("article, .post-block, .wp-block-tc23-post-picker"),
        Selector::parse("h2 a, h3 a, .post-block__title a"),
    ) else {
        return Vec::new();
    };

    document
        .select(&blocks)
        .filter_map(|block| {
            let anchor = block.select(&link).next()?;
            let title = element_text(anchor);
            let url = resolve(page_url, anchor.value().attr("href")?)?;
            (title.chars().count() > 10).then_some((title, url))
        })
        .collect()
}

fn google_search_links(document: &Html, page_url: &Url) -> Vec<(String, Url)> {
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&anchors)
        .filter_map(|anchor| {
            let title = element_text(anchor);
            let len = title.chars().count();
            if len <= 15 || len >= 300 || !mentions_any(&title, AI_TERMS) {
                return None;
            }
            let url = unwrap_search_redirect(resolve(page_url, anchor.value().attr("href")?)?)?;
            let host = url.host_str()?;
            if EXCLUDED_SEARCH_HOSTS.iter().any(|excluded| host.contains(excluded)) {
                return None;
            }
            Some((title, url))
        })
        .collect()
}

/// Try headline selectors in order; the first one that yields anything wins.
fn generic_links(document: &Html, page_url: &Url) -> Vec<(String, Url)> {
    for pattern in GENERIC_HEADLINE_SELECTORS {
        let Ok(selector) = Selector::parse(pattern) else {
            continue;
        };

        let links: Vec<(String, Url)> = document
            .select(&selector)
            .take(LINKS_PER_SELECTOR)
            .filter_map(|anchor| {
                let title = element_text(anchor);
                let len = title.chars().count();
                if len <= 15 || len >= 200 || !mentions_any(&title, AI_TECH_TERMS) {
                    return None;
                }
                let url = resolve(page_url, anchor.value().attr("href")?)?;
                Some((title, url))
            })
            .collect();

        if !links.is_empty() {
            return links;
        }
    }
    Vec::new()
}

fn element_text(element: ElementRef) -> String {
    normalize(&element.text().collect::<Vec<_>>().join(" "))
}

fn mentions_any(text: &str, terms: &[&str]) -> bool {
    let lower = text.to_lowercase();
    terms.iter().any(|term| lower.contains(term))
}

/// Resolve a possibly relative href and keep only web links.
fn resolve(page_url: &Url, href: &str) -> Option<Url> {
    let url = page_url.join(href.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

/// Google wraps organic results as `/url?q=<target>`.
fn unwrap_search_redirect(url: Url) -> Option<Url> {
    let is_redirect = url.host_str().is_some_and(|h| h.contains("google.")) && url.path() == "/url";
    if !is_redirect {
        return Some(url);
    }
    let target = url
        .query_pairs()
        .find(|(key, _)| key == "q" || key == "url")
        .map(|(_, value)| value.into_owned())?;
    Url::parse(&target).ok()
}
