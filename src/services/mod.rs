mod extract;
mod page_fetcher;

pub use page_fetcher::{FullPage, HttpPageFetcher, PageFetcher};
