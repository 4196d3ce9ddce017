//! Harvest pipeline: search, fetch, extract, convert
//!
//! This module contains the harvesting logic, including:
//! - Searching configured domains for source pages
//! - HTTP fetching of source pages
//! - External link extraction
//! - PDF snapshot conversion
//! - Pacing and overall harvest coordination
//!
//! Every network-facing collaborator sits behind a trait so the driver can be
//! exercised with fakes.

mod converter;
mod coordinator;
mod fetcher;
mod pacing;
mod parser;
mod search;

pub use converter::{ChromiumRenderer, PdfRenderer, Snapshot, SnapshotConverter};
pub use coordinator::{Harvester, HarvesterBuilder};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use pacing::{FixedPacer, NoPacing, Pacer, Pause};
pub use parser::{collect_external_links, extract_external_links};
pub use search::{parse_result_links, NewsSearch, ResultPager, SearchProvider, SearchQuery};
