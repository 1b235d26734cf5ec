//! The two scraping phases.
//!
//! 1. **Indexing** ([`links`]): render the paginated listing in a headless
//!    browser and harvest dated article permalinks into a set.
//! 2. **Fetching** ([`article`]): GET each article's static HTML and extract
//!    title, author, publication date and body text through ordered
//!    selector fallbacks.
//!
//! Both phases are strictly sequential and degrade instead of failing: a
//! page or article that cannot be processed is logged and skipped, and
//! partial results are always returned.

pub mod article;
pub mod links;
