//! HTML parsing and data extraction
//!
//! This module turns archive pages into article text, listing titles and
//! date labels.

pub mod html;
pub mod labels;
pub mod sanitize;
pub mod selectors;

pub use html::{extract_article, extract_title_list, looks_like_article, ExtractedArticle};
pub use labels::{date_label, DateAnchor};
