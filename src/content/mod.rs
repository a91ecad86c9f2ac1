//! Content signal extraction. Optional enrichment: classification never requires it.

mod extractor;
mod snapshot;

pub use extractor::{extract_signals, path_hint, PageSignals, BODY_TEXT_LIMIT};
pub use snapshot::PageSnapshot;
