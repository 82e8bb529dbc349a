//! Page configuration embedded in the markup.
//!
//! ```html
//! <script type="application/json" id="portfolio-config">
//!   { "navbar_offset": 64, "submit_delay_ms": 1500 }
//! </script>
//! ```

use pf_core::PageConfig;
use tracing::{debug, warn};
use web_sys::Document;

pub const CONFIG_ELEMENT_ID: &str = "portfolio-config";

/// Defaults when the block is missing; a malformed block is logged and ignored.
pub fn load(document: &Document) -> PageConfig {
    let Some(raw) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        debug!("no #{} block, using default config", CONFIG_ELEMENT_ID);
        return PageConfig::default();
    };

    match PageConfig::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            warn!("{}; using default config", err);
            PageConfig::default()
        }
    }
}
