#![no_main]

use embedsync_core::PassthroughUrls;
use embedsync_html::{Schema, data_to_html, html_to_data};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Arbitrary markup parses without panicking, filtered or not
        let _ = html_to_data(s, Some(&Schema::media()));
        let parsed = html_to_data(s, None);

        // Whatever was recovered builds back into markup
        let built = data_to_html(&parsed, &PassthroughUrls);
        if parsed.source.is_empty() {
            assert!(built.is_empty(), "built markup without a source");
        }
    }
});
