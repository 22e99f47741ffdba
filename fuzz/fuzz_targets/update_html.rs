#![no_main]

use arbitrary::Arbitrary;
use embedsync_core::MediaData;
use embedsync_html::{Schema, update_html};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    html: &'a str,
    source: &'a str,
    width: Option<&'a str>,
    height: Option<&'a str>,
    is_new_embed: bool,
    filter: bool,
}

fuzz_target!(|input: Input<'_>| {
    let data = MediaData {
        source: input.source.to_string(),
        width: input.width.map(str::to_string),
        height: input.height.map(str::to_string),
        ..MediaData::default()
    };
    let schema = input.filter.then(Schema::media);
    let patched = update_html(input.html, &data, input.is_new_embed, schema.as_ref());

    // Without an iframe there is nothing to patch
    if schema.is_none() && !input.html.to_ascii_lowercase().contains("<iframe") {
        assert_eq!(patched, input.html);
    }
});
