//! MIME type guessing from media URLs.

/// Guess the media type of a URL from its file extension.
///
/// Returns an empty string for unknown extensions.
pub fn guess(url: &str) -> &'static str {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let Some((_, ext)) = path.rsplit_once('.') else {
        return "";
    };

    match ext {
        "mp3" => "audio/mpeg",
        "m4a" => "audio/x-m4a",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" => "video/ogg",
        "swf" => "application/x-shockwave-flash",
        _ => "",
    }
}
