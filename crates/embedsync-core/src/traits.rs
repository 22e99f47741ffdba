//! Collaborators supplied by the host editor.

/// What a URL is being normalized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlPurpose {
    Source,
    Poster,
}

impl UrlPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            UrlPurpose::Source => "source",
            UrlPurpose::Poster => "poster",
        }
    }
}

/// Normalize a raw user string into the URL written into markup.
pub trait UrlConverter: Send + Sync {
    fn convert(&self, url: &str, purpose: UrlPurpose) -> String;
}

/// Converter that only trims surrounding whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughUrls;

impl UrlConverter for PassthroughUrls {
    fn convert(&self, url: &str, _purpose: UrlPurpose) -> String {
        url.trim().to_string()
    }
}

impl<F> UrlConverter for F
where
    F: Fn(&str, UrlPurpose) -> String + Send + Sync,
{
    fn convert(&self, url: &str, purpose: UrlPurpose) -> String {
        self(url, purpose)
    }
}

/// Produce the HTML fragment currently under edit, if any.
pub trait SelectionSnapshot {
    fn snapshot(&self) -> Option<String>;
}

impl SelectionSnapshot for str {
    fn snapshot(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl SelectionSnapshot for String {
    fn snapshot(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl SelectionSnapshot for Option<String> {
    fn snapshot(&self) -> Option<String> {
        self.clone()
    }
}
