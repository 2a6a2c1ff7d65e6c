use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_SLUG_LEN: usize = 128;

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());
static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").unwrap());

#[inline(always)]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.len() <= MAX_SLUG_LEN && SLUG_RE.is_match(slug)
}

#[inline(always)]
pub fn is_valid_url(url: &str) -> bool {
    url.len() <= 2048 && URL_RE.is_match(url)
}

#[inline(always)]
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
