//! GIF `<img>` to `<video>` rewriting.
//!
//! Works on raw text with a single pattern, no DOM:
//!
//! ```text
//! <img src="PATH.gif" alt="ALT" ATTRS/>
//! ```
//!
//! Each match becomes a `<video>` block with WebM and MP4 sources derived from
//! `PATH` and the original GIF kept as a fallback `<img>`. Tags that do not
//! have exactly this shape (attribute order, double quotes, trailing `/>`) are
//! passed through untouched.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `loading` value used when the original tag has none.
pub const DEFAULT_LOADING: &str = "lazy";

/// Literal counted by [`count_gif_references`].
const GIF_REFERENCE: &str = ".gif\"";

const GIF_EXT: &str = ".gif";
const MP4_EXT: &str = ".mp4";
const WEBM_EXT: &str = ".webm";

static RE_GIF_IMG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img\s+src="([^"]+\.gif)"\s+alt="([^"]*)"\s+([^>]*)/>"#).unwrap()
});
static RE_LOADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"loading="([^"]*)""#).unwrap());
static RE_FETCHPRIORITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"fetchpriority="([^"]*)""#).unwrap());

/// Result of a rewrite pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub html: String,
    /// Number of `<img>` tags replaced by `<video>` blocks
    pub replaced: usize,
}

/// Rewrites GIF images into `<video>` elements.
#[derive(Debug, Clone, Copy)]
pub struct GifRewriter<'a> {
    default_loading: &'a str,
}

impl Default for GifRewriter<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_LOADING)
    }
}

impl<'a> GifRewriter<'a> {
    pub const fn new(default_loading: &'a str) -> Self {
        Self { default_loading }
    }

    /// Replace every matching GIF `<img>` in `html`.
    pub fn rewrite(&self, html: &str) -> Rewrite {
        let mut replaced = 0;
        let html = RE_GIF_IMG
            .replace_all(html, |caps: &Captures| {
                replaced += 1;
                self.render(&GifImage::from_captures(caps))
            })
            .into_owned();

        Rewrite { html, replaced }
    }

    fn render(&self, img: &GifImage<'_>) -> String {
        let loading = img.loading.unwrap_or(self.default_loading);
        let fetchpriority = img
            .fetchpriority
            .map(|v| format!(" fetchpriority=\"{v}\""))
            .unwrap_or_default();
        let webm = video_sibling(img.src, WEBM_EXT);
        let mp4 = video_sibling(img.src, MP4_EXT);

        format!(
            "<video autoplay loop muted playsinline{fetchpriority} preload=\"{loading}\">\n\
             \x20           <source src=\"{webm}\" type=\"video/webm\">\n\
             \x20           <source src=\"{mp4}\" type=\"video/mp4\">\n\
             \x20           <!-- Fallback to GIF for older browsers -->\n\
             \x20           <img src=\"{src}\" alt=\"{alt}\" loading=\"{loading}\"/>\n\
             \x20         </video>",
            src = img.src,
            alt = img.alt,
        )
    }
}

/// One matched `<img>` tag.
struct GifImage<'h> {
    src: &'h str,
    alt: &'h str,
    loading: Option<&'h str>,
    fetchpriority: Option<&'h str>,
}

impl<'h> GifImage<'h> {
    fn from_captures(caps: &Captures<'h>) -> Self {
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        let attrs = group(3);

        Self {
            src: group(1),
            alt: group(2),
            loading: attr_value(&RE_LOADING, attrs),
            fetchpriority: attr_value(&RE_FETCHPRIORITY, attrs),
        }
    }
}

/// First value captured by `re` in an attribute string.
fn attr_value<'h>(re: &Regex, attrs: &'h str) -> Option<&'h str> {
    re.captures(attrs)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Rewrite GIF images using the default `loading` value.
pub fn convert_img_to_video(html: &str) -> String {
    GifRewriter::default().rewrite(html).html
}

/// Swap the `.gif` suffix of `gif_path` for `ext`.
///
/// Only the trailing extension changes: `a.gif.d/b.gif` -> `a.gif.d/b.mp4`.
pub fn video_sibling(gif_path: &str, ext: &str) -> String {
    let stem = gif_path.strip_suffix(GIF_EXT).unwrap_or(gif_path);
    format!("{stem}{ext}")
}

/// Count occurrences of `.gif"` anywhere in `html`.
///
/// Coarse: also counts references in tags the rewriter skips.
pub fn count_gif_references(html: &str) -> usize {
    html.matches(GIF_REFERENCE).count()
}
