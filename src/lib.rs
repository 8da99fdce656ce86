//! Rewrite GIF `<img>` tags in an HTML page into `<video>` tags.
//!
//! ```
//! let html = r#"<img src="demo.gif" alt="Demo" loading="lazy"/>"#;
//! let out = gif2video::convert_img_to_video(html);
//! assert!(out.contains(r#"<source src="demo.webm" type="video/webm">"#));
//! ```

pub mod cli;
pub mod config;
pub mod logger;
pub mod migrate;
pub mod rewrite;

pub use config::Config;
pub use rewrite::{GifRewriter, Rewrite, convert_img_to_video, count_gif_references};
