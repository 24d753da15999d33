//! TeraBox player page.
//!
//! Wraps the third-party embed in a native page: reads the page parameters,
//! builds the embed URL and head metadata, and hosts the interaction
//! [`governor::Governor`] that counts ad-button clicks and keeps popups from
//! leaving the page.

mod app;
pub mod embed;
pub mod meta;
mod page;
pub mod params;
mod surface;

pub use app::PlayerApp;
pub use embed::{EMBED_BASE, embed_url, filter_video_id};
pub use meta::{HeadDocument, MetaTag, PageMeta};
pub use page::{PlayerPage, ViewAction};
pub use params::{DEFAULT_TITLE, ParamsError, PlayerParams};
pub use surface::FrameSurface;
