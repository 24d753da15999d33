//! # governor
//!
//! UI-agnostic interaction governor for a third-party player embedded in a
//! cross-origin frame.
//!
//! The governor:
//! - classifies attempted new-window navigations against a blocked-domain
//!   list ([`BlockPolicy`])
//! - counts clicks on the player's ad button while a guidance overlay is
//!   shown, and completes after [`COMPLETION_THRESHOLD`] of them
//! - best-effort ships a navigation-blocking script to the surface
//!   ([`SurfaceMessage`])
//!
//! It owns no timers and no UI. Operations that need deferred work return a
//! [`TimerRequest`](core_types::TimerRequest); the host schedules it and feeds
//! the fired timer back. Fired timers are always checked against the current
//! state, so a superseded or orphaned timer is harmless.

mod governor;
pub mod hooks;
mod policy;
mod region;
mod script;
mod state;
mod surface;
pub mod toast;

use std::time::Duration;

pub use governor::{ClickOutcome, Governor};
pub use hooks::{ClickDisposition, InertWindow, LinkClick, OpenedWindow, PageContext, WindowOpener};
pub use policy::{BlockPolicy, BlockedDomains, DEFAULT_BLOCKED_DOMAIN};
pub use region::{
    AD_REGION_HEIGHT, AD_REGION_VERTICAL_RATIO, AD_REGION_WIDTH, ad_button_region,
    in_ad_button_region,
};
pub use script::{INSTALL_GUARD_GLOBAL, INSTALL_SCRIPT_TYPE, SurfaceMessage, intercept_script};
pub use state::{InteractionState, Phase};
pub use surface::{EmbeddedSurface, InjectionOutcome, RecordingSurface, SurfaceError};
pub use toast::{Toast, ToastPhase, Toasts};

/// Qualifying clicks required to complete the interaction.
pub const COMPLETION_THRESHOLD: u32 = 8;

/// Grace period between a surface load and showing the overlay. There is no
/// cross-origin signal for "the player finished its own loading".
pub const OVERLAY_REVEAL_DELAY: Duration = Duration::from_millis(3000);
