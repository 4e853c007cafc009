//! omni-bridge
//!
//! Hand-off from the web dashboard to the companion iOS app: deep link
//! construction, platform detection from the browser's user agent, and the
//! open-or-stay flow with its App Store fallback.

pub mod error;
pub mod launch;
pub mod link;
pub mod platform;
