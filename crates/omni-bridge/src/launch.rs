//! Opening the companion app from the browser.
//!
//! There is no way to ask a browser whether an app is installed. The flow
//! navigates to the deep link and waits: if the page is hidden or loses
//! focus within [`FALLBACK_TIMEOUT`] the app took over; otherwise the user is
//! still on the web page and the app is presumably missing.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::BridgeError;
use crate::link::{APP_STORE_URL, AppLinkConfig, AppScreen, build_deep_link};
use crate::platform::Platform;

/// How long to wait for the app to take over before giving up.
pub const FALLBACK_TIMEOUT: Duration = Duration::from_secs(2);

/// Prompt offering the App Store when the app did not open.
pub const INSTALL_PROMPT: &str =
    "The PeLTQL app is not installed. Would you like to download it from the App Store?";

/// The browser-side capabilities the open flow needs.
pub trait AppLauncher {
    /// Point the current page at `url`.
    fn navigate(&self, url: &str) -> Result<(), BridgeError>;

    /// Resolve once the page is hidden or loses focus after a navigation.
    fn wait_for_leave(&self) -> impl Future<Output = ()> + Send;

    /// Ask the user a yes/no question.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Result of trying to open the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The page lost visibility or focus, so the app took over.
    Opened,
    /// Nothing happened before the timeout.
    StayedWeb,
    /// Not an iOS device; nothing was attempted.
    NotIos,
    /// Navigation itself failed.
    Error,
}

impl OpenOutcome {
    pub fn opened(self) -> bool {
        self == Self::Opened
    }

    /// Short name of how the attempt ended.
    pub fn method(self) -> &'static str {
        match self {
            Self::Opened => "deeplink",
            Self::StayedWeb => "stayed-web",
            Self::NotIos => "not-ios",
            Self::Error => "error",
        }
    }
}

/// Try to open the app at `config`.
pub async fn open_app<L: AppLauncher>(
    platform: &Platform,
    launcher: &L,
    config: &AppLinkConfig,
) -> OpenOutcome {
    if !platform.is_ios() {
        info!("not an iOS device, skipping app open");
        return OpenOutcome::NotIos;
    }

    let link = build_deep_link(config);
    info!(link = %link, "opening companion app");

    let left = launcher.wait_for_leave();
    if let Err(e) = launcher.navigate(&link) {
        warn!(error = %e, "failed to open companion app");
        return OpenOutcome::Error;
    }

    match tokio::time::timeout(FALLBACK_TIMEOUT, left).await {
        Ok(()) => {
            info!("companion app opened");
            OpenOutcome::Opened
        }
        Err(_) => {
            info!("companion app not detected, staying on web");
            OpenOutcome::StayedWeb
        }
    }
}

/// Like [`open_app`], but when the app does not take over and
/// `offer_app_store` is set, ask whether to go to the App Store.
pub async fn open_with_fallback<L: AppLauncher>(
    platform: &Platform,
    launcher: &L,
    config: &AppLinkConfig,
    offer_app_store: bool,
) -> OpenOutcome {
    let outcome = open_app(platform, launcher, config).await;

    if outcome == OpenOutcome::StayedWeb
        && offer_app_store
        && launcher.confirm(INSTALL_PROMPT)
        && let Err(e) = launcher.navigate(APP_STORE_URL)
    {
        warn!(error = %e, "failed to open App Store");
    }

    outcome
}

/// Link for an "open in app" button: the deep link on iOS, otherwise
/// `web_fallback` (or `#` when there is none).
pub fn smart_link(platform: &Platform, config: &AppLinkConfig, web_fallback: Option<&str>) -> String {
    if platform.is_ios() {
        build_deep_link(config)
    } else {
        web_fallback.unwrap_or("#").to_string()
    }
}

/// Best-effort check by opening the dashboard screen. This does navigate.
pub async fn check_app_installed<L: AppLauncher>(platform: &Platform, launcher: &L) -> bool {
    if !platform.is_ios() {
        return false;
    }
    open_app(platform, launcher, &AppLinkConfig::screen(AppScreen::Dashboard))
        .await
        .opened()
}
