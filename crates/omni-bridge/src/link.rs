use std::fmt;
use std::str::FromStr;

use crate::error::BridgeError;

/// URL scheme registered by the companion app.
pub const APP_SCHEME: &str = "peltql";

pub const APP_STORE_URL: &str = "https://apps.apple.com/app/id123456789";

/// Screen the companion app opens on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppScreen {
    #[default]
    Dashboard,
    Survey,
    Portfolio,
    Chat,
}

impl AppScreen {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Survey => "survey",
            Self::Portfolio => "portfolio",
            Self::Chat => "chat",
        }
    }
}

impl fmt::Display for AppScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppScreen {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dashboard" => Ok(Self::Dashboard),
            "survey" => Ok(Self::Survey),
            "portfolio" => Ok(Self::Portfolio),
            "chat" => Ok(Self::Chat),
            _ => Err(BridgeError::UnknownScreen(s.to_string())),
        }
    }
}

/// What the companion app should show when it opens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppLinkConfig {
    pub survey_id: Option<String>,
    pub patient_id: Option<String>,
    pub screen: AppScreen,
    pub action: Option<String>,
    /// Extra query parameters, emitted in order after the named ones.
    pub params: Vec<(String, String)>,
}

impl AppLinkConfig {
    pub fn screen(screen: AppScreen) -> Self {
        Self {
            screen,
            ..Self::default()
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}

/// Build the `peltql://<screen>?...` link for `config`.
///
/// Empty ids and actions are left out, as is the `?` when there are no
/// parameters at all. Keys and values are percent-encoded.
pub fn build_deep_link(config: &AppLinkConfig) -> String {
    let named = [
        ("surveyId", config.survey_id.as_deref()),
        ("patientId", config.patient_id.as_deref()),
        ("action", config.action.as_deref()),
    ];

    let query: Vec<String> = named
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| format!("{key}={}", urlencoding::encode(v)))
        })
        .chain(config.params.iter().map(|(key, value)| {
            format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
        }))
        .collect();

    let mut url = format!("{APP_SCHEME}://{}", config.screen);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query.join("&"));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_link_has_no_query() {
        assert_eq!(build_deep_link(&AppLinkConfig::default()), "peltql://dashboard");
    }

    #[test]
    fn named_params_come_first() {
        let config = AppLinkConfig {
            survey_id: Some("s-1".to_string()),
            patient_id: Some("jane doe".to_string()),
            screen: AppScreen::Survey,
            action: Some("resume".to_string()),
            params: vec![("from".to_string(), "web&dash".to_string())],
        };
        assert_eq!(
            build_deep_link(&config),
            "peltql://survey?surveyId=s-1&patientId=jane%20doe&action=resume&from=web%26dash"
        );
    }

    #[test]
    fn empty_values_are_skipped() {
        let config = AppLinkConfig {
            survey_id: Some(String::new()),
            ..AppLinkConfig::screen(AppScreen::Chat)
        };
        assert_eq!(build_deep_link(&config), "peltql://chat");
    }

    #[test]
    fn screen_parses_case_insensitively() {
        assert_eq!("Portfolio".parse::<AppScreen>().unwrap(), AppScreen::Portfolio);
        assert!("settings".parse::<AppScreen>().is_err());
    }
}
