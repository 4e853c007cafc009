/// The browser the dashboard is running in, as far as the user agent says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    user_agent: String,
    max_touch_points: u32,
}

impl Platform {
    pub fn from_user_agent(user_agent: &str, max_touch_points: u32) -> Self {
        Self {
            user_agent: user_agent.to_lowercase(),
            max_touch_points,
        }
    }

    /// iPhone, iPod or iPad, including iPads that report a desktop Mac user
    /// agent but have a touch screen.
    pub fn is_ios(&self) -> bool {
        let ua = &self.user_agent;
        let device = ["iphone", "ipod", "ipad"].iter().any(|d| ua.contains(d));
        let ipad_os = self.max_touch_points > 1 && ua.contains("macintosh");
        device || ipad_os
    }

    /// Safari proper. Chrome and Android browsers also advertise "Safari",
    /// but always name themselves earlier in the string.
    pub fn is_safari(&self) -> bool {
        let ua = &self.user_agent;
        match ua.find("safari") {
            Some(pos) => {
                let head = &ua[..pos];
                !head.contains("chrome") && !head.contains("android")
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const IPAD_DESKTOP_MODE: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15";
    const DESKTOP_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const ANDROID: &str = "Mozilla/5.0 (Linux; Android 14) AppleWebKit/537.36 (KHTML, like Gecko) \
        Version/4.0 Mobile Safari/537.36";

    #[test]
    fn iphone_is_ios_safari() {
        let p = Platform::from_user_agent(IPHONE_SAFARI, 5);
        assert!(p.is_ios());
        assert!(p.is_safari());
    }

    #[test]
    fn touch_mac_is_ipad() {
        assert!(Platform::from_user_agent(IPAD_DESKTOP_MODE, 5).is_ios());
        assert!(!Platform::from_user_agent(IPAD_DESKTOP_MODE, 0).is_ios());
    }

    #[test]
    fn chrome_and_android_are_not_safari() {
        assert!(!Platform::from_user_agent(DESKTOP_CHROME, 0).is_safari());
        assert!(!Platform::from_user_agent(ANDROID, 5).is_safari());
        assert!(!Platform::from_user_agent(ANDROID, 5).is_ios());
    }
}
