//! Key conventions for the local transcript store.
//!
//! Pure string functions. The file-backed store maps each key to one file
//! inside its data directory.

/// Key under which the chat transcript is persisted.
pub const CHAT_HISTORY: &str = "omni_chat_history";

/// File name holding the value for `key`.
///
/// Keys are restricted to `[A-Za-z0-9_-]`; anything else is replaced with
/// `_` so a key can never escape the store directory.
pub fn file_name(key: &str) -> String {
    let safe: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{safe}.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_history_file_name() {
        assert_eq!(file_name(CHAT_HISTORY), "omni_chat_history.json");
    }

    #[test]
    fn path_separators_are_replaced() {
        assert_eq!(file_name("../etc/passwd"), "___etc_passwd.json");
    }
}
