//! Automatic links: `<http://example.com/>` and `<user@example.com>`.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::escaping::{Entropy, encode_email_address, unescape_special_chars};

static URL_AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<((?i:https?|ftp|dict):[^'">\s]+)>"#).unwrap()
});

static EMAIL_AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?i:mailto:)?([-.0-9A-Za-z_]+@[-A-Za-z0-9]+(?:\.[-A-Za-z0-9]+)*\.[A-Za-z]+)>")
        .unwrap()
});

/// Turn angle-bracketed URLs into anchors and email addresses into
/// obfuscated `mailto:` anchors.
pub fn autolinks(text: &str, entropy: &mut dyn Entropy) -> String {
    if !text.contains('<') {
        return text.to_string();
    }
    let text = URL_AUTOLINK.replace_all(text, r#"<a href="${1}">${1}</a>"#);
    EMAIL_AUTOLINK
        .replace_all(&text, |caps: &Captures| {
            encode_email_address(&unescape_special_chars(&caps[1]), entropy)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escaping::FixedEntropy;

    #[test]
    fn test_url_autolink() {
        let mut entropy = FixedEntropy::new(vec![]);
        assert_eq!(
            autolinks("see <http://example.com/?a=b> now", &mut entropy),
            r#"see <a href="http://example.com/?a=b">http://example.com/?a=b</a> now"#
        );
        assert_eq!(
            autolinks("<FTP://host/x>", &mut entropy),
            r#"<a href="FTP://host/x">FTP://host/x</a>"#
        );
    }

    #[test]
    fn test_url_with_space_is_not_autolink() {
        let mut entropy = FixedEntropy::new(vec![]);
        assert_eq!(autolinks("<http://a b>", &mut entropy), "<http://a b>");
    }

    #[test]
    fn test_email_autolink_uses_entropy() {
        let mut entropy = FixedEntropy::new(vec![0.95]);
        assert_eq!(
            autolinks("<mailto:me@ex.io>", &mut entropy),
            r#"<a href="mailto:me&#x40;ex.io">me&#x40;ex.io</a>"#
        );
    }

    #[test]
    fn test_email_domain_is_case_insensitive() {
        let mut entropy = FixedEntropy::new(vec![0.2]);
        let out = autolinks("<Me@Ex.IO>", &mut entropy);
        assert!(out.starts_with("<a href=\"&#109;&#97;&#105;&#108;&#116;&#111;:&#77;&#101;&#64;"));
        assert!(out.ends_with("&#73;&#79;</a>"));
    }
}
