//! Token normalization.
//!
//! Rewrites raw arguments so that every option reference is a standalone
//! `-x` or `--xyz` token: short-option clusters are split and the
//! Windows-style `/` prefix becomes `-`. The dispatch loop then only ever
//! compares whole tokens against the option table.

use tracing::debug;

use crate::config::ParserConfig;

/// Normalizes a raw token list.
///
/// Per token, in order:
///
/// - longer than one character, starting with `-` or `/`, second character
///   not `-`: a cluster, each following character becomes `-<char>`;
/// - starting with `/`: the slash is replaced by `-`;
/// - anything else is kept.
///
/// # Examples
///
/// ```
/// use argbind_parser::{ParserConfig, normalize_tokens};
///
/// let config = ParserConfig::default();
/// assert_eq!(
///     normalize_tokens(["-abc", "--long", "/x", "value"], &config),
///     vec!["-a", "-b", "-c", "--long", "-x", "value"]
/// );
/// ```
pub fn normalize_tokens<I, S>(raw: I, config: &ParserConfig) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized = Vec::new();
    let mut raw_count = 0usize;

    for token in raw {
        raw_count += 1;
        let token = token.as_ref();
        let mut chars = token.chars();
        let first = chars.next();
        let second = chars.next();

        let prefix_enabled = match first {
            Some('-') => config.combine_short,
            Some('/') => config.slash_prefix,
            _ => false,
        };

        match (prefix_enabled, second) {
            (true, Some(second)) if second != '-' => {
                normalized.extend(token.chars().skip(1).map(|ch| format!("-{ch}")));
            }
            (true, _) if first == Some('/') => {
                normalized.push(format!("-{}", &token[1..]));
            }
            _ => normalized.push(token.to_string()),
        }
    }

    debug!(raw = raw_count, normalized = normalized.len(), "Normalized tokens");
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(raw: &[&str]) -> Vec<String> {
        normalize_tokens(raw, &ParserConfig::default())
    }

    #[test]
    fn test_cluster_splits_into_short_options() {
        assert_eq!(normalize(&["-abc"]), vec!["-a", "-b", "-c"]);
        assert_eq!(normalize(&["-a"]), vec!["-a"]);
        assert_eq!(normalize(&["-v", "-vv"]), vec!["-v", "-v", "-v"]);
    }

    #[test]
    fn test_slash_prefix() {
        assert_eq!(normalize(&["/x"]), vec!["-x"]);
        assert_eq!(normalize(&["/ab"]), vec!["-a", "-b"]);
        // Second character is a dash, so it is not a cluster.
        assert_eq!(normalize(&["/-x"]), vec!["--x"]);
        assert_eq!(normalize(&["/"]), vec!["-"]);
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(
            normalize(&["--input", "file.txt", "-", "--", "", "x"]),
            vec!["--input", "file.txt", "-", "--", "", "x"]
        );
    }

    #[test]
    fn test_multibyte_clusters() {
        assert_eq!(normalize(&["-äß"]), vec!["-ä", "-ß"]);
        assert_eq!(normalize(&["/é"]), vec!["-é"]);
    }

    #[test]
    fn test_negative_numbers_are_split_like_any_cluster() {
        assert_eq!(normalize(&["-5"]), vec!["-5"]);
        assert_eq!(normalize(&["-12"]), vec!["-1", "-2"]);
    }

    #[test]
    fn test_config_disables_rewrites() {
        let config = ParserConfig {
            slash_prefix: false,
            combine_short: false,
            ..ParserConfig::default()
        };
        assert_eq!(
            normalize_tokens(["/usr/bin", "-abc", "/x"], &config),
            vec!["/usr/bin", "-abc", "/x"]
        );

        let slash_only = ParserConfig {
            combine_short: false,
            ..ParserConfig::default()
        };
        assert_eq!(
            normalize_tokens(["-ab", "/ab"], &slash_only),
            vec!["-ab", "-a", "-b"]
        );
    }
}
