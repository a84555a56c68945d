// Server / tree-path specification

use crate::core::error::{BciError, Result};
use std::fmt;
use std::str::FromStr;

/// A data server host plus an ordered list of tree-path templates,
/// written `host::template[;template...]`.
///
/// Templates may contain `~t` (tree name) and `~a`..`~j` (shot digits,
/// `~a` being the least significant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    host: String,
    templates: Vec<String>,
}

impl PathSpec {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    /// Base URL of the data gateway.
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.contains("://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        }
    }

    /// Expanded tree paths for `tree` and `shot`, in search order.
    pub fn expand(&self, tree: &str, shot: i32) -> Vec<String> {
        self.templates
            .iter()
            .map(|template| expand_template(template, tree, shot))
            .collect()
    }
}

impl FromStr for PathSpec {
    type Err = BciError;

    fn from_str(s: &str) -> Result<Self> {
        let (host, paths) = s
            .split_once("::")
            .ok_or_else(|| BciError::invalid(format!("path spec `{}` has no `host::` prefix", s)))?;

        let host = host.trim();
        if host.is_empty() {
            return Err(BciError::invalid(format!("path spec `{}` has an empty host", s)));
        }

        let templates: Vec<String> = paths
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        if templates.is_empty() {
            return Err(BciError::invalid(format!("path spec `{}` lists no tree paths", s)));
        }

        Ok(Self {
            host: host.to_string(),
            templates,
        })
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.host, self.templates.join(";"))
    }
}

fn expand_template(template: &str, tree: &str, shot: i32) -> String {
    let digits: Vec<u32> = shot
        .unsigned_abs()
        .to_string()
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .collect();

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('t') => {
                chars.next();
                out.push_str(tree);
            }
            Some(d @ 'a'..='j') => {
                chars.next();
                let pos = (d as u8 - b'a') as usize;
                let digit = digits.get(pos).copied().unwrap_or(0);
                out.push_str(&digit.to_string());
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_and_templates() {
        let spec: PathSpec = "atlas.gat.com::/trees/bci; /archive/~t/~c~b~a ;".parse().unwrap();
        assert_eq!(spec.host(), "atlas.gat.com");
        assert_eq!(spec.templates(), &["/trees/bci", "/archive/~t/~c~b~a"]);
        assert_eq!(spec.base_url(), "http://atlas.gat.com");
        assert_eq!(spec.to_string(), "atlas.gat.com::/trees/bci;/archive/~t/~c~b~a");
    }

    #[test]
    fn test_explicit_scheme_kept() {
        let spec: PathSpec = "https://gateway.example:8443/::/trees".parse().unwrap();
        assert_eq!(spec.base_url(), "https://gateway.example:8443");
    }

    #[test]
    fn test_parse_errors() {
        assert!("atlas.gat.com".parse::<PathSpec>().is_err());
        assert!("::/trees".parse::<PathSpec>().is_err());
        assert!("atlas.gat.com:: ; ".parse::<PathSpec>().is_err());
    }

    #[test]
    fn test_expand_templates() {
        let spec: PathSpec = "host::/trees/~t;/archive/~t/~c~b~a;/deep/~g~f~e".parse().unwrap();
        assert_eq!(
            spec.expand("bci", 169572),
            vec!["/trees/bci", "/archive/bci/572", "/deep/016"]
        );
    }

    #[test]
    fn test_unknown_escape_kept() {
        assert_eq!(expand_template("/x/~z~", "bci", 1), "/x/~z~");
    }
}
