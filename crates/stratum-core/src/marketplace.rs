//! Marketplace install matching
//!
//! Maps a catalog template's source URL to an installed marketplace by
//! repository-name comparison. Purely a local lookup against
//! already-synced marketplace metadata; absence of a match means "not
//! installed", which is a valid state, not an error.

use stratum_scanner::plugins::{Marketplace, MarketplaceSource, PluginInventory};
use stratum_scanner::{ClaudeLayout, ScanResult};

/// Read the known marketplaces from the plugin registry
pub fn known_marketplaces(layout: &ClaudeLayout) -> ScanResult<Vec<Marketplace>> {
    Ok(PluginInventory::scan(layout)?.marketplaces)
}

/// Resolve a template link to the name of the marketplace it is
/// installed from, if any.
#[must_use]
pub fn resolve_marketplace<'a>(link: &str, marketplaces: &'a [Marketplace]) -> Option<&'a str> {
    let wanted = repo_slug(link)?;

    marketplaces
        .iter()
        .find(|marketplace| {
            match &marketplace.source {
                MarketplaceSource::GitHub { owner, repo } => {
                    wanted.0.eq_ignore_ascii_case(owner) && wanted.1.eq_ignore_ascii_case(repo)
                }
                MarketplaceSource::Url { url } => repo_slug(url)
                    .is_some_and(|slug| {
                        slug.0.eq_ignore_ascii_case(&wanted.0)
                            && slug.1.eq_ignore_ascii_case(&wanted.1)
                    }),
                MarketplaceSource::Local { .. } => false,
            }
        })
        .map(|marketplace| marketplace.name.as_str())
}

/// Extract the `owner/repo` pair from a repository link.
///
/// Accepts https URLs (with optional `.git` and trailing path
/// segments), scp-style git addresses, and bare `owner/repo` slugs.
#[must_use]
pub fn repo_slug(link: &str) -> Option<(String, String)> {
    let trimmed = link.trim().trim_end_matches('/');

    // scp-style: git@host:owner/repo(.git)
    let path = if let Some((_, rest)) = trimmed.split_once(':') {
        if rest.starts_with("//") {
            // scheme://host/path -> drop the host segment
            let without_scheme = rest.trim_start_matches('/');
            let (_host, path) = without_scheme.split_once('/')?;
            path
        } else {
            rest
        }
    } else {
        trimmed
    };

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marketplace(name: &str, source: MarketplaceSource) -> Marketplace {
        Marketplace {
            name: name.to_string(),
            location: String::new(),
            source,
            auto_update: false,
        }
    }

    #[test]
    fn test_repo_slug_forms() {
        assert_eq!(
            repo_slug("https://github.com/acme/toolkit"),
            Some(("acme".to_string(), "toolkit".to_string()))
        );
        assert_eq!(
            repo_slug("https://github.com/acme/toolkit.git"),
            Some(("acme".to_string(), "toolkit".to_string()))
        );
        assert_eq!(
            repo_slug("https://github.com/acme/toolkit/tree/main/plugins"),
            Some(("acme".to_string(), "toolkit".to_string()))
        );
        assert_eq!(
            repo_slug("git@github.com:acme/toolkit.git"),
            Some(("acme".to_string(), "toolkit".to_string()))
        );
        assert_eq!(
            repo_slug("acme/toolkit"),
            Some(("acme".to_string(), "toolkit".to_string()))
        );
        assert_eq!(repo_slug("not-a-repo"), None);
    }

    #[test]
    fn test_resolve_against_github_source() {
        let marketplaces = vec![marketplace(
            "official",
            MarketplaceSource::GitHub {
                owner: "acme".to_string(),
                repo: "toolkit".to_string(),
            },
        )];

        assert_eq!(
            resolve_marketplace("https://github.com/acme/toolkit", &marketplaces),
            Some("official")
        );
        assert_eq!(
            resolve_marketplace("https://github.com/ACME/Toolkit.git", &marketplaces),
            Some("official")
        );
    }

    #[test]
    fn test_no_match_is_none() {
        let marketplaces = vec![marketplace(
            "official",
            MarketplaceSource::GitHub {
                owner: "acme".to_string(),
                repo: "toolkit".to_string(),
            },
        )];
        assert_eq!(
            resolve_marketplace("https://github.com/other/repo", &marketplaces),
            None
        );
    }

    #[test]
    fn test_resolve_against_url_source() {
        let marketplaces = vec![marketplace(
            "mirror",
            MarketplaceSource::Url {
                url: "https://git.example.com/acme/toolkit.git".to_string(),
            },
        )];
        assert_eq!(
            resolve_marketplace("https://github.com/acme/toolkit", &marketplaces),
            Some("mirror")
        );
    }
}
