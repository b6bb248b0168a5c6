//! Small pure helpers shared across domain consumers.

/// Parse `owner`/`name` out of the supported repository URL forms:
/// `https://host/owner/repo`, `.../owner/repo.git`, and
/// `git@host:owner/repo(.git)?`.
///
/// Returns `None` if fewer than two path segments are present.
#[must_use]
pub fn parse_owner_repo(url: &str) -> Option<(String, String)> {
    let trimmed = url.trim();
    let path_part = if let Some(rest) = trimmed.strip_prefix("git@") {
        rest.split_once(':').map(|(_, p)| p)?
    } else {
        let without_scheme = trimmed
            .split_once("://")
            .map_or(trimmed, |(_, rest)| rest);
        let (_, rest) = without_scheme.split_once('/')?;
        rest
    };

    let segments: Vec<&str> = path_part
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() < 2 {
        return None;
    }

    let owner = segments[segments.len() - 2].to_owned();
    let name = segments[segments.len() - 1]
        .strip_suffix(".git")
        .unwrap_or(segments[segments.len() - 1])
        .to_owned();

    Some((owner, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_https_url() {
        assert_eq!(
            parse_owner_repo("https://github.com/acme/widgets"),
            Some(("acme".to_owned(), "widgets".to_owned()))
        );
    }

    #[test]
    fn parses_https_url_with_git_suffix() {
        assert_eq!(
            parse_owner_repo("https://github.com/acme/widgets.git"),
            Some(("acme".to_owned(), "widgets".to_owned()))
        );
    }

    #[test]
    fn parses_ssh_url() {
        assert_eq!(
            parse_owner_repo("git@github.com:acme/widgets.git"),
            Some(("acme".to_owned(), "widgets".to_owned()))
        );
    }

    #[test]
    fn rejects_url_with_one_segment() {
        assert_eq!(parse_owner_repo("https://example.com/x"), None);
    }
}
