//! Video page URL validation.

use url::Url;

/// Hosts (and their subdomains) accepted as video page URLs.
const ACCEPTED_HOSTS: &[&str] = &["youtube.com", "youtu.be", "youtube-nocookie.com"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidUrl {
    #[error("no URL provided")]
    Empty,
    #[error("could not parse URL {input:?}: {reason}")]
    Unparseable { input: String, reason: String },
    #[error("unsupported URL scheme {0:?} (expected http or https)")]
    Scheme(String),
    #[error("the URL does not look like a YouTube video: {0}")]
    NotAVideoHost(String),
}

fn host_is_accepted(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    ACCEPTED_HOSTS
        .iter()
        .any(|h| host == *h || host.ends_with(&format!(".{h}")))
}

/// Validates user input as a video page URL and returns the parsed URL.
///
/// Surrounding whitespace is ignored. The scheme must be http or https and the
/// host must belong to one of the accepted video sites.
pub fn validate_video_url(input: &str) -> Result<Url, InvalidUrl> {
    let input = input.trim();
    if input.is_empty() {
        return Err(InvalidUrl::Empty);
    }

    let url = Url::parse(input).map_err(|e| InvalidUrl::Unparseable {
        input: input.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(InvalidUrl::Scheme(other.to_string())),
    }

    match url.host_str() {
        Some(host) if host_is_accepted(host) => Ok(url),
        _ => Err(InvalidUrl::NotAVideoHost(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_watch_and_short_urls() {
        assert!(validate_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").is_ok());
        assert!(validate_video_url("https://youtu.be/dQw4w9WgXcQ").is_ok());
        assert!(validate_video_url("http://m.youtube.com/watch?v=abc").is_ok());
        assert!(validate_video_url("https://music.youtube.com/watch?v=abc").is_ok());
        assert!(validate_video_url("  https://youtube.com/shorts/abc \n").is_ok());
    }

    #[test]
    fn empty_input() {
        assert_eq!(validate_video_url(""), Err(InvalidUrl::Empty));
        assert_eq!(validate_video_url("   \n"), Err(InvalidUrl::Empty));
    }

    #[test]
    fn malformed_input() {
        assert!(matches!(
            validate_video_url("not a url"),
            Err(InvalidUrl::Unparseable { .. })
        ));
        assert!(matches!(
            validate_video_url("www.youtube.com/watch?v=abc"),
            Err(InvalidUrl::Unparseable { .. })
        ));
    }

    #[test]
    fn wrong_scheme() {
        assert_eq!(
            validate_video_url("ftp://youtube.com/watch?v=abc"),
            Err(InvalidUrl::Scheme("ftp".to_string()))
        );
    }

    #[test]
    fn foreign_host() {
        assert!(matches!(
            validate_video_url("https://example.com/watch?v=abc"),
            Err(InvalidUrl::NotAVideoHost(_))
        ));
        assert!(matches!(
            validate_video_url("https://notyoutube.com/watch?v=abc"),
            Err(InvalidUrl::NotAVideoHost(_))
        ));
    }
}
