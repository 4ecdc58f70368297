/// URL transformation between environment tiers

use crate::content_path::extract_content_path;
use crate::env_config::{ConfigSet, EnvBase};

/// The kind of destination link offered for an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    Author,
    Preview,
    Publish,
}

impl LinkType {
    pub const ALL: [LinkType; 3] = [LinkType::Author, LinkType::Preview, LinkType::Publish];

    pub fn label(&self) -> &'static str {
        match self {
            LinkType::Author => "Author",
            LinkType::Preview => "Preview",
            LinkType::Publish => "Publish",
        }
    }
}

/// How the current tab is being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabMode {
    Author,
    Preview,
    Publish,
}

impl TabMode {
    fn as_link_type(self) -> LinkType {
        match self {
            TabMode::Author => LinkType::Author,
            TabMode::Preview => LinkType::Preview,
            TabMode::Publish => LinkType::Publish,
        }
    }
}

/// Compute the destination URL for viewing the current page on another
/// environment. Returns None when the page carries no content path or the
/// required base URL is not configured; the caller suppresses the link
/// instead of navigating.
///
/// Rules:
/// - author: `{author}/ui#/aem/editor.html{path}`, except local instances
///   (author base containing "localhost") open the editor directly as
///   `{author}/editor.html{path}`
/// - publish: `{publish}{path}`
/// - preview: `{author}{path}?wcmmode=disabled` (publish rendering served
///   from the author tier)
pub fn transform(current_url: &str, base: &EnvBase, link_type: LinkType) -> Option<String> {
    let path = extract_content_path(current_url);
    if path.is_empty() {
        return None;
    }

    match link_type {
        LinkType::Author => {
            if base.author.is_empty() {
                return None;
            }
            if base.author.contains("localhost") {
                Some(format!("{}/editor.html{}", base.author, path))
            } else {
                Some(format!("{}/ui#/aem/editor.html{}", base.author, path))
            }
        }
        LinkType::Publish => {
            if base.publish.is_empty() {
                return None;
            }
            Some(format!("{}{}", base.publish, path))
        }
        LinkType::Preview => {
            if base.author.is_empty() {
                return None;
            }
            Some(format!("{}{}?wcmmode=disabled", base.author, path))
        }
    }
}

/// Best-effort classification of the current tab: which configured
/// environment it belongs to and in which mode it is being viewed.
///
/// This is a substring heuristic, not a parser: the URL is matched against
/// each environment's base-URL prefixes in display order, and the mode is
/// read off marker substrings ("editor.html", "wcmmode=disabled"). The first
/// matching environment wins, so a base URL that is a textual prefix of
/// another environment's base can shadow it.
pub fn detect_environment(current_url: &str, config: &ConfigSet) -> Option<(String, TabMode)> {
    for name in config.display_order() {
        let Some(base) = config.get(&name) else {
            continue;
        };

        if !base.author.is_empty() && current_url.starts_with(&base.author) {
            let mode = if current_url.contains("editor.html") {
                TabMode::Author
            } else if current_url.contains("wcmmode=disabled") {
                TabMode::Preview
            } else {
                TabMode::Publish
            };
            return Some((name, mode));
        }

        if !base.publish.is_empty() && current_url.starts_with(&base.publish) {
            let mode = if current_url.contains("wcmmode=disabled") {
                TabMode::Preview
            } else {
                TabMode::Publish
            };
            return Some((name, mode));
        }
    }

    None
}

/// One entry of the popup's link list.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvLink {
    pub env: String,
    pub link_type: LinkType,
    pub url: String,
    pub active: bool,
}

/// Build the full link list for the popup: every environment in display
/// order, every link type whose base URL is configured. Environments with
/// nothing configured are omitted entirely, and the link matching the
/// detected current environment/mode is flagged active.
pub fn build_links(current_url: &str, config: &ConfigSet) -> Vec<EnvLink> {
    let current = detect_environment(current_url, config);

    let mut links = Vec::new();
    for name in config.display_order() {
        let Some(base) = config.get(&name) else {
            continue;
        };
        if base.is_empty() {
            continue;
        }

        for link_type in LinkType::ALL {
            let Some(url) = transform(current_url, base, link_type) else {
                continue;
            };
            let active = current
                .as_ref()
                .is_some_and(|(env, mode)| *env == name && mode.as_link_type() == link_type);
            links.push(EnvLink {
                env: name.clone(),
                link_type,
                url,
                active,
            });
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT: &str =
        "https://author.example.com/ui#/aem/editor.html/content/we-retail/us/en/products.html?x=1";

    fn stage() -> EnvBase {
        EnvBase::new("https://author-stage.example.com", "https://stage.example.com")
    }

    fn local() -> EnvBase {
        EnvBase::new("http://localhost:4502", "http://localhost:3000")
    }

    #[test]
    fn test_transform_publish() {
        assert_eq!(
            transform(CURRENT, &stage(), LinkType::Publish),
            Some("https://stage.example.com/content/we-retail/us/en/products.html".to_string())
        );
    }

    #[test]
    fn test_transform_preview() {
        assert_eq!(
            transform(CURRENT, &stage(), LinkType::Preview),
            Some(
                "https://author-stage.example.com/content/we-retail/us/en/products.html?wcmmode=disabled"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_transform_author() {
        assert_eq!(
            transform(CURRENT, &stage(), LinkType::Author),
            Some(
                "https://author-stage.example.com/ui#/aem/editor.html/content/we-retail/us/en/products.html"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_transform_author_localhost_skips_routing_shell() {
        let url = transform(CURRENT, &local(), LinkType::Author).unwrap();

        assert_eq!(
            url,
            "http://localhost:4502/editor.html/content/we-retail/us/en/products.html"
        );
        assert!(!url.contains("/ui#/aem/"));
    }

    #[test]
    fn test_transform_unconfigured_base_is_none() {
        let no_publish = EnvBase::new("https://author-dev.example.com", "");
        let no_author = EnvBase::new("", "https://dev.example.com");

        assert_eq!(transform(CURRENT, &no_publish, LinkType::Publish), None);
        assert_eq!(transform(CURRENT, &no_author, LinkType::Author), None);
        assert_eq!(transform(CURRENT, &no_author, LinkType::Preview), None);
    }

    #[test]
    fn test_transform_without_content_path_is_none() {
        assert_eq!(
            transform("https://author.example.com/sites.html", &stage(), LinkType::Publish),
            None
        );
        assert_eq!(transform("", &stage(), LinkType::Publish), None);
    }

    fn detection_config() -> ConfigSet {
        let mut config = ConfigSet::new();
        config.set(
            "stage",
            EnvBase::new("https://author-stage.example.com", "https://stage.example.com"),
        );
        config.set(
            "prod",
            EnvBase::new("https://author.example.com", "https://www.example.com"),
        );
        config
    }

    #[test]
    fn test_detect_author_tab() {
        let config = detection_config();
        assert_eq!(
            detect_environment(CURRENT, &config),
            Some(("prod".to_string(), TabMode::Author))
        );
    }

    #[test]
    fn test_detect_preview_tab() {
        let config = detection_config();
        let url = "https://author-stage.example.com/content/we-retail/us/en.html?wcmmode=disabled";
        assert_eq!(
            detect_environment(url, &config),
            Some(("stage".to_string(), TabMode::Preview))
        );
    }

    #[test]
    fn test_detect_publish_tab() {
        let config = detection_config();
        let url = "https://www.example.com/content/we-retail/us/en.html";
        assert_eq!(
            detect_environment(url, &config),
            Some(("prod".to_string(), TabMode::Publish))
        );
    }

    #[test]
    fn test_detect_unknown_url() {
        let config = detection_config();
        assert_eq!(detect_environment("https://github.com", &config), None);
    }

    #[test]
    fn test_detect_first_match_in_display_order_wins() {
        let mut config = ConfigSet::new();
        // stage's publish base is a textual prefix of the custom env's base;
        // stage comes first in display order and shadows it
        config.set("stage", EnvBase::new("", "https://stage.example.com"));
        config.add_env("stage-spa");
        config.set("stage-spa", EnvBase::new("", "https://stage.example.com/spa"));

        let url = "https://stage.example.com/spa/content/site/page.html";
        assert_eq!(
            detect_environment(url, &config),
            Some(("stage".to_string(), TabMode::Publish))
        );
    }

    #[test]
    fn test_build_links_skips_unconfigured_environments() {
        let config = detection_config();
        let links = build_links(CURRENT, &config);

        // only stage and prod are configured: 3 link types each
        assert_eq!(links.len(), 6);
        assert!(links.iter().all(|l| l.env == "stage" || l.env == "prod"));
        assert_eq!(links[0].env, "stage");
    }

    #[test]
    fn test_build_links_marks_active() {
        let config = detection_config();
        let links = build_links(CURRENT, &config);

        let active: Vec<&EnvLink> = links.iter().filter(|l| l.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].env, "prod");
        assert_eq!(active[0].link_type, LinkType::Author);
    }

    #[test]
    fn test_build_links_partial_configuration() {
        let mut config = ConfigSet::new();
        config.set("dev", EnvBase::new("https://author-dev.example.com", ""));

        let links = build_links(CURRENT, &config);

        // author + preview only: no publish base
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.link_type != LinkType::Publish));
    }

    #[test]
    fn test_build_links_empty_for_non_content_page() {
        let config = detection_config();
        assert!(build_links("https://news.ycombinator.com", &config).is_empty());
    }
}
