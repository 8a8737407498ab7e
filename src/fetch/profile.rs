//! Header sets that make automated requests resemble browser traffic.

use rand::seq::SliceRandom;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, DNT, HeaderMap, HeaderName, HeaderValue, PRAGMA,
    REFERER, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};

use url::Url;

use super::strategy::{ProfileKind, Target};

const BROWSER_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/120.0",
];

const MINIMAL_USER_AGENT: &str = "Mozilla/5.0 (compatible; TicketMonitor/1.0)";

const DOCUMENT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";
const API_ACCEPT: &str = "application/json, text/plain, */*";

/// A concrete disguise: the kind of profile plus the user agent picked for it.
///
/// The user agent is chosen once per strategy so that every request of the
/// strategy (warm-up included) presents the same browser.
#[derive(Debug, Clone)]
pub struct DisguiseProfile {
    kind: ProfileKind,
    user_agent: Option<&'static str>,
}

impl DisguiseProfile {
    /// Picks a profile of the given kind, rotating the user agent for
    /// browser profiles.
    pub fn pick<R: rand::Rng>(kind: ProfileKind, rng: &mut R) -> Self {
        let user_agent = match kind {
            ProfileKind::Browser => BROWSER_USER_AGENTS.choose(rng).copied(),
            ProfileKind::Minimal => Some(MINIMAL_USER_AGENT),
            ProfileKind::Bare => None,
        };
        Self { kind, user_agent }
    }

    /// The user agent presented, if any.
    pub fn user_agent(&self) -> Option<&'static str> {
        self.user_agent
    }

    /// Headers for a top-level page navigation.
    pub fn document_headers(&self, url: &Url, referrer: Option<&str>) -> HeaderMap {
        self.headers(Target::Page, url, referrer)
    }

    /// Headers for a request of the given target kind to `url`.
    pub fn headers(&self, target: Target, url: &Url, referrer: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(ua) = self.user_agent {
            headers.insert(USER_AGENT, HeaderValue::from_static(ua));
        }

        if self.kind == ProfileKind::Browser {
            headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
            headers.insert(DNT, HeaderValue::from_static("1"));
            match target {
                Target::Page => {
                    headers.insert(ACCEPT, HeaderValue::from_static(DOCUMENT_ACCEPT));
                    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
                    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
                    headers.insert(
                        HeaderName::from_static("sec-fetch-dest"),
                        HeaderValue::from_static("document"),
                    );
                    headers.insert(
                        HeaderName::from_static("sec-fetch-mode"),
                        HeaderValue::from_static("navigate"),
                    );
                }
                Target::Api => {
                    headers.insert(ACCEPT, HeaderValue::from_static(API_ACCEPT));
                    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
                    headers.insert(
                        HeaderName::from_static("x-requested-with"),
                        HeaderValue::from_static("XMLHttpRequest"),
                    );
                    headers.insert(
                        HeaderName::from_static("sec-fetch-mode"),
                        HeaderValue::from_static("cors"),
                    );
                }
            }
            headers.insert(
                HeaderName::from_static("sec-fetch-site"),
                HeaderValue::from_static(fetch_site(url, referrer)),
            );
        }

        if self.kind != ProfileKind::Bare {
            if let Some(value) = referrer.and_then(|r| HeaderValue::from_str(r).ok()) {
                headers.insert(REFERER, value);
            }
        }

        headers
    }
}

/// The `sec-fetch-site` a browser would send for `url` when navigating from
/// `referrer`.
fn fetch_site(url: &Url, referrer: Option<&str>) -> &'static str {
    let Some(referrer) = referrer else {
        return "none";
    };
    let Ok(referrer) = Url::parse(referrer) else {
        return "cross-site";
    };
    if referrer.origin() == url.origin() {
        "same-origin"
    } else if referrer.scheme() == url.scheme()
        && registrable_domain(&referrer).is_some()
        && registrable_domain(&referrer) == registrable_domain(url)
    {
        "same-site"
    } else {
        "cross-site"
    }
}

/// Last two labels of the host. Good enough for the hosts we talk to; no
/// public suffix list.
fn registrable_domain(url: &Url) -> Option<String> {
    let host = url.domain()?;
    let labels: Vec<&str> = host.rsplit('.').take(2).collect();
    (labels.len() == 2).then(|| format!("{}.{}", labels[1], labels[0]))
}
