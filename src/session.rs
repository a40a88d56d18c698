//! Browsing-session capability used by the crawl and detail passes.
//!
//! The target site is reached through the [`Session`] trait rather than a
//! concrete client, so the page-level logic can be driven against canned
//! HTML in tests. The trait mirrors what the crawl actually needs from a
//! browser: load a page, query elements, fill the search form, press the
//! search button, and release the session when done.
//!
//! # Architecture
//!
//! - [`Session`]: the capability trait
//! - [`HttpSession`]: the real adapter, an anonymous `reqwest` client with
//!   `scraper` queries over the most recently loaded document
//! - [`Element`]: what a query returns, visible text plus an optional href
//!
//! The adapter keeps no cookie jar, so every run starts as a fresh
//! anonymous visitor. Form interaction is buffered: `fill_field` stores the
//! pending value and `click` on the search control submits the buffered
//! form as the GET request the site's own form produces.
//!
//! Selector strings are structural matchers against the target site's
//! markup and are the most fragile part of the system; when the site
//! changes its markup these constants are the first place to look.

use std::collections::HashMap;
use std::error::Error;
use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

/// Form field id for the job search term.
pub const JOB_FIELD: &str = "text-input-what";
/// Form field id for the location search term. Arrives pre-populated on
/// the real site, hence the keystroke-based clearing in the crawl.
pub const LOCATION_FIELD: &str = "text-input-where";
/// The search submit button.
pub const SEARCH_BUTTON: &str = ".icl-Button.icl-Button--primary.icl-Button--md.icl-WhatWhere-button";

/// Query parameter names the search form submits to.
const JOB_PARAM: &str = "q";
const LOCATION_PARAM: &str = "l";
/// Path the search form submits to, relative to the site root.
const SEARCH_PATH: &str = "emplois";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// One element matched by a structural selector.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// The element's visible text, whitespace-collapsed.
    pub text: String,
    /// The element's `href`, resolved to an absolute URL when present.
    pub href: Option<String>,
}

/// Capability interface over a browsing session.
///
/// One session serves one crawl or one detail pass; implementations must
/// tolerate `close` being called after a failed navigation.
pub trait Session {
    /// Load a page, making it the current document.
    async fn navigate(&mut self, url: &str) -> Result<(), Box<dyn Error>>;

    /// Query the current document. Returns an empty list when nothing
    /// matches or no document is loaded; never fails.
    fn find_all(&self, selector: &str) -> Vec<Element>;

    /// Type a value into a form field, appending to whatever is there.
    fn fill_field(&mut self, id: &str, text: &str);

    /// Press backspace `keystrokes` times in a form field. The target
    /// site pre-populates the location field and offers no reliable
    /// clear primitive, so the crawl clears it this way.
    fn clear_field(&mut self, id: &str, keystrokes: usize);

    /// Click an element. For the search control this submits the form
    /// and loads the first result page.
    async fn click(&mut self, selector: &str) -> Result<(), Box<dyn Error>>;

    /// Release the session. Safe to call on any path, including after
    /// an error.
    fn close(&mut self);
}

/// Run a selector over a document and collect matching elements.
///
/// `href` attributes are resolved against `base` so relative pagination
/// links come back absolute. A selector that fails to parse is logged and
/// matches nothing rather than aborting the page.
pub fn select_all(document: &str, selector: &str, base: Option<&Url>) -> Vec<Element> {
    let parsed = match Selector::parse(selector) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(selector, error = %e, "Unparseable selector; matching nothing");
            return Vec::new();
        }
    };

    let html = Html::parse_document(document);
    html.select(&parsed)
        .map(|element| {
            let text = element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ");
            let href = element.value().attr("href").map(|raw| match base {
                Some(base) => base
                    .join(raw)
                    .map(|resolved| resolved.to_string())
                    .unwrap_or_else(|_| raw.to_string()),
                None => raw.to_string(),
            });
            Element { text, href }
        })
        .collect()
}

/// The real session: an anonymous HTTP client over the live site.
pub struct HttpSession {
    client: reqwest::Client,
    current_url: Option<Url>,
    document: Option<String>,
    form: HashMap<String, String>,
}

impl HttpSession {
    /// Open a fresh anonymous session.
    ///
    /// The client carries no cookie store, so nothing persists between
    /// runs beyond what the history file records.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed; that is fatal
    /// for the enclosing crawl.
    pub fn open() -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(8))
            .timeout(Duration::from_secs(20))
            .build()?;
        info!("Opened anonymous browsing session");

        Ok(HttpSession {
            client,
            current_url: None,
            document: None,
            form: HashMap::new(),
        })
    }

    /// Build the result-page URL the search form submits to.
    fn search_url(&self) -> Result<String, Box<dyn Error>> {
        let base = self
            .current_url
            .as_ref()
            .ok_or("no page loaded; navigate to the search engine first")?;
        let what = self.form.get(JOB_FIELD).map(String::as_str).unwrap_or("");
        let where_ = self.form.get(LOCATION_FIELD).map(String::as_str).unwrap_or("");
        let relative = format!(
            "{}?{}={}&{}={}",
            SEARCH_PATH,
            JOB_PARAM,
            urlencoding::encode(what),
            LOCATION_PARAM,
            urlencoding::encode(where_),
        );
        Ok(base.join(&relative)?.to_string())
    }
}

impl Session for HttpSession {
    async fn navigate(&mut self, url: &str) -> Result<(), Box<dyn Error>> {
        let target = Url::parse(url)?;
        debug!(%target, "Navigating");

        let response = self.client.get(target.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("{} returned HTTP {}", target, status.as_u16()).into());
        }

        let body = response.text().await?;
        debug!(%target, bytes = body.len(), "Loaded page");
        self.current_url = Some(target);
        self.document = Some(body);
        Ok(())
    }

    fn find_all(&self, selector: &str) -> Vec<Element> {
        match &self.document {
            Some(document) => select_all(document, selector, self.current_url.as_ref()),
            None => Vec::new(),
        }
    }

    fn fill_field(&mut self, id: &str, text: &str) {
        self.form.entry(id.to_string()).or_default().push_str(text);
    }

    fn clear_field(&mut self, id: &str, keystrokes: usize) {
        if let Some(value) = self.form.get_mut(id) {
            for _ in 0..keystrokes {
                value.pop();
            }
        }
    }

    async fn click(&mut self, selector: &str) -> Result<(), Box<dyn Error>> {
        if selector == SEARCH_BUTTON {
            let url = self.search_url()?;
            info!(%url, "Submitting search form");
            self.form.clear();
            return self.navigate(&url).await;
        }

        // Anything else clickable over plain HTTP is a link.
        match self.find_all(selector).into_iter().find_map(|el| el.href) {
            Some(href) => self.navigate(&href).await,
            None => Err(format!("nothing to click for selector {selector}").into()),
        }
    }

    fn close(&mut self) {
        self.current_url = None;
        self.document = None;
        self.form.clear();
        info!("Closed browsing session");
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_text_and_href() {
        let html = r#"
            <div class="pagination">
                <a href="/jobs?start=10">2</a>
                <a href="/jobs?start=20">Suivant</a>
            </div>
        "#;
        let base = Url::parse("https://jobs.example/").unwrap();
        let elements = select_all(html, "div.pagination a", Some(&base));

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[1].text, "Suivant");
        assert_eq!(
            elements[1].href.as_deref(),
            Some("https://jobs.example/jobs?start=20")
        );
    }

    #[test]
    fn test_select_all_without_base_keeps_raw_href() {
        let html = r#"<a class="next" href="/page2">next</a>"#;
        let elements = select_all(html, "a.next", None);
        assert_eq!(elements[0].href.as_deref(), Some("/page2"));
    }

    #[test]
    fn test_select_all_bad_selector_matches_nothing() {
        let elements = select_all("<p>hi</p>", "p[", None);
        assert!(elements.is_empty());
    }

    #[test]
    fn test_select_all_collapses_whitespace() {
        let html = "<div class=\"summary\">\n  line one\n  line two\n</div>";
        let elements = select_all(html, "div.summary", None);
        assert_eq!(elements[0].text, "line one line two");
    }

    #[tokio::test]
    async fn test_http_session_search_url_requires_navigation() {
        let mut session = HttpSession::open().unwrap();
        session.fill_field(JOB_FIELD, "data scientist");
        let err = session.click(SEARCH_BUTTON).await.unwrap_err();
        assert!(err.to_string().contains("navigate"));
    }

    #[test]
    fn test_http_session_clear_field_trims_pending_value() {
        let mut session = HttpSession::open().unwrap();
        session.fill_field(LOCATION_FIELD, "Lyon");
        session.clear_field(LOCATION_FIELD, 15);
        session.fill_field(LOCATION_FIELD, "Paris");
        assert_eq!(session.form.get(LOCATION_FIELD).unwrap(), "Paris");
    }

    #[test]
    fn test_search_url_encodes_terms() {
        let mut session = HttpSession::open().unwrap();
        session.current_url = Some(Url::parse("https://www.indeed.fr/").unwrap());
        session.fill_field(JOB_FIELD, "data scientist");
        session.fill_field(LOCATION_FIELD, "Paris");
        let url = session.search_url().unwrap();
        assert_eq!(
            url,
            "https://www.indeed.fr/emplois?q=data%20scientist&l=Paris"
        );
    }
}
