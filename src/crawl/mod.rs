//! Crawling passes over the target job-search site.
//!
//! Two passes share the [`crate::session::Session`] capability:
//!
//! 1. **Search crawl** ([`paginate`]): submit the search form, walk the
//!    result pages, and extract one batch of listings per page ([`extract`]).
//! 2. **Detail pass** ([`enrich`]): revisit listings the user flagged in
//!    the history file and attach their full description.
//!
//! Both passes are strictly sequential, one page at a time, with a jittered
//! pause before every navigation. The session is released on every exit
//! path, including extraction failures and navigation errors.

pub mod enrich;
pub mod extract;
pub mod paginate;

/// Canned result-page HTML shared by the crawl tests.
#[cfg(test)]
pub(crate) mod fixtures {
    /// One listing row: (title, link, company, city, posted, summary).
    pub type Row<'a> = (&'a str, &'a str, &'a str, &'a str, &'a str, &'a str);

    /// Build a result page in the target site's markup, with one extra
    /// standalone company label when `extra_company` is set (the shape of
    /// a sponsored insert that breaks field alignment).
    pub fn result_page(rows: &[Row], pagination: &[&str], extra_company: bool) -> String {
        let mut html = String::from("<html><body>\n");
        for (title, link, company, city, posted, summary) in rows {
            html.push_str(&format!(
                concat!(
                    "<div class=\"jobsearch-SerpJobCard\">\n",
                    "  <a class=\"jobtitle turnstileLink \" href=\"{link}\">{title}</a>\n",
                    "  <span class=\"company\">{company}</span>\n",
                    "  <div class=\"location\">{city}</div>\n",
                    "  <div class=\"result-link-bar\">{posted} - sauvegarder ce poste</div>\n",
                    "  <div class=\"summary\">{summary}</div>\n",
                    "</div>\n",
                ),
                link = link,
                title = title,
                company = company,
                city = city,
                posted = posted,
                summary = summary,
            ));
        }
        if extra_company {
            html.push_str("<span class=\"company\">Sponsored Corp</span>\n");
        }
        if !pagination.is_empty() {
            html.push_str("<div class=\"pagination\">\n");
            for (i, href) in pagination.iter().enumerate() {
                html.push_str(&format!("  <a href=\"{}\">{}</a>\n", href, i + 2));
            }
            html.push_str("</div>\n");
        }
        html.push_str("</body></html>\n");
        html
    }
}
