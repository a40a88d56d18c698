//! Relevance rules applied to a crawled batch before it reaches history.
//!
//! Filtering is a pure, order-preserving pass: fields are lower-cased
//! first (rules match case-insensitively and the stored form stays
//! consistent), then an ordered sequence of keep/drop predicates narrows
//! the batch, and finally the output delimiter is scrubbed out of the
//! free-text fields. It never fails, it only narrows.
//!
//! Every keyword set is configuration. The built-in defaults encode one
//! particular search (junior data-science roles around Paris, consulting
//! firms excluded); point `--filter-config` at a YAML file to run the same
//! pipeline against a different market.

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::JobRecord;
use crate::utils::replace_separator;

/// Keyword rules for one search profile.
///
/// All matching is substring containment over the lower-cased field, so
/// short stems catch their variants ("consult" catches "consulting" and
/// "consultant").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRules {
    /// Keep a record only when its title contains one of these.
    pub keep_title: Vec<String>,
    /// Drop when the title contains any of these: contract types not
    /// wanted (internships, apprenticeships) and seniority or function
    /// markers outside the target range.
    pub drop_title: Vec<String>,
    /// Drop when the company or the description contains any of these
    /// sector markers.
    pub drop_sector: Vec<String>,
    /// Drop these companies outright.
    pub drop_companies: Vec<String>,
    /// Drop listings located in these cities.
    pub drop_cities: Vec<String>,
    /// Output delimiter scrubbed from title and description.
    pub separator: char,
}

impl Default for FilterRules {
    fn default() -> Self {
        let list = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        FilterRules {
            keep_title: list(&["scientist", "science", "research"]),
            drop_title: list(&[
                "alternan", "stage", "intern", "lead", "chief", "chef", "manager", "senior",
                "consult",
            ]),
            drop_sector: list(&["consult", "conseil"]),
            drop_companies: list(&[
                "capgemini",
                "novencia",
                "kpmg",
                "ey",
                "mazars",
                "accenture",
                "sopra",
                "avisia",
                "ingeniance",
            ]),
            drop_cities: list(&["villetaneuse"]),
            separator: ',',
        }
    }
}

impl FilterRules {
    /// Load rules from a YAML file. Fields left out of the file keep
    /// their built-in defaults.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let raw = fs::read_to_string(path)?;
        let rules: FilterRules = serde_yaml::from_str(&raw)?;
        info!(path = %path.display(), "Loaded filter rules");
        Ok(rules)
    }

    /// Apply the rules to a batch, in order, returning the kept records
    /// lower-cased and scrubbed of the output delimiter.
    pub fn apply(&self, records: Vec<JobRecord>) -> Vec<JobRecord> {
        let before = records.len();
        let kept: Vec<JobRecord> = records
            .into_iter()
            .map(|mut record| {
                record.title = record.title.to_lowercase();
                record.company = record.company.to_lowercase();
                record.city = record.city.to_lowercase();
                record.description = record.description.to_lowercase();
                record
            })
            .filter(|r| contains_any(&r.title, &self.keep_title))
            .filter(|r| !contains_any(&r.title, &self.drop_title))
            .filter(|r| {
                !contains_any(&r.company, &self.drop_sector)
                    && !contains_any(&r.description, &self.drop_sector)
            })
            .filter(|r| !contains_any(&r.company, &self.drop_companies))
            .filter(|r| !contains_any(&r.city, &self.drop_cities))
            .map(|mut record| {
                record.title = replace_separator(&record.title, self.separator);
                record.description = replace_separator(&record.description, self.separator);
                record
            })
            .collect();

        debug!(before, after = kept.len(), "Applied relevance rules");
        kept
    }
}

fn contains_any(field: &str, words: &[String]) -> bool {
    words.iter().any(|word| field.contains(word.as_str()))
}
