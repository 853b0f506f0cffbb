//! Domain keyword filter.
//!
//! Traditional-medicine displays carry marker terms (dosha names, tissue
//! names) that a biomedical target must share before it may be proposed.

use crate::score::normalize;

/// Marker terms blocking cross-domain matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainKeywordSet {
    keywords: Vec<String>,
}

impl DomainKeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| normalize(k.as_ref()))
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// The stock NAMASTE marker set.
    pub fn standard() -> Self {
        Self::new(namaste_standards::config::DEFAULT_DOMAIN_KEYWORDS)
    }

    /// First marker present in the source display but absent from the target.
    pub fn blocking_keyword(&self, source_display: &str, target_display: &str) -> Option<&str> {
        let source = normalize(source_display);
        let target = normalize(target_display);
        self.keywords
            .iter()
            .find(|kw| source.contains(kw.as_str()) && !target.contains(kw.as_str()))
            .map(String::as_str)
    }

    /// True if the pair may be ranked. Directional: only source markers count.
    pub fn allows(&self, source_display: &str, target_display: &str) -> bool {
        self.blocking_keyword(source_display, target_display).is_none()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
