// src/analyze/keywords.rs
//! Keyword coverage: fraction of configured keywords present in the text.

/// Lowercased, de-duplicated keyword list (config order kept).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    terms: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<String> = Vec::new();
        for k in keywords {
            let k = k.as_ref().trim().to_lowercase();
            if !k.is_empty() && !terms.contains(&k) {
                terms.push(k);
            }
        }
        Self { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of keywords found as case-insensitive substrings of `text`.
    pub fn matches(&self, text: &str) -> usize {
        let haystack = text.to_lowercase();
        self.terms.iter().filter(|k| haystack.contains(k.as_str())).count()
    }

    /// `matches / max(len, 1)`; `0.0` for an empty set.
    pub fn score(&self, text: &str) -> f64 {
        if self.terms.is_empty() {
            return 0.0;
        }
        self.matches(text) as f64 / self.terms.len() as f64
    }
}

/// One-shot form of [`KeywordSet::score`].
pub fn keyword_score<S: AsRef<str>>(text: &str, keywords: &[S]) -> f64 {
    KeywordSet::new(keywords).score(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_of_keywords_found() {
        let kw = ["evaluation", "monitoring", "baseline", "survey"];
        assert_eq!(keyword_score("Baseline survey for the programme", &kw), 0.5);
        assert_eq!(keyword_score("nothing relevant", &kw), 0.0);
        assert_eq!(
            keyword_score("EVALUATION, monitoring, baseline and survey", &kw),
            1.0
        );
    }

    #[test]
    fn empty_keyword_list_scores_zero() {
        let kw: [&str; 0] = [];
        assert_eq!(keyword_score("anything at all", &kw), 0.0);
    }

    #[test]
    fn substring_semantics() {
        // "evaluat" hits both "evaluation" and "evaluate"
        assert_eq!(keyword_score("Final evaluation report", &["evaluat"]), 1.0);
    }

    #[test]
    fn duplicate_keywords_count_once() {
        let set = KeywordSet::new(["Survey", "survey ", "  "]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.score("household survey"), 1.0);
    }
}
