use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Term labels: "{startYear}-{yy} Term {n}"
// ---------------------------------------------------------------------------

pub const DEFAULT_FIRST_YEAR: i32 = 2021;
pub const DEFAULT_LAST_YEAR: i32 = 2025;
pub const TERMS_PER_YEAR: u32 = 2;
/// Bounds accepted for configured axis years.
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 9998;

/// Chronological sort key of a term label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TermKey {
    pub start_year: i32,
    pub term: u32,
}

impl TermKey {
    /// Key assigned to labels that do not follow the term pattern.
    pub const EARLIEST: TermKey = TermKey {
        start_year: 0,
        term: 0,
    };

    /// Parse `"2021-22 Term 2"` into `(2021, 2)`.
    pub fn parse(label: &str) -> Option<Self> {
        let (year_part, term_part) = label.split_once(" Term ")?;
        let start_year = year_part.split('-').next()?.trim().parse().ok()?;
        let term = term_part.trim().parse().ok()?;
        Some(TermKey { start_year, term })
    }

    /// Like [`TermKey::parse`], but malformed labels sort as the earliest term.
    // NOTE: this hides malformed labels instead of reporting them; keep until
    // product confirms whether bad terms should be surfaced.
    pub fn of(label: &str) -> Self {
        Self::parse(label).unwrap_or(Self::EARLIEST)
    }
}

/// Label for the given academic year and term number, e.g. `2024-25 Term 1`.
pub fn term_label(start_year: i32, term: u32) -> String {
    format!("{start_year}-{:02} Term {term}", (start_year + 1).rem_euclid(100))
}

/// Chronological comparison of two term labels.
pub fn compare_terms(a: &str, b: &str) -> Ordering {
    TermKey::of(a).cmp(&TermKey::of(b))
}

// ---------------------------------------------------------------------------
// TermAxis – canonical x-axis shared by every chart
// ---------------------------------------------------------------------------

/// Ordered list of every term between two academic years (inclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermAxis {
    labels: Vec<String>,
}

impl TermAxis {
    /// Two terms per academic year, from `first_year` through `last_year`.
    pub fn generate(first_year: i32, last_year: i32) -> Self {
        let labels: Vec<String> = (first_year..=last_year)
            .flat_map(|year| (1..=TERMS_PER_YEAR).map(move |term| term_label(year, term)))
            .collect();
        debug_assert!(labels
            .windows(2)
            .all(|w| compare_terms(&w[0], &w[1]) == Ordering::Less));
        TermAxis { labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Axis position of a label, if it is on the axis.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}

impl Default for TermAxis {
    fn default() -> Self {
        TermAxis::generate(DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR)
    }
}
