use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Filter selection: what the user has picked in each widget
// ---------------------------------------------------------------------------

/// Current state of the filter widgets.
///
/// `None` or an empty string means "no constraint". An empty `sections` list
/// likewise does not constrain anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub school_department: Option<String>,
    pub course_code: Option<String>,
    pub bidding_window: Option<String>,
    pub instructor: Option<String>,
    /// Selected sections, in the order they were ticked.
    pub sections: Vec<String>,
}

impl FilterSelection {
    /// Borrowed view of the selection used by the filter engine.
    pub fn criteria(&self) -> Criteria<'_> {
        Criteria {
            school_department: self.school_department.as_deref(),
            course_code: self.course_code.as_deref(),
            bidding_window: self.bidding_window.as_deref(),
            instructor: self.instructor.as_deref(),
            sections: &self.sections,
        }
    }

    /// Whether a course and at least one section are selected.
    pub fn is_chartable(&self) -> bool {
        active(self.course_code.as_deref()).is_some() && !self.sections.is_empty()
    }
}

/// Filter criteria borrowed from a selection or passed ad hoc.
#[derive(Debug, Clone, Copy, Default)]
pub struct Criteria<'a> {
    pub school_department: Option<&'a str>,
    pub course_code: Option<&'a str>,
    pub bidding_window: Option<&'a str>,
    pub instructor: Option<&'a str>,
    pub sections: &'a [String],
}

impl Criteria<'_> {
    /// A record passes when every active criterion matches exactly.
    pub fn matches(&self, record: &Record) -> bool {
        let eq = |criterion: Option<&str>, value: &str| match active(criterion) {
            Some(wanted) => wanted == value,
            None => true,
        };
        eq(self.school_department, &record.school_department)
            && eq(self.course_code, &record.course_code)
            && eq(self.bidding_window, &record.bidding_window)
            && eq(self.instructor, &record.instructor)
            && (self.sections.is_empty() || self.sections.iter().any(|s| *s == record.section))
    }
}

fn active(criterion: Option<&str>) -> Option<&str> {
    criterion.filter(|c| !c.is_empty())
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Records passing `criteria`, in input order.
pub fn filter_records<'a, I>(records: I, criteria: &Criteria<'_>) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|record| criteria.matches(record))
        .collect()
}

/// Records of the dataset passing `criteria`. Empty when nothing matches.
pub fn filter<'a>(dataset: &'a Dataset, criteria: &Criteria<'_>) -> Vec<&'a Record> {
    filter_records(dataset.records(), criteria)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Shorthand record builder shared by the data-layer tests.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn rec(
        dept: &str,
        code: &str,
        window: &str,
        instructor: &str,
        section: &str,
        term: &str,
        median: Option<f64>,
        min: Option<f64>,
    ) -> Record {
        Record {
            school_department: dept.into(),
            course_code: code.into(),
            description: format!("{code} description"),
            bidding_window: window.into(),
            instructor: instructor.into(),
            section: section.into(),
            term: term.into(),
            median_bid: median,
            min_bid: min,
        }
    }

    pub(crate) fn sample_dataset() -> Dataset {
        Dataset::from_records(vec![
            rec("SIS", "IS111", "Round 1", "LEE", "G1", "2022-23 Term 1", Some(30.0), Some(10.0)),
            rec("SIS", "IS111", "Round 1", "LEE", "G2", "2022-23 Term 1", Some(35.0), Some(12.0)),
            rec("SIS", "IS111", "Round 2", "NG", "G1", "2022-23 Term 2", Some(20.0), None),
            rec("SIS", "IS112", "Round 1", "NG", "G1", "2023-24 Term 1", None, None),
            rec("SOB", "COR1100", "Round 1", "TAN", "G3", "2021-22 Term 2", Some(55.0), Some(40.0)),
            rec("SOE", "CS102", "Round 1A", "TAN", "A", "2022-23 Term 1", Some(50.0), Some(45.0)),
            rec("SOE", "CS102", "Round 1A", "TAN", "A", "2022-23 Term 2", Some(60.0), Some(52.0)),
        ])
    }

    #[test]
    fn empty_criteria_keep_everything() {
        let ds = sample_dataset();
        assert_eq!(filter(&ds, &Criteria::default()).len(), ds.len());
        let blank = Criteria {
            school_department: Some(""),
            course_code: Some(""),
            ..Criteria::default()
        };
        assert_eq!(filter(&ds, &blank).len(), ds.len());
    }

    #[test]
    fn scalar_criteria_match_exactly() {
        let ds = sample_dataset();
        let crit = Criteria {
            school_department: Some("SIS"),
            course_code: Some("IS111"),
            bidding_window: Some("Round 1"),
            ..Criteria::default()
        };
        let out = filter(&ds, &crit);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.course_code == "IS111" && r.bidding_window == "Round 1"));
        assert!(std::ptr::eq(out[0], &ds.records()[0]));

        let prefix = Criteria {
            course_code: Some("IS11"),
            ..Criteria::default()
        };
        assert!(filter(&ds, &prefix).is_empty());
    }

    #[test]
    fn sections_use_set_membership() {
        let ds = sample_dataset();
        let sections = vec!["G1".to_string(), "G3".to_string()];
        let crit = Criteria {
            sections: &sections,
            ..Criteria::default()
        };
        let out = filter(&ds, &crit);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|r| r.section == "G1" || r.section == "G3"));
    }

    #[test]
    fn unmatched_combination_is_empty_not_error() {
        let ds = sample_dataset();
        let crit = Criteria {
            school_department: Some("SIS"),
            course_code: Some("CS102"),
            ..Criteria::default()
        };
        assert!(filter(&ds, &crit).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = sample_dataset();
        let sections = vec!["G1".to_string()];
        let crit = Criteria {
            school_department: Some("SIS"),
            sections: &sections,
            ..Criteria::default()
        };
        let once = filter(&ds, &crit);
        let twice = filter_records(once.iter().copied(), &crit);
        assert_eq!(once, twice);
    }

    #[test]
    fn extra_criterion_never_grows_result() {
        let ds = sample_dataset();
        let sections = vec!["G1".to_string()];
        let steps = [
            Criteria::default(),
            Criteria {
                school_department: Some("SIS"),
                ..Criteria::default()
            },
            Criteria {
                school_department: Some("SIS"),
                course_code: Some("IS111"),
                ..Criteria::default()
            },
            Criteria {
                school_department: Some("SIS"),
                course_code: Some("IS111"),
                bidding_window: Some("Round 2"),
                ..Criteria::default()
            },
            Criteria {
                school_department: Some("SIS"),
                course_code: Some("IS111"),
                bidding_window: Some("Round 2"),
                instructor: Some("NG"),
                sections: &sections,
            },
        ];
        let sizes: Vec<usize> = steps.iter().map(|c| filter(&ds, c).len()).collect();
        assert!(sizes.windows(2).all(|w| w[1] <= w[0]), "{sizes:?}");
        assert_eq!(*sizes.last().unwrap(), 1);
    }

    #[test]
    fn selection_chartable_needs_course_and_section() {
        let mut sel = FilterSelection::default();
        assert!(!sel.is_chartable());
        sel.course_code = Some("CS102".into());
        assert!(!sel.is_chartable());
        sel.sections.push("A".into());
        assert!(sel.is_chartable());
        sel.course_code = Some(String::new());
        assert!(!sel.is_chartable());
    }
}
