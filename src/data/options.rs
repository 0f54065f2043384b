use std::collections::BTreeSet;

use super::filter::{filter, Criteria};
use super::model::Dataset;

/// Longest course label shown in the dropdown before it is cut with "...".
pub const COURSE_LABEL_MAX_CHARS: usize = 50;

/// One entry of a dropdown / checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Text shown in the widget.
    pub label: String,
    /// Value written into the selection when picked.
    pub value: String,
    /// Full text for hover, when `label` is shortened.
    pub title: Option<String>,
}

impl SelectOption {
    fn plain(value: &str) -> Self {
        SelectOption {
            label: value.to_string(),
            value: value.to_string(),
            title: None,
        }
    }
}

/// Sorted, deduplicated options with label == value.
///
/// Blank cells are left out: an empty pick means "no constraint" downstream.
fn distinct_sorted<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<SelectOption> {
    values
        .into_iter()
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(SelectOption::plain)
        .collect()
}

/// `"{code} -> {description}"`, cut to [`COURSE_LABEL_MAX_CHARS`] characters.
///
/// Returns `(label, full_text)`.
pub fn course_label(code: &str, description: &str) -> (String, String) {
    let full = format!("{code} -> {description}");
    let label = if full.chars().count() > COURSE_LABEL_MAX_CHARS {
        let cut: String = full.chars().take(COURSE_LABEL_MAX_CHARS).collect();
        format!("{cut}...")
    } else {
        full.clone()
    };
    (label, full)
}

// ---------------------------------------------------------------------------
// Cascade: department → course → window → instructor → sections
// ---------------------------------------------------------------------------

/// Every school/department in the table.
pub fn school_department_options(dataset: &Dataset) -> Vec<SelectOption> {
    distinct_sorted(dataset.records().iter().map(|r| r.school_department.as_str()))
}

/// Distinct (code, description) pairs, sorted by course code.
pub fn course_options(dataset: &Dataset, school_department: Option<&str>) -> Vec<SelectOption> {
    let criteria = Criteria {
        school_department,
        ..Criteria::default()
    };
    let mut seen = BTreeSet::new();
    let mut options: Vec<SelectOption> = filter(dataset, &criteria)
        .into_iter()
        .filter(|r| !r.course_code.is_empty())
        .filter(|&r| seen.insert((r.course_code.as_str(), r.description.as_str())))
        .map(|r| {
            let (label, full) = course_label(&r.course_code, &r.description);
            SelectOption {
                label,
                value: r.course_code.clone(),
                title: Some(full),
            }
        })
        .collect();
    // Stable: pairs sharing a code keep first-seen order.
    options.sort_by(|a, b| a.value.cmp(&b.value));
    options
}

pub fn bidding_window_options(
    dataset: &Dataset,
    school_department: Option<&str>,
    course_code: Option<&str>,
) -> Vec<SelectOption> {
    let criteria = Criteria {
        school_department,
        course_code,
        ..Criteria::default()
    };
    distinct_sorted(
        filter(dataset, &criteria)
            .into_iter()
            .map(|r| r.bidding_window.as_str()),
    )
}

pub fn instructor_options(
    dataset: &Dataset,
    school_department: Option<&str>,
    course_code: Option<&str>,
    bidding_window: Option<&str>,
) -> Vec<SelectOption> {
    let criteria = Criteria {
        school_department,
        course_code,
        bidding_window,
        ..Criteria::default()
    };
    distinct_sorted(filter(dataset, &criteria).into_iter().map(|r| r.instructor.as_str()))
}

pub fn section_options(
    dataset: &Dataset,
    school_department: Option<&str>,
    course_code: Option<&str>,
    bidding_window: Option<&str>,
    instructor: Option<&str>,
) -> Vec<SelectOption> {
    let criteria = Criteria {
        school_department,
        course_code,
        bidding_window,
        instructor,
        sections: &[],
    };
    distinct_sorted(filter(dataset, &criteria).into_iter().map(|r| r.section.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::tests::{rec, sample_dataset};
    use crate::data::model::Record;

    fn values(options: &[SelectOption]) -> Vec<&str> {
        options.iter().map(|o| o.value.as_str()).collect()
    }

    #[test]
    fn departments_are_sorted_and_distinct() {
        let ds = sample_dataset();
        let opts = school_department_options(&ds);
        assert_eq!(values(&opts), ["SIS", "SOB", "SOE"]);
        assert!(opts.iter().all(|o| o.label == o.value && o.title.is_none()));
    }

    #[test]
    fn courses_follow_department() {
        let ds = sample_dataset();
        assert_eq!(values(&course_options(&ds, None)), ["COR1100", "CS102", "IS111", "IS112"]);
        let sis = course_options(&ds, Some("SIS"));
        assert_eq!(values(&sis), ["IS111", "IS112"]);
        for opt in &sis {
            assert!(ds
                .records()
                .iter()
                .any(|r| r.school_department == "SIS" && r.course_code == opt.value));
        }
        assert!(course_options(&ds, Some("LAW")).is_empty());
    }

    #[test]
    fn course_pairs_with_same_code_are_both_kept() {
        let mut renamed: Record = rec("SIS", "IS111", "Round 1", "LEE", "G9", "2024-25 Term 1", None, None);
        renamed.description = "Renamed course".into();
        let mut records = sample_dataset().records().to_vec();
        records.push(renamed);
        let ds = Dataset::from_records(records);
        let opts = course_options(&ds, Some("SIS"));
        assert_eq!(values(&opts), ["IS111", "IS111", "IS112"]);
        assert_eq!(opts[0].label, "IS111 -> IS111 description");
        assert_eq!(opts[1].label, "IS111 -> Renamed course");
    }

    #[test]
    fn long_course_labels_are_truncated() {
        let (label, full) = course_label("CS102", "Programming Fundamentals II");
        assert_eq!(label, full);
        assert_eq!(label, "CS102 -> Programming Fundamentals II");

        let desc = "Analytics Foundation for Decision Making in Modern Enterprises";
        let (label, full) = course_label("IS217", desc);
        assert_eq!(full, format!("IS217 -> {desc}"));
        assert_eq!(label.chars().count(), COURSE_LABEL_MAX_CHARS + 3);
        assert!(label.ends_with("..."));
        assert_eq!(&label[..COURSE_LABEL_MAX_CHARS], &full[..COURSE_LABEL_MAX_CHARS]);

        // exactly at the limit: untouched
        let fifty = "x".repeat(COURSE_LABEL_MAX_CHARS - "C1 -> ".len());
        let (label, full) = course_label("C1", &fifty);
        assert_eq!(label.chars().count(), COURSE_LABEL_MAX_CHARS);
        assert_eq!(label, full);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let desc = "é".repeat(60);
        let (label, _) = course_label("FR101", &desc);
        assert_eq!(label.chars().count(), COURSE_LABEL_MAX_CHARS + 3);
    }

    #[test]
    fn course_option_title_holds_full_text() {
        let ds = sample_dataset();
        let opts = course_options(&ds, Some("SOE"));
        assert_eq!(opts.len(), 1);
        assert_eq!(opts[0].title.as_deref(), Some("CS102 -> CS102 description"));
    }

    #[test]
    fn blank_cells_are_not_offered() {
        let mut records = vec![
            rec("SIS", "IS111", "Round 1", "", "G1", "2022-23 Term 1", Some(30.0), None),
            rec("SIS", "IS111", "Round 1", "LEE", "G2", "2022-23 Term 1", Some(35.0), None),
            rec("SIS", "IS111", "", "LEE", "", "2022-23 Term 2", Some(20.0), None),
        ];
        records.push(rec("SIS", "", "Round 1", "LEE", "G3", "2022-23 Term 2", None, None));
        let ds = Dataset::from_records(records);

        assert_eq!(values(&course_options(&ds, Some("SIS"))), ["IS111"]);
        assert_eq!(values(&bidding_window_options(&ds, None, Some("IS111"))), ["Round 1"]);
        assert_eq!(values(&instructor_options(&ds, None, Some("IS111"), None)), ["LEE"]);
        assert_eq!(
            values(&section_options(&ds, None, Some("IS111"), None, None)),
            ["G1", "G2"]
        );
        let all = [
            school_department_options(&ds),
            course_options(&ds, None),
            bidding_window_options(&ds, None, None),
            instructor_options(&ds, None, None, None),
            section_options(&ds, None, None, None, None),
        ];
        assert!(all.iter().flatten().all(|o| !o.value.is_empty()));
    }

    #[test]
    fn downstream_options_narrow_with_each_stage() {
        let ds = sample_dataset();
        assert_eq!(
            values(&bidding_window_options(&ds, None, None)),
            ["Round 1", "Round 1A", "Round 2"]
        );
        assert_eq!(
            values(&bidding_window_options(&ds, Some("SIS"), Some("IS111"))),
            ["Round 1", "Round 2"]
        );
        assert_eq!(
            values(&instructor_options(&ds, Some("SIS"), Some("IS111"), None)),
            ["LEE", "NG"]
        );
        assert_eq!(
            values(&instructor_options(&ds, Some("SIS"), Some("IS111"), Some("Round 2"))),
            ["NG"]
        );
        assert_eq!(
            values(&section_options(&ds, Some("SIS"), Some("IS111"), Some("Round 1"), None)),
            ["G1", "G2"]
        );
        assert_eq!(
            values(&section_options(&ds, Some("SIS"), Some("IS111"), Some("Round 1"), Some("LEE"))),
            ["G1", "G2"]
        );
        assert!(section_options(&ds, Some("SOB"), Some("CS102"), None, None).is_empty());
    }
}
