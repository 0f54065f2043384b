use super::chart::{build_charts, ChartSpec};
use super::filter::{filter, FilterSelection};
use super::model::Dataset;
use super::options::{
    bidding_window_options, course_options, instructor_options, school_department_options,
    section_options, SelectOption,
};
use super::terms::TermAxis;

/// Option lists for the five filter widgets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSets {
    pub school_departments: Vec<SelectOption>,
    pub courses: Vec<SelectOption>,
    pub bidding_windows: Vec<SelectOption>,
    pub instructors: Vec<SelectOption>,
    pub sections: Vec<SelectOption>,
}

/// What the chart area should show.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    /// No course or no section picked yet.
    NoSelection,
    /// The selection is valid but matches no record.
    NoMatchingData,
    Charts(Vec<ChartSpec>),
}

/// Everything the shell needs after one interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub options: OptionSets,
    pub charts: ChartOutcome,
    /// Records matching the current selection.
    pub matching: usize,
}

/// Drop a scalar selection that is not among the options of its stage.
fn retain_known(value: &mut Option<String>, options: &[SelectOption]) {
    if let Some(v) = value.as_deref() {
        if !v.is_empty() && !options.iter().any(|o| o.value == v) {
            log::debug!("clearing stale selection '{v}'");
            *value = None;
        }
    }
}

/// Evaluate the cascade top-down, clearing downstream picks that became invalid.
pub fn resolve_options(dataset: &Dataset, selection: &mut FilterSelection) -> OptionSets {
    let school_departments = school_department_options(dataset);
    retain_known(&mut selection.school_department, &school_departments);

    let department = selection.school_department.as_deref();
    let courses = course_options(dataset, department);
    retain_known(&mut selection.course_code, &courses);

    let course = selection.course_code.as_deref();
    let bidding_windows = bidding_window_options(dataset, department, course);
    retain_known(&mut selection.bidding_window, &bidding_windows);

    let window = selection.bidding_window.as_deref();
    let instructors = instructor_options(dataset, department, course, window);
    retain_known(&mut selection.instructor, &instructors);

    let instructor = selection.instructor.as_deref();
    let sections = section_options(dataset, department, course, window, instructor);
    selection
        .sections
        .retain(|s| sections.iter().any(|o| o.value == *s));

    OptionSets {
        school_departments,
        courses,
        bidding_windows,
        instructors,
        sections,
    }
}

/// Charts for the selection, or why there are none.
pub fn chart_outcome(dataset: &Dataset, axis: &TermAxis, selection: &FilterSelection) -> ChartOutcome {
    if !selection.is_chartable() {
        return ChartOutcome::NoSelection;
    }
    let records = filter(dataset, &selection.criteria());
    let charts = build_charts(&records, &selection.sections, axis);
    if charts.is_empty() {
        ChartOutcome::NoMatchingData
    } else {
        ChartOutcome::Charts(charts)
    }
}

/// One full recomputation pass: options, then charts.
pub fn compute_view(dataset: &Dataset, axis: &TermAxis, selection: &mut FilterSelection) -> DashboardView {
    let options = resolve_options(dataset, selection);
    let matching = filter(dataset, &selection.criteria()).len();
    let charts = chart_outcome(dataset, axis, selection);
    DashboardView {
        options,
        charts,
        matching,
    }
}
