// ---------------------------------------------------------------------------
// Column names of the bidding table
// ---------------------------------------------------------------------------

/// Column headers the loader requires. Headers are compared after trimming.
pub mod columns {
    pub const SCHOOL_DEPARTMENT: &str = "School/Department";
    pub const COURSE_CODE: &str = "Course Code";
    pub const DESCRIPTION: &str = "Description";
    pub const BIDDING_WINDOW: &str = "Bidding Window";
    pub const INSTRUCTOR: &str = "Instructor";
    pub const SECTION: &str = "Section";
    pub const TERM: &str = "Term";
    pub const MEDIAN_BID: &str = "Median Bid";
    pub const MIN_BID: &str = "Min Bid";

    /// All required columns, in the order [`super::Record::from_cells`] expects them.
    pub const REQUIRED: [&str; 9] = [
        SCHOOL_DEPARTMENT,
        COURSE_CODE,
        DESCRIPTION,
        BIDDING_WINDOW,
        INSTRUCTOR,
        SECTION,
        TERM,
        MEDIAN_BID,
        MIN_BID,
    ];
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// One historical bidding result for a course section in a given term.
///
/// String fields are always trimmed. Bids are either a finite number or `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub school_department: String,
    pub course_code: String,
    pub description: String,
    pub bidding_window: String,
    pub instructor: String,
    pub section: String,
    pub term: String,
    pub median_bid: Option<f64>,
    pub min_bid: Option<f64>,
}

impl Record {
    /// Build a normalized record from raw cells ordered as [`columns::REQUIRED`].
    pub fn from_cells(cells: [&str; 9]) -> Self {
        let [
            school_department,
            course_code,
            description,
            bidding_window,
            instructor,
            section,
            term,
            median_bid,
            min_bid,
        ] = cells;
        Record {
            school_department: school_department.trim().to_string(),
            course_code: course_code.trim().to_string(),
            description: description.trim().to_string(),
            bidding_window: bidding_window.trim().to_string(),
            instructor: instructor.trim().to_string(),
            section: section.trim().to_string(),
            term: term.trim().to_string(),
            median_bid: parse_bid(median_bid),
            min_bid: parse_bid(min_bid),
        }
    }
}

/// Parse a bid cell. Anything that is not a finite decimal number is absent.
pub fn parse_bid(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded bidding table. Built once at startup and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    /// All records in load order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
