/// Data layer: the bidding table and the filter → chart pipeline.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (trimmed, bids coerced)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ options   │  cascade: department → course → window → instructor → sections
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  exact-match criteria → matching records
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  chart    │  mean per term, reindexed onto the TermAxis (terms)
///   └──────────┘
/// ```
/// `view` runs the three stages for one interaction.

pub mod chart;
pub mod filter;
pub mod loader;
pub mod model;
pub mod options;
pub mod terms;
pub mod view;
