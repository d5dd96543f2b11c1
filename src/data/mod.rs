/// Data layer: records, loading, classification, filtering, aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<Record> (risk derived per row)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ InsuranceDataset  │  records, region index, age bounds
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  region ∧ age interval ∧ smoker set → subset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  subset → DashboardArtifacts
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod risk;
