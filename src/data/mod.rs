/// Data layer: core types, loading, and the tolerance query.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  pick id / mz / rt columns → FeatureTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ FeatureTable  │  Vec<Feature>, row order preserved
///   └──────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ proximity  │  ppm / seconds tolerance box → near-duplicate count
///   └───────────┘
/// ```

pub mod loader;
pub mod model;
pub mod proximity;
pub mod tolerance;
