/// Data layer for the trainers: tabular types, loading, preparation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   prep    │  clean, encode, split → Features + row indices
///   └──────────┘
/// ```
///
/// `synth` produces stand-in datasets with the same layouts.

pub mod loader;
pub mod model;
pub mod prep;
pub mod synth;
