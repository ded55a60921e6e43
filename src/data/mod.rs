/// Data layer: field extraction, loading, aggregation, sampling and export.
///
/// Architecture:
/// ```text
///  level CSV (초/중/고/특/각/그)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fields::* on combined columns → LevelTable
///   └──────────┘   (cache memoises by path + mtime)
///        │
///        ├──────────────────────┬─────────────────────┐
///        ▼                      ▼                     ▼
///   ┌───────────┐        ┌──────────────┐      ┌──────────┐
///   │ aggregate │ ─────▶ │ distribution │      │  sample   │  filter → seeded draw
///   └───────────┘        └──────────────┘      └──────────┘
///        │                      │                     │
///        └──────────────────────┴─────────┬───────────┘
///                                         ▼
///                                   ┌──────────┐
///                                   │  export   │  UTF-8 BOM CSV
///                                   └──────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod distribution;
pub mod error;
pub mod export;
pub mod fields;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sample;
pub mod stats;
