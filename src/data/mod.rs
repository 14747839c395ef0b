/// Data layer: core types, loading, reshaping and naming.
///
/// Architecture:
/// ```text
///  DAQ export (.csv / .txt, UTF-16 or UTF-8)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode + per-layout parse ──► reshape (alarms, HMS)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ DataTable │  index labels + numeric columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  naming   │  user labels → columns, then loader::save_csv
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod naming;
pub mod reshape;

#[cfg(test)]
pub mod fixtures;
