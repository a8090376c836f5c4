// Sales Scenes - Core Library
// Exposes the record model, aggregation transforms, and scene selector
// for use in the CLI binary and tests

pub mod aggregate;
pub mod record;
pub mod scene;

// UI is an external collaborator of the scene pipeline: everything
// above compiles and tests without it
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use aggregate::{
    latest_year, stack_shares, top_brands, yearly_shares, yearly_totals, BrandTotal, StackBand,
    StackedSeries, YearShare, YearlyTotal, TOP_N,
};
pub use record::{load_csv, BrandOrigin, Record};
pub use scene::{Scene, SceneData};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
