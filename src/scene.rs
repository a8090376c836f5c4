// Scene Selector - which of the three views is active
//
// An explicit finite-state value owned by the UI controller and passed
// by reference into rendering. Transitions clamp at the ends rather
// than wrapping: "next" on the last scene and "previous" on the first
// are no-ops.

use crate::aggregate::{self, BrandTotal, StackedSeries, YearlyTotal, TOP_N};
use crate::record::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scene {
    #[default]
    YearlyTotals,
    MarketShare,
    TopBrands,
}

impl Scene {
    /// All scenes in presentation order
    pub const ALL: [Scene; 3] = [Scene::YearlyTotals, Scene::MarketShare, Scene::TopBrands];

    pub fn index(&self) -> usize {
        match self {
            Scene::YearlyTotals => 0,
            Scene::MarketShare => 1,
            Scene::TopBrands => 2,
        }
    }

    /// Direct jump by scene index (valid inputs are 0-2)
    pub fn select(index: usize) -> Option<Scene> {
        Scene::ALL.get(index).copied()
    }

    pub fn next(&self) -> Scene {
        let i = (self.index() + 1).min(Scene::ALL.len() - 1);
        Scene::ALL[i]
    }

    pub fn previous(&self) -> Scene {
        Scene::ALL[self.index().saturating_sub(1)]
    }

    /// Chart title
    pub fn title(&self) -> &'static str {
        match self {
            Scene::YearlyTotals => "Total Sales by Year: Asian vs Western",
            Scene::MarketShare => "Market Share by Region Over Time",
            Scene::TopBrands => "Top 10 Brands by Sales",
        }
    }

    /// Short name for the scene tabs
    pub fn short_name(&self) -> &'static str {
        match self {
            Scene::YearlyTotals => "Yearly Totals",
            Scene::MarketShare => "Market Share",
            Scene::TopBrands => "Top Brands",
        }
    }

    /// Run this scene's transform over the full record set.
    ///
    /// Called on every render; nothing is cached between scenes.
    pub fn dataset(&self, records: &[Record]) -> SceneData {
        match self {
            Scene::YearlyTotals => SceneData::YearlyTotals(aggregate::yearly_totals(records)),
            Scene::MarketShare => {
                let shares = aggregate::yearly_shares(records);
                SceneData::MarketShare(aggregate::stack_shares(&shares))
            }
            Scene::TopBrands => SceneData::TopBrands(aggregate::top_brands(records, TOP_N)),
        }
    }
}

/// Derived dataset for one scene - the only thing the renderer consumes
#[derive(Debug, Clone, PartialEq)]
pub enum SceneData {
    YearlyTotals(Vec<YearlyTotal>),
    MarketShare(Vec<StackedSeries>),
    TopBrands(Vec<BrandTotal>),
}
