//! The visualizers this store knows how to build.

use std::fmt;

use algoscope_trace::Algorithm;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::array::ArrayVisualizerState;
use crate::config::StoreConfig;
use crate::search::SearchVisualizerState;
use crate::sort::SortVisualizerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizerKind {
    BasicArrayOperations,
    BubbleSort,
    LinearSearch,
}

/// How a visualizer produces its frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Model {
    /// Precomputed trace replayed by a cursor.
    Trace,
    /// Live array mutated by staged operations.
    DirectMutation,
}

/// A freshly built visualizer of any kind.
#[derive(Debug, Clone)]
pub enum AnyVisualizer {
    Array(ArrayVisualizerState),
    Sort(SortVisualizerState),
    Search(SearchVisualizerState),
}

impl AnyVisualizer {
    pub fn kind(&self) -> VisualizerKind {
        match self {
            AnyVisualizer::Array(_) => VisualizerKind::BasicArrayOperations,
            AnyVisualizer::Sort(_) => VisualizerKind::BubbleSort,
            AnyVisualizer::Search(_) => VisualizerKind::LinearSearch,
        }
    }
}

#[derive(Serialize)]
pub struct CatalogEntry {
    pub kind: VisualizerKind,
    /// Name shown in menus.
    pub label: &'static str,
    pub title: &'static str,
    /// Path segment used by the HTTP routes.
    pub route: &'static str,
    pub storage_key: &'static str,
    pub model: Model,
    pub algorithm: Option<Algorithm>,
    #[serde(skip)]
    pub factory: fn(&StoreConfig) -> AnyVisualizer,
}

fn build_array(config: &StoreConfig) -> AnyVisualizer {
    AnyVisualizer::Array(ArrayVisualizerState::new(config))
}

fn build_sort(config: &StoreConfig) -> AnyVisualizer {
    AnyVisualizer::Sort(SortVisualizerState::new(config))
}

fn build_search(config: &StoreConfig) -> AnyVisualizer {
    AnyVisualizer::Search(SearchVisualizerState::new(config))
}

pub static CATALOG: [CatalogEntry; 3] = [
    CatalogEntry {
        kind: VisualizerKind::BasicArrayOperations,
        label: "Basic Array Operations",
        title: "Basic Array Operations",
        route: "array",
        storage_key: "arrayVisualizer",
        model: Model::DirectMutation,
        algorithm: None,
        factory: build_array,
    },
    CatalogEntry {
        kind: VisualizerKind::BubbleSort,
        label: "Bubble Sort",
        title: "Bubble Sort Algorithm",
        route: "sort",
        storage_key: "bubbleSort",
        model: Model::Trace,
        algorithm: Some(Algorithm::BubbleSort),
        factory: build_sort,
    },
    CatalogEntry {
        kind: VisualizerKind::LinearSearch,
        label: "Linear Search",
        title: "Linear Search Algorithm",
        route: "search",
        storage_key: "linearSearch",
        model: Model::Trace,
        algorithm: Some(Algorithm::LinearSearch),
        factory: build_search,
    },
];

impl VisualizerKind {
    pub const ALL: [VisualizerKind; 3] = [
        VisualizerKind::BasicArrayOperations,
        VisualizerKind::BubbleSort,
        VisualizerKind::LinearSearch,
    ];

    pub fn entry(self) -> &'static CatalogEntry {
        match self {
            VisualizerKind::BasicArrayOperations => &CATALOG[0],
            VisualizerKind::BubbleSort => &CATALOG[1],
            VisualizerKind::LinearSearch => &CATALOG[2],
        }
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn route(self) -> &'static str {
        self.entry().route
    }

    pub fn storage_key(self) -> &'static str {
        self.entry().storage_key
    }

    pub fn build(self, config: &StoreConfig) -> AnyVisualizer {
        (self.entry().factory)(config)
    }

    pub fn from_route(route: &str) -> Option<Self> {
        CATALOG
            .iter()
            .find(|entry| entry.route == route)
            .map(|entry| entry.kind)
    }

    /// Resolve a menu label. Anything unrecognised falls back to the basic
    /// array operations visualizer.
    pub fn from_label(label: &str) -> Self {
        let wanted = label.trim();
        if let Some(entry) = CATALOG
            .iter()
            .find(|entry| entry.label.eq_ignore_ascii_case(wanted) || entry.route == wanted)
        {
            return entry.kind;
        }
        match wanted.parse::<Algorithm>() {
            Ok(Algorithm::BubbleSort) => VisualizerKind::BubbleSort,
            Ok(Algorithm::LinearSearch) => VisualizerKind::LinearSearch,
            Err(_) => {
                debug!(label, "unknown visualizer, using basic array operations");
                VisualizerKind::BasicArrayOperations
            }
        }
    }
}

impl fmt::Display for VisualizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
