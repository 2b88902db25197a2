//! Static insight shown when the service is unavailable

use cantilever_ipc::Insight;

const FALLBACK_TITLE: &str = "Modernist Concrete Cantilever";

const FALLBACK_DESCRIPTION: &str = "This structure exemplifies contemporary minimalist architecture, utilizing reinforced concrete slabs to create dramatic cantilevers. The interplay of floor-to-ceiling glass and rigid stone textures dissolves the barrier between the interior living spaces and the external environment.";

const FALLBACK_FEATURES: [&str; 4] = [
    "Floating geometric volumes",
    "Passive solar design via glass orientation",
    "Infinity edge pool integration",
    "Minimalist material palette",
];

/// The fixed fallback record, identical on every call
pub fn fallback_insight() -> Insight {
    Insight {
        title: FALLBACK_TITLE.to_string(),
        description: FALLBACK_DESCRIPTION.to_string(),
        features: FALLBACK_FEATURES.iter().map(|f| f.to_string()).collect(),
    }
}
