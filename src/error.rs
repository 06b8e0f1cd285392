// Manifest-stage error taxonomy. Any of these aborts the run.

/// Collection inside a manifest that must hold at least one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    Sequences,
    Canvases,
    /// The `images` list of the canvas with this id.
    Images(String),
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collection::Sequences => write!(f, "sequences"),
            Collection::Canvases => write!(f, "canvases of the first sequence"),
            Collection::Images(canvas) => write!(f, "images of canvas {canvas}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to fetch manifest {uri}: {reason}")]
    Fetch { uri: String, reason: String },

    #[error("Invalid IIIF manifest {uri}: {reason}")]
    Parse { uri: String, reason: String },

    #[error("Manifest {uri} has no {collection}")]
    EmptyCollection { uri: String, collection: Collection },
}
