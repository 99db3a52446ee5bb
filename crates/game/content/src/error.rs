//! Loader failures.

/// Everything that can go wrong while loading authored content.
///
/// All variants are load-time: once a catalog is built, every name in it has
/// been validated against the core enumerations.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse ability catalog: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("ability `{ability}` names unknown status `{status}`")]
    UnknownStatus { ability: String, status: String },

    #[error("ability `{ability}` names unknown damage style `{style}`")]
    UnknownStyle { ability: String, style: String },

    #[error("ability `{ability}` names unknown target filter `{filter}`")]
    UnknownFilter { ability: String, filter: String },

    #[error("ability `{ability}` inflicts engine-managed status `{status}`")]
    VitalMarkerInflict { ability: String, status: String },

    #[error("duplicate ability `{0}`")]
    DuplicateAbility(String),
}
