use thiserror::Error;

/// A collaborator the controller needed was not there; the dependent behaviour is skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissingDependency {
    #[error("no {0} clip is configured")]
    Clip(&'static str),
    #[error("the {0} clip could not be played")]
    ClipUnavailable(&'static str),
    #[error("bone `{0}` was not found in the skeleton")]
    Bone(String),
}

/// Why a root-motion request was ignored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RootMotionRejected {
    #[error("root motion is already playing")]
    AlreadyActive,
    #[error(transparent)]
    Missing(#[from] MissingDependency),
}
