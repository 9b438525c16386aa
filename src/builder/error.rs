//! Build errors for model construction.

use thiserror::Error;

/// Errors detected while declaring or validating a model.
///
/// A malformed model is rejected at build time wherever the defect is
/// statically visible; defects that depend on guard outcomes (an
/// unresolvable junction, say) surface at traversal time instead as
/// [`EvaluateError`](crate::runtime::EvaluateError).
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("region '{region}' already has starting pseudo-state '{existing}'")]
    DuplicateStartingVertex { region: String, existing: String },

    #[error("region '{region}' has no starting pseudo-state")]
    MissingStartingVertex { region: String },

    #[error("pseudo-state '{pseudo_state}' has no outgoing transition")]
    DanglingPseudoState { pseudo_state: String },

    #[error("junction '{junction}' participates in a transition cycle")]
    JunctionCycle { junction: String },

    #[error("internal transition source '{vertex}' must be a state")]
    InternalFromPseudoState { vertex: String },

    #[error("external transition from '{vertex}' targets its ancestor '{ancestor}'; use a local transition")]
    ExternalTargetIsAncestor { vertex: String, ancestor: String },
}
