//! Runtime errors raised during trigger evaluation.

use thiserror::Error;

use crate::model::transition::ActionError;

/// Errors raised while evaluating a trigger against an instance.
///
/// Structural variants mean the model is malformed in a way only visible at
/// traversal time; they cannot be repaired at runtime. `Action` carries a
/// user callback failure. In every case the instance is left exactly as far
/// as evaluation had progressed; there is no rollback.
#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error("no starting vertex resolvable for region '{region}'")]
    NoStartingVertex { region: String },

    #[error("region '{region}' has no active vertex to leave")]
    NoActiveVertex { region: String },

    #[error("junction '{junction}' has no transition matching the current trigger")]
    UnresolvedJunction { junction: String },

    #[error("junction chain through '{junction}' does not terminate")]
    JunctionCycle { junction: String },

    #[error("behaviour of '{element}' failed: {source}")]
    Action {
        element: String,
        #[source]
        source: ActionError,
    },
}
