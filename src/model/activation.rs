//! Per-transition exit/enter span strategies.
//!
//! Each transition's kind is resolved once, at build time, into an
//! [`Activation`]. External activations precompute the exact elements to
//! exit and enter using the lowest-common-ancestor rule; local activations
//! keep only their target because their boundary depends on which ancestor
//! is active when they are traversed; internal activations never change the
//! configuration at all.

use crate::model::element::{Element, ElementId, ElementKind};

pub(crate) enum Activation {
    External {
        /// The single element immediately below the common ancestor on the
        /// source's side.
        to_exit: ElementId,
        /// Elements strictly below the common ancestor on the target's
        /// side, outermost first.
        to_enter: Vec<ElementId>,
    },
    Local {
        target: ElementId,
    },
    Internal {
        source: ElementId,
    },
}

impl Activation {
    /// Precompute the span of an external transition.
    ///
    /// When the source lies on the target's own ancestry (including a
    /// self-transition) there is no element strictly between them on the
    /// source side, so the source itself is exited and re-entered.
    pub(crate) fn external(elements: &[Element], source: ElementId, target: ElementId) -> Self {
        let source_chain = ancestry(elements, source);
        let target_chain = ancestry(elements, target);

        let mut shared = 0;
        let max = source_chain.len().min(target_chain.len());
        while shared < max && source_chain[shared] == target_chain[shared] {
            shared += 1;
        }
        let from = shared.min(source_chain.len() - 1);

        // A history target is not entered itself: entering its region lets
        // the region's entry logic restore or default as appropriate.
        let to = target_chain.len() - usize::from(is_history(elements, target));

        Activation::External {
            to_exit: source_chain[from],
            to_enter: target_chain[from.min(to)..to].to_vec(),
        }
    }
}

/// The chain of elements from the root down to (and including) `element`.
pub(crate) fn ancestry(elements: &[Element], element: ElementId) -> Vec<ElementId> {
    let mut chain = Vec::new();
    let mut current = Some(element);
    while let Some(id) = current {
        chain.push(id);
        current = elements[id.index()].parent;
    }
    chain.reverse();
    chain
}

fn is_history(elements: &[Element], element: ElementId) -> bool {
    matches!(
        &elements[element.index()].kind,
        ElementKind::PseudoState(data) if data.kind.is_history()
    )
}
