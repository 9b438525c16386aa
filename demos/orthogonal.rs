//! Orthogonal regions: two independent sub-machines inside one state, each
//! consuming the same trigger, with a completion transition firing once
//! both reach a final state.

use std::sync::Arc;

use statechart::{Instance, ModelBuilder, Observer, PseudoStateKind};

struct Console;

impl Observer for Console {
    fn transition(&self, instance: &str, transition: &str) {
        println!("{instance}: {transition}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut builder = ModelBuilder::new("review");
    let root = builder.root();
    let initial = builder.pseudo_state("initial", root, PseudoStateKind::Initial)?;
    let voting = builder.state("voting", root);
    let published = builder.state("published", root);

    builder.transition(initial).to(voting);

    let editors = builder.region("editors", voting);
    let e_initial = builder.pseudo_state_in("initial", editors, PseudoStateKind::Initial)?;
    let e_pending = builder.state_in("pending", editors);
    let e_approved = builder.state_in("approved", editors);
    builder.transition(e_initial).to(e_pending);
    builder
        .transition(e_pending)
        .on::<String>()
        .when(|t: &String| t == "approve")
        .to(e_approved);

    let legal = builder.region("legal", voting);
    let l_initial = builder.pseudo_state_in("initial", legal, PseudoStateKind::Initial)?;
    let l_pending = builder.state_in("pending", legal);
    let l_cleared = builder.state_in("cleared", legal);
    builder.transition(l_initial).to(l_pending);
    builder
        .transition(l_pending)
        .on::<String>()
        .when(|t: &String| t == "approve")
        .to(l_cleared);

    // completion: fires once both regions sit on a final state
    builder.transition(voting).to(published);

    let model = Arc::new(builder.build()?);
    let mut instance = Instance::with_observer("article", Arc::clone(&model), Arc::new(Console))?;

    instance.evaluate(String::from("approve"))?;
    assert!(instance.is_active(published));
    println!("published: {}", instance.is_active(published));
    Ok(())
}
