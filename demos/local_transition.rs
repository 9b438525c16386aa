//! A composite state whose child is swapped by a local transition: the
//! composite stays entered, only the nested configuration changes.

use std::sync::Arc;

use statechart::{Instance, ModelBuilder, Observer, PseudoStateKind, TransitionKind};

struct Console;

impl Observer for Console {
    fn entered(&self, instance: &str, element: &str) {
        println!("{instance}: enter {element}");
    }

    fn left(&self, instance: &str, element: &str) {
        println!("{instance}: leave {element}");
    }

    fn transition(&self, instance: &str, transition: &str) {
        println!("{instance}: {transition}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder.pseudo_state("initial", root, PseudoStateKind::Initial)?;
    let state_a = builder.state("stateA", root);
    let initial_a = builder.pseudo_state("initialA", state_a, PseudoStateKind::Initial)?;
    let state_aa = builder.state("stateAA", state_a);
    let state_ab = builder.state("stateAB", state_a);

    builder.transition(initial).to(state_a);
    builder.transition(initial_a).to(state_aa);
    builder
        .transition(state_a)
        .on::<String>()
        .when(|t: &String| t == "move")
        .kind(TransitionKind::Local)
        .to(state_ab);

    let model = Arc::new(builder.build()?);
    let mut instance = Instance::with_observer("instance", Arc::clone(&model), Arc::new(Console))?;

    println!("--");
    instance.evaluate(String::from("move"))?;
    println!("--");
    println!(
        "stateA still active: {}, now in {}",
        instance.is_active(state_a),
        model.qualified_name_of(state_ab)
    );
    assert!(instance.is_active(state_ab));
    Ok(())
}
