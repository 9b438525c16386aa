//! Deep history: leaving a composite and returning restores the nested
//! configuration exactly as it was.

use std::sync::Arc;

use statechart::{Instance, ModelBuilder, Observer, PseudoStateKind};

struct Console;

impl Observer for Console {
    fn entered(&self, instance: &str, element: &str) {
        println!("{instance}: enter {element}");
    }

    fn left(&self, instance: &str, element: &str) {
        println!("{instance}: leave {element}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut builder = ModelBuilder::new("player");
    let root = builder.root();
    let initial = builder.pseudo_state("initial", root, PseudoStateKind::Initial)?;
    let operational = builder.state("operational", root);
    let history = builder.pseudo_state("history", operational, PseudoStateKind::DeepHistory)?;
    let stopped = builder.state("stopped", operational);
    let running = builder.state("running", operational);
    let flipped = builder.state("flipped", root);

    builder.transition(initial).to(operational);
    builder.transition(history).to(stopped);
    builder
        .transition(stopped)
        .on::<String>()
        .when(|t: &String| t == "play")
        .to(running);
    builder
        .transition(operational)
        .on::<String>()
        .when(|t: &String| t == "flip")
        .to(flipped);
    builder
        .transition(flipped)
        .on::<String>()
        .when(|t: &String| t == "flip")
        .to(operational);

    let model = Arc::new(builder.build()?);
    let mut instance = Instance::with_observer("deck", Arc::clone(&model), Arc::new(Console))?;

    instance.evaluate(String::from("play"))?;
    instance.evaluate(String::from("flip"))?;
    instance.evaluate(String::from("flip"))?;

    // back in `running`, not `stopped`: history restored the configuration
    assert!(instance.is_active(running));
    println!("restored to {}", model.qualified_name_of(running));
    Ok(())
}
