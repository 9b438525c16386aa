//! End-to-end scenarios exercising transition semantics against running
//! instances.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use statechart::{
    EvaluateError, Instance, Model, ModelBuilder, Observer, PseudoStateKind, RecordingObserver,
    StateHandle, TraceKind, TransitionKind,
};

fn exits(observer: &RecordingObserver) -> Vec<String> {
    observer
        .records()
        .into_iter()
        .filter(|r| r.kind == TraceKind::Exit)
        .map(|r| r.subject)
        .collect()
}

fn entries(observer: &RecordingObserver) -> Vec<String> {
    observer
        .records()
        .into_iter()
        .filter(|r| r.kind == TraceKind::Entry)
        .map(|r| r.subject)
        .collect()
}

/// model -> stateA -> { stateAA, stateAB }, with a local transition on
/// "move" from stateA to stateAB.
fn local_model() -> (Arc<Model>, StateHandle, StateHandle, StateHandle) {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let state_a = builder.state("stateA", root);
    let initial_a = builder
        .pseudo_state("initialA", state_a, PseudoStateKind::Initial)
        .unwrap();
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

    (
        Arc::new(builder.build().unwrap()),
        state_a,
        state_aa,
        state_ab,
    )
}

#[test]
fn local_transition_replaces_the_child_without_leaving_the_composite() {
    let (model, state_a, state_aa, state_ab) = local_model();
    let observer = Arc::new(RecordingObserver::new());
    let mut instance =
        Instance::with_observer("i", Arc::clone(&model), Arc::clone(&observer) as Arc<dyn Observer>)
            .unwrap();

    assert!(instance.is_active(state_aa));
    observer.take();

    assert!(instance.evaluate(String::from("move")).unwrap());
    assert!(instance.is_active(state_a));
    assert!(instance.is_active(state_ab));
    assert!(!instance.is_active(state_aa));

    let exited = exits(observer.as_ref());
    assert!(exited.contains(&model.qualified_name_of(state_aa).to_string()));
    assert!(!exited.contains(&model.qualified_name_of(state_a).to_string()));
}

#[test]
fn local_transition_enters_an_inactive_composite_through_its_default_entry() {
    // the boundary of a local transition is resolved against the active
    // configuration: with the composite inactive, the walk stops at the
    // composite itself and entry proceeds from its initial pseudo-state
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let outside = builder.state("outside", root);
    let composite = builder.state("composite", root);
    let initial_c = builder
        .pseudo_state("initialC", composite, PseudoStateKind::Initial)
        .unwrap();
    let first = builder.state("first", composite);
    let second = builder.state("second", composite);

    builder.transition(initial).to(outside);
    builder.transition(initial_c).to(first);
    builder
        .transition(outside)
        .on::<String>()
        .kind(TransitionKind::Local)
        .to(second);

    let model = Arc::new(builder.build().unwrap());
    let mut instance = Instance::new("i", model).unwrap();

    assert!(instance.evaluate(String::from("in")).unwrap());
    assert!(instance.is_active(composite));
    assert!(instance.is_active(first));
    assert!(!instance.is_active(second));
    assert!(!instance.is_active(outside));
}

#[test]
fn local_self_transition_recycles_children_without_crossing_the_boundary() {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let composite = builder.state("composite", root);
    let initial_c = builder
        .pseudo_state("initialC", composite, PseudoStateKind::Initial)
        .unwrap();
    let first = builder.state("first", composite);
    let second = builder.state("second", composite);

    builder.transition(initial).to(composite);
    builder.transition(initial_c).to(first);
    builder
        .transition(first)
        .on::<String>()
        .when(|t: &String| t == "next")
        .to(second);
    builder
        .transition(composite)
        .on::<String>()
        .when(|t: &String| t == "reset")
        .kind(TransitionKind::Local)
        .to(composite);

    let model = Arc::new(builder.build().unwrap());
    let observer = Arc::new(RecordingObserver::new());
    let mut instance =
        Instance::with_observer("i", Arc::clone(&model), Arc::clone(&observer) as Arc<dyn Observer>)
            .unwrap();

    instance.evaluate(String::from("next")).unwrap();
    assert!(instance.is_active(second));
    observer.take();

    assert!(instance.evaluate(String::from("reset")).unwrap());
    assert!(instance.is_active(composite));
    assert!(instance.is_active(first));
    assert!(!instance.is_active(second));

    let exited = exits(observer.as_ref());
    assert!(exited.contains(&model.qualified_name_of(second).to_string()));
    assert!(!exited.contains(&model.qualified_name_of(composite).to_string()));
}

#[test]
fn external_transition_exits_innermost_first_and_enters_outermost_first() {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let s1 = builder.state("s1", root);
    let initial1 = builder
        .pseudo_state("initial1", s1, PseudoStateKind::Initial)
        .unwrap();
    let s11 = builder.state("s11", s1);
    let s2 = builder.state("s2", root);
    let initial2 = builder
        .pseudo_state("initial2", s2, PseudoStateKind::Initial)
        .unwrap();
    let s21 = builder.state("s21", s2);

    builder.transition(initial).to(s1);
    builder.transition(initial1).to(s11);
    builder.transition(initial2).to(s21);
    builder.transition(s11).on::<String>().to(s21);

    let model = Arc::new(builder.build().unwrap());
    let observer = Arc::new(RecordingObserver::new());
    let mut instance =
        Instance::with_observer("i", Arc::clone(&model), Arc::clone(&observer) as Arc<dyn Observer>)
            .unwrap();
    observer.take();

    assert!(instance.evaluate(String::from("go")).unwrap());

    let exited = exits(observer.as_ref());
    let s11_exit = exited
        .iter()
        .position(|n| n == model.qualified_name_of(s11))
        .unwrap();
    let s1_exit = exited
        .iter()
        .position(|n| n == model.qualified_name_of(s1))
        .unwrap();
    assert!(s11_exit < s1_exit);

    let entered = entries(observer.as_ref());
    let s2_entry = entered
        .iter()
        .position(|n| n == model.qualified_name_of(s2))
        .unwrap();
    let s21_entry = entered
        .iter()
        .position(|n| n == model.qualified_name_of(s21))
        .unwrap();
    assert!(s2_entry < s21_entry);
    assert!(instance.is_active(s21));
}

#[test]
fn self_transition_exits_and_reenters_the_state() {
    let entered = Arc::new(AtomicUsize::new(0));
    let exited = Arc::new(AtomicUsize::new(0));

    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let a = builder.state("a", root);
    builder.transition(initial).to(a);
    builder.transition(a).on::<String>().to(a);

    let entry_count = Arc::clone(&entered);
    builder.on_entry(a, move || {
        entry_count.fetch_add(1, Ordering::SeqCst);
    });
    let exit_count = Arc::clone(&exited);
    builder.on_exit(a, move || {
        exit_count.fetch_add(1, Ordering::SeqCst);
    });

    let model = Arc::new(builder.build().unwrap());
    let mut instance = Instance::new("i", model).unwrap();
    assert_eq!(entered.load(Ordering::SeqCst), 1);

    assert!(instance.evaluate(String::from("again")).unwrap());
    assert_eq!(exited.load(Ordering::SeqCst), 1);
    assert_eq!(entered.load(Ordering::SeqCst), 2);
    assert!(instance.is_active(a));
}

#[test]
fn internal_transition_runs_behaviour_without_exit_or_entry() {
    let count = Arc::new(AtomicUsize::new(0));

    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let a = builder.state("a", root);
    builder.transition(initial).to(a);
    let counter = Arc::clone(&count);
    builder
        .transition(a)
        .on::<u32>()
        .action(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .internal();

    let model = Arc::new(builder.build().unwrap());
    let observer = Arc::new(RecordingObserver::new());
    let mut instance =
        Instance::with_observer("i", Arc::clone(&model), Arc::clone(&observer) as Arc<dyn Observer>)
            .unwrap();
    observer.take();

    assert!(instance.evaluate(7u32).unwrap());
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(instance.is_active(a));
    assert!(exits(observer.as_ref()).is_empty());
    assert!(entries(observer.as_ref()).is_empty());
}

#[test]
fn shallow_history_restores_the_last_active_child() {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let s1 = builder.state("s1", root);
    let history = builder
        .pseudo_state("history", s1, PseudoStateKind::ShallowHistory)
        .unwrap();
    let s11 = builder.state("s11", s1);
    let s12 = builder.state("s12", s1);
    let s2 = builder.state("s2", root);

    builder.transition(initial).to(s1);
    builder.transition(history).to(s11);
    builder
        .transition(s11)
        .on::<String>()
        .when(|t: &String| t == "next")
        .to(s12);
    builder
        .transition(s1)
        .on::<String>()
        .when(|t: &String| t == "out")
        .to(s2);
    builder
        .transition(s2)
        .on::<String>()
        .when(|t: &String| t == "back")
        .to(s1);

    let model = Arc::new(builder.build().unwrap());
    let mut instance = Instance::new("i", model).unwrap();

    assert!(instance.is_active(s11));
    instance.evaluate(String::from("next")).unwrap();
    instance.evaluate(String::from("out")).unwrap();
    assert!(instance.is_active(s2));

    instance.evaluate(String::from("back")).unwrap();
    assert!(instance.is_active(s12));
    assert!(!instance.is_active(s11));
}

/// Two nesting levels; only the outer region starts at the given history
/// kind. Deep history cascades restoration to the inner region, shallow
/// history lets it fall back to its initial pseudo-state.
fn nested_history_model(
    kind: PseudoStateKind,
) -> (Arc<Model>, StateHandle, StateHandle, StateHandle) {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let s1 = builder.state("s1", root);
    let history = builder.pseudo_state("history", s1, kind).unwrap();
    let s11 = builder.state("s11", s1);
    let initial11 = builder
        .pseudo_state("initial11", s11, PseudoStateKind::Initial)
        .unwrap();
    let s111 = builder.state("s111", s11);
    let s112 = builder.state("s112", s11);
    let s2 = builder.state("s2", root);

    builder.transition(initial).to(s1);
    builder.transition(history).to(s11);
    builder.transition(initial11).to(s111);
    builder
        .transition(s111)
        .on::<String>()
        .when(|t: &String| t == "step")
        .to(s112);
    builder
        .transition(s1)
        .on::<String>()
        .when(|t: &String| t == "out")
        .to(s2);
    builder
        .transition(s2)
        .on::<String>()
        .when(|t: &String| t == "back")
        .to(s1);

    (Arc::new(builder.build().unwrap()), s11, s111, s112)
}

#[test]
fn deep_history_cascades_restoration_to_nested_regions() {
    let (model, s11, _s111, s112) = nested_history_model(PseudoStateKind::DeepHistory);
    let mut instance = Instance::new("i", model).unwrap();

    instance.evaluate(String::from("step")).unwrap();
    instance.evaluate(String::from("out")).unwrap();
    instance.evaluate(String::from("back")).unwrap();

    assert!(instance.is_active(s11));
    assert!(instance.is_active(s112));
}

#[test]
fn shallow_history_leaves_nested_regions_to_their_default_entry() {
    let (model, s11, s111, s112) = nested_history_model(PseudoStateKind::ShallowHistory);
    let mut instance = Instance::new("i", model).unwrap();

    instance.evaluate(String::from("step")).unwrap();
    instance.evaluate(String::from("out")).unwrap();
    instance.evaluate(String::from("back")).unwrap();

    assert!(instance.is_active(s11));
    assert!(instance.is_active(s111));
    assert!(!instance.is_active(s112));
}

#[test]
fn completion_transition_fires_without_an_external_trigger() {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let working = builder.state("working", root);
    let initial_w = builder
        .pseudo_state("initialW", working, PseudoStateKind::Initial)
        .unwrap();
    let done = builder.state("done", working);
    let finished = builder.state("finished", root);

    builder.transition(initial).to(working);
    builder.transition(initial_w).to(done);
    // no trigger type: matches the synthetic completion trigger
    builder.transition(working).to(finished);

    let model = Arc::new(builder.build().unwrap());
    let instance = Instance::new("i", model).unwrap();

    // `done` is final, so `working` completes during initial entry
    assert!(instance.is_active(finished));
    assert!(!instance.is_active(working));
}

#[test]
fn junction_chain_executes_as_one_atomic_hop_sequence() {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let a = builder.state("a", root);
    let j1 = builder
        .pseudo_state("j1", root, PseudoStateKind::Junction)
        .unwrap();
    let j2 = builder
        .pseudo_state("j2", root, PseudoStateKind::Junction)
        .unwrap();
    let b = builder.state("b", root);

    builder.transition(initial).to(a);
    builder.transition(a).on::<String>().to(j1);
    builder.transition(j1).to(j2);
    builder.transition(j2).to(b);

    let model = Arc::new(builder.build().unwrap());
    let observer = Arc::new(RecordingObserver::new());
    let mut instance =
        Instance::with_observer("i", Arc::clone(&model), Arc::clone(&observer) as Arc<dyn Observer>)
            .unwrap();
    observer.take();

    assert!(instance.evaluate(String::from("go")).unwrap());
    assert!(instance.is_active(b));

    // all three hops appear, source-to-target
    let hops: Vec<String> = observer
        .records()
        .into_iter()
        .filter(|r| r.kind == TraceKind::Transition)
        .map(|r| r.subject)
        .collect();
    assert_eq!(hops.len(), 3);
    assert!(hops[0].ends_with("model.j1"));
    assert!(hops[1].ends_with("model.j2"));
    assert!(hops[2].ends_with("model.b"));
}

#[test]
fn choice_selects_among_guarded_transitions_at_entry() {
    fn build() -> (Arc<Model>, StateHandle, StateHandle) {
        let mut builder = ModelBuilder::new("model");
        let root = builder.root();
        let initial = builder
            .pseudo_state("initial", root, PseudoStateKind::Initial)
            .unwrap();
        let a = builder.state("a", root);
        let choice = builder
            .pseudo_state("choice", root, PseudoStateKind::Choice)
            .unwrap();
        let big = builder.state("big", root);
        let small = builder.state("small", root);

        builder.transition(initial).to(a);
        builder.transition(a).on::<u32>().to(choice);
        builder.transition(choice).when(|n: &u32| *n > 10).to(big);
        builder.transition(choice).to(small);

        (Arc::new(builder.build().unwrap()), big, small)
    }

    let (model, big, _) = build();
    let mut instance = Instance::new("i", model).unwrap();
    assert!(instance.evaluate(42u32).unwrap());
    assert!(instance.is_active(big));

    let (model, _, small) = build();
    let mut instance = Instance::new("i", model).unwrap();
    assert!(instance.evaluate(5u32).unwrap());
    assert!(instance.is_active(small));
}

#[test]
fn orthogonal_regions_each_consume_the_same_trigger() {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let split = builder.state("split", root);
    builder.transition(initial).to(split);

    let r1 = builder.region("r1", split);
    let initial1 = builder
        .pseudo_state_in("initial1", r1, PseudoStateKind::Initial)
        .unwrap();
    let a1 = builder.state_in("a1", r1);
    let b1 = builder.state_in("b1", r1);
    builder.transition(initial1).to(a1);
    builder.transition(a1).on::<String>().to(b1);

    let r2 = builder.region("r2", split);
    let initial2 = builder
        .pseudo_state_in("initial2", r2, PseudoStateKind::Initial)
        .unwrap();
    let a2 = builder.state_in("a2", r2);
    let b2 = builder.state_in("b2", r2);
    builder.transition(initial2).to(a2);
    builder.transition(a2).on::<String>().to(b2);

    let model = Arc::new(builder.build().unwrap());
    let mut instance = Instance::new("i", model).unwrap();

    assert!(instance.is_active(a1));
    assert!(instance.is_active(a2));

    assert!(instance.evaluate(String::from("go")).unwrap());
    assert!(instance.is_active(b1));
    assert!(instance.is_active(b2));
}

#[test]
fn entering_a_deep_vertex_activates_the_sibling_regions_independently() {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let outside = builder.state("outside", root);
    let split = builder.state("split", root);
    builder.transition(initial).to(outside);

    let r1 = builder.region("r1", split);
    let initial1 = builder
        .pseudo_state_in("initial1", r1, PseudoStateKind::Initial)
        .unwrap();
    let a1 = builder.state_in("a1", r1);
    let b1 = builder.state_in("b1", r1);
    builder.transition(initial1).to(a1);

    let r2 = builder.region("r2", split);
    let initial2 = builder
        .pseudo_state_in("initial2", r2, PseudoStateKind::Initial)
        .unwrap();
    let a2 = builder.state_in("a2", r2);
    builder.transition(initial2).to(a2);

    // targets a vertex deep inside r1, bypassing r1's initial
    builder.transition(outside).on::<String>().to(b1);

    let model = Arc::new(builder.build().unwrap());
    let mut instance = Instance::new("i", model).unwrap();

    assert!(instance.evaluate(String::from("go")).unwrap());
    assert!(instance.is_active(split));
    assert!(instance.is_active(b1));
    assert!(!instance.is_active(a1));
    // the sibling region came up through its own default entry
    assert!(instance.is_active(a2));
}

#[test]
fn deferred_trigger_is_redelivered_after_the_next_transition() {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let waiting = builder.state("waiting", root);
    let ready = builder.state("ready", root);
    let done = builder.state("done", root);

    builder.transition(initial).to(waiting);
    builder.defer_trigger::<u32>(waiting);
    builder.transition(waiting).on::<String>().to(ready);
    builder.transition(ready).on::<u32>().to(done);

    let model = Arc::new(builder.build().unwrap());
    let mut instance = Instance::new("i", model).unwrap();

    // nothing handles u32 in `waiting`; it is absorbed, not dropped
    assert!(instance.evaluate(7u32).unwrap());
    assert!(instance.is_active(waiting));
    assert_eq!(instance.deferred_len(), 1);

    // the transition to `ready` makes the pooled u32 deliverable
    assert!(instance.evaluate(String::from("go")).unwrap());
    assert!(instance.is_active(done));
    assert_eq!(instance.deferred_len(), 0);
}

#[test]
fn unconsumed_deferred_triggers_are_discarded_on_redelivery() {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let waiting = builder.state("waiting", root);
    let ready = builder.state("ready", root);

    builder.transition(initial).to(waiting);
    builder.defer_trigger::<u32>(waiting);
    builder.transition(waiting).on::<String>().to(ready);

    let model = Arc::new(builder.build().unwrap());
    let mut instance = Instance::new("i", model).unwrap();

    assert!(instance.evaluate(7u32).unwrap());
    assert_eq!(instance.deferred_len(), 1);

    // `ready` neither handles nor defers u32
    assert!(instance.evaluate(String::from("go")).unwrap());
    assert!(instance.is_active(ready));
    assert_eq!(instance.deferred_len(), 0);
}

#[test]
fn terminate_stops_the_instance_reacting() {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let a = builder.state("a", root);
    let b = builder.state("b", root);
    let terminate = builder
        .pseudo_state("terminate", root, PseudoStateKind::Terminate)
        .unwrap();

    builder.transition(initial).to(a);
    builder
        .transition(a)
        .on::<String>()
        .when(|t: &String| t == "stop")
        .to(terminate);
    builder
        .transition(a)
        .on::<String>()
        .when(|t: &String| t == "go")
        .to(b);

    let model = Arc::new(builder.build().unwrap());
    let mut instance = Instance::new("i", model).unwrap();

    assert!(instance.evaluate(String::from("stop")).unwrap());
    assert!(instance.is_terminated());

    assert!(!instance.evaluate(String::from("go")).unwrap());
    assert!(!instance.is_active(b));
}

#[test]
fn failing_action_aborts_evaluation_with_partial_configuration() {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let a = builder.state("a", root);
    let b = builder.state("b", root);

    builder.transition(initial).to(a);
    builder
        .transition(a)
        .on::<String>()
        .try_action(|| Err("effect failed".into()))
        .to(b);

    let exited_a = Arc::new(AtomicUsize::new(0));
    let exit_count = Arc::clone(&exited_a);
    builder.on_exit(a, move || {
        exit_count.fetch_add(1, Ordering::SeqCst);
    });
    let entered_b = Arc::new(AtomicUsize::new(0));
    let entry_count = Arc::clone(&entered_b);
    builder.on_entry(b, move || {
        entry_count.fetch_add(1, Ordering::SeqCst);
    });

    let model = Arc::new(builder.build().unwrap());
    let mut instance = Instance::new("i", model).unwrap();

    let result = instance.evaluate(String::from("go"));
    assert!(matches!(result, Err(EvaluateError::Action { .. })));

    // the source was exited before the effect ran, the target was never
    // entered; no rollback
    assert_eq!(exited_a.load(Ordering::SeqCst), 1);
    assert_eq!(entered_b.load(Ordering::SeqCst), 0);
}

#[test]
fn first_declared_matching_transition_wins() {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let a = builder.state("a", root);
    let b = builder.state("b", root);
    let c = builder.state("c", root);

    builder.transition(initial).to(a);
    builder.transition(a).on::<String>().to(b);
    builder.transition(a).on::<String>().to(c);

    let model = Arc::new(builder.build().unwrap());
    let mut instance = Instance::new("i", model).unwrap();

    assert!(instance.evaluate(String::from("go")).unwrap());
    assert!(instance.is_active(b));
    assert!(!instance.is_active(c));
}

#[test]
fn inner_state_shadows_its_ancestors_for_the_same_trigger() {
    let mut builder = ModelBuilder::new("model");
    let root = builder.root();
    let initial = builder
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let outer = builder.state("outer", root);
    let initial_o = builder
        .pseudo_state("initialO", outer, PseudoStateKind::Initial)
        .unwrap();
    let inner_a = builder.state("innerA", outer);
    let inner_b = builder.state("innerB", outer);
    let elsewhere = builder.state("elsewhere", root);

    builder.transition(initial).to(outer);
    builder.transition(initial_o).to(inner_a);
    builder.transition(inner_a).on::<String>().to(inner_b);
    builder.transition(outer).on::<String>().to(elsewhere);

    let model = Arc::new(builder.build().unwrap());
    let mut instance = Instance::new("i", model).unwrap();

    // depth-first delegation: the child consumes the trigger first
    assert!(instance.evaluate(String::from("go")).unwrap());
    assert!(instance.is_active(inner_b));
    assert!(instance.is_active(outer));
    assert!(!instance.is_active(elsewhere));
}
