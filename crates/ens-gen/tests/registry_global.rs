use std::sync::{Arc, Barrier};
use std::thread;

use ens_core::{EnsError, Selection};
use ens_gen::{
    global, materialize, register_combination_strategy, register_permutation_strategy,
    EnsembleConfig, SandboxedCombination, SandboxedPermutation, StepValues, ALL_PERM, RANDOM,
    STEP,
};

#[test]
fn builtins_are_preregistered() {
    let names = global().permutations.names();
    for name in [ALL_PERM, STEP, RANDOM] {
        assert!(names.iter().any(|n| n == name), "{names:?}");
        assert!(global().combinations.contains(name));
    }
}

#[test]
fn builtin_names_cannot_be_replaced() {
    let err = register_permutation_strategy(ALL_PERM, StepValues).unwrap_err();
    assert!(matches!(err, EnsError::DuplicateStrategy(_)));
    assert_eq!(err.info().context["strategy"], ALL_PERM);
}

#[test]
fn concurrent_registration_admits_exactly_one() {
    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                register_permutation_strategy("raced", StepValues).is_ok()
            })
        })
        .collect();
    let winners = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread"))
        .filter(|won| *won)
        .count();
    assert_eq!(winners, 1);
}

#[test]
fn registered_names_resolve_during_materialization() {
    register_permutation_strategy(
        "last_value",
        SandboxedPermutation::new("last_value", |shape, _, _| {
            let last = shape.sizes().iter().map(|size| size.saturating_sub(1)).collect();
            Ok(vec![Selection::new(last)])
        }),
    )
    .expect("register permutation");
    register_combination_strategy(
        "exe_only",
        SandboxedCombination::new("exe_only", |_, exe_args, _, _| {
            Ok(exe_args
                .iter()
                .cloned()
                .map(|exe| ens_core::ParamSet::new(Default::default(), exe))
                .collect())
        }),
    )
    .expect("register combination");

    let config = EnsembleConfig::new("custom", "echo")
        .with_file_parameters(Some(
            [("A".to_string(), vec!["1".to_string(), "2".to_string()])]
                .into_iter()
                .collect(),
        ))
        .with_exe_arg_parameters(Some(
            [("B".to_string(), vec![vec!["x".to_string()], vec!["y".to_string()]])]
                .into_iter()
                .collect(),
        ))
        .with_permutation_strategy("last_value")
        .with_combination_strategy("exe_only");
    let members = materialize(&config, 0).expect("materialize");
    assert_eq!(members.len(), 1);
    assert!(members[0].params.file_params.is_empty());
    assert_eq!(members[0].params.exe_args["B"], ["y"]);
}

#[test]
fn custom_permutation_name_defaults_to_all_perm_combination() {
    register_permutation_strategy("first_values", StepValues).expect("register");
    let config = EnsembleConfig::new("defaulted", "echo")
        .with_file_parameters(Some(
            [("A".to_string(), vec!["1".to_string(), "2".to_string()])]
                .into_iter()
                .collect(),
        ))
        .with_exe_arg_parameters(Some(
            [("B".to_string(), vec![vec!["x".to_string()], vec!["y".to_string()]])]
                .into_iter()
                .collect(),
        ))
        .with_permutation_strategy("first_values");
    // step on each axis, then the all_perm product
    assert_eq!(materialize(&config, 0).expect("materialize").len(), 4);
}
