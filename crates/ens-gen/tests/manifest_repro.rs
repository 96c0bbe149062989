use ens_gen::{
    build_manifest, from_json_slice, materialize, stable_hash_string, to_canonical_json_bytes,
    EnsembleConfig, Manifest,
};

const CONFIG: &str = r#"
name: repro
exe: python
exe_args: [run.py]
file_parameters:
  lr: ["0.1", "0.01"]
  depth: ["2", "4", "8"]
exe_arg_parameters:
  mode: [[--train], [--eval, --fast]]
  device: [[--cpu], [--gpu]]
permutation_strategy: random
max_permutations: 4
replicas: 2
"#;

const SWAPPED: &str = r#"
name: repro
exe: python
exe_args: [run.py]
file_parameters:
  depth: ["2", "4", "8"]
  lr: ["0.1", "0.01"]
exe_arg_parameters:
  device: [[--cpu], [--gpu]]
  mode: [[--train], [--eval, --fast]]
permutation_strategy: random
max_permutations: 4
replicas: 2
"#;

fn manifest_for(text: &str, seed: u64) -> Manifest {
    let config = EnsembleConfig::from_yaml_str(text).expect("config");
    let members = materialize(&config, seed).expect("members");
    build_manifest(&config, seed, members).expect("manifest")
}

#[test]
fn manifest_repeats_for_a_seed() {
    let manifest_a = manifest_for(CONFIG, 99);
    let manifest_b = manifest_for(CONFIG, 99);
    assert_eq!(manifest_a, manifest_b);
    assert_eq!(manifest_a.members.len(), 8);
    let bytes_a = to_canonical_json_bytes(&manifest_a).expect("json");
    let bytes_b = to_canonical_json_bytes(&manifest_b).expect("json");
    assert_eq!(bytes_a, bytes_b);
}

#[test]
fn decoded_manifest_keeps_parameter_order() {
    let manifest = manifest_for(CONFIG, 5);
    let bytes = to_canonical_json_bytes(&manifest).expect("json");
    let restored: Manifest = from_json_slice(&bytes).expect("decode");
    assert_eq!(restored.members.len(), manifest.members.len());
    for (restored, original) in restored.members.iter().zip(&manifest.members) {
        assert_eq!(restored.command_args(), original.command_args());
        let restored_exe: Vec<_> = restored.params.exe_args.keys().collect();
        assert_eq!(restored_exe, ["mode", "device"]);
        let restored_files: Vec<_> = restored.params.file_params.keys().collect();
        assert_eq!(restored_files, ["lr", "depth"]);
        assert_eq!(restored.files.params.keys().collect::<Vec<_>>(), ["lr", "depth"]);
    }
    assert_eq!(to_canonical_json_bytes(&restored).expect("json"), bytes);
}

#[test]
fn declaration_order_changes_plan_hash() {
    let declared = manifest_for(CONFIG, 5);
    let swapped = manifest_for(SWAPPED, 5);
    assert_ne!(declared.plan_hash, swapped.plan_hash);
    let declared_args = declared.members[0].command_args();
    assert_eq!(declared_args[0], "run.py");
    assert!(declared_args[1] == "--train" || declared_args[1] == "--eval");
    let swapped_args = swapped.members[0].command_args();
    assert!(swapped_args[1] == "--cpu" || swapped_args[1] == "--gpu");
}

#[test]
fn plan_hash_tracks_seed_and_config() {
    let config = EnsembleConfig::from_yaml_str(CONFIG).expect("config");
    let base = stable_hash_string(&(&config, 1u64)).expect("hash");
    assert_eq!(base, stable_hash_string(&(&config, 1u64)).expect("hash"));
    assert_ne!(base, stable_hash_string(&(&config, 2u64)).expect("hash"));
    let other = config.clone().with_replicas(3);
    assert_ne!(base, stable_hash_string(&(&other, 1u64)).expect("hash"));
    assert_eq!(base.len(), 64);
}

#[test]
fn json_and_yaml_configs_agree() {
    let yaml = EnsembleConfig::from_yaml_str(CONFIG).expect("yaml");
    let json = serde_json::to_string(&yaml).expect("encode");
    let parsed = EnsembleConfig::from_json_str(&json).expect("json");
    assert_eq!(
        stable_hash_string(&parsed).expect("hash"),
        stable_hash_string(&yaml).expect("hash")
    );
}
