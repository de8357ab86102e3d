//! End-to-end integration tests across the engine and the stock classes
//!
//! Mappings arrive the way callers load them: parsed from YAML or JSON text,
//! then resolved through the catalogue and read back through typed views.

use opts_catalog::{AFLR3Opts, KeyDefnOpts, Options, RunControlOpts, RunMatrixOpts, ULimitOpts};
use opts_core::{Error, OptionsView, Value};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

const CASE_YAML: &str = r#"
NSubmit: 2
ShellCmds: module load cart3d
RunControl:
  PhaseSequence: [0, 1, 2]
  PhaseIters: [0, 500, 1000]
  nIter: [200, 100]
  MPI: true
  nProc: 64
  Environ:
    OMP_NUM_THREADS: 8
    F_UFMTENDIAN: big
  ulimit:
    s: unlimited
    c: 0
  aflr3:
    i: pyfun.surf
    mdf: 2
    blr: 1.2
  verify: false
RunMatrix:
  File: matrix.csv
  Keys: [mach, alpha, beta, p_inlet, T_inlet]
  Defns:
    p_inlet:
      Type: SurfBC
      CompID: inlet
      TotalPressure: p_inlet
      TotalTemperature: T_inlet
    T_inlet:
      Type: value
      Format: "%.1f"
"#;

fn parse_yaml(text: &str) -> Value {
    serde_yaml::from_str(text).expect("valid YAML")
}

fn case() -> Options {
    let data = parse_yaml(CASE_YAML);
    opts_catalog::isolate::<Options>(&data, &[]).expect("case resolves")
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_yaml_case_resolves_fully() {
    let opts = case();
    assert_eq!(opts.class_name(), "Options");
    assert_eq!(opts.nsubmit(None), Some(&json!(2)));
    assert_eq!(opts.shell_cmds(Some(0)), Some(&json!("module load cart3d")));
    assert_eq!(opts.shell_cmds(None), Some(&json!(["module load cart3d"])));
}

#[test]
fn test_yaml_and_json_agree() {
    let from_yaml = case();
    let json_text = serde_json::to_string(&parse_yaml(CASE_YAML)).unwrap();
    let from_json: Value = serde_json::from_str(&json_text).unwrap();
    let from_json = opts_catalog::build("Options", from_json).unwrap();
    assert_eq!(from_yaml.node(), &from_json);
}

#[test]
fn test_export_round_trip() {
    let opts = case();
    let exported = serde_json::to_value(opts.node()).unwrap();
    assert_eq!(exported, opts.to_mapping());
    let rebuilt = opts_catalog::build("Options", exported).unwrap();
    assert_eq!(opts.node(), &rebuilt);
}

// ============================================================================
// RunControl
// ============================================================================

#[test]
fn test_run_control_phases() {
    let rc = case().run_control().unwrap();
    assert_eq!(rc.phase_count(), 3);
    assert_eq!(rc.last_phase(), Some(2));
    assert_eq!(rc.phase_iter(1), Some(500));
    assert_eq!(rc.phase_iter(9), Some(1000));
    assert_eq!(rc.n_iter(Some(0)), Some(&json!(200)));
    assert_eq!(rc.n_iter(Some(2)), Some(&json!(100)));
}

#[rstest]
#[case(None)]
#[case(Some(0))]
#[case(Some(5))]
fn test_run_control_scalars_ignore_phase(#[case] j: Option<i64>) {
    let rc = case().run_control().unwrap();
    assert_eq!(rc.mpi(j), Some(&json!(true)));
    assert_eq!(rc.n_proc(j), Some(&json!(64)));
}

#[test]
fn test_environ_accepts_any_variable() {
    let rc = case().run_control().unwrap();
    let environ = rc.section("Environ").unwrap();
    assert_eq!(environ.get("OMP_NUM_THREADS"), Some(&json!(8)));
    assert_eq!(environ.get("F_UFMTENDIAN"), Some(&json!("big")));
}

#[test]
fn test_ulimit_from_partial_path() {
    let rc: RunControlOpts = case().run_control().unwrap();
    let ulimit: ULimitOpts = rc.ulimit().unwrap();
    assert_eq!(ulimit.stack_size(None), Some(&json!("unlimited")));
    assert_eq!(ulimit.core_file_size(None), Some(&json!(0)));
    assert_eq!(ulimit.get_ulimit("n", 0), None);
}

#[test]
fn test_aflr3_settings() {
    let mut aflr3: AFLR3Opts = case().run_control().unwrap().aflr3().unwrap();
    assert_eq!(aflr3.aflr3_run(None), Some(&json!(true)));
    assert_eq!(aflr3.aflr3_mdf(None), Some(&json!(2)));
    assert_eq!(aflr3.aflr3_blr(None), Some(&json!(1.2)));

    aflr3.set_aflr3_key("cdfr", 1.1).unwrap();
    aflr3.set_aflr3_flag("blc", true).unwrap();
    assert_eq!(aflr3.aflr3_key("cdfr"), Some(&json!(1.1)));
    assert_eq!(aflr3.aflr3_flag("blc"), Some(&json!(true)));
}

#[test]
fn test_program_disabled_by_boolean() {
    let rc = case().run_control().unwrap();
    let verify = rc.get_section(&["verify"]).unwrap();
    assert_eq!(verify.get("run"), Some(&json!(false)));
    // untouched programs stay off
    let intersect = rc.get_section(&["intersect"]).unwrap();
    assert_eq!(intersect.get("run"), Some(&json!(false)));
}

// ============================================================================
// RunMatrix
// ============================================================================

#[test]
fn test_run_matrix_definitions_by_type() {
    let rm: RunMatrixOpts = case().run_matrix().unwrap();
    assert_eq!(rm.key_names(), vec!["mach", "alpha", "beta", "p_inlet", "T_inlet"]);
    assert_eq!(rm.run_matrix_file(None), Some(&json!("matrix.csv")));
    assert_eq!(rm.key_class("p_inlet"), Some("PressureKeyDefnOpts"));
    assert_eq!(rm.key_class("T_inlet"), Some("KeyDefnOpts"));
    assert_eq!(rm.key_class("mach"), None);
}

#[test]
fn test_pressure_definition_values() {
    let rm = case().run_matrix().unwrap();
    let defn: KeyDefnOpts = rm.definition("p_inlet").unwrap();
    assert_eq!(defn.key_type(None), Some(&json!("SurfBC")));
    assert_eq!(defn.get("CompID"), Some(&json!(["inlet"])));
    assert_eq!(defn.get("TotalPressure"), Some(&json!("p_inlet")));
    assert_eq!(defn.get("RefPressure"), Some(&json!(1.0)));
    assert_eq!(defn.value_type(None), Some(&json!("float")));
}

#[test]
fn test_value_definition_format() {
    let rm = case().run_matrix().unwrap();
    let defn = rm.definition("T_inlet").unwrap();
    assert_eq!(defn.format(None), Some(&json!("%.1f")));
    assert_eq!(defn.key_label(None), Some(&json!(true)));
}

// ============================================================================
// Failures
// ============================================================================

#[rstest]
#[case::unknown_option("RunControl:\n  nIterations: 5\n")]
#[case::bad_type("RunControl:\n  MPI: sometimes\n")]
#[case::bad_value("RunMatrix:\n  Definitions:\n    mach:\n      Value: complex\n")]
#[case::ragged("RunControl:\n  nIter: [[1, 2], 3]\n")]
#[case::float_ulimit("RunControl:\n  ulimit:\n    s: 1.5\n")]
fn test_invalid_yaml_is_rejected(#[case] text: &str) {
    let data = parse_yaml(text);
    assert!(opts_catalog::build("Options", data).is_err());
}

#[test]
fn test_wrong_view_is_a_type_mismatch() {
    let root = case();
    let err = opts_catalog::isolate::<ULimitOpts>(root.node(), &["RunControl"]).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }), "{err}");
}

#[test]
fn test_setters_validate() {
    let mut rc = case().run_control().unwrap();
    rc.set_n_proc(128).unwrap();
    assert_eq!(rc.n_proc(None), Some(&json!(128)));
    assert!(rc.set_n_proc("many").is_err());
    assert_eq!(rc.n_proc(None), Some(&json!(128)));
}
