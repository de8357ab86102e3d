//! Typed views over catalogue nodes

use opts_core::{Map, OptionsView, Result, Value, option_accessors, options_view};

use crate::exec::AFLR3;
use crate::options::OPTIONS;
use crate::runctl::{RUN_CONTROL, ULIMIT};
use crate::runmatrix::{KEY_DEFN, RUN_MATRIX};

options_view! {
    /// Root of a full configuration
    pub struct Options => OPTIONS;
}

options_view! {
    pub struct RunControlOpts => RUN_CONTROL;
}

options_view! {
    pub struct RunMatrixOpts => RUN_MATRIX;
}

options_view! {
    /// Resource limits applied before running a case
    pub struct ULimitOpts => ULIMIT;
}

options_view! {
    pub struct AFLR3Opts => AFLR3;
}

options_view! {
    /// Definition of one run matrix key
    pub struct KeyDefnOpts => KEY_DEFN;
}

option_accessors! {
    Options, prefix = "Options", {
        nsubmit / set_nsubmit => "NSubmit",
        python_exec / set_python_exec => "PythonExec",
        shell_cmds / set_shell_cmds => "ShellCmds",
        batch_shell_cmds / set_batch_shell_cmds => "BatchShellCmds",
    }
}

impl Options {
    pub fn run_control(&self) -> Result<RunControlOpts> {
        crate::isolate(self.node(), &["RunControl"])
    }

    pub fn run_matrix(&self) -> Result<RunMatrixOpts> {
        crate::isolate(self.node(), &["RunMatrix"])
    }
}

option_accessors! {
    RunControlOpts, prefix = "RunControl", {
        phase_iters / set_phase_iters => "PhaseIters",
        phase_sequence / set_phase_sequence => "PhaseSequence",
        n_iter / set_n_iter => "nIter",
        n_proc / set_n_proc => "nProc",
        n_job / set_n_job => "nJob",
        mpi / set_mpi => "MPI",
        mpicmd / set_mpicmd => "mpicmd",
        qsub / set_qsub => "qsub",
        slurm / set_slurm => "slurm",
        resubmit / set_resubmit => "Resubmit",
        post_shell_cmds / set_post_shell_cmds => "PostShellCmds",
        warm_start / set_warm_start => "WarmStart",
        warm_start_folder / set_warm_start_folder => "WarmStartFolder",
    }
}

impl RunControlOpts {
    /// Number of phases, from `PhaseSequence` (one when unset or empty).
    pub fn phase_count(&self) -> usize {
        self.get("PhaseSequence")
            .and_then(Value::as_array)
            .map_or(1, |phases| phases.len().max(1))
    }

    /// Index of the last phase to run.
    pub fn last_phase(&self) -> Option<i64> {
        self.get_phase("PhaseSequence", i64::MAX).and_then(Value::as_i64)
    }

    /// Iteration at which phase `j` is complete.
    pub fn phase_iter(&self, j: i64) -> Option<i64> {
        self.get_phase("PhaseIters", j).and_then(Value::as_i64)
    }

    pub fn ulimit(&self) -> Result<ULimitOpts> {
        crate::isolate(self.node(), &["RunControl", "ulimit"])
    }

    pub fn aflr3(&self) -> Result<AFLR3Opts> {
        crate::isolate(self.node(), &["RunControl", "aflr3"])
    }
}

option_accessors! {
    RunMatrixOpts, prefix = "RunMatrix", {
        run_matrix_keys / set_run_matrix_keys => "Keys",
        run_matrix_file / set_run_matrix_file => "File",
        run_matrix_prefix / set_run_matrix_prefix => "Prefix",
        run_matrix_group_prefix / set_run_matrix_group_prefix => "GroupPrefix",
        run_matrix_group_mesh / set_run_matrix_group_mesh => "GroupMesh",
        run_matrix_freestream / set_run_matrix_freestream => "Freestream",
    }
}

impl RunMatrixOpts {
    /// Names of the run matrix keys.
    pub fn key_names(&self) -> Vec<&str> {
        self.get("Keys")
            .and_then(Value::as_array)
            .map(|keys| keys.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Definition of run matrix key `key`, when one was given.
    pub fn definition(&self, key: &str) -> Option<KeyDefnOpts> {
        self.get_section(&["Definitions", key])
            .ok()
            .cloned()
            .and_then(|node| KeyDefnOpts::try_from_node(node).ok())
    }

    /// Class name used for key `key`, following its `Type`.
    pub fn key_class(&self, key: &str) -> Option<&str> {
        self.get_section(&["Definitions", key])
            .ok()
            .map(|node| node.class_name())
    }
}

option_accessors! {
    ULimitOpts, prefix = "ulimit", {
        core_file_size / set_core_file_size => "c",
        open_files / set_open_files => "n",
        stack_size / set_stack_size => "s",
        max_processes / set_max_processes => "u",
        virtual_memory / set_virtual_memory => "v",
    }
}

impl ULimitOpts {
    /// Limit `name` (short flag or long name) for phase `j`.
    pub fn get_ulimit(&self, name: &str, j: i64) -> Option<&Value> {
        self.get_phase(name, j)
    }

    pub fn set_ulimit(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.node_mut().set_opt(name, value)
    }
}

option_accessors! {
    AFLR3Opts, prefix = "aflr3", {
        aflr3_run / set_aflr3_run => "run",
        aflr3_i / set_aflr3_i => "i",
        aflr3_o / set_aflr3_o => "o",
        aflr3_bcfile / set_aflr3_bcfile => "BCFile",
        aflr3_bli / set_aflr3_bli => "bli",
        aflr3_blr / set_aflr3_blr => "blr",
        aflr3_blds / set_aflr3_blds => "blds",
        aflr3_grow / set_aflr3_grow => "grow",
        aflr3_mdf / set_aflr3_mdf => "mdf",
        aflr3_mdsblf / set_aflr3_mdsblf => "mdsblf",
        aflr3_nqual / set_aflr3_nqual => "nqual",
    }
}

impl AFLR3Opts {
    /// Option `k` from the `key=val` style options.
    pub fn aflr3_key(&self, k: &str) -> Option<&Value> {
        self.get("keys").and_then(|keys| keys.get(k))
    }

    pub fn set_aflr3_key(&mut self, k: &str, value: impl Into<Value>) -> Result<()> {
        self.node_mut().extend_opt("keys", single(k, value.into()))
    }

    /// Option `k` from the `-flag val` style options.
    pub fn aflr3_flag(&self, k: &str) -> Option<&Value> {
        self.get("flags").and_then(|flags| flags.get(k))
    }

    pub fn set_aflr3_flag(&mut self, k: &str, value: impl Into<Value>) -> Result<()> {
        self.node_mut().extend_opt("flags", single(k, value.into()))
    }
}

fn single(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

option_accessors! {
    KeyDefnOpts, prefix = "Definitions", {
        key_type / set_key_type => "Type",
        value_type / set_value_type => "Value",
        format / set_format => "Format",
        abbreviation / set_abbreviation => "Abbreviation",
        key_label / set_key_label => "Label",
        key_group / set_key_group => "Group",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn view<V: OptionsView>(class: &str, raw: Value) -> V {
        V::try_from_node(catalog().build(class, raw).unwrap()).unwrap()
    }

    #[test]
    fn test_accessor_keys_are_declared() {
        let cases: [(&str, &[&str]); 6] = [
            (OPTIONS, Options::ACCESSOR_KEYS),
            (RUN_CONTROL, RunControlOpts::ACCESSOR_KEYS),
            (RUN_MATRIX, RunMatrixOpts::ACCESSOR_KEYS),
            (ULIMIT, ULimitOpts::ACCESSOR_KEYS),
            (AFLR3, AFLR3Opts::ACCESSOR_KEYS),
            (KEY_DEFN, KeyDefnOpts::ACCESSOR_KEYS),
        ];
        for (class, keys) in cases {
            let schema = catalog().get(class).unwrap();
            for key in keys {
                assert!(schema.has_option(key), "{class} has no option {key}");
            }
        }
    }

    #[test]
    fn test_run_control_phases() {
        let rc: RunControlOpts = view(
            RUN_CONTROL,
            json!({"PhaseSequence": [0, 1, 2], "PhaseIters": [200, 400]}),
        );
        assert_eq!(rc.phase_count(), 3);
        assert_eq!(rc.last_phase(), Some(2));
        assert_eq!(rc.phase_iter(0), Some(200));
        assert_eq!(rc.phase_iter(2), Some(400));
        assert_eq!(rc.phase_iters(None), Some(&json!([200, 400])));
    }

    #[test]
    fn test_run_control_defaults() {
        let rc: RunControlOpts = view(RUN_CONTROL, Value::Null);
        assert_eq!(rc.phase_count(), 1);
        assert_eq!(rc.last_phase(), None);
        assert_eq!(rc.n_job(None), Some(&json!(0)));
        assert_eq!(rc.slurm(None), Some(&json!(false)));
    }

    #[test]
    fn test_run_control_setters_validate() {
        let mut rc: RunControlOpts = view(RUN_CONTROL, Value::Null);
        rc.set_mpicmd("mpiexec").unwrap();
        assert!(rc.set_mpicmd("aprun").is_err());
        rc.set_n_proc(128).unwrap();
        assert_eq!(rc.n_proc(None), Some(&json!(128)));
        rc.set_phase_iters(500).unwrap();
        assert_eq!(rc.phase_iters(None), Some(&json!([500])));
    }

    #[test]
    fn test_ulimit_by_long_name() {
        let mut ul: ULimitOpts = view(ULIMIT, json!({"open_files": 1024}));
        assert_eq!(ul.get_ulimit("n", 0), Some(&json!(1024)));
        assert_eq!(ul.get_ulimit("open_files", 3), Some(&json!(1024)));
        assert_eq!(ul.stack_size(None), Some(&json!(4194304)));

        ul.set_ulimit("stack_size", "unlimited").unwrap();
        assert_eq!(ul.stack_size(None), Some(&json!("unlimited")));
        assert!(ul.set_ulimit("stack_size", 1.5).is_err());
        assert!(ul.set_ulimit("T", 1).is_err());
    }

    #[test]
    fn test_aflr3_keys_and_flags() {
        let mut af: AFLR3Opts = view(AFLR3, json!({"bli": 10}));
        assert_eq!(af.aflr3_run(None), Some(&json!(true)));
        assert_eq!(af.aflr3_mdf(None), Some(&json!(2)));
        assert_eq!(af.aflr3_key("cdfr"), None);

        af.set_aflr3_key("cdfr", 1.1).unwrap();
        af.set_aflr3_key("mdsblf", 1).unwrap();
        af.set_aflr3_flag("angqbf", 10).unwrap();
        assert_eq!(af.aflr3_key("cdfr"), Some(&json!(1.1)));
        assert_eq!(af.get("keys"), Some(&json!({"cdfr": 1.1, "mdsblf": 1})));
        assert_eq!(af.aflr3_flag("angqbf"), Some(&json!(10)));

        assert!(af.set_aflr3_mdf(3).is_err());
    }

    #[test]
    fn test_aflr3_default_keys_not_shared() {
        let mut a: AFLR3Opts = view(AFLR3, Value::Null);
        let b: AFLR3Opts = view(AFLR3, Value::Null);
        a.set_aflr3_key("cdfr", 1.2).unwrap();
        assert_eq!(b.get("keys"), Some(&json!({})));
        assert_eq!(a.aflr3_run(None), Some(&json!(false)));
    }

    #[test]
    fn test_run_matrix_definitions() {
        let rm: RunMatrixOpts = view(
            RUN_MATRIX,
            json!({
                "Keys": ["mach", "alpha", "bc"],
                "Definitions": {
                    "mach": {"Format": "%.2f"},
                    "bc": {"Type": "SurfBC", "CompID": "nozzle"}
                }
            }),
        );
        assert_eq!(rm.key_names(), vec!["mach", "alpha", "bc"]);
        assert_eq!(rm.key_class("mach"), Some("KeyDefnOpts"));
        assert_eq!(rm.key_class("bc"), Some("PressureKeyDefnOpts"));
        assert_eq!(rm.key_class("alpha"), None);

        let mach = rm.definition("mach").unwrap();
        assert_eq!(mach.key_type(None), Some(&json!("mach")));
        assert_eq!(mach.format(None), Some(&json!("%.2f")));
        assert_eq!(mach.value_type(None), Some(&json!("float")));

        let bc = rm.definition("bc").unwrap();
        assert_eq!(bc.get("CompID"), Some(&json!(["nozzle"])));
        assert_eq!(bc.get("TotalTemperature"), Some(&json!("T0")));
    }

    #[test]
    fn test_options_sections() {
        let opts: Options = view(
            OPTIONS,
            json!({
                "nSubmit": 4,
                "RunControl": {"nProc": 16, "ulimit": {"s": "unlimited"}},
                "RunMatrix": {"prefix": "poweroff"}
            }),
        );
        assert_eq!(opts.nsubmit(None), Some(&json!(4)));

        let rc = opts.run_control().unwrap();
        assert_eq!(rc.n_proc(None), Some(&json!(16)));
        assert_eq!(rc.ulimit().unwrap().stack_size(None), Some(&json!("unlimited")));
        assert_eq!(rc.aflr3().unwrap().aflr3_run(None), Some(&json!(false)));

        let rm = opts.run_matrix().unwrap();
        assert_eq!(rm.run_matrix_prefix(None), Some(&json!("poweroff")));
    }
}
