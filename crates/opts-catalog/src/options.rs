//! The root options class

use opts_core::{SchemaDef, types};

use crate::runctl::RUN_CONTROL;
use crate::runmatrix::RUN_MATRIX;

pub const OPTIONS: &str = "Options";

pub fn options() -> SchemaDef {
    SchemaDef::new(OPTIONS)
        .opts(["BatchShellCmds", "NSubmit", "PythonExec", "ShellCmds"])
        .alias("nSubmit", "NSubmit")
        .types("BatchShellCmds", types::STR)
        .list_depth("BatchShellCmds", 1)
        .types("NSubmit", types::INT)
        .types("PythonExec", types::STR)
        .types("ShellCmds", types::STR)
        .list_depth("ShellCmds", 1)
        .default("NSubmit", 10)
        .section("RunControl", RUN_CONTROL)
        .section("RunMatrix", RUN_MATRIX)
        .describe("BatchShellCmds", "additional shell commands for batch jobs")
        .describe("NSubmit", "maximum number of jobs to submit at one time")
        .describe("PythonExec", "Python executable used by job scripts")
        .describe("ShellCmds", "commands to run at the top of each job script")
        .describe("RunControl", "run sequence, job submission and program settings")
        .describe("RunMatrix", "run matrix keys and their definitions")
}
