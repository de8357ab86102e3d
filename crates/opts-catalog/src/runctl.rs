//! Run control: phases, job submission and per-program sections

use opts_core::{SchemaDef, types};

use crate::exec::{AFLR3, INTERSECT, VERIFY};

pub const ULIMIT: &str = "ULimitOpts";
pub const ENVIRON: &str = "EnvironOpts";
pub const RUN_CONTROL: &str = "RunControlOpts";

/// `ulimit` flags, by short letter with their long names as aliases.
const ULIMIT_FLAGS: &[(&str, &str, &[&str])] = &[
    ("c", "core file size limit, `ulimit -c`", &["core_file_size"]),
    ("d", "process data segment limit, `ulimit -d`", &["data_segment"]),
    ("e", "max scheduling priority, `ulimit -e`", &["scheduling_priority"]),
    ("f", "max size of files written by shell, `ulimit -f`", &["file_size"]),
    ("i", "max number of pending signals, `ulimit -i`", &["pending_signals"]),
    ("l", "max size that may be locked into memory, `ulimit -l`", &["locked_memory"]),
    ("m", "max resident set size, `ulimit -m`", &["set_size"]),
    ("n", "max number of open files, `ulimit -n`", &["open_files"]),
    ("p", "pipe size in 512-byte blocks, `ulimit -p`", &["pipe_size"]),
    ("q", "max bytes in POSIX message queues, `ulimit -q`", &["message_queue_size"]),
    ("r", "max real-time scheduling priority, `ulimit -r`", &["real_time_priority"]),
    ("s", "stack size limit, `ulimit -s`", &["stack_size"]),
    ("t", "max amount of cpu time in s, `ulimit -t`", &["time_limit"]),
    (
        "u",
        "max number of procs avail to one user, `ulimit -u`",
        &["max_processes", "processes", "user_processes"],
    ),
    ("v", "max virtual memory avail to shell, `ulimit -v`", &["virtual_memory"]),
    ("x", "max number of file locks, `ulimit -x`", &["file_locks"]),
];

/// Resource limits; every value is an integer or a word such as `"unlimited"`.
pub fn ulimit() -> SchemaDef {
    let mut def = SchemaDef::new(ULIMIT).types("_default_", types::INT_OR_STR);
    for (flag, description, aliases) in ULIMIT_FLAGS {
        def = def.opts([*flag]).describe(*flag, *description);
        for alias in *aliases {
            def = def.alias(*alias, *flag);
        }
    }
    def.default("s", 4_194_304)
}

/// Environment variables; names are free-form.
pub fn environ() -> SchemaDef {
    SchemaDef::new(ENVIRON)
        .types("_default_", types::INT_OR_STR)
        .open()
}

pub fn run_control() -> SchemaDef {
    SchemaDef::new(RUN_CONTROL)
        .opts([
            "Continue",
            "JSONFile",
            "MPI",
            "PhaseIters",
            "PhaseSequence",
            "PostShellCmds",
            "PreMesh",
            "Resubmit",
            "RootDir",
            "Verbose",
            "WarmStart",
            "WarmStartFolder",
            "mpicmd",
            "nIter",
            "nJob",
            "nProc",
            "qsub",
            "slurm",
        ])
        .alias("CAPEFile", "JSONFile")
        .alias("PostCmds", "PostShellCmds")
        .alias("sbatch", "slurm")
        .types("Continue", types::BOOL)
        .types("JSONFile", types::STR)
        .types("MPI", types::BOOL)
        .types("PhaseIters", types::INT)
        .list_depth("PhaseIters", 1)
        .types("PhaseSequence", types::INT)
        .list_depth("PhaseSequence", 1)
        .types("PostShellCmds", types::STR)
        .list_depth("PostShellCmds", 1)
        .types("PreMesh", types::BOOL)
        .types("Resubmit", types::BOOL)
        .types("RootDir", types::STR)
        .types("Verbose", types::BOOL)
        .types("WarmStart", types::BOOL)
        .types("WarmStartFolder", types::STR)
        .types("mpicmd", types::STR)
        .values("mpicmd", ["mpiexec", "mpirun"])
        .types("nIter", types::INT)
        .list_depth("nIter", 1)
        .types("nJob", types::INT)
        .types("nProc", types::INT)
        .types("qsub", types::BOOL)
        .types("slurm", types::BOOL)
        .default("Continue", true)
        .default("MPI", false)
        .default("PreMesh", false)
        .default("Resubmit", false)
        .default("Verbose", false)
        .default("WarmStart", false)
        .default("nJob", 0)
        .default("qsub", false)
        .default("slurm", false)
        .section("Environ", ENVIRON)
        .section("aflr3", AFLR3)
        .section("intersect", INTERSECT)
        .section("ulimit", ULIMIT)
        .section("verify", VERIFY)
        .describe("Continue", "whether restarts of same phase can use same job")
        .describe("JSONFile", "name of JSON file from which settings originated")
        .describe("MPI", "whether or not to run MPI in phase")
        .describe("PhaseIters", "check-point iterations for phase *j*")
        .describe("PhaseSequence", "list of phase indices to run")
        .describe("PostShellCmds", "list of commands to run after each cycle")
        .describe("PreMesh", "whether or not to generate volume mesh before submitting")
        .describe("Resubmit", "whether or not to submit new job at end of phase *j*")
        .describe("RootDir", "(absolute) base folder from which settings were read")
        .describe("Verbose", "`RunControl` verbosity flag")
        .describe("WarmStart", "whether to warm start a case")
        .describe("WarmStartFolder", "folder from which to get warm-start file")
        .describe("mpicmd", "MPI executable name")
        .describe("nIter", "number of iterations to run in phase *j*")
        .describe("nJob", "number of jobs to run concurrently")
        .describe("nProc", "number of cores/threads to use per case")
        .describe("qsub", "whether or not to submit jobs with PBS")
        .describe("slurm", "whether or not to submit jobs with Slurm")
}
