//! Classes describing one external program invocation
//!
//! Every program section accepts a bare boolean in place of a mapping
//! (`"verify": false` means `{"run": false}`). When `run` is not given, a
//! section with any content stores `run: true`; an empty one stays empty and
//! reads the class default `false`.

use opts_core::{Map, OptionsNode, SchemaDef, Value, types};

pub const EXEC: &str = "ExecOpts";
pub const AFLR3: &str = "AFLR3Opts";
pub const INTERSECT: &str = "IntersectOpts";
pub const VERIFY: &str = "VerifyOpts";

fn run_flag(value: &Value) -> Option<Map<String, Value>> {
    let run = value.as_bool()?;
    let mut map = Map::new();
    map.insert("run".to_string(), Value::Bool(run));
    Some(map)
}

fn default_run(node: &mut OptionsNode) {
    if node.is_empty() {
        return;
    }
    if let Err(err) = node.set_default("run", true) {
        tracing::warn!(section = %node.label(), "{err}");
    }
}

pub fn exec() -> SchemaDef {
    SchemaDef::new(EXEC)
        .opts(["run"])
        .types("run", types::BOOL)
        .default("run", false)
        .describe("run", "whether to execute program")
        .coerce(run_flag)
        .post_init(default_run)
}

pub fn aflr3() -> SchemaDef {
    SchemaDef::new(AFLR3)
        .extends(EXEC)
        .opts([
            "BCFile", "angblisimx", "angqbf", "blc", "blds", "bli", "blr", "cdfr", "cdfs",
            "flags", "grow", "i", "keys", "mdf", "mdsblf", "nqual", "o",
        ])
        .types("BCFile", types::STR)
        .types("angblisimx", types::FLOAT)
        .types("angqbf", types::FLOAT)
        .types("blc", types::BOOL)
        .types("blds", types::FLOAT)
        .types("bli", types::INT)
        .types("blr", types::FLOAT)
        .types("cdfr", types::FLOAT)
        .types("cdfs", types::NUMBER)
        .types("flags", types::DICT)
        .types("grow", types::FLOAT)
        .types("i", types::STR)
        .types("keys", types::DICT)
        .types("nqual", types::INT)
        .types("o", types::STR)
        .values("mdf", [1, 2])
        .values("mdsblf", [0, 1, 2])
        .default("flags", Value::Object(Map::new()))
        .default("keys", Value::Object(Map::new()))
        .default("mdf", 2)
        .default("nqual", 0)
        .describe("BCFile", "AFLR3 boundary condition file")
        .describe("angblisimx", "AFLR3 max angle b/w BL intersecting faces")
        .describe("angqbf", "AFLR3 max angle on surface triangles")
        .describe("blc", "AFLR3 prism layer option")
        .describe("blds", "AFLR3 initial boundary-layer spacing")
        .describe("bli", "number of AFLR3 prism layers")
        .describe("blr", "AFLR3 boundary layer stretching ratio")
        .describe("cdfr", "AFLR3 max geometric growth rate")
        .describe("cdfs", "AFLR3 geometric growth exclusion zone size")
        .describe("flags", "AFLR3 options using `-flag val` format")
        .describe("grow", "AFLR3 off-body growth rate")
        .describe("i", "input file for AFLR3")
        .describe("keys", "AFLR3 options using `key=val` format")
        .describe("mdf", "AFLR3 volume grid distribution flag")
        .describe("mdsblf", "AFLR3 BL spacing thickness factor option")
        .describe("nqual", "number of AFLR3 mesh quality passes")
        .describe("o", "output file for AFLR3")
        .describe("run", "whether or not to run AFLR3")
}

pub fn intersect() -> SchemaDef {
    SchemaDef::new(INTERSECT)
        .extends(EXEC)
        .opts(["ascii", "cutout", "i", "o", "rm", "smalltri", "triged"])
        .types("ascii", types::BOOL)
        .types("cutout", types::INT)
        .types("i", types::STR)
        .types("o", types::STR)
        .types("rm", types::BOOL)
        .types("smalltri", types::FLOAT)
        .types("triged", types::BOOL)
        .default("i", "Components.tri")
        .default("o", "Components.i.tri")
        .default("rm", false)
        .default("smalltri", 1e-4)
        .default("triged", true)
        .describe("ascii", "flag that input file is ASCII")
        .describe("cutout", "number of component to subtract")
        .describe("i", "input file to `intersect`")
        .describe("o", "output file for `intersect`")
        .describe("rm", "whether to remove small triangles")
        .describe("smalltri", "cutoff size for small triangles with `rm`")
        .describe("triged", "whether to write `triged.tri` when `rm` is set")
        .describe("run", "whether or not to run `intersect`")
}

pub fn verify() -> SchemaDef {
    SchemaDef::new(VERIFY)
        .extends(EXEC)
        .opts(["ascii", "i"])
        .types("ascii", types::BOOL)
        .types("i", types::STR)
        .default("i", "Components.i.tri")
        .describe("ascii", "option for ASCII input file to `verify`")
        .describe("i", "input file to `verify`")
        .describe("run", "whether or not to run `verify`")
}
