//! Run matrix classes: the list of varying keys and their definitions

use opts_core::{SchemaDef, types};
use serde_json::json;

pub const KEY_DEFN: &str = "KeyDefnOpts";
pub const PRESSURE_KEY_DEFN: &str = "PressureKeyDefnOpts";
pub const KEY_DEFN_COLLECTION: &str = "KeyDefnCollectionOpts";
pub const RUN_MATRIX: &str = "RunMatrixOpts";

pub fn key_defn() -> SchemaDef {
    SchemaDef::new(KEY_DEFN)
        .opts(["Abbreviation", "Format", "Group", "Label", "Type", "Value"])
        .types("Abbreviation", types::STR)
        .types("Format", types::STR)
        .types("Group", types::BOOL)
        .types("Label", types::BOOL)
        .types("Type", types::STR)
        .types("Value", types::STR)
        .values("Value", ["float", "int", "str"])
        .default("Format", "%s")
        .default("Group", false)
        .default("Label", true)
        .default("Type", "value")
        .default("Value", "float")
        .describe("Abbreviation", "short name used in folder names")
        .describe("Format", "printf-style format for folder names")
        .describe("Group", "whether the key changes the group folder")
        .describe("Label", "whether the key appears in case folder names")
        .describe("Type", "key type, selects the definition class")
        .describe("Value", "data type of the key's values")
}

/// Keys describing a boundary condition with its own freestream state.
pub fn pressure_key_defn() -> SchemaDef {
    SchemaDef::new(PRESSURE_KEY_DEFN)
        .extends(KEY_DEFN)
        .opts([
            "CompID",
            "RefPressure",
            "RefTemperature",
            "TotalPressure",
            "TotalTemperature",
        ])
        .types("CompID", types::STR)
        .list_depth("CompID", 1)
        .types("RefPressure", types::FLOAT_OR_STR)
        .types("RefTemperature", types::FLOAT_OR_STR)
        .types("TotalPressure", types::FLOAT_OR_STR)
        .types("TotalTemperature", types::FLOAT_OR_STR)
        .default("CompID", json!([]))
        .default("RefPressure", 1.0)
        .default("RefTemperature", 1.0)
        .default("TotalTemperature", "T0")
        .describe("CompID", "components the boundary condition applies to")
        .describe("RefPressure", "reference static pressure, or a key name")
        .describe("RefTemperature", "reference static temperature, or a key name")
        .describe("TotalPressure", "total pressure, or a key name")
        .describe("TotalTemperature", "total temperature, or a key name")
}

/// Definitions keyed by run matrix key name.
///
/// A definition without a `Type` is given the key it is stored under, so
/// `{"mach": {}}` is read as `{"mach": {"Type": "mach"}}`.
pub fn key_defn_collection() -> SchemaDef {
    SchemaDef::new(KEY_DEFN_COLLECTION)
        .tagged("Type")
        .kind("value", KEY_DEFN)
        .kind("SurfBC", PRESSURE_KEY_DEFN)
        .kind("SurfCT", PRESSURE_KEY_DEFN)
        .fallback(KEY_DEFN)
        .inject_tag_from_key()
        .open()
}

pub fn run_matrix() -> SchemaDef {
    SchemaDef::new(RUN_MATRIX)
        .opts([
            "File",
            "Freestream",
            "GroupMesh",
            "GroupPrefix",
            "Keys",
            "Prefix",
        ])
        .alias("Cols", "Keys")
        .alias("cols", "Keys")
        .alias("keys", "Keys")
        .alias("Defns", "Definitions")
        .alias("defns", "Definitions")
        .alias("file", "File")
        .alias("gas", "Freestream")
        .alias("prefix", "Prefix")
        .types("File", types::STR)
        .types("Freestream", types::DICT)
        .types("GroupMesh", types::BOOL)
        .types("GroupPrefix", types::STR)
        .types("Keys", types::STR)
        .list_depth("Keys", 1)
        .types("Prefix", types::STR)
        .default("GroupMesh", false)
        .default("GroupPrefix", "Grid")
        .default("Keys", json!(["mach", "alpha", "beta"]))
        .default("Prefix", "")
        .section("Definitions", KEY_DEFN_COLLECTION)
        .describe("Definitions", "definitions for each run matrix variable")
        .describe("File", "run matrix data file name")
        .describe("Freestream", "properties of freestream gas model")
        .describe("GroupMesh", "whether cases in a group share one mesh")
        .describe("GroupPrefix", "default prefix for group folders")
        .describe("Keys", "list of run matrix variables")
        .describe("Prefix", "default prefix for case folders")
}

