use std::cell::{
    Cell,
    RefCell,
    RefMut
};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::compute::computerequest::ComputeRequest;
use crate::manager::managererror::ManagerError;
use crate::manager::manager::{
    IManager,
    Manager
};
use crate::quadrature::convergence::ConvergenceLadder;

pub const DEFAULT_NAME: &str = "Default";
pub const DEFAULT_DISPLAY_DIGITS: u32 = 6;

// Configuration file layout:
//
// {
//     "display_digits": 6,
//     "default_ladder": "Default",
//     "ladders": [ { "name": "Coarse", "counts": [2, 4, 8, 16] } ],
//     "presets": [ { "name": "Sine", "expression": "sin(x)", "a": 0.0, "b": 3.14159, "n": 200 } ]
// }
//
// Every field is optional. Entries are added on top of the built-in
// "Default" ladder and preset, replacing them when the names collide.
// A file is applied whole or not at all: every entry is built and the
// default ladder resolved before anything is registered.

#[derive(Deserialize)]
struct ConfigurationJsonProp {
    display_digits: Option<u32>,
    default_ladder: Option<String>,
    #[serde(default)]
    ladders: Vec<serde_json::Value>,
    #[serde(default)]
    presets: Vec<serde_json::Value>
}

#[derive(Deserialize)]
struct LadderJsonProp {
    counts: Vec<i64>
}

fn get_ladder_from_json(json_value: serde_json::Value) -> Result<ConvergenceLadder, ManagerError> {
    let json_prop: LadderJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
    Ok(ConvergenceLadder::new(json_prop.counts)?)
}

fn get_preset_from_json(json_value: serde_json::Value) -> Result<ComputeRequest, ManagerError> {
    ManagerError::from_json_or_json_parse_error(json_value)
}

pub struct Configuration {
    ladder_manager_cell: RefCell<Manager<ConvergenceLadder>>,
    preset_manager_cell: RefCell<Manager<ComputeRequest>>,
    default_ladder_cell: RefCell<String>,
    display_digits_cell: Cell<u32>
}

impl Configuration {
    pub fn new() -> Configuration {
        let ladder_manager = Manager::new(get_ladder_from_json);
        ladder_manager.insert(DEFAULT_NAME, ConvergenceLadder::default());
        let preset_manager = Manager::new(get_preset_from_json);
        preset_manager.insert(DEFAULT_NAME, ComputeRequest::default());
        Configuration {
            ladder_manager_cell: RefCell::new(ladder_manager),
            preset_manager_cell: RefCell::new(preset_manager),
            default_ladder_cell: RefCell::new(DEFAULT_NAME.to_owned()),
            display_digits_cell: Cell::new(DEFAULT_DISPLAY_DIGITS)
        }
    }

    pub fn ladder_manager(&self) -> RefMut<'_, Manager<ConvergenceLadder>> {
        self.ladder_manager_cell.borrow_mut()
    }

    pub fn preset_manager(&self) -> RefMut<'_, Manager<ComputeRequest>> {
        self.preset_manager_cell.borrow_mut()
    }

    pub fn display_digits(&self) -> u32 {
        self.display_digits_cell.get()
    }

    pub fn default_ladder_name(&self) -> String {
        self.default_ladder_cell.borrow().clone()
    }

    pub fn default_ladder(&self) -> Result<ConvergenceLadder, ManagerError> {
        let name = self.default_ladder_name();
        self.ladder_manager().get(&name)
    }

    pub fn from_reader(&self, file_path: &Path) -> Result<(), ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_prop: ConfigurationJsonProp = serde_json::from_reader(reader)?;
        self.load(json_prop)
    }

    pub fn from_json_str(&self, json: &str) -> Result<(), ManagerError> {
        let json_prop: ConfigurationJsonProp = serde_json::from_str(json)?;
        self.load(json_prop)
    }

    fn load(&self, json_prop: ConfigurationJsonProp) -> Result<(), ManagerError> {
        let ladders = self.ladder_manager().build_obj_from_json_vec(&json_prop.ladders)?;
        let presets = self.preset_manager().build_obj_from_json_vec(&json_prop.presets)?;
        if let Some(name) = &json_prop.default_ladder {
            let known = ladders.iter().any(|(n, _)| n == name) || self.ladder_manager().contains(name);
            if !known {
                return Err(ManagerError::NameNotFoundError(name.clone()));
            }
        }

        self.ladder_manager().map().extend(ladders);
        self.preset_manager().map().extend(presets);
        if let Some(name) = json_prop.default_ladder {
            *self.default_ladder_cell.borrow_mut() = name;
        }
        if let Some(digits) = json_prop.display_digits {
            self.display_digits_cell.set(digits);
        }
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_defaults() {
        let config = Configuration::new();
        assert_eq!(config.default_ladder().unwrap(), ConvergenceLadder::default());
        assert_eq!(config.preset_manager().get(DEFAULT_NAME).unwrap(), ComputeRequest::default());
        assert_eq!(config.display_digits(), DEFAULT_DISPLAY_DIGITS);
    }

    #[test]
    fn loads_ladders_and_presets() {
        let config = Configuration::new();
        config
            .from_json_str(
                r#"{
                    "display_digits": 4,
                    "default_ladder": "Coarse",
                    "ladders": [{"name": "Coarse", "counts": [2, 4, 8]}],
                    "presets": [{"name": "Sine", "expression": "sin(x)", "b": 3.0, "n": 8}]
                }"#,
            )
            .unwrap();
        assert_eq!(config.display_digits(), 4);
        assert_eq!(config.default_ladder().unwrap().counts(), &[2, 4, 8]);
        let sine = config.preset_manager().get("Sine").unwrap();
        assert_eq!(sine, ComputeRequest::new("sin(x)", 0.0, 3.0, 8));
    }

    #[test]
    fn rejects_bad_ladders_and_unknown_default() {
        let config = Configuration::new();
        let result = config.from_json_str(r#"{"ladders": [{"name": "Bad", "counts": [5, 3]}]}"#);
        assert!(matches!(result, Err(ManagerError::LadderError(_))));

        let result = config.from_json_str(r#"{"default_ladder": "Missing"}"#);
        assert!(matches!(result, Err(ManagerError::NameNotFoundError(_))));
        assert_eq!(config.default_ladder_name(), DEFAULT_NAME);
    }

    #[test]
    fn failed_load_leaves_configuration_untouched() {
        let config = Configuration::new();
        let result = config.from_json_str(
            r#"{
                "display_digits": 3,
                "ladders": [{"name": "Good", "counts": [2, 4]}],
                "presets": [{"name": "Broken", "n": "oops"}]
            }"#,
        );
        assert!(matches!(result, Err(ManagerError::JsonParseError(_))));
        assert!(!config.ladder_manager().contains("Good"));
        assert!(!config.preset_manager().contains("Broken"));
        assert_eq!(config.display_digits(), DEFAULT_DISPLAY_DIGITS);

        let result = config.from_json_str(
            r#"{
                "default_ladder": "Missing",
                "ladders": [{"name": "Fine", "counts": [100, 200]}],
                "presets": [{"name": "Sine", "expression": "sin(x)"}]
            }"#,
        );
        assert!(matches!(result, Err(ManagerError::NameNotFoundError(_))));
        assert!(!config.ladder_manager().contains("Fine"));
        assert!(!config.preset_manager().contains("Sine"));
        assert_eq!(config.ladder_manager().names(), vec![DEFAULT_NAME]);
        assert_eq!(config.preset_manager().names(), vec![DEFAULT_NAME]);
    }
}
