use std::cell::{
    RefCell,
    RefMut
};
use std::collections::HashMap;

use serde::de::Error;

use super::managererror::ManagerError;

/// Named objects built from JSON. Every JSON object carries a `name`
/// field that becomes its key; the remaining fields are handed to the
/// manager's builder.
pub trait IManager<V>
where
    V: Clone,
{
    fn map(&self) -> RefMut<'_, HashMap<String, V>>;

    /// Builds the named object without registering it.
    fn build_obj_from_json(&self, json_value: serde_json::Value) -> Result<(String, V), ManagerError>;

    fn insert_obj_from_json(&self, json_value: serde_json::Value) -> Result<(), ManagerError> {
        let (name, v) = self.build_obj_from_json(json_value)?;
        self.map().insert(name, v);
        Ok(())
    }

    fn get(&self, name: &str) -> Result<V, ManagerError> {
        let map = self.map();
        map.get(name)
            .cloned()
            .ok_or_else(|| ManagerError::NameNotFoundError(name.to_owned()))
    }

    fn contains(&self, name: &str) -> bool {
        self.map().contains_key(name)
    }

    fn insert(&self, name: &str, value: V) {
        self.map().insert(name.to_owned(), value);
    }

    /// Registered names, sorted.
    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.map().keys().cloned().collect();
        names.sort();
        names
    }

    /// Builds every object first and registers them only if all succeed.
    fn insert_obj_from_json_vec(&self, json_vec: &[serde_json::Value]) -> Result<(), ManagerError> {
        let built = self.build_obj_from_json_vec(json_vec)?;
        self.map().extend(built);
        Ok(())
    }

    fn build_obj_from_json_vec(&self, json_vec: &[serde_json::Value]) -> Result<Vec<(String, V)>, ManagerError> {
        json_vec
            .iter()
            .map(|j| self.build_obj_from_json(j.clone()))
            .collect()
    }
}

pub struct Manager<V> {
    map_cell: RefCell<HashMap<String, V>>,
    get_obj_from_json: fn(serde_json::Value) -> Result<V, ManagerError>
}

impl<V> Manager<V>
where
    V: Clone,
{
    pub fn new(get_obj_from_json: fn(serde_json::Value) -> Result<V, ManagerError>) -> Manager<V> {
        Manager { map_cell: RefCell::new(HashMap::new()), get_obj_from_json }
    }
}

fn name_of(json_value: &serde_json::Value) -> Result<String, ManagerError> {
    json_value
        .get("name")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| ManagerError::JsonParseError(serde_json::Error::missing_field("name")))
}

impl<V> IManager<V> for Manager<V>
where
    V: Clone,
{
    fn map(&self) -> RefMut<'_, HashMap<String, V>> {
        self.map_cell.borrow_mut()
    }

    fn build_obj_from_json(&self, json_value: serde_json::Value) -> Result<(String, V), ManagerError> {
        let name = name_of(&json_value)?;
        let v = (self.get_obj_from_json)(json_value)?;
        Ok((name, v))
    }
}

#[cfg(test)]
mod tests {
    use serde::de::Error;
    use serde_json::json;

    use super::*;

    fn manager() -> Manager<f64> {
        Manager::new(|json_value| {
            json_value["value"]
                .as_f64()
                .ok_or_else(|| ManagerError::JsonParseError(serde_json::Error::missing_field("value")))
        })
    }

    #[test]
    fn insert_and_get() {
        let manager = manager();
        manager
            .insert_obj_from_json_vec(&[
                json!({"name": "b", "value": 2.0}),
                json!({"name": "a", "value": 1.0}),
            ])
            .unwrap();
        assert_eq!(manager.get("a").unwrap(), 1.0);
        assert_eq!(manager.names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn missing_name_or_key() {
        let manager = manager();
        assert!(matches!(
            manager.insert_obj_from_json(json!({"value": 2.0})),
            Err(ManagerError::JsonParseError(_))
        ));
        assert!(matches!(manager.get("nope"), Err(ManagerError::NameNotFoundError(_))));
    }

    #[test]
    fn failed_batch_registers_nothing() {
        let manager = manager();
        let result = manager.insert_obj_from_json_vec(&[
            json!({"name": "a", "value": 1.0}),
            json!({"name": "b"}),
        ]);
        assert!(result.is_err());
        assert!(!manager.contains("a"));
        assert!(manager.names().is_empty());
    }
}
