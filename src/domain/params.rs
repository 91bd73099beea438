// Builders for query strings and request bodies. Unset or empty values are
// never sent; list values use the `key[]` convention Swarm's PHP backend parses.

use serde_json::{Map, Value};

use crate::domain::model::Body;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    pub fn push_opt<T: ToString>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub fn push_str(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(value) if !value.is_empty() => self.push(key, value),
            _ => self,
        }
    }

    pub fn push_list<T: ToString>(&mut self, key: &str, values: &[T]) -> &mut Self {
        let list_key = format!("{}[]", key);
        for value in values {
            self.push(&list_key, value.to_string());
        }
        self
    }

    /// Boolean filters are `1`/`0` on the query string.
    pub fn push_flag(&mut self, key: &str, value: Option<bool>) -> &mut Self {
        self.push_opt(key, value.map(|flag| if flag { "1" } else { "0" }))
    }

    /// `fields` is a single comma-separated parameter.
    pub fn push_fields<S: AsRef<str>>(&mut self, fields: &[S]) -> &mut Self {
        if fields.is_empty() {
            return self;
        }
        let joined = fields
            .iter()
            .map(|field| field.as_ref())
            .collect::<Vec<_>>()
            .join(",");
        self.push("fields", joined)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Body fields collected as JSON values, encoded as a form or JSON at the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn insert_opt<T: Into<Value>>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    pub fn insert_str(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(value) if !value.is_empty() => self.insert(key, value),
            _ => self,
        }
    }

    pub fn insert_list<S: AsRef<str>>(&mut self, key: &str, values: &[S]) -> &mut Self {
        if values.is_empty() {
            return self;
        }
        let list = values
            .iter()
            .map(|value| Value::String(value.as_ref().to_string()))
            .collect::<Vec<_>>();
        self.insert(key, Value::Array(list))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_json(self) -> Body {
        Body::Json(Value::Object(self.0))
    }

    pub fn into_form(self) -> Body {
        let mut pairs = Vec::new();
        for (key, value) in self.0 {
            flatten_form(&key, value, &mut pairs);
        }
        Body::Form(pairs)
    }
}

fn flatten_form(key: &str, value: Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => pairs.push((key.to_string(), flag.to_string())),
        Value::Number(number) => pairs.push((key.to_string(), number.to_string())),
        Value::String(text) => pairs.push((key.to_string(), text)),
        Value::Array(items) => {
            let list_key = format!("{}[]", key);
            for item in items {
                flatten_form(&list_key, item, pairs);
            }
        }
        Value::Object(map) => {
            for (sub_key, item) in map {
                flatten_form(&format!("{}[{}]", key, sub_key), item, pairs);
            }
        }
    }
}
