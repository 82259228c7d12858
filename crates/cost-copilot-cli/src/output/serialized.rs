use serde_json::Value;
use std::fmt::Display;

pub fn print_json(value: &Value) {
    emit("JSON", serde_json::to_string_pretty(value).map(|s| s + "\n"));
}

pub fn print_yaml(value: &Value) {
    emit("YAML", serde_yaml::to_string(value));
}

fn emit<E: Display>(format: &str, rendered: Result<String, E>) {
    match rendered {
        Ok(s) => print!("{}", s),
        Err(e) => eprintln!("{} serialization error: {}", format, e),
    }
}
