use std::fmt::Display;
use std::fs;
use std::process;

pub fn read_to_string_or_exit(path: &str, label: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {label} at {path}: {e}");
        process::exit(1);
    })
}

pub fn exit_with_error(error: impl Display) -> ! {
    eprintln!("error: {error}");
    process::exit(1);
}

pub fn print_json_or_exit<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(error) => exit_with_error(error),
    }
}
