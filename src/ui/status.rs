// Coloured status lines. They go to stderr so stdout carries only JSON.

use colored::Colorize;

pub fn warn(message: &str) {
    eprintln!("{}", format!("Warning: {}", message).yellow().bold());
}

pub fn info(message: &str) {
    eprintln!("{}", message.cyan());
}

pub fn success(message: &str) {
    eprintln!("{}", format!("✔ {}", message).green().bold());
}

pub fn error(message: &str) {
    eprintln!("{}", format!("✘ {}", message).red().bold());
}
