use crate::models::Session;
use colored::*;
use serde_json::Value;

/// Print a response body, pretty-printed when it is JSON.
pub fn display_body(body: &[u8]) {
    if body.is_empty() {
        println!("{}", "(empty response)".dimmed());
        return;
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(json) => match serde_json::to_string_pretty(&json) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", String::from_utf8_lossy(body)),
        },
        Err(_) => println!("{}", String::from_utf8_lossy(body)),
    }
}

pub fn display_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(pretty) => println!("{}", pretty),
        Err(_) => println!("{}", value),
    }
}

/// Show a session's profile. Tokens are masked.
pub fn display_session(session: &Session) {
    println!("{} {}", "User:".cyan(), session.id);
    if let Some(name) = &session.name {
        println!("{} {}", "Name:".cyan(), name);
    }
    if let Some(phone) = &session.phone_number {
        println!("{} {}", "Phone:".cyan(), phone);
    }
    if let Some(email) = &session.email {
        println!("{} {}", "Email:".cyan(), email);
    }
    if let Some(role) = &session.role {
        println!("{} {}", "Role:".cyan(), role);
    }
    println!(
        "{} {}",
        "Verified:".cyan(),
        if session.is_verified { "yes" } else { "no" }
    );
    println!(
        "{} {}",
        "Notifications:".cyan(),
        if session.notifications_enabled { "on" } else { "off" }
    );
    println!("{} {}", "Access token:".cyan(), mask_token(&session.access_token).dimmed());
}

/// Keep only the last four characters of a token.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

pub fn display_success(message: &str) {
    println!("{}", message.green());
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", "Error:".red(), message);
}
