//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::{Settings, API_KEY_ENV_VARS};
use console::style;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Nexus Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let sections = [
        ("External Tools", vec![check_tesseract(settings)]),
        ("API Configuration", vec![check_api_key(settings), check_endpoint(settings)]),
        ("Directories", vec![check_upload_dir(settings)]),
        ("Configuration", vec![check_config_file()]),
    ];

    let mut errors = 0;
    let mut warnings = 0;
    for (title, checks) in &sections {
        println!("{}", style(title).bold());
        for check in checks {
            check.print();
            match check.status {
                CheckStatus::Error => errors += 1,
                CheckStatus::Warning => warnings += 1,
                CheckStatus::Ok => {}
            }
        }
        println!();
    }

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Nexus.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Nexus is ready to use.");
    }

    Ok(())
}

/// Check that the tesseract binary runs.
fn check_tesseract(settings: &Settings) -> CheckResult {
    let cmd = &settings.ocr.tesseract_cmd;
    let hint = install_hint_tesseract();

    match Command::new(cmd).arg("--version").output() {
        Ok(output) if output.status.success() => {
            // Older releases print the version on stderr.
            let text = if output.stdout.is_empty() {
                output.stderr
            } else {
                output.stdout
            };
            let version = String::from_utf8_lossy(&text)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();
            CheckResult::ok("tesseract", &truncate(&version, 50))
        }
        Ok(_) => CheckResult::error("tesseract", "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error("tesseract", &format!("{} not found", cmd), hint)
        }
        Err(e) => CheckResult::error("tesseract", &format!("error: {}", e), hint),
    }
}

/// Check that an API key is configured, without printing it.
fn check_api_key(settings: &Settings) -> CheckResult {
    let name = API_KEY_ENV_VARS[0];
    let set_hint = format!("Set with: export {}='gsk_...'", name);

    match settings.api_key() {
        Some(key) if key.chars().count() > 12 => {
            let chars: Vec<char> = key.chars().collect();
            let masked = format!(
                "{}...{}",
                chars[..4].iter().collect::<String>(),
                chars[chars.len() - 4..].iter().collect::<String>()
            );
            if key.starts_with("gsk_") {
                CheckResult::ok(name, &format!("configured ({})", masked))
            } else {
                CheckResult::warning(
                    name,
                    &format!("configured ({}) but format looks unusual", masked),
                    "Groq keys start with gsk_; ignore this for other providers",
                )
            }
        }
        Some(_) => CheckResult::warning(name, "set but suspiciously short", &set_hint),
        None => CheckResult::error(name, "not set", &set_hint),
    }
}

fn check_endpoint(settings: &Settings) -> CheckResult {
    match url::Url::parse(&settings.completion.api_base) {
        Ok(_) => CheckResult::ok(
            "Completion endpoint",
            &format!(
                "{} ({})",
                settings.completion.api_base, settings.completion.model
            ),
        ),
        Err(e) => CheckResult::error(
            "Completion endpoint",
            &format!("invalid URL: {}", e),
            "Fix completion.api_base in the config file",
        ),
    }
}

fn check_upload_dir(settings: &Settings) -> CheckResult {
    let dir = settings.upload_dir();
    if dir.exists() {
        let count = std::fs::read_dir(&dir).map(|d| d.count()).unwrap_or(0);
        CheckResult::ok(
            "Upload directory",
            &format!("{} ({} files)", dir.display(), count),
        )
    } else {
        CheckResult::warning(
            "Upload directory",
            &format!("{} (will be created)", dir.display()),
            "Directory will be created on first use",
        )
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: nexus config init",
        )
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Platform-specific install hint for tesseract.
fn install_hint_tesseract() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install tesseract"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install tesseract-ocr (or set TESSERACT_CMD)"
    } else {
        "Install from: https://github.com/UB-Mannheim/tesseract/wiki (or set TESSERACT_CMD)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_api_key_is_masked() {
        let mut settings = Settings::default();
        settings.completion.api_key = Some("gsk_abcdefghijklmnop1234".to_string());
        let result = check_api_key(&settings);
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.contains("gsk_...1234"));
        assert!(!result.message.contains("abcdefgh"));
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let result = check_api_key(&Settings::default());
        assert_eq!(result.status, CheckStatus::Error);
    }

    #[test]
    fn test_missing_tesseract_is_an_error() {
        let mut settings = Settings::default();
        settings.ocr.tesseract_cmd = "nexus-no-such-binary".to_string();
        assert_eq!(check_tesseract(&settings).status, CheckStatus::Error);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 50), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
