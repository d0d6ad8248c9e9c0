//! Add a module or child theme to an existing project.
//!
//! Both operations patch `storeforge.toml` with targeted text edits rather
//! than re-serializing the whole file, so comments and formatting survive.

use anyhow::{bail, Context as _, Result};

use super::{AddArgs, AddTarget};
use crate::context::Context;

/// Run the add command.
pub async fn run(args: AddArgs, ctx: &Context) -> Result<()> {
    let config_path = ctx.config_path()?;
    let text = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    match args.target {
        AddTarget::Module { name } => match enable_module(&text, &name)? {
            ModulePatch::AlreadyEnabled => {
                ctx.output
                    .warn(&format!("Module '{}' is already enabled", name));
            }
            ModulePatch::Updated(patched) => {
                std::fs::write(&config_path, patched)
                    .with_context(|| format!("Failed to write {}", config_path.display()))?;
                ctx.output.success(&format!("Module '{}' enabled", name));
            }
        },
        AddTarget::Theme { name } => {
            let patched = set_child_theme(&text, &name);
            std::fs::write(&config_path, patched)
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
            ctx.output.success(&format!("Child theme set to '{}'", name));
        }
    }

    Ok(())
}

/// Result of patching the module list.
enum ModulePatch {
    Updated(String),
    AlreadyEnabled,
}

/// Insert `name` into the `modules = [...]` list. A missing list is created
/// at the top of the file; enabling an already-listed module is a no-op.
fn enable_module(text: &str, name: &str) -> Result<ModulePatch> {
    let mut lines: Vec<String> = text.lines().map(String::from).collect();

    let Some(index) = lines.iter().position(|line| is_modules_line(line)) else {
        let patched = format!("modules = [\"{name}\"]\n\n{text}");
        return Ok(ModulePatch::Updated(patched));
    };

    let line = lines[index].clone();
    let (open, close) = match (line.find('['), line.rfind(']')) {
        (Some(open), Some(close)) if open < close => (open, close),
        _ => bail!("The modules list spans multiple lines; edit storeforge.toml manually"),
    };

    let entries: Vec<&str> = line[open + 1..close]
        .split(',')
        .map(|entry| entry.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|entry| !entry.is_empty())
        .collect();
    if entries.contains(&name) {
        return Ok(ModulePatch::AlreadyEnabled);
    }

    let mut updated: Vec<String> = entries.iter().map(|e| format!("\"{e}\"")).collect();
    updated.push(format!("\"{name}\""));
    lines[index] = format!(
        "{}[{}]{}",
        &line[..open],
        updated.join(", "),
        &line[close + 1..]
    );

    Ok(ModulePatch::Updated(rejoin(lines, text)))
}

/// Set the `child` key of the `[theme]` section, replacing an existing value
/// or appending the section when the file has none.
fn set_child_theme(text: &str, name: &str) -> String {
    let mut lines: Vec<String> = text.lines().map(String::from).collect();
    let child_line = format!("child = \"{name}\"");

    let Some(header) = lines.iter().position(|line| line.trim() == "[theme]") else {
        let mut patched = text.to_string();
        if !patched.is_empty() && !patched.ends_with('\n') {
            patched.push('\n');
        }
        patched.push_str(&format!("\n[theme]\n{child_line}\n"));
        return patched;
    };

    let section_end = lines[header + 1..]
        .iter()
        .position(|line| line.trim_start().starts_with('['))
        .map(|offset| header + 1 + offset)
        .unwrap_or(lines.len());

    let existing = lines[header + 1..section_end].iter().position(|line| {
        let trimmed = line.trim_start();
        trimmed.starts_with("child") && trimmed[5..].trim_start().starts_with('=')
    });
    if let Some(offset) = existing {
        lines[header + 1 + offset] = child_line;
        return rejoin(lines, text);
    }

    // Insert after the last non-blank line of the section.
    let insert_at = lines[header + 1..section_end]
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map(|offset| header + 1 + offset + 1)
        .unwrap_or(header + 1);
    lines.insert(insert_at, child_line);
    rejoin(lines, text)
}

fn is_modules_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed
        .strip_prefix("modules")
        .map(|rest| rest.trim_start().starts_with('='))
        .unwrap_or(false)
}

fn rejoin(lines: Vec<String>, original: &str) -> String {
    let mut text = lines.join("\n");
    if original.ends_with('\n') {
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"# storefront config
modules = ["catalog", "cart"]

[adapter]
name = "woo-rest"
endpoint = "https://shop.example.com"

[theme]
core = "base"
"#;

    // === Modules ===

    #[test]
    fn test_enable_module_appends_to_list() {
        let patched = match enable_module(CONFIG, "search").unwrap() {
            ModulePatch::Updated(text) => text,
            ModulePatch::AlreadyEnabled => panic!("expected update"),
        };
        assert!(patched.contains(r#"modules = ["catalog", "cart", "search"]"#));
        // Comments and other sections survive.
        assert!(patched.starts_with("# storefront config"));
        assert!(patched.contains("endpoint = \"https://shop.example.com\""));
    }

    #[test]
    fn test_enable_module_duplicate_is_noop() {
        assert!(matches!(
            enable_module(CONFIG, "cart").unwrap(),
            ModulePatch::AlreadyEnabled
        ));
    }

    #[test]
    fn test_enable_module_into_empty_list() {
        let config = "modules = []\n";
        let patched = match enable_module(config, "cart").unwrap() {
            ModulePatch::Updated(text) => text,
            ModulePatch::AlreadyEnabled => panic!("expected update"),
        };
        assert_eq!(patched, "modules = [\"cart\"]\n");
    }

    #[test]
    fn test_enable_module_creates_missing_list() {
        let config = "[adapter]\nname = \"woo-rest\"\n";
        let patched = match enable_module(config, "cart").unwrap() {
            ModulePatch::Updated(text) => text,
            ModulePatch::AlreadyEnabled => panic!("expected update"),
        };
        assert!(patched.starts_with("modules = [\"cart\"]\n"));
        assert!(patched.contains("[adapter]"));
    }

    #[test]
    fn test_enable_module_rejects_multiline_list() {
        let config = "modules = [\n  \"catalog\",\n]\n";
        assert!(enable_module(config, "cart").is_err());
    }

    // === Theme ===

    #[test]
    fn test_set_child_theme_inserts_into_section() {
        let patched = set_child_theme(CONFIG, "midnight");
        assert!(patched.contains("[theme]\ncore = \"base\"\nchild = \"midnight\"\n"));
    }

    #[test]
    fn test_set_child_theme_replaces_existing() {
        let config = "[theme]\ncore = \"base\"\nchild = \"daylight\"\n";
        let patched = set_child_theme(config, "midnight");
        assert_eq!(patched, "[theme]\ncore = \"base\"\nchild = \"midnight\"\n");
    }

    #[test]
    fn test_set_child_theme_appends_missing_section() {
        let config = "modules = []\n";
        let patched = set_child_theme(config, "midnight");
        assert_eq!(patched, "modules = []\n\n[theme]\nchild = \"midnight\"\n");
    }

    #[test]
    fn test_set_child_theme_stops_at_next_section() {
        let config = "[theme]\ncore = \"base\"\n\n[cache]\nstrategy = \"timed\"\n";
        let patched = set_child_theme(config, "midnight");
        assert!(patched.contains("core = \"base\"\nchild = \"midnight\""));
        // The cache section is untouched.
        assert!(patched.contains("[cache]\nstrategy = \"timed\""));
    }
}
