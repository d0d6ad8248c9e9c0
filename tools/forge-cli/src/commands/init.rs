//! Initialize a new storefront project.

use anyhow::{bail, Result};
use dialoguer::{Input, MultiSelect};

use super::InitArgs;
use crate::context::{Context, CONFIG_FILE};

/// Modules shipped with the framework, offered during scaffolding.
const AVAILABLE_MODULES: &[&str] = &["catalog", "cart", "checkout-redirect", "search", "blog"];

/// Modules enabled when the user accepts defaults.
const DEFAULT_MODULES: &[&str] = &["catalog", "cart"];

const DEFAULT_ENDPOINT: &str = "https://shop.example.com";

/// Run the init command.
pub async fn run(args: InitArgs, ctx: &Context) -> Result<()> {
    let name = if args.name == "." {
        // Use current directory name
        ctx.cwd
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("my-storefront")
            .to_string()
    } else {
        args.name.clone()
    };

    ctx.output.header(&format!("Initializing storefront: {}", name));

    let target_dir = if args.name == "." {
        ctx.cwd.clone()
    } else {
        ctx.cwd.join(&args.name)
    };

    // Check if directory exists and is not empty
    if target_dir.exists() && target_dir.read_dir()?.next().is_some() && args.name != "." {
        bail!("Directory '{}' already exists and is not empty", args.name);
    }

    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        ctx.output
            .debug(&format!("Created directory: {}", target_dir.display()));
    }

    let endpoint = resolve_endpoint(&args)?;
    let modules = resolve_modules(&args, ctx)?;

    ctx.output.step(1, 4, &format!("Creating {CONFIG_FILE}"));
    std::fs::write(
        target_dir.join(CONFIG_FILE),
        generate_config(&endpoint, &modules),
    )?;

    ctx.output.step(2, 4, "Creating .env.example");
    std::fs::write(
        target_dir.join(".env.example"),
        generate_env_example(&endpoint),
    )?;

    ctx.output.step(3, 4, "Creating .gitignore");
    std::fs::write(target_dir.join(".gitignore"), "/target\n.env.local\n.env\n")?;

    ctx.output.step(4, 4, "Done!");
    ctx.output
        .success(&format!("Storefront '{}' initialized successfully", name));
    ctx.output.info("");
    ctx.output.info("Next steps:");
    if args.name != "." {
        ctx.output.list_item(&format!("cd {}", args.name));
    }
    ctx.output
        .list_item("cp .env.example .env.local  # fill in your API keys");
    ctx.output.list_item("storeforge doctor");

    Ok(())
}

fn resolve_endpoint(args: &InitArgs) -> Result<String> {
    if let Some(endpoint) = &args.endpoint {
        return Ok(endpoint.clone());
    }
    if args.yes {
        return Ok(DEFAULT_ENDPOINT.to_string());
    }
    let endpoint: String = Input::new()
        .with_prompt("WooCommerce store URL")
        .default(DEFAULT_ENDPOINT.to_string())
        .interact_text()?;
    Ok(endpoint)
}

fn resolve_modules(args: &InitArgs, ctx: &Context) -> Result<Vec<String>> {
    if !args.modules.is_empty() {
        for module in &args.modules {
            if !AVAILABLE_MODULES.contains(&module.as_str()) {
                ctx.output
                    .warn(&format!("Unknown module '{}', enabling anyway", module));
            }
        }
        return Ok(args.modules.clone());
    }
    if args.yes {
        return Ok(DEFAULT_MODULES.iter().map(|m| m.to_string()).collect());
    }

    let defaults: Vec<bool> = AVAILABLE_MODULES
        .iter()
        .map(|m| DEFAULT_MODULES.contains(m))
        .collect();
    let selected = MultiSelect::new()
        .with_prompt("Modules to enable")
        .items(AVAILABLE_MODULES)
        .defaults(&defaults)
        .interact()?;
    Ok(selected
        .into_iter()
        .map(|i| AVAILABLE_MODULES[i].to_string())
        .collect())
}

fn generate_config(endpoint: &str, modules: &[String]) -> String {
    let module_list = modules
        .iter()
        .map(|m| format!("\"{m}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"# StoreForge storefront configuration.
# Credentials are read from WOO_KEY / WOO_SECRET, see .env.example.

modules = [{module_list}]

[adapter]
name = "woo-rest"
endpoint = "{endpoint}"

[theme]
core = "base"

[cache]
strategy = "timed"

[cache.revalidate]
products = 60
categories = 300
"#
    )
}

fn generate_env_example(endpoint: &str) -> String {
    format!(
        r#"# WooCommerce REST API credentials.
# Copy to .env.local and fill in real values.
WOO_URL={endpoint}
WOO_KEY=ck_your-consumer-key
WOO_SECRET=cs_your-consumer-secret
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_is_valid() {
        let text = generate_config(
            "https://shop.example.com",
            &["catalog".to_string(), "cart".to_string()],
        );
        let config = forge_core::config::parse_config(&text).unwrap();
        assert_eq!(config.adapter.name, "woo-rest");
        assert_eq!(config.adapter.endpoint, "https://shop.example.com");
        assert_eq!(config.modules, vec!["catalog", "cart"]);
        assert_eq!(config.theme.core, "base");
        assert_eq!(
            config.cache.as_ref().unwrap().revalidate_for("products"),
            Some(60)
        );
    }

    #[test]
    fn test_generated_config_with_no_modules() {
        let text = generate_config("https://shop.example.com", &[]);
        let config = forge_core::config::parse_config(&text).unwrap();
        assert!(config.modules.is_empty());
    }

    #[test]
    fn test_env_example_lists_all_variables() {
        let text = generate_env_example("https://shop.example.com");
        assert!(text.contains("WOO_URL=https://shop.example.com"));
        assert!(text.contains("WOO_KEY="));
        assert!(text.contains("WOO_SECRET="));
    }
}
