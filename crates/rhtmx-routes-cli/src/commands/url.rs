use anyhow::{Context, Result};
use rhtmx_resources::load_table;
use std::collections::HashMap;
use std::path::Path;

pub fn execute(config: &Path, name: &str, params: &[String]) -> Result<()> {
    let table = load_table(config)?;

    let params = parse_params(params)?;
    let entry = table
        .by_name(name)
        .with_context(|| format!("No route named '{}'", name))?;
    let url = entry.generate_url(&params).with_context(|| {
        format!("Route '{}' needs parameters: {}", name, entry.keys.join(", "))
    })?;

    println!("{}", url);
    Ok(())
}

fn parse_params(params: &[String]) -> Result<HashMap<String, String>> {
    params
        .iter()
        .map(|param| {
            param
                .split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .with_context(|| format!("Expected key=value, got '{}'", param))
        })
        .collect()
}
