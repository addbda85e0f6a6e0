use anyhow::Result;
use colored::Colorize;
use rhtmx_resources::{load_table, HttpMethod, RouteEntry, RouteTable};
use std::path::Path;

pub fn execute(config: &Path, json: bool, controller: Option<&str>) -> Result<()> {
    let table = load_table(config)?;

    let routes = filter_routes(&table, controller);

    if json {
        println!("{}", routes_json(&routes)?);
        return Ok(());
    }

    if routes.is_empty() {
        println!("{}", "No routes declared".yellow());
        return Ok(());
    }

    let name_width = routes
        .iter()
        .filter_map(|e| e.name.as_deref())
        .map(str::len)
        .max()
        .unwrap_or(0);
    let pattern_width = routes.iter().map(|e| e.pattern.as_str().len()).max().unwrap_or(0);

    for entry in routes {
        println!(
            "{:>name_width$}  {}  {:<pattern_width$}  {}",
            entry.name.as_deref().unwrap_or("").cyan(),
            method_label(entry.method),
            entry.pattern.as_str(),
            format!("{}#{}", entry.target.controller, entry.target.action).dimmed(),
        );
    }

    Ok(())
}

/// Prints the reverse-registration index
pub fn resources(config: &Path) -> Result<()> {
    let table = load_table(config)?;

    for (identifier, registration) in table.resource_index() {
        println!(
            "{}  {}  [{}]",
            identifier.join(", ").cyan(),
            registration.pattern,
            registration.keys.join(", ").yellow(),
        );
    }

    Ok(())
}

/// Routes whose controller starts with `controller`, or all of them
fn filter_routes<'a>(table: &'a RouteTable, controller: Option<&str>) -> Vec<&'a RouteEntry> {
    table
        .iter()
        .filter(|e| controller.map_or(true, |c| e.target.controller.starts_with(c)))
        .collect()
}

/// JSON for a filtered subset, same shape as the full table
fn routes_json(routes: &[&RouteEntry]) -> Result<String> {
    Ok(RouteTable::from_entries(routes.iter().map(|e| (*e).clone()).collect())?
        .to_json()?)
}

fn method_label(method: HttpMethod) -> String {
    let label = format!("{:<6}", method.as_str());
    match method {
        HttpMethod::Get | HttpMethod::Head | HttpMethod::Options => label.green().to_string(),
        HttpMethod::Post => label.blue().to_string(),
        HttpMethod::Put | HttpMethod::Patch => label.yellow().to_string(),
        HttpMethod::Delete => label.red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhtmx_resources::{ResourceOptions, RouteExpander};

    fn table() -> RouteTable {
        let expander = RouteExpander::new();
        let mut routes = expander.builder();
        routes
            .resources("posts", ResourceOptions::default())
            .unwrap()
            .namespace("admin", |admin| {
                admin.resources("users", ResourceOptions::default())?;
                Ok(())
            })
            .unwrap();
        routes.finish()
    }

    #[test]
    fn test_filter_by_controller_prefix() {
        let table = table();
        assert_eq!(filter_routes(&table, None).len(), 16);

        let admin = filter_routes(&table, Some("admin/"));
        assert_eq!(admin.len(), 8);
        assert!(admin.iter().all(|e| e.target.controller == "admin/users"));

        assert!(filter_routes(&table, Some("comments")).is_empty());
    }

    #[test]
    fn test_filtered_json_keeps_entry_shape() {
        let table = table();
        let routes = filter_routes(&table, Some("posts"));
        let json: serde_json::Value = serde_json::from_str(&routes_json(&routes).unwrap()).unwrap();

        let routes = json.as_array().unwrap();
        assert_eq!(routes.len(), 8);
        assert_eq!(routes[0]["name"], "posts");
        assert_eq!(routes[0]["target"]["controller"], "posts");
    }

    #[test]
    fn test_method_label_is_padded() {
        for method in [HttpMethod::Get, HttpMethod::Post, HttpMethod::Put, HttpMethod::Delete] {
            let label = method_label(method);
            assert!(label.contains(&format!("{:<6}", method.as_str())), "label: {label}");
        }
    }
}
