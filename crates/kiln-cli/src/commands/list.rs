//! Implementation of the `kiln ls` command: list registered projects.

use std::collections::HashMap;

use kiln_core::application::{ProjectService, Repository};
use kiln_core::domain::ClassId;

use crate::{error::CliResult, output::OutputManager};

pub fn execute(repo: &dyn Repository, output: OutputManager) -> CliResult<()> {
    let projects = ProjectService::new(repo).list()?;

    // Resolve class ids to labels for display; a dangling id (class
    // removed after the project was created) is shown as "?".
    let labels: HashMap<ClassId, String> = repo
        .load_all_classes()?
        .into_iter()
        .filter_map(|c| c.id.map(|id| (id, c.label.to_string())))
        .collect();

    output.header(&format!("Projects ({})", projects.len()))?;
    for project in &projects {
        let label = labels
            .get(&project.class_id)
            .map(String::as_str)
            .unwrap_or("?");
        output.print(&format!(
            "  {:<16} {:<12} {}  ({})",
            project.name,
            label,
            project.path.display(),
            project.created_at.format("%Y-%m-%d")
        ))?;
    }
    Ok(())
}
