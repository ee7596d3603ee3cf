//! Shared store semantics behind the repository adapters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use kiln_core::application::ApplicationError;
use kiln_core::domain::{Class, ClassId, Project, ProjectId};
use kiln_core::error::{KilnError, KilnResult};

/// The keyed class/project state, independent of where it lives.
///
/// Serialization covers the whole store so [`super::FileRepository`] can
/// snapshot it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    classes: Vec<Class>,
    projects: Vec<Project>,
    next_class_id: i64,
    next_project_id: i64,
}

impl Default for Store {
    /// A fresh store always contains the reserved class.
    fn default() -> Self {
        Self {
            classes: vec![Class::reserved()],
            projects: Vec::new(),
            next_class_id: ClassId::RESERVED.0 + 1,
            next_project_id: 1,
        }
    }
}

impl Store {
    // ── classes ───────────────────────────────────────────────────────────

    pub fn load_class(&self, id: ClassId) -> KilnResult<Class> {
        self.classes
            .iter()
            .find(|c| c.id == Some(id))
            .cloned()
            .ok_or_else(|| not_found("class", id.to_string()))
    }

    pub fn class_id_by_label(&self, label: &str) -> KilnResult<ClassId> {
        let needle = label.trim().to_lowercase();
        self.classes
            .iter()
            .find(|c| c.label.as_str() == needle)
            .and_then(|c| c.id)
            .ok_or_else(|| not_found("class", label.to_string()))
    }

    pub fn load_class_by_label(&self, label: &str) -> KilnResult<Class> {
        let id = self.class_id_by_label(label)?;
        self.load_class(id)
    }

    pub fn save_class(&mut self, class: &mut Class) -> KilnResult<()> {
        class.validate()?;

        let duplicate_label = self
            .classes
            .iter()
            .any(|c| c.label == class.label && c.id != class.id);
        if duplicate_label {
            return Err(ApplicationError::AlreadyExists {
                path: class.label.as_str().into(),
            }
            .into());
        }

        match class.id {
            Some(id) => {
                let stored = self
                    .classes
                    .iter_mut()
                    .find(|c| c.id == Some(id))
                    .ok_or_else(|| not_found("class", id.to_string()))?;
                *stored = class.clone();
            }
            None => {
                class.id = Some(ClassId(self.next_class_id));
                self.next_class_id += 1;
                self.classes.push(class.clone());
            }
        }
        Ok(())
    }

    pub fn remove_class(&mut self, id: ClassId) -> KilnResult<()> {
        if id.is_reserved() {
            return Err(ApplicationError::Protected { id: id.0 }.into());
        }
        let before = self.classes.len();
        self.classes.retain(|c| c.id != Some(id));
        if self.classes.len() == before {
            return Err(not_found("class", id.to_string()));
        }
        Ok(())
    }

    pub fn load_all_classes(&self) -> Vec<Class> {
        self.classes.clone()
    }

    // ── projects ──────────────────────────────────────────────────────────

    pub fn save_project(&mut self, project: &mut Project) -> KilnResult<()> {
        if self.projects.iter().any(|p| p.path == project.path) {
            return Err(ApplicationError::AlreadyExists {
                path: project.path.clone(),
            }
            .into());
        }
        project.id = Some(ProjectId(self.next_project_id));
        self.next_project_id += 1;
        self.projects.push(project.clone());
        Ok(())
    }

    pub fn load_project(&self, path: &Path) -> KilnResult<Project> {
        self.projects
            .iter()
            .find(|p| p.path == path)
            .cloned()
            .ok_or_else(|| not_found("project", path.display().to_string()))
    }

    pub fn load_all_projects(&self) -> Vec<Project> {
        self.projects.clone()
    }

    pub fn remove_project(&mut self, path: &Path) -> KilnResult<()> {
        let before = self.projects.len();
        self.projects.retain(|p| p.path != path);
        if self.projects.len() == before {
            return Err(not_found("project", path.display().to_string()));
        }
        Ok(())
    }
}

fn not_found(what: &'static str, key: String) -> KilnError {
    ApplicationError::NotFound { what, key }.into()
}
