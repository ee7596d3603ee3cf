//! In-memory repository for tests and ephemeral runs.

use std::path::Path;
use std::sync::{Arc, RwLock};

use kiln_core::application::ports::Repository;
use kiln_core::domain::{Class, ClassId, Project};
use kiln_core::error::KilnResult;

use super::store::Store;

/// Thread-safe in-memory repository, seeded with the reserved class.
///
/// Clones share the underlying store.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    inner: Arc<RwLock<Store>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Store> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Store> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Repository for MemoryRepository {
    fn load_class(&self, id: ClassId) -> KilnResult<Class> {
        self.read().load_class(id)
    }

    fn load_class_by_label(&self, label: &str) -> KilnResult<Class> {
        self.read().load_class_by_label(label)
    }

    fn class_id_by_label(&self, label: &str) -> KilnResult<ClassId> {
        self.read().class_id_by_label(label)
    }

    fn save_class(&self, class: &mut Class) -> KilnResult<()> {
        self.write().save_class(class)
    }

    fn remove_class(&self, id: ClassId) -> KilnResult<()> {
        self.write().remove_class(id)
    }

    fn load_all_classes(&self) -> KilnResult<Vec<Class>> {
        Ok(self.read().load_all_classes())
    }

    fn save_project(&self, project: &mut Project) -> KilnResult<()> {
        self.write().save_project(project)
    }

    fn load_project(&self, path: &Path) -> KilnResult<Project> {
        self.read().load_project(path)
    }

    fn load_all_projects(&self) -> KilnResult<Vec<Project>> {
        Ok(self.read().load_all_projects())
    }

    fn remove_project(&self, path: &Path) -> KilnResult<()> {
        self.write().remove_project(path)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::application::ApplicationError;
    use kiln_core::domain::FolderEntry;
    use kiln_core::error::KilnError;
    use std::path::PathBuf;

    fn sample(label: &str) -> Class {
        Class::builder(label, "Example")
            .folder(FolderEntry::empty("src/"))
            .build()
            .unwrap()
    }

    #[test]
    fn fresh_repository_contains_the_reserved_class() {
        let repo = MemoryRepository::new();
        let class = repo.load_class(ClassId::RESERVED).unwrap();
        assert!(class.is_default);
        assert_eq!(repo.load_all_classes().unwrap().len(), 1);
    }

    #[test]
    fn save_assigns_sequential_ids_above_reserved() {
        let repo = MemoryRepository::new();
        let mut a = sample("a");
        let mut b = sample("b");
        repo.save_class(&mut a).unwrap();
        repo.save_class(&mut b).unwrap();
        assert_eq!(a.id, Some(ClassId(2)));
        assert_eq!(b.id, Some(ClassId(3)));
    }

    #[test]
    fn label_lookup_is_case_insensitive() {
        let repo = MemoryRepository::new();
        let mut class = sample("foo");
        repo.save_class(&mut class).unwrap();

        assert_eq!(
            repo.class_id_by_label("Foo").unwrap(),
            repo.class_id_by_label("foo").unwrap()
        );
        assert_eq!(repo.class_id_by_label("FOO").unwrap(), class.id.unwrap());
    }

    #[test]
    fn unknown_label_is_not_found() {
        let repo = MemoryRepository::new();
        let err = repo.class_id_by_label("nope").unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::NotFound { .. })
        ));
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let repo = MemoryRepository::new();
        repo.save_class(&mut sample("dup")).unwrap();
        let err = repo.save_class(&mut sample("dup")).unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn resaving_a_stored_class_updates_in_place() {
        let repo = MemoryRepository::new();
        let mut class = sample("exp");
        repo.save_class(&mut class).unwrap();

        class.name = "Renamed".into();
        repo.save_class(&mut class).unwrap();

        assert_eq!(repo.load_class_by_label("exp").unwrap().name, "Renamed");
        assert_eq!(repo.load_all_classes().unwrap().len(), 2);
    }

    #[test]
    fn removing_reserved_class_always_fails_protected() {
        let repo = MemoryRepository::new();
        let err = repo.remove_class(ClassId::RESERVED).unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::Protected { id: 1 })
        ));
        assert!(repo.load_class(ClassId::RESERVED).is_ok());
    }

    #[test]
    fn duplicate_project_path_is_already_exists() {
        let repo = MemoryRepository::new();
        let mut first = Project::new("demo", "/work/demo", ClassId(2)).unwrap();
        repo.save_project(&mut first).unwrap();

        let mut second = Project::new("other", "/work/demo", ClassId(3)).unwrap();
        let err = repo.save_project(&mut second).unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn remove_project_deletes_the_record_by_path() {
        let repo = MemoryRepository::new();
        let mut project = Project::new("demo", "/work/demo", ClassId(2)).unwrap();
        repo.save_project(&mut project).unwrap();

        repo.remove_project(&PathBuf::from("/work/demo")).unwrap();
        assert!(repo.load_project(Path::new("/work/demo")).is_err());
        assert!(repo.remove_project(Path::new("/work/demo")).is_err());
    }
}
