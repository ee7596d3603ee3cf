//! Class use cases: import, removal, listing.
//!
//! Orchestration only - the import strategies themselves live behind the
//! [`ClassSource`] port and the store behind [`Repository`].

use tracing::{info, instrument};

use crate::application::error::ApplicationError;
use crate::application::ports::{ClassSource, Repository};
use crate::domain::{Class, ClassId};
use crate::error::KilnResult;

/// Service for managing stored classes.
pub struct ClassService<'a> {
    repo: &'a dyn Repository,
}

impl<'a> ClassService<'a> {
    pub fn new(repo: &'a dyn Repository) -> Self {
        Self { repo }
    }

    /// Import a class from a source and register it.
    ///
    /// The source produces a fully-formed class or fails; nothing is
    /// persisted on failure, so a broken config or unreachable directory
    /// never leaves a partial class behind.
    #[instrument(skip_all, fields(source = %source.describe()))]
    pub fn import_from(&self, source: &dyn ClassSource) -> KilnResult<Class> {
        let mut class = source.import()?;
        class.validate()?;
        self.repo.save_class(&mut class)?;
        info!(label = %class.label, "class imported");
        Ok(class)
    }

    /// Remove a class by label.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no class carries the label
    /// - `Protected` for the reserved class - it is never removed
    #[instrument(skip(self))]
    pub fn remove_by_label(&self, label: &str) -> KilnResult<ClassId> {
        let id = self.repo.class_id_by_label(label)?;
        if id.is_reserved() {
            return Err(ApplicationError::Protected { id: id.0 }.into());
        }
        self.repo.remove_class(id)?;
        info!(label, %id, "class removed");
        Ok(id)
    }

    /// Remove every class except the reserved one. Returns the number
    /// removed.
    pub fn remove_all(&self) -> KilnResult<usize> {
        let mut removed = 0;
        for class in self.repo.load_all_classes()? {
            let Some(id) = class.id else { continue };
            if id.is_reserved() {
                continue;
            }
            self.repo.remove_class(id)?;
            removed += 1;
        }
        Ok(removed)
    }

    /// All stored classes, reserved class included.
    pub fn list(&self) -> KilnResult<Vec<Class>> {
        self.repo.load_all_classes()
    }

    /// Load one class by label.
    pub fn get(&self, label: &str) -> KilnResult<Class> {
        self.repo.load_class_by_label(label)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockRepository;
    use crate::domain::FolderEntry;
    use crate::error::KilnError;

    struct FixedSource(KilnResult<Class>);

    impl ClassSource for FixedSource {
        fn describe(&self) -> String {
            "fixture".into()
        }

        fn import(&self) -> KilnResult<Class> {
            match &self.0 {
                Ok(class) => Ok(class.clone()),
                Err(e) => Err(e.clone()),
            }
        }
    }

    fn sample_class() -> Class {
        Class::builder("exp", "Example")
            .folder(FolderEntry::empty("src/"))
            .build()
            .unwrap()
    }

    #[test]
    fn import_saves_the_produced_class() {
        let mut repo = MockRepository::new();
        repo.expect_save_class()
            .times(1)
            .returning(|class: &mut Class| {
                class.id = Some(ClassId(2));
                Ok(())
            });

        let source = FixedSource(Ok(sample_class()));
        let class = ClassService::new(&repo).import_from(&source).unwrap();
        assert_eq!(class.id, Some(ClassId(2)));
    }

    #[test]
    fn failed_import_never_touches_the_repository() {
        let mut repo = MockRepository::new();
        repo.expect_save_class().times(0);

        let source = FixedSource(Err(ApplicationError::ImportError {
            source_name: "bad.toml".into(),
            reason: "missing label".into(),
        }
        .into()));

        let err = ClassService::new(&repo).import_from(&source).unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::ImportError { .. })
        ));
    }

    #[test]
    fn removing_reserved_class_is_protected() {
        let mut repo = MockRepository::new();
        repo.expect_class_id_by_label()
            .returning(|_| Ok(ClassId::RESERVED));
        repo.expect_remove_class().times(0);

        let err = ClassService::new(&repo)
            .remove_by_label("default")
            .unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::Protected { id: 1 })
        ));
    }

    #[test]
    fn remove_by_label_resolves_then_removes() {
        let mut repo = MockRepository::new();
        repo.expect_class_id_by_label()
            .returning(|_| Ok(ClassId(7)));
        repo.expect_remove_class()
            .withf(|id| *id == ClassId(7))
            .times(1)
            .returning(|_| Ok(()));

        let id = ClassService::new(&repo).remove_by_label("exp").unwrap();
        assert_eq!(id, ClassId(7));
    }

    #[test]
    fn remove_all_skips_the_reserved_class() {
        let mut repo = MockRepository::new();
        repo.expect_load_all_classes().returning(|| {
            let mut a = sample_class();
            a.id = Some(ClassId(2));
            let mut b = sample_class();
            b.id = Some(ClassId(3));
            b.label = crate::domain::Label::new("other").unwrap();
            Ok(vec![Class::reserved(), a, b])
        });
        repo.expect_remove_class()
            .withf(|id| !id.is_reserved())
            .times(2)
            .returning(|_| Ok(()));

        let removed = ClassService::new(&repo).remove_all().unwrap();
        assert_eq!(removed, 2);
    }
}
