//! Build-once cache of schemas per argument type.
//!
//! The map lock is held only long enough to fetch or insert a slot. The
//! build itself runs inside the slot's `OnceLock`, so concurrent first
//! requests for one type wait for a single build while other types proceed.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, OnceLock, PoisonError};

use argbind_core::{Arguments, Schema, SchemaError};
use tracing::debug;

type Slot = Arc<OnceLock<Result<Arc<Schema>, SchemaError>>>;

static GLOBAL: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::new);

/// Schemas keyed by the identity of the argument type they describe.
///
/// Failed builds are cached too; a type whose declaration is invalid keeps
/// returning the same error.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    slots: Mutex<HashMap<TypeId, Slot>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by [`schema_for`].
    pub fn global() -> &'static SchemaRegistry {
        &GLOBAL
    }

    /// Returns the schema for `T`, building it on first request.
    pub fn get_or_build<T: Arguments>(&self) -> Result<Arc<Schema>, SchemaError> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(TypeId::of::<T>()).or_default())
        };

        slot.get_or_init(|| {
            let built = Schema::build(T::schema_spec()).map(Arc::new);
            match &built {
                Ok(schema) => debug!(
                    ty = type_name::<T>(),
                    fields = schema.descriptors().len(),
                    "Cached schema"
                ),
                Err(err) => debug!(ty = type_name::<T>(), %err, "Cached schema error"),
            }
            built
        })
        .clone()
    }

    /// Number of types requested so far.
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Returns the cached schema for `T` from the global registry.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use argbind_core::{Arguments, FieldSpec, Record, SchemaSpec, Value, ValueError};
/// use argbind_parser::schema_for;
///
/// #[derive(Default)]
/// struct Args {
///     quiet: bool,
/// }
///
/// impl Record for Args {
///     fn assign(&mut self, field: &str, value: Value) -> Result<(), ValueError> {
///         match field {
///             "quiet" => self.quiet = value.try_into()?,
///             other => return Err(ValueError::UnknownField(other.to_string())),
///         }
///         Ok(())
///     }
/// }
///
/// impl Arguments for Args {
///     fn schema_spec() -> SchemaSpec {
///         SchemaSpec::new().with_field(FieldSpec::flag("quiet").with_option("-q"))
///     }
/// }
///
/// let first = schema_for::<Args>().unwrap();
/// let second = schema_for::<Args>().unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
pub fn schema_for<T: Arguments>() -> Result<Arc<Schema>, SchemaError> {
    SchemaRegistry::global().get_or_build::<T>()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use argbind_core::{FieldSpec, Record, SchemaSpec, Value, ValueError};
    use rayon::prelude::*;

    use super::*;

    static BUILDS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Default)]
    struct Counted;

    impl Record for Counted {
        fn assign(&mut self, field: &str, _value: Value) -> Result<(), ValueError> {
            Err(ValueError::UnknownField(field.to_string()))
        }
    }

    impl Arguments for Counted {
        fn schema_spec() -> SchemaSpec {
            BUILDS.fetch_add(1, Ordering::SeqCst);
            SchemaSpec::new().with_field(FieldSpec::int("level").with_option("-l"))
        }
    }

    #[derive(Default)]
    struct Broken;

    impl Record for Broken {
        fn assign(&mut self, field: &str, _value: Value) -> Result<(), ValueError> {
            Err(ValueError::UnknownField(field.to_string()))
        }
    }

    impl Arguments for Broken {
        fn schema_spec() -> SchemaSpec {
            SchemaSpec::new()
                .with_field(FieldSpec::flag("a").with_option("-x"))
                .with_field(FieldSpec::flag("b").with_option("-x"))
        }
    }

    #[test]
    fn test_concurrent_first_use_builds_once() {
        let registry = SchemaRegistry::new();
        let schemas: Vec<Arc<Schema>> = (0..64)
            .into_par_iter()
            .map(|_| registry.get_or_build::<Counted>().unwrap())
            .collect();

        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
        assert!(schemas.iter().all(|s| Arc::ptr_eq(s, &schemas[0])));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_errors_are_cached() {
        let registry = SchemaRegistry::new();
        assert!(registry.is_empty());

        let first = registry.get_or_build::<Broken>().unwrap_err();
        let second = registry.get_or_build::<Broken>().unwrap_err();
        assert_eq!(first, second);
        assert!(matches!(first, SchemaError::DuplicateOption { .. }));
    }
}
