//! Annotation-driven field lookup and assignment.
//!
//! A destination record type declares, once, which of its fields answer to
//! which `(namespace, key)` annotation by building a [`FieldRegistry`]. The
//! generic [`find_field`], [`get_field`] and [`set_field`] functions then
//! resolve keys against that registry for any record implementing
//! [`Annotated`], checking value kinds before anything is written.
//!
//! # Examples
//!
//! ```
//! use std::sync::OnceLock;
//! use lineconf::fields::{Annotated, FieldRegistry, set_field};
//!
//! #[derive(Default)]
//! struct Daemon {
//!     logdir: String,
//! }
//!
//! impl Annotated for Daemon {
//!     fn registry() -> &'static FieldRegistry<Self> {
//!         static REGISTRY: OnceLock<FieldRegistry<Daemon>> = OnceLock::new();
//!         REGISTRY.get_or_init(|| {
//!             FieldRegistry::builder()
//!                 .bind("conf", "logdir", |d: &Daemon| &d.logdir, |d: &mut Daemon| &mut d.logdir)
//!                 .build()
//!                 .expect("keys are unique")
//!         })
//!     }
//! }
//!
//! let mut daemon = Daemon::default();
//! set_field(&mut daemon, "conf", "logdir", "/var/log/chrony".into()).expect("field bound");
//! assert_eq!(daemon.logdir, "/var/log/chrony");
//! ```

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::value::{FieldKind, FieldType, FieldValue};

/// Errors raised while resolving or assigning annotated fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// No field carries the requested annotation.
    #[error("no field with tag {namespace} and name {key} found")]
    NotFound { namespace: String, key: String },
    /// The value's kind differs from the field's declared kind.
    #[error("field {key} holds {expected} values, got {found}")]
    TypeMismatch {
        key: String,
        expected: FieldKind,
        found: FieldKind,
    },
    /// Two fields were bound to the same annotation.
    #[error("annotation {namespace}:{key} is bound more than once")]
    DuplicateKey { namespace: String, key: String },
}

type Getter<T> = Box<dyn Fn(&T) -> Option<FieldValue> + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, FieldValue) -> Result<(), FieldValue> + Send + Sync>;

/// Association between an annotation and one field of `T`.
pub struct FieldBinding<T> {
    namespace: &'static str,
    key: &'static str,
    kind: FieldKind,
    get: Getter<T>,
    set: Setter<T>,
}

impl<T> FieldBinding<T> {
    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Declared value kind of the field.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Read the field's current value from `record`.
    pub fn get(&self, record: &T) -> Option<FieldValue> {
        (self.get)(record)
    }

    /// Assign `value` to the field of `record`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TypeMismatch`] and leaves `record` untouched if
    /// the kind of `value` differs from [`Self::kind`], or if the field's
    /// type refuses the value.
    pub fn set(&self, record: &mut T, value: FieldValue) -> Result<(), FieldError> {
        if value.kind() != self.kind {
            return Err(self.mismatch(&value));
        }
        (self.set)(record, value).map_err(|rejected| self.mismatch(&rejected))
    }

    fn mismatch(&self, value: &FieldValue) -> FieldError {
        FieldError::TypeMismatch {
            key: self.key.to_owned(),
            expected: self.kind,
            found: value.kind(),
        }
    }
}

impl<T> fmt::Debug for FieldBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("namespace", &self.namespace)
            .field("key", &self.key)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Every annotated field of a record type, in declaration order.
pub struct FieldRegistry<T> {
    bindings: Vec<FieldBinding<T>>,
}

impl<T: 'static> FieldRegistry<T> {
    pub fn builder() -> FieldRegistryBuilder<T> {
        FieldRegistryBuilder {
            bindings: Vec::new(),
        }
    }

    /// Locate the field annotated with `key` under `namespace`.
    ///
    /// Fields without an annotation in `namespace` never match.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotFound`] when no field carries the annotation.
    pub fn find(&self, namespace: &str, key: &str) -> Result<&FieldBinding<T>, FieldError> {
        self.bindings
            .iter()
            .find(|b| b.namespace == namespace && b.key == key)
            .ok_or_else(|| FieldError::NotFound {
                namespace: namespace.to_owned(),
                key: key.to_owned(),
            })
    }

    /// Bindings declared under `namespace`, in declaration order.
    pub fn fields<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a FieldBinding<T>> {
        self.bindings.iter().filter(move |b| b.namespace == namespace)
    }
}

impl<T> fmt::Debug for FieldRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("bindings", &self.bindings)
            .finish()
    }
}

/// Collects bindings for a [`FieldRegistry`].
pub struct FieldRegistryBuilder<T> {
    bindings: Vec<FieldBinding<T>>,
}

impl<T: 'static> FieldRegistryBuilder<T> {
    /// Bind the field reached through `get`/`get_mut` to `key` in `namespace`.
    ///
    /// The field's kind is taken from its Rust type.
    #[must_use]
    pub fn bind<V: FieldType + 'static>(
        mut self,
        namespace: &'static str,
        key: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        self.bindings.push(FieldBinding {
            namespace,
            key,
            kind: V::KIND,
            get: Box::new(move |record: &T| get(record).to_value()),
            set: Box::new(move |record: &mut T, value: FieldValue| {
                *get_mut(record) = V::from_value(value)?;
                Ok(())
            }),
        });
        self
    }

    /// Finish the registry.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::DuplicateKey`] if two fields share an annotation
    /// within the same namespace.
    pub fn build(self) -> Result<FieldRegistry<T>, FieldError> {
        let mut seen = HashSet::new();
        for b in &self.bindings {
            if !seen.insert((b.namespace, b.key)) {
                return Err(FieldError::DuplicateKey {
                    namespace: b.namespace.to_owned(),
                    key: b.key.to_owned(),
                });
            }
        }
        Ok(FieldRegistry {
            bindings: self.bindings,
        })
    }
}

/// A record type whose fields carry annotations.
pub trait Annotated: Sized + 'static {
    /// The registry describing this type's annotated fields.
    ///
    /// Implementations usually build it once and keep it in a static.
    fn registry() -> &'static FieldRegistry<Self>;
}

/// Locate the binding of `T` annotated with `key` under `namespace`.
///
/// Repeated calls with the same arguments return the same binding.
///
/// # Errors
///
/// Returns [`FieldError::NotFound`] when no field carries the annotation.
pub fn find_field<T: Annotated>(
    namespace: &str,
    key: &str,
) -> Result<&'static FieldBinding<T>, FieldError> {
    T::registry().find(namespace, key)
}

/// Read the value of the field of `record` annotated with `key`.
///
/// Unset optional fields read as `Ok(None)`.
///
/// # Errors
///
/// Returns [`FieldError::NotFound`] when no field carries the annotation.
pub fn get_field<T: Annotated>(
    record: &T,
    namespace: &str,
    key: &str,
) -> Result<Option<FieldValue>, FieldError> {
    Ok(find_field::<T>(namespace, key)?.get(record))
}

/// Assign `value` to the field of `record` annotated with `key`.
///
/// # Errors
///
/// Returns [`FieldError::NotFound`] when no field carries the annotation and
/// [`FieldError::TypeMismatch`] when the value has a different kind from the
/// field. `record` is left unchanged on error.
pub fn set_field<T: Annotated>(
    record: &mut T,
    namespace: &str,
    key: &str,
    value: FieldValue,
) -> Result<(), FieldError> {
    find_field::<T>(namespace, key)?.set(record, value)
}
