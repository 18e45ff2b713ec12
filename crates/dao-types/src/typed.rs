//! Null-aware typed reads over deferred value sources.
//!
//! A [`ValueSource`] answers two questions on demand: is the value null, and
//! what is the raw value. Nothing is copied out up front, so a source bound
//! to a result column or a parameter always reflects the current row or the
//! current read index. [`TypedValue`] derives every typed read from those two
//! accessors through the [`FromSqlValue`] table.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::TypeError;
use crate::from_sql::FromSqlValue;
use crate::value::SqlValue;

/// A value that can be inspected lazily.
pub trait ValueSource {
    /// Whether the current value is SQL NULL.
    fn is_null(&self) -> bool;

    /// The current raw value.
    fn raw_value(&self) -> SqlValue;
}

impl ValueSource for SqlValue {
    fn is_null(&self) -> bool {
        SqlValue::is_null(self)
    }

    fn raw_value(&self) -> SqlValue {
        self.clone()
    }
}

impl<S: ValueSource + ?Sized> ValueSource for &S {
    fn is_null(&self) -> bool {
        (**self).is_null()
    }

    fn raw_value(&self) -> SqlValue {
        (**self).raw_value()
    }
}

impl<S: ValueSource + ?Sized> ValueSource for Rc<S> {
    fn is_null(&self) -> bool {
        (**self).is_null()
    }

    fn raw_value(&self) -> SqlValue {
        (**self).raw_value()
    }
}

/// Typed reads available on every [`ValueSource`].
pub trait TypedValue: ValueSource {
    /// Read the value as `T`; NULL reads as `T`'s null default.
    fn get<T: FromSqlValue>(&self) -> Result<T, TypeError> {
        if self.is_null() {
            Ok(T::null_default())
        } else {
            T::from_sql_value(&self.raw_value())
        }
    }

    /// Read the value as `T`; NULL reads as `default`.
    fn get_or<T: FromSqlValue>(&self, default: T) -> Result<T, TypeError> {
        if self.is_null() {
            Ok(default)
        } else {
            T::from_sql_value(&self.raw_value())
        }
    }

    /// A reusable reader projecting this source onto `T`.
    fn reader<T: FromSqlValue>(&self) -> TypedReader<&Self, T> {
        TypedReader::new(self)
    }
}

impl<S: ValueSource + ?Sized> TypedValue for S {}

/// A [`ValueSource`] built from two closures.
///
/// ```
/// use dao_types::{FnValue, SqlValue, TypedValue};
///
/// let source = FnValue::new(|| false, || SqlValue::Int(3));
/// assert_eq!(source.get::<i64>().unwrap(), 3);
/// ```
pub struct FnValue<N, V> {
    is_null: N,
    raw_value: V,
}

impl<N, V> FnValue<N, V>
where
    N: Fn() -> bool,
    V: Fn() -> SqlValue,
{
    /// Create a source from a null test and a raw value accessor.
    pub fn new(is_null: N, raw_value: V) -> Self {
        Self { is_null, raw_value }
    }
}

impl<N, V> ValueSource for FnValue<N, V>
where
    N: Fn() -> bool,
    V: Fn() -> SqlValue,
{
    fn is_null(&self) -> bool {
        (self.is_null)()
    }

    fn raw_value(&self) -> SqlValue {
        (self.raw_value)()
    }
}

impl<N, V> fmt::Debug for FnValue<N, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValue").finish_non_exhaustive()
    }
}

/// A projection of a live source onto `T`.
///
/// The reader stores no value; every call queries the source again.
pub struct TypedReader<S, T> {
    source: S,
    _target: PhantomData<fn() -> T>,
}

impl<S: ValueSource, T: FromSqlValue> TypedReader<S, T> {
    /// Wrap a source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            _target: PhantomData,
        }
    }

    /// The nullable view: `None` for NULL, otherwise the projected value.
    ///
    /// [`read`](Self::read) is the null-safe projection that maps NULL to
    /// `T`'s null default.
    pub fn nullable(&self) -> Result<Option<T>, TypeError> {
        if self.source.is_null() {
            Ok(None)
        } else {
            T::from_sql_value(&self.source.raw_value()).map(Some)
        }
    }

    /// The projected value, with NULL reading as `T`'s null default.
    pub fn read(&self) -> Result<T, TypeError> {
        self.source.get()
    }

    /// The projected value, with NULL reading as `default`.
    pub fn read_or(&self, default: T) -> Result<T, TypeError> {
        self.source.get_or(default)
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: fmt::Debug, T: FromSqlValue> fmt::Debug for TypedReader<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedReader")
            .field("source", &self.source)
            .field("target", &T::TARGET)
            .finish()
    }
}

/// Readers memoized per `(ordinal, reader type)`.
///
/// Asking twice for the same column and type returns the same reader.
#[derive(Default)]
pub struct ReaderCache {
    readers: RefCell<HashMap<(usize, TypeId), Rc<dyn Any>>>,
}

impl ReaderCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached reader for `ordinal`, created with `make` on first use.
    pub fn get_or_insert_with<R: 'static>(&self, ordinal: usize, make: impl FnOnce() -> R) -> Rc<R> {
        let key = (ordinal, TypeId::of::<R>());

        let cached = self.readers.borrow().get(&key).cloned();
        if let Some(Ok(reader)) = cached.map(|existing| existing.downcast::<R>()) {
            return reader;
        }

        let reader = Rc::new(make());
        let erased: Rc<dyn Any> = reader.clone();
        self.readers.borrow_mut().insert(key, erased);
        reader
    }

    /// Number of cached readers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readers.borrow().len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readers.borrow().is_empty()
    }

    /// Drop every cached reader.
    pub fn clear(&self) {
        self.readers.borrow_mut().clear();
    }
}

impl fmt::Debug for ReaderCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderCache")
            .field("readers", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_get_null_reads_default() {
        assert_eq!(SqlValue::Null.get::<i32>().unwrap(), 0);
        assert_eq!(SqlValue::Null.get::<String>().unwrap(), "");
        assert_eq!(SqlValue::Null.get::<Option<i32>>().unwrap(), None);
        assert_eq!(SqlValue::Null.get_or(9i64).unwrap(), 9);
    }

    #[test]
    fn test_get_widens_strictly() {
        assert_eq!(SqlValue::TinyInt(4).get::<i64>().unwrap(), 4);
        assert!(matches!(
            SqlValue::BigInt(4).get::<i16>(),
            Err(TypeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_reader_requeries_source() {
        let current = Cell::new(SqlValue::Int(1));
        let source = FnValue::new(
            || false,
            || {
                let value = current.take();
                current.set(value.clone());
                value
            },
        );
        let reader = source.reader::<i32>();

        assert_eq!(reader.read().unwrap(), 1);
        current.set(SqlValue::Int(2));
        assert_eq!(reader.read().unwrap(), 2);
        assert_eq!(reader.nullable().unwrap(), Some(2));
    }

    #[test]
    fn test_reader_null_handling() {
        let reader = TypedReader::<_, i32>::new(SqlValue::Null);
        assert_eq!(reader.nullable().unwrap(), None);
        assert_eq!(reader.read().unwrap(), 0);
        assert_eq!(reader.read_or(-1).unwrap(), -1);
    }

    #[test]
    fn test_reader_cache_memoizes_per_ordinal_and_type() {
        let cache = ReaderCache::new();
        let made = Cell::new(0);
        let make = || {
            made.set(made.get() + 1);
            TypedReader::<_, i32>::new(SqlValue::Int(5))
        };

        let first = cache.get_or_insert_with(0, make);
        let second = cache.get_or_insert_with(0, || TypedReader::<_, i32>::new(SqlValue::Null));
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(made.get(), 1);
        assert_eq!(second.read().unwrap(), 5);

        let other_type = cache.get_or_insert_with(0, || TypedReader::<_, i64>::new(SqlValue::Int(5)));
        assert_eq!(other_type.read().unwrap(), 5);
        let other_column = cache.get_or_insert_with(1, || TypedReader::<_, i32>::new(SqlValue::Int(6)));
        assert_eq!(other_column.read().unwrap(), 6);
        assert_eq!(cache.len(), 3);

        cache.clear();
        assert!(cache.is_empty());
    }
}
