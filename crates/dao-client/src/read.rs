//! Row reading.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use dao_types::{FromSqlValue, ReaderCache, SqlValue, TypedReader, TypedValue, ValueSource};

use crate::driver::RowCursor;
use crate::error::{Error, Result};

/// One column of a live cursor. Reads always see the current row.
pub struct ColumnValue<R> {
    cursor: Rc<RefCell<R>>,
    ordinal: usize,
}

impl<R> ColumnValue<R> {
    /// Column ordinal.
    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

impl<R: RowCursor> ValueSource for ColumnValue<R> {
    fn is_null(&self) -> bool {
        self.cursor.borrow().is_null(self.ordinal)
    }

    fn raw_value(&self) -> SqlValue {
        self.cursor.borrow().value(self.ordinal)
    }
}

impl<R> fmt::Debug for ColumnValue<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnValue")
            .field("ordinal", &self.ordinal)
            .finish()
    }
}

/// Typed access to the rows of a cursor.
///
/// Column readers returned by [`RowReader::reader`] are created once per
/// column and type, and follow the cursor as it advances.
pub struct RowReader<R> {
    cursor: Rc<RefCell<R>>,
    readers: ReaderCache,
    rows_read: usize,
}

impl<R: RowCursor + 'static> RowReader<R> {
    /// Wrap a cursor positioned before its first row.
    pub fn new(cursor: R) -> Self {
        Self {
            cursor: Rc::new(RefCell::new(cursor)),
            readers: ReaderCache::new(),
            rows_read: 0,
        }
    }

    /// Move to the next row. Returns `false` once the rows are exhausted.
    pub fn advance(&mut self) -> Result<bool> {
        let more = self.cursor.borrow_mut().advance().map_err(Error::driver)?;
        if more {
            self.rows_read += 1;
        }
        Ok(more)
    }

    /// Zero-based index of the current row, `None` before the first row.
    #[must_use]
    pub fn row_index(&self) -> Option<usize> {
        self.rows_read.checked_sub(1)
    }

    /// Number of columns.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.cursor.borrow().field_count()
    }

    /// Name of the column at `ordinal`.
    #[must_use]
    pub fn field_name(&self, ordinal: usize) -> String {
        self.cursor.borrow().field_name(ordinal)
    }

    /// Ordinal of the column called `name`, ignoring case.
    #[must_use]
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        let cursor = self.cursor.borrow();
        let lowered = name.to_lowercase();
        (0..cursor.field_count()).find(|&i| cursor.field_name(i).to_lowercase() == lowered)
    }

    /// A live view of the column at `ordinal`.
    #[must_use]
    pub fn column(&self, ordinal: usize) -> ColumnValue<R> {
        ColumnValue {
            cursor: Rc::clone(&self.cursor),
            ordinal,
        }
    }

    /// Whether the column at `ordinal` of the current row is NULL.
    #[must_use]
    pub fn is_null(&self, ordinal: usize) -> bool {
        self.cursor.borrow().is_null(ordinal)
    }

    /// Read the column at `ordinal` as `T`; NULL reads as `T`'s default.
    pub fn get<T: FromSqlValue>(&self, ordinal: usize) -> Result<T> {
        Ok(self.column(ordinal).get()?)
    }

    /// Read the column called `name` as `T`.
    pub fn get_by_name<T: FromSqlValue>(&self, name: &str) -> Result<T> {
        let ordinal = self
            .ordinal(name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))?;
        self.get(ordinal)
    }

    /// The cached reader projecting the column at `ordinal` onto `T`.
    pub fn reader<T: FromSqlValue + 'static>(&self, ordinal: usize) -> Rc<TypedReader<ColumnValue<R>, T>> {
        self.readers
            .get_or_insert_with(ordinal, || TypedReader::new(self.column(ordinal)))
    }

    /// Number of column readers created so far.
    #[must_use]
    pub fn cached_readers(&self) -> usize {
        self.readers.len()
    }
}

impl<R> fmt::Debug for RowReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowReader")
            .field("rows_read", &self.rows_read)
            .field("readers", &self.readers)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::BoxError;

    struct VecCursor {
        columns: Vec<&'static str>,
        rows: Vec<Vec<SqlValue>>,
        position: Option<usize>,
    }

    impl VecCursor {
        fn current(&self) -> &[SqlValue] {
            self.position.map_or(&[][..], |p| self.rows[p].as_slice())
        }
    }

    impl RowCursor for VecCursor {
        type Error = BoxError;

        fn advance(&mut self) -> std::result::Result<bool, BoxError> {
            let next = self.position.map_or(0, |p| p + 1);
            if next < self.rows.len() {
                self.position = Some(next);
                Ok(true)
            } else {
                Ok(false)
            }
        }

        fn field_count(&self) -> usize {
            self.columns.len()
        }

        fn field_name(&self, ordinal: usize) -> String {
            self.columns[ordinal].to_string()
        }

        fn is_null(&self, ordinal: usize) -> bool {
            self.current().get(ordinal).is_none_or(SqlValue::is_null)
        }

        fn value(&self, ordinal: usize) -> SqlValue {
            self.current().get(ordinal).cloned().unwrap_or_default()
        }
    }

    fn people() -> RowReader<VecCursor> {
        RowReader::new(VecCursor {
            columns: vec!["Id", "Name"],
            rows: vec![
                vec![SqlValue::Int(1), SqlValue::from("Ann")],
                vec![SqlValue::Int(2), SqlValue::Null],
            ],
            position: None,
        })
    }

    #[test]
    fn test_reads_follow_cursor() {
        let mut reader = people();
        assert_eq!(reader.row_index(), None);
        let id = reader.reader::<i64>(0);
        let name = reader.reader::<Option<String>>(1);

        assert!(reader.advance().unwrap());
        assert_eq!(reader.row_index(), Some(0));
        assert_eq!(id.read().unwrap(), 1);
        assert_eq!(name.read().unwrap(), Some("Ann".to_string()));

        assert!(reader.advance().unwrap());
        assert_eq!(id.read().unwrap(), 2);
        assert_eq!(name.read().unwrap(), None);
        assert_eq!(reader.get::<String>(1).unwrap(), "");
        assert!(reader.is_null(1));

        assert!(!reader.advance().unwrap());
        assert_eq!(reader.row_index(), Some(1));
    }

    #[test]
    fn test_readers_are_cached() {
        let reader = people();
        let a = reader.reader::<i32>(0);
        let b = reader.reader::<i32>(0);
        assert!(Rc::ptr_eq(&a, &b));
        reader.reader::<i64>(0);
        assert_eq!(reader.cached_readers(), 2);
    }

    #[test]
    fn test_lookup_by_name() {
        let mut reader = people();
        reader.advance().unwrap();
        assert_eq!(reader.field_count(), 2);
        assert_eq!(reader.field_name(1), "Name");
        assert_eq!(reader.ordinal("name"), Some(1));
        assert_eq!(reader.get_by_name::<i32>("ID").unwrap(), 1);
        assert!(matches!(
            reader.get_by_name::<i32>("missing"),
            Err(Error::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_type_mismatch_is_conversion_error() {
        let mut reader = people();
        reader.advance().unwrap();
        assert!(matches!(
            reader.get::<i32>(1),
            Err(Error::Conversion(_))
        ));
    }
}
