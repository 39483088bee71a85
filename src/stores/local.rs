//! Implements an expense store that keeps all of its data in a single JSON
//! document on disk.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use serde::Serialize;
use serde_json::Value;

use crate::{
    Error, Expense, NewExpense,
    aggregation::sort_by_date_descending,
    budget::{MonthlyLimit, YearMonth},
    database_id::ExpenseId,
    stores::ExpenseStore,
};

/// The key the data is stored under, used as the file name.
pub const STORAGE_KEY: &str = "moneysaver_data";

/// Everything the local store persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredData {
    monthly_limit: MonthlyLimit,
    expenses: Vec<Expense>,
}

/// Stores expenses and the monthly limit as one JSON document in a directory.
///
/// The document is read once when the store is opened and rewritten after every
/// change.
#[derive(Debug)]
pub struct LocalExpenseStore {
    path: PathBuf,
    data: Mutex<StoredData>,
}

impl LocalExpenseStore {
    /// Open the store in `directory`, creating the directory if needed.
    ///
    /// Missing or unparseable data is replaced with an empty expense list and
    /// the default limit. Records that cannot be read are skipped while the
    /// rest are kept. Whenever anything is dropped, the file is first copied to
    /// `moneysaver_data.json.corrupt`.
    ///
    /// # Errors
    /// Returns [Error::LocalStorageError] if the directory cannot be created.
    pub fn open(directory: impl AsRef<Path>) -> Result<Self, Error> {
        let directory = directory.as_ref();

        fs::create_dir_all(directory).map_err(|error| {
            Error::LocalStorageError(format!(
                "could not create data directory {}: {error}",
                directory.display()
            ))
        })?;

        let path = directory.join(format!("{STORAGE_KEY}.json"));
        let data = load_data(&path);

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoredData>, Error> {
        self.data
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire local store lock: {error}"))
            .map_err(|_| Error::StoreLockError)
    }

    /// Apply `operation` to a copy of the data, persist the copy and only then
    /// make it the current data.
    fn mutate<T, F>(&self, operation: F) -> Result<T, Error>
    where
        F: FnOnce(&mut StoredData) -> Result<T, Error>,
    {
        let mut data = self.lock()?;
        let mut updated = data.clone();

        let result = operation(&mut updated)?;
        persist_data(&self.path, &updated)?;
        *data = updated;

        Ok(result)
    }

    fn filtered_expenses<P>(&self, predicate: P) -> Result<Vec<Expense>, Error>
    where
        P: Fn(&Expense) -> bool,
    {
        let data = self.lock()?;

        // Newest first so that the stable date sort puts later inserts first on ties.
        let expenses = data
            .expenses
            .iter()
            .rev()
            .filter(|expense| predicate(expense))
            .cloned()
            .collect();

        Ok(sort_by_date_descending(expenses))
    }
}

fn load_data(path: &Path) -> StoredData {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::debug!("no local data at {}, starting empty", path.display());
            return StoredData::default();
        }
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to read local data; starting with defaults",
            );
            return StoredData::default();
        }
    };

    let document = match serde_json::from_str(&raw) {
        Ok(document) => document,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to parse local data; starting with defaults",
            );
            back_up_unreadable_data(path);
            return StoredData::default();
        }
    };

    let (data, skipped) = decode_document(document);

    if skipped > 0 {
        tracing::warn!(
            path = %path.display(),
            skipped,
            "skipped unreadable values in local data",
        );
        back_up_unreadable_data(path);
    }

    data
}

/// Decode the stored document value by value.
///
/// Returns the readable data and the number of values that were skipped.
fn decode_document(document: Value) -> (StoredData, usize) {
    let mut fields = match document {
        Value::Object(fields) => fields,
        other => {
            tracing::warn!("expected a JSON object in local data, found {other}");
            return (StoredData::default(), 1);
        }
    };

    let mut skipped = 0;

    let monthly_limit = match fields.remove("monthlyLimit") {
        None | Some(Value::Null) => MonthlyLimit::default(),
        Some(value) => match serde_json::from_value(value) {
            Ok(limit) => limit,
            Err(error) => {
                tracing::warn!("unreadable monthly limit in local data, using the default: {error}");
                skipped += 1;
                MonthlyLimit::default()
            }
        },
    };

    let expenses = match fields.remove("expenses") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(records)) => records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<Expense>(record) {
                Ok(expense) => Some(expense),
                Err(error) => {
                    tracing::warn!("skipping unreadable expense in local data: {error}");
                    skipped += 1;
                    None
                }
            })
            .collect(),
        Some(other) => {
            tracing::warn!("expected a list of expenses in local data, found {other}");
            skipped += 1;
            Vec::new()
        }
    };

    (
        StoredData {
            monthly_limit,
            expenses,
        },
        skipped,
    )
}

/// Keep a copy of data that could not be fully read before it is overwritten.
fn back_up_unreadable_data(path: &Path) {
    let backup_path = path.with_extension("json.corrupt");

    match fs::copy(path, &backup_path) {
        Ok(_) => tracing::warn!("copied unreadable local data to {}", backup_path.display()),
        Err(error) => tracing::error!(
            "could not copy unreadable local data to {}: {error}",
            backup_path.display()
        ),
    }
}

fn persist_data(path: &Path, data: &StoredData) -> Result<(), Error> {
    let payload = serde_json::to_vec_pretty(data)
        .map_err(|error| Error::LocalStorageError(format!("could not encode data: {error}")))?;

    let temp_path = path.with_extension("json.tmp");

    fs::write(&temp_path, payload).map_err(|error| {
        Error::LocalStorageError(format!(
            "could not write {}: {error}",
            temp_path.display()
        ))
    })?;

    fs::rename(&temp_path, path).map_err(|error| {
        Error::LocalStorageError(format!("could not replace {}: {error}", path.display()))
    })
}

impl ExpenseStore for LocalExpenseStore {
    fn fetch_limit(&self) -> Result<MonthlyLimit, Error> {
        Ok(self.lock()?.monthly_limit)
    }

    fn set_limit(&self, limit: MonthlyLimit) -> Result<(), Error> {
        self.mutate(|data| {
            data.monthly_limit = limit;
            Ok(())
        })
    }

    fn fetch_expenses(&self) -> Result<Vec<Expense>, Error> {
        self.filtered_expenses(|_| true)
    }

    fn fetch_expenses_in_month(&self, year_month: YearMonth) -> Result<Vec<Expense>, Error> {
        self.filtered_expenses(|expense| year_month.contains(expense.date))
    }

    fn get_expense(&self, id: ExpenseId) -> Result<Expense, Error> {
        self.lock()?
            .expenses
            .iter()
            .find(|expense| expense.id == id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn create_expense(&self, expense: NewExpense) -> Result<Expense, Error> {
        self.mutate(|data| {
            let id = data
                .expenses
                .iter()
                .map(|expense| expense.id)
                .max()
                .unwrap_or(0)
                + 1;

            let expense = expense.into_expense(id);
            data.expenses.push(expense.clone());

            Ok(expense)
        })
    }

    fn update_expense(&self, id: ExpenseId, expense: NewExpense) -> Result<Expense, Error> {
        self.mutate(|data| {
            let stored = data
                .expenses
                .iter_mut()
                .find(|stored| stored.id == id)
                .ok_or(Error::UpdateMissingExpense)?;

            let is_recurring = stored.is_recurring;
            *stored = Expense {
                is_recurring,
                ..expense.into_expense(id)
            };

            Ok(stored.clone())
        })
    }

    fn delete_expense(&self, id: ExpenseId) -> Result<(), Error> {
        self.mutate(|data| {
            let position = data
                .expenses
                .iter()
                .position(|expense| expense.id == id)
                .ok_or(Error::DeleteMissingExpense)?;

            data.expenses.remove(position);

            Ok(())
        })
    }

    fn check_health(&self) -> Result<(), Error> {
        self.lock().map(|_| ())
    }
}
