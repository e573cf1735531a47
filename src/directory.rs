//! Directory of project managers (name + phone), kept sorted by name.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{CallSheetError, Result};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ManagerRecord {
    pub name: String,
    pub phone: String,
}

impl ManagerRecord {
    pub fn new(name: &str, phone: &str) -> Self {
        Self { name: name.trim().to_string(), phone: phone.trim().to_string() }
    }

    fn same_name(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// A manager with this name already exists at `index`; nothing changed.
    Duplicate { index: usize },
}

/// Lowercase and strip French/Spanish accents so that "Éric" sorts next to "Eric".
pub fn fold_name(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' | 'á' | 'ã' => 'a',
            'ç' => 'c',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' | 'í' | 'ì' => 'i',
            'ô' | 'ö' | 'ó' | 'ò' | 'õ' => 'o',
            'ù' | 'û' | 'ü' | 'ú' => 'u',
            'ÿ' => 'y',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

fn by_name(a: &ManagerRecord, b: &ManagerRecord) -> Ordering {
    fold_name(&a.name).cmp(&fold_name(&b.name)).then_with(|| a.name.cmp(&b.name))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagerDirectory {
    managers: Vec<ManagerRecord>,
}

impl ManagerDirectory {
    pub fn new() -> Self { Self::default() }

    pub fn from_records(records: Vec<ManagerRecord>) -> Self {
        let mut dir = Self { managers: records };
        dir.sort();
        dir
    }

    fn sort(&mut self) { self.managers.sort_by(by_name); }

    fn position(&self, name: &str) -> Option<usize> {
        self.managers.iter().position(|m| m.same_name(name))
    }

    pub fn list(&self) -> &[ManagerRecord] { &self.managers }

    pub fn len(&self) -> usize { self.managers.len() }

    pub fn is_empty(&self) -> bool { self.managers.is_empty() }

    pub fn add(&mut self, name: &str, phone: &str) -> Result<AddOutcome> {
        let record = ManagerRecord::new(name, phone);
        if record.name.is_empty() || record.phone.is_empty() {
            return Err(CallSheetError::MissingManagerFields);
        }
        if let Some(index) = self.position(&record.name) {
            return Ok(AddOutcome::Duplicate { index });
        }
        self.managers.push(record);
        self.sort();
        Ok(AddOutcome::Added)
    }

    /// Second half of an add that hit a duplicate and was confirmed: only the phone changes.
    pub fn overwrite_phone(&mut self, index: usize, phone: &str) -> Result<()> {
        let record = self.managers.get_mut(index).ok_or(CallSheetError::IndexOutOfRange(index))?;
        record.phone = phone.trim().to_string();
        Ok(())
    }

    /// Replaces the entry at `index` of the sorted list. Other entries are not
    /// checked for a clashing name.
    pub fn update(&mut self, index: usize, name: &str, phone: &str) -> Result<()> {
        let record = ManagerRecord::new(name, phone);
        if record.name.is_empty() || record.phone.is_empty() {
            return Err(CallSheetError::MissingManagerFields);
        }
        let slot = self.managers.get_mut(index).ok_or(CallSheetError::IndexOutOfRange(index))?;
        *slot = record;
        self.sort();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<ManagerRecord> {
        (index < self.managers.len()).then(|| self.managers.remove(index))
    }

    pub fn clear(&mut self) { self.managers.clear(); }

    pub fn find_by_name(&self, name: &str) -> Option<&ManagerRecord> {
        let wanted = name.trim().to_lowercase();
        self.managers.iter().find(|m| m.name.trim().to_lowercase() == wanted)
    }

    /// Autocomplete suggestions. An empty query suggests nothing.
    pub fn search(&self, query: &str) -> Vec<&ManagerRecord> {
        if query.is_empty() {
            return Vec::new();
        }
        let q = query.to_lowercase();
        self.managers.iter().filter(|m| m.name.to_lowercase().contains(&q)).collect()
    }

    /// Imports `name,phone` lines. Known names are skipped, never overwritten.
    /// Returns how many records were added.
    pub fn import_delimited(&mut self, text: &str) -> usize {
        let mut imported = 0;
        for line in text.split('\n') {
            let mut parts = line.split(',').map(str::trim);
            let (Some(name), Some(phone)) = (parts.next(), parts.next()) else { continue };
            if name.is_empty() || phone.is_empty() {
                continue;
            }
            if self.position(name).is_some() {
                tracing::debug!(%name, "import: manager already known, skipped");
                continue;
            }
            self.managers.push(ManagerRecord::new(name, phone));
            imported += 1;
        }
        if imported > 0 {
            self.sort();
        }
        imported
    }

    pub fn export_delimited(&self) -> String {
        self.managers.iter().map(|m| format!("{},{}\n", m.name, m.phone)).collect()
    }

    /// Records the manager used on a printed sheet. A known name is left alone
    /// even when the phone differs. Returns true when the directory changed.
    pub fn auto_save(&mut self, name: &str, phone: &str) -> bool {
        let record = ManagerRecord::new(name, phone);
        if record.name.is_empty() || record.phone.is_empty() {
            return false;
        }
        match self.position(&record.name) {
            Some(i) if self.managers[i].phone != record.phone => {
                tracing::info!(name = %record.name, "auto-save skipped: manager already saved with another phone");
                false
            }
            Some(_) => false,
            None => {
                self.managers.push(record);
                self.sort();
                true
            }
        }
    }
}
