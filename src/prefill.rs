//! Form pre-fill from the query string sent by the tracking tool (Monday).
//!
//! Expected parameters: `titre` (row name), `format`, `date`, `heure` (PAT),
//! `responsable` (phone looked up in the directory) and `lieu` (optional).

use chrono::NaiveDate;

use crate::directory::ManagerDirectory;
use crate::error::{CallSheetError, Result};
use crate::form::{FormState, FORMAT_OPTIONS};
use crate::title::parse_title;

/// Tracking-tool format labels → form option values.
const FORMAT_MAPPING: [(&str, &str); 8] = [
    ("L'interview", "L'interview"),
    ("Interview", "L'interview"),
    ("L'interro", "L'interro"),
    ("Interro", "L'interro"),
    ("C'est quoi?", "C'est quoi"),
    ("C'est quoi", "C'est quoi"),
    ("Audrey t'explique", "Audrey T'explique"),
    ("Audrey T'explique", "Audrey T'explique"),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Decodes `?a=1&b=x+y`; `+` is a space, keys without `=` get an empty value.
    pub fn parse(search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        let decode = |s: &str| {
            let s = s.replace('+', " ");
            urlencoding::decode(&s).map(|c| c.into_owned()).unwrap_or(s)
        };
        let pairs = search
            .split('&')
            .filter(|p| !p.is_empty())
            .map(|p| match p.split_once('=') {
                Some((k, v)) => (decode(k), decode(v)),
                None => (decode(p), String::new()),
            })
            .collect();
        Self(pairs)
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

/// Form option value for a tracking-tool label, if any option matches.
pub fn map_format(label: &str) -> Option<&'static str> {
    let mapped = FORMAT_MAPPING.iter().find(|(from, _)| *from == label).map(|(_, to)| *to).unwrap_or(label);
    FORMAT_OPTIONS.iter().find(|(value, text)| *value == mapped || *text == mapped).map(|(value, _)| *value)
}

/// `YYYY-MM-DD` as-is, `DD/MM/YYYY` rewritten; anything else is rejected.
pub fn normalize_date(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parsed = if trimmed.contains('-') {
        // chrono accepts `2025-3-3`; only the zero-padded shape is kept
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .filter(|iso| iso == trimmed)
    } else if trimmed.contains('/') {
        NaiveDate::parse_from_str(trimmed, "%d/%m/%Y").ok().map(|d| d.format("%Y-%m-%d").to_string())
    } else {
        None
    };
    parsed.ok_or_else(|| CallSheetError::InvalidDate(raw.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefillField {
    Guest,
    School,
    Format,
    Date,
    PatTime,
    ManagerName,
    ManagerPhone,
    Location,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrefillReport {
    pub filled: Vec<PrefillField>,
    /// Parameters present but unusable, with their raw value.
    pub rejected: Vec<(&'static str, String)>,
}

/// Applies every recognised parameter to `form`. Steps are independent: a bad
/// value for one parameter never stops the others.
pub fn prefill(params: &QueryParams, directory: &ManagerDirectory, form: &mut FormState) -> PrefillReport {
    let mut report = PrefillReport::default();

    if let Some(titre) = params.get("titre").filter(|t| !t.is_empty()) {
        let parsed = parse_title(titre);
        if !parsed.guest.is_empty() {
            tracing::info!(guest = %parsed.guest, "prefill: guest");
            form.guest_name = parsed.guest;
            report.filled.push(PrefillField::Guest);
        }
        if !parsed.school.is_empty() {
            tracing::info!(school = %parsed.school, "prefill: school");
            form.school_name = parsed.school;
            report.filled.push(PrefillField::School);
        }
    }

    if let Some(label) = params.get("format").filter(|f| !f.is_empty()) {
        match map_format(label) {
            Some(value) => {
                tracing::info!(format = value, "prefill: format");
                form.format_type = value.to_string();
                report.filled.push(PrefillField::Format);
            }
            None => {
                tracing::warn!(%label, "prefill: unknown format");
                report.rejected.push(("format", label.to_string()));
            }
        }
    }

    if let Some(raw) = params.get("date").filter(|d| !d.is_empty()) {
        match normalize_date(raw) {
            Ok(date) => {
                tracing::info!(%date, "prefill: date");
                form.date = date;
                report.filled.push(PrefillField::Date);
            }
            Err(e) => {
                tracing::warn!(error = %e, "prefill: could not parse date");
                report.rejected.push(("date", raw.to_string()));
            }
        }
    }

    if let Some(heure) = params.get("heure").filter(|h| !h.is_empty()) {
        tracing::info!(%heure, "prefill: PAT time");
        form.pat_time = heure.to_string();
        report.filled.push(PrefillField::PatTime);
    }

    if let Some(name) = params.get("responsable").map(str::trim).filter(|n| !n.is_empty()) {
        form.manager_name = name.to_string();
        report.filled.push(PrefillField::ManagerName);
        match directory.find_by_name(name) {
            Some(found) => {
                tracing::info!(%name, phone = %found.phone, "prefill: manager phone found");
                form.manager_phone = found.phone.clone();
                report.filled.push(PrefillField::ManagerPhone);
            }
            None if directory.is_empty() => tracing::info!(%name, "prefill: manager directory is empty"),
            None => {
                let known = directory.list().iter().map(|m| m.name.as_str()).collect::<Vec<_>>().join(", ");
                tracing::info!(%name, %known, "prefill: manager not in directory");
            }
        }
    }

    if let Some(lieu) = params.get("lieu").filter(|l| !l.trim().is_empty()) {
        tracing::info!(%lieu, "prefill: exterior location");
        form.is_exterior = true;
        form.exterior_address = lieu.to_string();
        report.filled.push(PrefillField::Location);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::ManagerRecord;

    fn directory() -> ManagerDirectory {
        ManagerDirectory::from_records(vec![ManagerRecord::new("Alice Martin", "06 01 02 03 04")])
    }

    #[test]
    fn query_string_is_decoded() {
        let q = QueryParams::parse("?titre=Marc+Lambert%20-%20%C3%89cole%2042&heure=10%3A00&flag&titre=second");
        assert_eq!(q.get("titre"), Some("Marc Lambert - École 42"));
        assert_eq!(q.get("heure"), Some("10:00"));
        assert_eq!(q.get("flag"), Some(""));
        assert_eq!(q.get("lieu"), None);
        assert!(QueryParams::parse("").is_empty());
    }

    #[test]
    fn format_mapping_and_passthrough() {
        assert_eq!(map_format("Interview"), Some("L'interview"));
        assert_eq!(map_format("C'est quoi?"), Some("C'est quoi"));
        assert_eq!(map_format("Audrey t'explique"), Some("Audrey T'explique"));
        // label of an option rather than its value
        assert_eq!(map_format("C'est quoi ?"), Some("C'est quoi"));
        assert_eq!(map_format("Podcast"), None);
    }

    #[test]
    fn dates_are_normalized() {
        assert_eq!(normalize_date("2025-03-03").unwrap(), "2025-03-03");
        assert_eq!(normalize_date("3/9/2025").unwrap(), "2025-09-03");
        assert_eq!(normalize_date("03/09/2025").unwrap(), "2025-09-03");
        assert!(matches!(normalize_date("2025-13-40"), Err(CallSheetError::InvalidDate(ref d)) if d == "2025-13-40"));
        assert!(normalize_date("March 3rd").is_err());
        assert!(matches!(normalize_date("2025-3-3"), Err(CallSheetError::InvalidDate(_))));
    }

    #[test]
    fn full_query_fills_the_form() {
        let q = QueryParams::parse(
            "titre=Interview%20Jean%20Dupont%20Sciences%20Po&format=Interview&date=03/03/2025&heure=10:00&responsable=%20alice%20martin%20&lieu=Campus%20Nord",
        );
        let mut form = FormState::default();
        let report = prefill(&q, &directory(), &mut form);

        assert_eq!(form.guest_name, "Jean Dupont");
        assert_eq!(form.school_name, "Sciences Po");
        assert_eq!(form.format_type, "L'interview");
        assert_eq!(form.date, "2025-03-03");
        assert_eq!(form.pat_time, "10:00");
        assert_eq!(form.manager_name, "alice martin");
        assert_eq!(form.manager_phone, "06 01 02 03 04");
        assert!(form.is_exterior);
        assert_eq!(form.exterior_address, "Campus Nord");
        assert_eq!(report.filled.len(), 8);
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn bad_values_do_not_block_other_parameters() {
        let q = QueryParams::parse("date=demain&format=Podcast&heure=09:15&responsable=Inconnu&lieu=%20%20");
        let mut form = FormState::with_date("2025-01-01");
        let report = prefill(&q, &directory(), &mut form);

        assert_eq!(form.date, "2025-01-01");
        assert_eq!(form.format_type, "L'interview");
        assert_eq!(form.pat_time, "09:15");
        assert_eq!(form.manager_name, "Inconnu");
        assert_eq!(form.manager_phone, "");
        assert!(!form.is_exterior);
        assert_eq!(report.rejected, vec![("format", "Podcast".to_string()), ("date", "demain".to_string())]);
    }

    #[test]
    fn no_parameters_leave_form_untouched() {
        let mut form = FormState::with_date("2025-01-01");
        let before = form.clone();
        let report = prefill(&QueryParams::default(), &directory(), &mut form);
        assert_eq!(form, before);
        assert_eq!(report, PrefillReport::default());
    }
}
