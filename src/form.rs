//! In-memory state of the call sheet form.

use crate::error::{CallSheetError, RequiredField, Result};
use crate::schedule::{compute_schedule, CustomSchedule, ScheduleResult};

/// Canonical options of the format select: (value, label).
pub const FORMAT_OPTIONS: [(&str, &str); 4] = [
    ("L'interview", "L'interview"),
    ("L'interro", "L'interro"),
    ("C'est quoi", "C'est quoi ?"),
    ("Audrey T'explique", "Audrey T'explique"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub format_type: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub guest_name: String,
    pub school_name: String,
    /// `HH:MM`
    pub pat_time: String,
    pub manager_name: String,
    pub manager_phone: String,
    pub is_exterior: bool,
    pub exterior_address: String,
    pub custom_schedule: bool,
    pub custom: CustomSchedule,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            format_type: FORMAT_OPTIONS[0].0.to_string(),
            date: String::new(),
            guest_name: String::new(),
            school_name: String::new(),
            pat_time: String::new(),
            manager_name: String::new(),
            manager_phone: String::new(),
            is_exterior: false,
            exterior_address: String::new(),
            custom_schedule: false,
            custom: CustomSchedule::default(),
        }
    }
}

impl FormState {
    pub fn with_date(date: impl Into<String>) -> Self {
        Self { date: date.into(), ..Self::default() }
    }

    /// Schedule for display: custom times when enabled, otherwise derived from
    /// PAT. An unreadable PAT gives an empty schedule (the renderer has fallbacks).
    pub fn schedule(&self) -> ScheduleResult {
        let custom = self.custom_schedule.then_some(&self.custom);
        compute_schedule(&self.pat_time, custom).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "schedule not computable");
            ScheduleResult::default()
        })
    }

    pub fn missing_fields(&self) -> Vec<RequiredField> {
        [
            (RequiredField::Date, &self.date),
            (RequiredField::Guest, &self.guest_name),
            (RequiredField::PatTime, &self.pat_time),
            (RequiredField::ManagerName, &self.manager_name),
            (RequiredField::ManagerPhone, &self.manager_phone),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(f, _)| f)
        .collect()
    }

    pub fn validate_for_print(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() { Ok(()) } else { Err(CallSheetError::MissingFields(missing)) }
    }

    /// Document title, also the suggested PDF file name.
    pub fn print_title(&self) -> String {
        let format = self.format_type.replace('\'', "");
        let guest = self.guest_name.split_whitespace().collect::<Vec<_>>().join("_");
        format!("CallSheet_{}_{}_{}.pdf", format, guest, self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> FormState {
        FormState {
            date: "2025-03-03".into(),
            guest_name: "Jean Dupont".into(),
            pat_time: "10:00".into(),
            manager_name: "Alice".into(),
            manager_phone: "06 00 00 00 00".into(),
            ..FormState::default()
        }
    }

    #[test]
    fn complete_form_validates() {
        assert!(complete().validate_for_print().is_ok());
    }

    #[test]
    fn blank_fields_are_reported_in_order() {
        let form = FormState { guest_name: "  ".into(), manager_phone: String::new(), ..complete() };
        assert_eq!(form.missing_fields(), vec![RequiredField::Guest, RequiredField::ManagerPhone]);
        assert!(matches!(form.validate_for_print(), Err(CallSheetError::MissingFields(_))));
    }

    #[test]
    fn print_title_strips_apostrophes_and_spaces() {
        assert_eq!(complete().print_title(), "CallSheet_Linterview_Jean_Dupont_2025-03-03.pdf");
    }

    #[test]
    fn custom_times_only_used_when_enabled() {
        let mut form = complete();
        form.custom.install = "07:00".into();
        assert_eq!(form.schedule().install, "09:30");
        form.custom_schedule = true;
        assert_eq!(form.schedule().install, "07:00");
    }

    #[test]
    fn unreadable_pat_gives_blank_schedule() {
        let form = FormState { pat_time: "dix heures".into(), ..complete() };
        assert_eq!(form.schedule(), ScheduleResult::default());
    }
}
