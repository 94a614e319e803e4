use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{date_stamp, BoatDetails, BoatField, BoatRecord, BoatSubmission};

/// Whether the form creates a new record or edits the one it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(BoatRecord),
}

/// Local state of the record form modal. Nothing here touches the collection;
/// cancelling simply drops the struct.
#[derive(Clone)]
pub(crate) struct RecordForm {
    pub(crate) mode: FormMode,
    pub(crate) details: BoatDetails,
    pub(crate) active: BoatField,
    pub(crate) error: Option<String>,
}

impl RecordForm {
    /// Blank for create, pre-filled for edit.
    pub(crate) fn new(mode: FormMode) -> Self {
        let details = match &mode {
            FormMode::Create => BoatDetails::blank(),
            FormMode::Edit(record) => BoatDetails::from_record(record),
        };
        Self {
            mode,
            details,
            active: BoatField::FORM_ORDER[0],
            error: None,
        }
    }

    pub(crate) fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "New Boat Registration",
            FormMode::Edit(_) => "Edit Boat Registration",
        }
    }

    pub(crate) fn focus(&mut self, field: BoatField) {
        self.active = field;
    }

    /// Move focus forward, wrapping from the last field to the first.
    pub(crate) fn next_field(&mut self) {
        let next = (self.active.form_index() + 1) % BoatField::FORM_ORDER.len();
        self.active = BoatField::FORM_ORDER[next];
    }

    /// Move focus backward, wrapping from the first field to the last.
    pub(crate) fn previous_field(&mut self) {
        let len = BoatField::FORM_ORDER.len();
        let previous = (self.active.form_index() + len - 1) % len;
        self.active = BoatField::FORM_ORDER[previous];
    }

    /// Append a printable character to the active field.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.details.get_mut(self.active).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.details.get_mut(self.active).pop();
    }

    /// Check the required fields and hand back the field set stamped with
    /// `today`. On failure focus jumps to the first empty field.
    pub(crate) fn submit(&mut self, today: NaiveDate) -> Result<BoatSubmission> {
        let missing = self.details.missing_fields();
        if let Some(first) = missing.first().copied() {
            self.focus(first);
            let message = if missing.len() == 1 {
                format!("{} is required.", first.label())
            } else {
                format!(
                    "{} is required ({} required fields are empty).",
                    first.label(),
                    missing.len()
                )
            };
            self.error = Some(message.clone());
            return Err(anyhow!(message));
        }

        self.error = None;
        Ok(BoatSubmission {
            details: self.details.clone(),
            updated_at: date_stamp(today),
        })
    }

    /// Text in front of the value, shared by rendering and cursor placement.
    pub(crate) fn prefix(field: BoatField) -> String {
        format!("  {} *: ", field.label())
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: BoatField) -> Line<'static> {
        let value = self.details.get(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            field.placeholder().to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(Self::prefix(field)),
            Span::styled(display, style),
        ])
    }

    pub(crate) fn value_len(&self, field: BoatField) -> usize {
        self.details.get(field).chars().count()
    }
}

/// Record staged for deletion while the confirmation modal is up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ConfirmBoatDelete {
    pub(crate) id: String,
    pub(crate) owner_name: String,
}

impl ConfirmBoatDelete {
    pub(crate) fn for_boat(boat: &BoatRecord) -> Self {
        Self {
            id: boat.id.clone(),
            owner_name: boat.details.owner_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 19).unwrap()
    }

    #[test]
    fn create_mode_starts_blank() {
        let form = RecordForm::new(FormMode::Create);
        assert_eq!(form.details, BoatDetails::blank());
        assert_eq!(form.active, BoatField::OwnerName);
        assert_eq!(form.title(), "New Boat Registration");
    }

    #[test]
    fn edit_mode_prefills_every_field() {
        let seed = BoatRecord::seed();
        let form = RecordForm::new(FormMode::Edit(seed.clone()));
        assert_eq!(form.details, seed.details);
        assert_eq!(form.title(), "Edit Boat Registration");
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        let mut form = RecordForm::new(FormMode::Create);
        form.previous_field();
        assert_eq!(form.active, BoatField::NetTonnage);
        form.next_field();
        assert_eq!(form.active, BoatField::OwnerName);
        form.next_field();
        assert_eq!(form.active, BoatField::BoatName);
        form.next_field();
        assert_eq!(form.active, BoatField::OwnerAddress);
    }

    #[test]
    fn typing_targets_the_active_field() {
        let mut form = RecordForm::new(FormMode::Create);
        form.focus(BoatField::YearOfBuild);
        for ch in "20x19".chars() {
            assert!(form.push_char(ch));
        }
        assert!(!form.push_char('\u{7}'));
        form.backspace();
        assert_eq!(form.details.year_of_build, "20x1");
        assert_eq!(form.value_len(BoatField::YearOfBuild), 4);
    }

    #[test]
    fn submit_is_blocked_until_every_field_is_filled() {
        let mut form = RecordForm::new(FormMode::Create);
        form.focus(BoatField::NetTonnage);
        let err = form.submit(today()).unwrap_err();
        assert!(err.to_string().starts_with("Name of Owner is required"));
        assert_eq!(form.active, BoatField::OwnerName);
        assert!(form.error.is_some());

        form.details = BoatRecord::seed().details;
        form.details.set(BoatField::RegisterDepth, "");
        let err = form.submit(today()).unwrap_err();
        assert_eq!(err.to_string(), "Register Depth (RD) is required.");
        assert_eq!(form.active, BoatField::RegisterDepth);

        form.details.set(BoatField::OwnerAddress, " ");
        form.details.set(BoatField::BoatName, "");
        let err = form.submit(today()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Name of Boat is required (3 required fields are empty)."
        );
        assert_eq!(form.active, BoatField::BoatName);
    }

    #[test]
    fn submit_accepts_unvalidated_text() {
        let mut form = RecordForm::new(FormMode::Create);
        form.details = BoatRecord::seed().details;
        form.details.set(BoatField::YearOfBuild, "around 2019");
        form.details.set(BoatField::GrossTonnage, "forty-five");

        let submission = form.submit(today()).unwrap();
        assert_eq!(submission.details.year_of_build, "around 2019");
        assert_eq!(submission.updated_at, "10/19/2025");
        assert_eq!(form.error, None);
    }

    #[test]
    fn confirm_delete_captures_identity() {
        let confirm = ConfirmBoatDelete::for_boat(&BoatRecord::seed());
        assert_eq!(confirm.id, "1");
        assert_eq!(confirm.owner_name, "John Oliver G. Virola");
    }
}
