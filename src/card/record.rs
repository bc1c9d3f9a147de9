//! Card record and field names.

use super::Photo;

// ─────────────────────────────────────────────────────────────────────────────
// Card Fields
// ─────────────────────────────────────────────────────────────────────────────

/// The string fields of a card, addressable by name from the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardField {
    Name,
    Id,
    Institution,
    Program,
    EmergencyContact,
    Email,
    Phone,
}

impl CardField {
    /// All string fields in form order.
    pub fn all() -> &'static [CardField] {
        &[
            CardField::Name,
            CardField::Id,
            CardField::Institution,
            CardField::Program,
            CardField::Email,
            CardField::Phone,
            CardField::EmergencyContact,
        ]
    }

    /// Form label for this field.
    pub fn label(&self) -> &'static str {
        match self {
            CardField::Name => "Full Name",
            CardField::Id => "Student ID",
            CardField::Institution => "College/University",
            CardField::Program => "Course/Program",
            CardField::EmergencyContact => "Emergency Contact",
            CardField::Email => "Email",
            CardField::Phone => "Phone",
        }
    }

    /// Hint text shown in an empty form input.
    pub fn hint(&self) -> &'static str {
        match self {
            CardField::Name => "Enter full name",
            CardField::Id => "Enter student ID",
            CardField::Institution => "Enter college/university name",
            CardField::Program => "Enter course or program",
            CardField::EmergencyContact => "Emergency contact number",
            CardField::Email => "student@university.edu",
            CardField::Phone => "+1 (555) 123-4567",
        }
    }

    /// Text the card shows when the field is empty.
    ///
    /// Contact-only fields are never printed on the card and have no fallback.
    pub fn preview_fallback(&self) -> Option<&'static str> {
        match self {
            CardField::Name => Some("Student Name"),
            CardField::Id => Some("ID000000"),
            CardField::Institution => Some("University Name"),
            CardField::Program => Some("Course Name"),
            CardField::Email => Some("email@university.edu"),
            CardField::EmergencyContact | CardField::Phone => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Card Record
// ─────────────────────────────────────────────────────────────────────────────

/// Everything printed on (or kept alongside) one identity card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardRecord {
    pub name: String,
    pub id: String,
    pub institution: String,
    pub program: String,
    pub photo: Option<Photo>,
    pub emergency_contact: String,
    pub email: String,
    pub phone: String,
}

impl CardRecord {
    /// Placeholder values shown at startup.
    pub fn sample() -> Self {
        Self {
            name: "Alex Johnson".to_string(),
            id: "ST2024001".to_string(),
            institution: "University of Technology".to_string(),
            program: "Computer Science".to_string(),
            photo: None,
            emergency_contact: "+1 (555) 123-4567".to_string(),
            email: "alex.johnson@university.edu".to_string(),
            phone: "+1 (555) 987-6543".to_string(),
        }
    }

    /// A record with every field cleared.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Borrow a string field by name.
    pub fn field(&self, field: CardField) -> &str {
        match field {
            CardField::Name => &self.name,
            CardField::Id => &self.id,
            CardField::Institution => &self.institution,
            CardField::Program => &self.program,
            CardField::EmergencyContact => &self.emergency_contact,
            CardField::Email => &self.email,
            CardField::Phone => &self.phone,
        }
    }

    /// Mutably borrow a string field by name, for direct binding to a text input.
    pub fn field_mut(&mut self, field: CardField) -> &mut String {
        match field {
            CardField::Name => &mut self.name,
            CardField::Id => &mut self.id,
            CardField::Institution => &mut self.institution,
            CardField::Program => &mut self.program,
            CardField::EmergencyContact => &mut self.emergency_contact,
            CardField::Email => &mut self.email,
            CardField::Phone => &mut self.phone,
        }
    }

    /// Set one named field.
    pub fn set_field(&mut self, field: CardField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    /// The value the card displays for `field`: the entered text, or the
    /// field's fallback when it is blank.
    pub fn display_value(&self, field: CardField) -> &str {
        let value = self.field(field);
        if value.trim().is_empty() {
            field.preview_fallback().unwrap_or("")
        } else {
            value
        }
    }

    /// Whether the fields required for export (name and ID) are non-empty.
    ///
    /// Whitespace counts as content; only an empty string blocks export.
    pub fn is_exportable(&self) -> bool {
        !self.name.is_empty() && !self.id.is_empty()
    }

    /// Base filename (without extension) for exported artifacts.
    pub fn export_file_stem(&self) -> String {
        format!("{}-ID-Card", self.name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
