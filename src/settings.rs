//! Sheet settings: the constants printed on every call sheet, persisted as JSON.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub name: String,
    pub role: String,
    pub phone: String,
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            name: "Martin Pavloff".into(),
            role: "Responsable vidéo".into(),
            phone: "06 12 52 85 69".into(),
        }
    }
}

/// Delays (milliseconds) used by the print window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintTiming {
    /// Wait after the logo has loaded (or failed) before printing.
    pub settle_ms: i32,
    /// Print regardless once this much time has passed.
    pub fallback_ms: i32,
    /// Close the window this long after printing.
    pub close_ms: i32,
}

impl Default for PrintTiming {
    fn default() -> Self {
        Self { settle_ms: 500, fallback_ms: 2000, close_ms: 1000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSettings {
    pub brand: String,
    /// Meeting place printed when the shoot is not exterior.
    pub default_venue: Vec<String>,
    pub secondary_contact: Contact,
    /// Logo path, relative to the page.
    pub logo_path: String,
    pub wardrobe_notes: Vec<String>,
    pub print: PrintTiming,
    /// UI language: "system" | "fr" | "en".
    pub language: String,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            brand: "L'Étudiant".into(),
            default_venue: vec![
                "L'Etudiant, Carré Daumesnil".into(),
                "52, rue Jacques-Hillairet - 75012 PARIS".into(),
            ],
            secondary_contact: Contact::default(),
            logo_path: "logo_etudiant.png".into(),
            wardrobe_notes: vec![
                "Évitez les vêtements avec marques apparentes, les logos, les carreaux et les rayures".into(),
                "Nous tournons parfois sur fond vert (qui est notre couleur d'incrustation), merci donc de ne pas porter de vert (au risque de vous fondre dans le décor)".into(),
                "Si vous portez des lunettes, dans les mesures du possible, merci de privilégier les lentilles de contact pour notre tournage".into(),
            ],
            print: PrintTiming::default(),
            language: "system".into(),
        }
    }
}

impl SheetSettings {
    /// Parses a stored settings slot; anything unreadable yields the defaults.
    pub fn from_json(raw: Option<&str>) -> Self {
        match raw.map(serde_json::from_str::<SheetSettings>) {
            Some(Ok(s)) => s,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "stored settings unreadable, using defaults");
                Self::default()
            }
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_slot_gives_defaults() {
        assert_eq!(SheetSettings::from_json(None), SheetSettings::default());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let s = SheetSettings::from_json(Some(r#"{"brand":"Studio","print":{"fallback_ms":5000}}"#));
        assert_eq!(s.brand, "Studio");
        assert_eq!(s.print.fallback_ms, 5000);
        assert_eq!(s.print.settle_ms, 500);
        assert_eq!(s.secondary_contact.name, "Martin Pavloff");
    }

    #[test]
    fn corrupt_json_gives_defaults() {
        assert_eq!(SheetSettings::from_json(Some("{not json")), SheetSettings::default());
    }
}
