//! Call sheet HTML, shared by the on-screen preview and the print window.

use chrono::{Datelike, NaiveDate};

use crate::form::FormState;
use crate::schedule::ScheduleResult;
use crate::settings::SheetSettings;

const DAYS: [&str; 7] = ["Dimanche", "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi"];
const MONTHS: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin",
    "juillet", "août", "septembre", "octobre", "novembre", "décembre",
];

const FALLBACK_INSTALL: &str = "08:30";
const FALLBACK_END: &str = "11:30";
const FALLBACK_GUEST: &str = "[Nom de l'invité]";

#[derive(Debug, Clone, PartialEq)]
pub enum RenderTarget {
    /// Fragment injected in the preview panel.
    Preview,
    /// Body of the print window; `logo_src` is the resolved logo URL.
    Print { logo_src: String },
}

pub fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// `2025-03-03` → `LUNDI 3 MARS 2025`. Empty when the date cannot be read.
pub fn format_french_date(ymd: &str) -> String {
    let Ok(date) = NaiveDate::parse_from_str(ymd.trim(), "%Y-%m-%d") else {
        return String::new();
    };
    let day = DAYS[date.weekday().num_days_from_sunday() as usize];
    let month = MONTHS[date.month0() as usize];
    format!("{} {} {} {}", day, date.day(), month, date.year()).to_uppercase()
}

fn or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}

/// `(time, label)` rows of the day narrative, with fixed fallbacks for blanks.
pub fn schedule_lines(schedule: &ScheduleResult, pat_time: &str, guest: &str) -> Vec<(String, String)> {
    let meet = or(&schedule.meet, pat_time);
    vec![
        (or(&schedule.install, FALLBACK_INSTALL).to_string(), "Installation".to_string()),
        (meet.to_string(), format!("Arrivée {}", or(guest, FALLBACK_GUEST))),
        (or(&schedule.hair_makeup, meet).to_string(), "HMC (Habillage Maquillage Coiffure) - Au besoin".to_string()),
        (pat_time.to_string(), "Début de tournage".to_string()),
        (or(&schedule.end, FALLBACK_END).to_string(), "Fin de tournage et rangement".to_string()),
    ]
}

fn para(text: &str) -> String {
    format!("<p>{}</p>", esc(text))
}

struct Markup {
    wrapper: &'static str,
    header: &'static str,
    title_tag: &'static str,
    section: &'static str,
    heading_tag: &'static str,
}

impl Markup {
    fn section(&self, heading: &str, body: &str) -> String {
        format!("<div class=\"{cls}\"><{h}>{heading}</{h}>{body}</div>", cls = self.section, h = self.heading_tag)
    }
}

const PREVIEW_MARKUP: Markup = Markup {
    wrapper: "pdf-content",
    header: "pdf-header",
    title_tag: "h2",
    section: "pdf-section",
    heading_tag: "h3",
};

const PRINT_MARKUP: Markup = Markup {
    wrapper: "container",
    header: "header",
    title_tag: "h1",
    section: "section",
    heading_tag: "h2",
};

pub fn render_sheet(form: &FormState, schedule: &ScheduleResult, settings: &SheetSettings, target: &RenderTarget) -> String {
    let m = match target {
        RenderTarget::Preview => &PREVIEW_MARKUP,
        RenderTarget::Print { .. } => &PRINT_MARKUP,
    };
    let mut html = String::new();
    html.push_str(&format!("<div class=\"{}\">", m.wrapper));

    // header
    html.push_str(&format!("<div class=\"{}\">", m.header));
    match target {
        RenderTarget::Preview => html.push_str(&format!("<div class=\"pdf-logo-text\">{}</div>", esc(&settings.brand))),
        RenderTarget::Print { logo_src } => html.push_str(&format!(
            "<img src=\"{}\" alt=\"Logo {}\" class=\"logo\" onerror=\"this.style.display='none'\">",
            esc(logo_src),
            esc(&settings.brand),
        )),
    }
    html.push_str(&format!(
        "<{t}>FEUILLE DE SERVICE - {}</{t}></div><br><br>",
        esc(&format_french_date(&form.date)),
        t = m.title_tag,
    ));

    // format + guest
    let guest_line = if form.school_name.trim().is_empty() {
        format!("INVITÉ : {}", form.guest_name)
    } else {
        format!("INVITÉ : {} - {}", form.guest_name, form.school_name)
    };
    html.push_str(&format!(
        "<div class=\"{cls}\"><{h}>FORMAT : \"{}\"</{h}>{}</div>",
        esc(&form.format_type.to_uppercase()),
        para(&guest_line),
        cls = m.section,
        h = m.heading_tag,
    ));

    // location
    let venue: String = if form.is_exterior && !form.exterior_address.trim().is_empty() {
        form.exterior_address.lines().map(|l| para(l)).collect()
    } else {
        settings.default_venue.iter().map(|l| para(l)).collect()
    };
    html.push_str(&m.section("LIEU DE RDV :", &venue));

    // meet time
    html.push_str(&format!(
        "<div class=\"{cls}\"><{h}>HEURE DE RDV : {}</{h}></div>",
        esc(or(&schedule.meet, &form.pat_time)),
        cls = m.section,
        h = m.heading_tag,
    ));

    // contacts
    let c = &settings.secondary_contact;
    let contacts = format!(
        "{}{}",
        para(&format!("{} (Responsable projet) - {}", form.manager_name, form.manager_phone)),
        para(&format!("{} ({}) - {}", c.name, c.role, c.phone)),
    );
    html.push_str(&m.section("CONTACTS :", &contacts));

    // day narrative
    let day: String = schedule_lines(schedule, &form.pat_time, &form.guest_name)
        .iter()
        .map(|(time, label)| format!("<p><strong>{}</strong> : {}</p>", esc(time), esc(label)))
        .collect();
    html.push_str(&m.section("DÉROULÉ DE LA JOURNÉE :", &day));

    // notes
    let notes: String = settings.wardrobe_notes.iter().map(|n| para(&format!("• {}", n))).collect();
    html.push_str(&m.section("NOTE AUX INTERVENANTS :", &notes));

    html.push_str("</div>");
    html
}

const PRINT_CSS: &str = r#"
    @page { size: A4; margin: 20mm; }
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: 'Nunito', Arial, sans-serif; color: #000; line-height: 1.6; background-color: white; }
    .container { width: 100%; max-width: 210mm; margin: 0 auto; }
    .header { text-align: center; margin-bottom: 20px; }
    .logo { max-width: 210px; height: auto; display: block; margin: 0 auto 15px; }
    h1 { font-size: 20px; margin: 10px 0; font-weight: bold; }
    h2 { font-size: 16px; margin: 15px 0 5px; font-weight: bold; }
    p { margin: 5px 0; }
    .section { margin-bottom: 20px; page-break-inside: avoid; }
"#;

/// Complete HTML document for the print window.
pub fn print_document(form: &FormState, schedule: &ScheduleResult, settings: &SheetSettings, logo_src: &str) -> String {
    let body = render_sheet(form, schedule, settings, &RenderTarget::Print { logo_src: logo_src.to_string() });
    format!(
        "<!DOCTYPE html><html lang=\"fr\"><head><meta charset=\"UTF-8\"><title>{}</title><style>{}</style></head><body>{}</body></html>",
        esc(&form.print_title()),
        PRINT_CSS,
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormState {
        FormState {
            format_type: "L'interview".into(),
            date: "2025-03-03".into(),
            guest_name: "Jean Dupont".into(),
            school_name: "Sciences Po".into(),
            pat_time: "10:00".into(),
            manager_name: "Alice".into(),
            manager_phone: "06 11".into(),
            ..FormState::default()
        }
    }

    #[test]
    fn french_date_uses_fixed_tables() {
        assert_eq!(format_french_date("2025-03-03"), "LUNDI 3 MARS 2025");
        assert_eq!(format_french_date("2024-02-18"), "DIMANCHE 18 FÉVRIER 2024");
        assert_eq!(format_french_date("2025-08-15"), "VENDREDI 15 AOÛT 2025");
        assert_eq!(format_french_date(""), "");
        assert_eq!(format_french_date("03/03/2025"), "");
    }

    #[test]
    fn narrative_fallbacks_for_blank_checkpoints() {
        let lines = schedule_lines(&ScheduleResult::default(), "10:00", "");
        let times: Vec<&str> = lines.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(times, vec!["08:30", "10:00", "10:00", "10:00", "11:30"]);
        assert_eq!(lines[1].1, "Arrivée [Nom de l'invité]");
    }

    #[test]
    fn hair_makeup_falls_back_to_meet() {
        let s = ScheduleResult { install: "07:00".into(), meet: "07:30".into(), hair_makeup: "".into(), end: "".into() };
        let lines = schedule_lines(&s, "08:00", "Léa");
        assert_eq!(lines[2].0, "07:30");
        assert_eq!(lines[4].0, "11:30");
    }

    #[test]
    fn preview_sections_in_order() {
        let f = form();
        let html = render_sheet(&f, &f.schedule(), &SheetSettings::default(), &RenderTarget::Preview);
        let order = [
            "FEUILLE DE SERVICE - LUNDI 3 MARS 2025",
            "FORMAT : \"L&#39;INTERVIEW\"",
            "INVITÉ : Jean Dupont - Sciences Po",
            "LIEU DE RDV :",
            "Carré Daumesnil",
            "HEURE DE RDV : 09:45",
            "Alice (Responsable projet) - 06 11",
            "Martin Pavloff (Responsable vidéo) - 06 12 52 85 69",
            "<strong>09:30</strong> : Installation",
            "<strong>11:30</strong> : Fin de tournage et rangement",
            "NOTE AUX INTERVENANTS :",
        ];
        let mut from = 0;
        for needle in order {
            let at = html[from..].find(needle).unwrap_or_else(|| panic!("{needle} missing after {from}"));
            from += at + needle.len();
        }
        assert!(html.starts_with("<div class=\"pdf-content\">"));
        assert!(html.contains("<h3>CONTACTS :</h3>"));
    }

    #[test]
    fn exterior_address_lines_replace_default_venue() {
        let f = FormState { is_exterior: true, exterior_address: "Campus Nord\n12 rue <Test>".into(), ..form() };
        let html = render_sheet(&f, &f.schedule(), &SheetSettings::default(), &RenderTarget::Preview);
        assert!(html.contains("<p>Campus Nord</p><p>12 rue &lt;Test&gt;</p>"));
        assert!(!html.contains("Daumesnil"));
    }

    #[test]
    fn blank_exterior_address_keeps_default_venue() {
        let f = FormState { is_exterior: true, exterior_address: "  ".into(), ..form() };
        let html = render_sheet(&f, &f.schedule(), &SheetSettings::default(), &RenderTarget::Preview);
        assert!(html.contains("Daumesnil"));
    }

    #[test]
    fn school_omitted_when_blank() {
        let f = FormState { school_name: String::new(), ..form() };
        let html = render_sheet(&f, &f.schedule(), &SheetSettings::default(), &RenderTarget::Preview);
        assert!(html.contains("<p>INVITÉ : Jean Dupont</p>"));
    }

    #[test]
    fn print_document_has_logo_and_title() {
        let f = form();
        let doc = print_document(&f, &f.schedule(), &SheetSettings::default(), "https://x.test/logo_etudiant.png");
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>CallSheet_Linterview_Jean_Dupont_2025-03-03.pdf</title>"));
        assert!(doc.contains("<img src=\"https://x.test/logo_etudiant.png\""));
        assert!(doc.contains("class=\"logo\""));
        assert!(doc.contains("<h1>FEUILLE DE SERVICE - LUNDI 3 MARS 2025</h1>"));
        assert!(doc.contains("<div class=\"section\"><h2>CONTACTS :</h2>"));
    }
}
