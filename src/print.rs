//! Print path: validation, print surface, directory auto-save.

use crate::directory::ManagerDirectory;
use crate::error::Result;
use crate::form::FormState;
use crate::render::print_document;
use crate::settings::SheetSettings;

/// Where a finished call sheet goes: a browser print window on the web, an
/// HTML file on desktop.
pub trait PrintSurface {
    fn open(&mut self, title: &str, html: &str, settings: &SheetSettings) -> Result<()>;
}

/// Lets the print fire once, whichever of the logo signal or the fallback
/// timer comes first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PrintGate {
    printed: bool,
}

impl PrintGate {
    pub fn new() -> Self { Self::default() }

    /// True the first time only.
    pub fn fire(&mut self) -> bool {
        !std::mem::replace(&mut self.printed, true)
    }

    pub fn printed(&self) -> bool { self.printed }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOutcome {
    pub title: String,
    /// The manager was added to the directory; caller should persist it.
    pub directory_changed: bool,
}

/// Logo URL resolved against the page location (`https://host/app/index.html`
/// → `https://host/app/logo.png`).
pub fn resolve_logo(page_href: &str, logo_path: &str) -> String {
    if logo_path.contains("://") || page_href.is_empty() {
        return logo_path.to_string();
    }
    let page = page_href.split(['?', '#']).next().unwrap_or(page_href);
    let base_end = page.rfind('/').map(|i| i + 1).unwrap_or(page.len());
    format!("{}{}", &page[..base_end], logo_path.trim_start_matches('/'))
}

/// Validates the form, hands the document to `surface`, then records the
/// manager. Nothing is opened and the directory is untouched when a required
/// field is blank or the surface fails.
pub fn generate_print(
    form: &FormState,
    settings: &SheetSettings,
    logo_src: &str,
    directory: &mut ManagerDirectory,
    surface: &mut dyn PrintSurface,
) -> Result<PrintOutcome> {
    form.validate_for_print()?;

    let schedule = form.schedule();
    let title = form.print_title();
    let html = print_document(form, &schedule, settings, logo_src);
    surface.open(&title, &html, settings)?;
    tracing::info!(%title, "call sheet sent to print");

    let directory_changed = directory.auto_save(&form.manager_name, &form.manager_phone);
    Ok(PrintOutcome { title, directory_changed })
}

#[cfg(target_arch = "wasm32")]
pub mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::{prelude::Closure, JsCast};
    use web_sys::{window, HtmlImageElement, Window};

    use super::{PrintGate, PrintSurface};
    use crate::error::{CallSheetError, Result};
    use crate::settings::SheetSettings;

    /// Opens `about:blank`, injects the document and prints once the logo has
    /// loaded or failed, with a fallback timer; closes the window afterwards.
    pub struct BrowserPrintWindow;

    fn schedule_print(win: &Window, gate: &Rc<RefCell<PrintGate>>, delay: i32, close_ms: i32) {
        let target = win.clone();
        let gate = gate.clone();
        let cb = Closure::wrap(Box::new(move || {
            if !gate.borrow_mut().fire() {
                return;
            }
            let _ = target.print();
            let closer = target.clone();
            let close_cb = Closure::wrap(Box::new(move || { let _ = closer.close(); }) as Box<dyn FnMut()>);
            let _ = target.set_timeout_with_callback_and_timeout_and_arguments_0(close_cb.as_ref().unchecked_ref(), close_ms);
            close_cb.forget();
        }) as Box<dyn FnMut()>);
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), delay);
        cb.forget();
    }

    impl PrintSurface for BrowserPrintWindow {
        fn open(&mut self, title: &str, html: &str, settings: &SheetSettings) -> Result<()> {
            let w = window().ok_or_else(|| CallSheetError::Surface("no window".into()))?;
            let win = w
                .open_with_url_and_target("about:blank", "_blank")
                .ok()
                .flatten()
                .ok_or(CallSheetError::PopupBlocked)?;
            let doc = win.document().ok_or_else(|| CallSheetError::Surface("print window has no document".into()))?;
            let root = doc.document_element().ok_or_else(|| CallSheetError::Surface("print window has no root".into()))?;
            root.set_inner_html(html);
            doc.set_title(title);
            let _ = win.focus();

            let timing = &settings.print;
            let gate = Rc::new(RefCell::new(PrintGate::new()));
            let logo = doc
                .query_selector(".logo")
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlImageElement>().ok());
            match logo {
                Some(img) if !img.complete() => {
                    let on_done = {
                        let win = win.clone();
                        let gate = gate.clone();
                        let (settle, close) = (timing.settle_ms, timing.close_ms);
                        Closure::wrap(Box::new(move || schedule_print(&win, &gate, settle, close)) as Box<dyn FnMut()>)
                    };
                    img.set_onload(Some(on_done.as_ref().unchecked_ref()));
                    img.set_onerror(Some(on_done.as_ref().unchecked_ref()));
                    on_done.forget();
                }
                _ => schedule_print(&win, &gate, timing.settle_ms, timing.close_ms),
            }
            schedule_print(&win, &gate, timing.fallback_ms, timing.close_ms);
            Ok(())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod file {
    use std::path::PathBuf;

    use super::PrintSurface;
    use crate::error::Result;
    use crate::settings::SheetSettings;

    /// Desktop fallback: writes `<title>.html` to `dir` for the system browser.
    pub struct HtmlFileSurface {
        pub dir: PathBuf,
        pub written: Option<PathBuf>,
    }

    impl HtmlFileSurface {
        pub fn in_current_dir() -> Self {
            let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Self { dir, written: None }
        }
    }

    impl PrintSurface for HtmlFileSurface {
        fn open(&mut self, title: &str, html: &str, _settings: &SheetSettings) -> Result<()> {
            let name = format!("{}.html", title.trim_end_matches(".pdf"));
            let path = self.dir.join(name);
            std::fs::write(&path, html)?;
            tracing::info!(path = %path.display(), "call sheet written");
            self.written = Some(path);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::ManagerRecord;
    use crate::error::{CallSheetError, RequiredField};

    #[derive(Default)]
    struct Recording {
        opened: Vec<(String, String)>,
        fail: bool,
    }

    impl PrintSurface for Recording {
        fn open(&mut self, title: &str, html: &str, _settings: &SheetSettings) -> Result<()> {
            if self.fail {
                return Err(CallSheetError::PopupBlocked);
            }
            self.opened.push((title.to_string(), html.to_string()));
            Ok(())
        }
    }

    fn complete() -> FormState {
        FormState {
            date: "2025-03-03".into(),
            guest_name: "Jean Dupont".into(),
            pat_time: "10:00".into(),
            manager_name: "Bruno".into(),
            manager_phone: "06 22".into(),
            ..FormState::default()
        }
    }

    fn directory() -> ManagerDirectory {
        ManagerDirectory::from_records(vec![ManagerRecord::new("Alice", "06 11")])
    }

    #[test]
    fn gate_fires_once() {
        let mut gate = PrintGate::new();
        assert!(gate.fire());
        assert!(!gate.fire());
        assert!(gate.printed());
    }

    #[test]
    fn logo_is_resolved_next_to_the_page() {
        assert_eq!(resolve_logo("https://h.test/app/index.html?titre=x", "logo_etudiant.png"), "https://h.test/app/logo_etudiant.png");
        assert_eq!(
            resolve_logo("https://h.test/app/index.html?titre=x&date=03/03/2025", "logo_etudiant.png"),
            "https://h.test/app/logo_etudiant.png"
        );
        assert_eq!(resolve_logo("https://h.test/app/#/a/b", "logo.png"), "https://h.test/app/logo.png");
        assert_eq!(resolve_logo("https://h.test/", "/logo.png"), "https://h.test/logo.png");
        assert_eq!(resolve_logo("", "logo.png"), "logo.png");
        assert_eq!(resolve_logo("https://h.test/", "https://cdn.test/l.png"), "https://cdn.test/l.png");
    }

    #[test]
    fn successful_print_opens_once_and_saves_manager() {
        let mut dir = directory();
        let mut surface = Recording::default();
        let outcome = generate_print(&complete(), &SheetSettings::default(), "logo.png", &mut dir, &mut surface).unwrap();

        assert!(outcome.directory_changed);
        assert_eq!(outcome.title, "CallSheet_Linterview_Jean_Dupont_2025-03-03.pdf");
        assert_eq!(surface.opened.len(), 1);
        assert!(surface.opened[0].1.contains("<strong>09:30</strong> : Installation"));
        assert!(dir.find_by_name("bruno").is_some());
    }

    #[test]
    fn any_blank_required_field_blocks_printing() {
        let blanks: [fn(&mut FormState); 5] = [
            |f| f.date.clear(),
            |f| f.guest_name.clear(),
            |f| f.pat_time.clear(),
            |f| f.manager_name.clear(),
            |f| f.manager_phone = "  ".into(),
        ];
        for (i, blank) in blanks.iter().enumerate() {
            let mut form = complete();
            blank(&mut form);
            let mut dir = directory();
            let mut surface = Recording::default();
            let err = generate_print(&form, &SheetSettings::default(), "logo.png", &mut dir, &mut surface).unwrap_err();
            assert!(matches!(err, CallSheetError::MissingFields(ref f) if f.len() == 1), "case {i}");
            assert!(surface.opened.is_empty(), "case {i}");
            assert_eq!(dir, directory(), "case {i}");
        }
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let mut dir = directory();
        let err = generate_print(&FormState::default(), &SheetSettings::default(), "", &mut dir, &mut Recording::default()).unwrap_err();
        let CallSheetError::MissingFields(fields) = err else { panic!("unexpected {err}") };
        assert_eq!(fields[0], RequiredField::Date);
        assert_eq!(fields.len(), 5);
    }

    #[test]
    fn blocked_surface_skips_auto_save() {
        let mut dir = directory();
        let mut surface = Recording { fail: true, ..Default::default() };
        let err = generate_print(&complete(), &SheetSettings::default(), "logo.png", &mut dir, &mut surface).unwrap_err();
        assert!(matches!(err, CallSheetError::PopupBlocked));
        assert_eq!(dir, directory());
    }

    #[test]
    fn file_surface_writes_html() {
        let dir = std::env::temp_dir().join(format!("callsheet-print-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut surface = file::HtmlFileSurface { dir: dir.clone(), written: None };
        surface.open("CallSheet_x.pdf", "<html></html>", &SheetSettings::default()).unwrap();
        let path = surface.written.clone().unwrap();
        assert_eq!(path, dir.join("CallSheet_x.html"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
        let _ = std::fs::remove_dir_all(dir);
    }
}
