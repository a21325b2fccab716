#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use doc_organize::constants::*;
use doc_organize::document::TemplateSlot;
use doc_organize::*;
use std::collections::BTreeMap;

pub struct Fixture {
    pub doc: MemoryDocument,
    pub section: TemplateId,
    pub page: TemplateId,
    pub footer: TemplateId,
    pub callout: TemplateId,
}

fn slot(name: &str, frame: Rect, default_text: &str) -> TemplateSlot {
    TemplateSlot {
        name: name.to_string(),
        frame,
        default_text: default_text.to_string(),
    }
}

/// Document with every template the passes look for and no artboards
pub fn templates() -> Fixture {
    let mut doc = MemoryDocument::new();
    doc.text_metrics = TextMetrics {
        char_width: 10.0,
        line_height: 16.0,
    };
    let text = Rect::new(0.0, 0.0, 300.0, 20.0);

    let section = doc.add_template(
        "Section Title",
        Rect::new(0.0, 0.0, 300.0, 40.0),
        vec![slot(SECTION_TITLE_SLOT, text, "Section")],
    );
    let page = doc.add_template(
        "Page Title",
        Rect::new(0.0, 0.0, 300.0, 40.0),
        vec![slot(PAGE_TITLE_SLOT, text, "Page")],
    );
    let footer = doc.add_template(
        "Footer",
        Rect::new(0.0, 0.0, 400.0, 20.0),
        vec![
            slot(PAGE_NUMBER_SLOT, text, ""),
            slot(CURRENT_SECTION_SLOT, text, ""),
            slot(CURRENT_DATE_SLOT, text, ""),
            slot(DOCUMENT_TITLE_SLOT, text, ""),
        ],
    );
    doc.add_template(
        "TOC Section",
        Rect::new(0.0, 0.0, 100.0, 30.0),
        vec![
            slot(TOC_SECTION_TITLE_SLOT, text, ""),
            slot(TOC_PAGE_NUMBER_SLOT, text, ""),
        ],
    );
    doc.add_template(
        "TOC Page",
        Rect::new(0.0, 0.0, 100.0, 20.0),
        vec![
            slot(TOC_PAGE_TITLE_SLOT, text, ""),
            slot(TOC_PAGE_NUMBER_SLOT, text, ""),
        ],
    );
    let callout = doc.add_template(
        "Callout",
        Rect::new(0.0, 0.0, 24.0, 24.0),
        vec![
            slot(CALLOUT_NUMBER_SLOT, Rect::new(0.0, 0.0, 24.0, 24.0), "0"),
            slot(CALLOUT_DESCRIPTION_SLOT, Rect::default(), ""),
        ],
    );
    doc.add_template(
        "Callout Row",
        Rect::new(0.0, 0.0, 200.0, 24.0),
        vec![
            slot(CALLOUT_LIST_NUMBER_SLOT, Rect::new(4.0, 4.0, 20.0, 16.0), ""),
            slot(
                CALLOUT_LIST_DESCRIPTION_SLOT,
                Rect::new(30.0, 4.0, 160.0, 16.0),
                "",
            ),
        ],
    );

    Fixture {
        doc,
        section,
        page,
        footer,
        callout,
    }
}

impl Fixture {
    /// Artboard with a title element and a footer
    pub fn titled_artboard(&mut self, frame: Rect, section: Option<&str>, page: Option<&str>) -> LayerId {
        let artboard = self.doc.add_artboard("Artboard", frame);
        if let Some(title) = section {
            self.doc.add_instance(
                artboard,
                self.section,
                Rect::new(40.0, 20.0, 300.0, 40.0),
                &[(SECTION_TITLE_SLOT, title)],
            );
        }
        if let Some(title) = page {
            self.doc.add_instance(
                artboard,
                self.page,
                Rect::new(40.0, 20.0, 300.0, 40.0),
                &[(PAGE_TITLE_SLOT, title)],
            );
        }
        self.footer(artboard);
        artboard
    }

    pub fn footer(&mut self, artboard: LayerId) -> LayerId {
        let height = self.doc.frame(artboard).height;
        self.doc.add_instance(
            artboard,
            self.footer,
            Rect::new(0.0, height - 20.0, 400.0, 20.0),
            &[],
        )
    }

    /// `<tocGroup>` with its sizing rectangle
    pub fn toc_container(&mut self, artboard: LayerId, frame: Rect) -> LayerId {
        let container = self
            .doc
            .add_layer(Some(artboard), LayerKind::Group, TOC_GROUP, frame);
        self.doc.add_layer(
            Some(container),
            LayerKind::Shape,
            TOC_GROUP_RECT,
            Rect::new(0.0, 0.0, frame.width, frame.height),
        );
        container
    }

    pub fn add_callout(&mut self, parent: LayerId, x: f64, y: f64, description: &str) -> LayerId {
        self.doc.add_instance(
            parent,
            self.callout,
            Rect::new(x, y, 24.0, 24.0),
            &[(CALLOUT_DESCRIPTION_SLOT, description)],
        )
    }

    /// The end-to-end document: a section and two pages, out of order
    pub fn setup_install_configure(&mut self) -> [LayerId; 3] {
        let configure =
            self.titled_artboard(Rect::new(0.0, 400.0, 400.0, 300.0), None, Some("Configure"));
        let install =
            self.titled_artboard(Rect::new(500.0, 0.0, 400.0, 300.0), None, Some("Install"));
        let setup =
            self.titled_artboard(Rect::new(0.0, 0.0, 400.0, 300.0), Some("Setup"), None);
        [setup, install, configure]
    }
}

pub fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

pub fn hyphen_settings() -> Settings {
    Settings {
        dash_type: DashType::Hyphen,
        ..Default::default()
    }
}

/// Names, frames and overrides of every layer in tree order
pub fn snapshot(doc: &MemoryDocument) -> Vec<(String, Rect, BTreeMap<String, String>)> {
    doc_organize::document::all_page_layers(doc)
        .into_iter()
        .map(|id| {
            let layer = doc.layer(id).unwrap();
            (layer.name.clone(), layer.frame, layer.overrides.clone())
        })
        .collect()
}
