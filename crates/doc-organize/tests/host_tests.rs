mod common;

use common::*;
use doc_organize::constants::*;
use doc_organize::document::{child_named, children_of_kind};
use doc_organize::*;
use serde_json::json;

#[test]
fn test_organize_command_reads_store() {
    let mut f = templates();
    let [setup, _, _] = f.setup_install_configure();
    let mut store = JsonSettingsStore::new();
    store.set_setting_for_key("dashType", json!("-"));
    store.set_setting_for_key("useTOC", json!(false));

    let report = dispatch_command(&mut f.doc, &mut store, Command::OrganizeDocument, &now()).unwrap();

    match report {
        Report::Summary(summary) => assert!(!summary.has_errors()),
        other => panic!("Expected a summary, got {:?}", other),
    }
    assert_eq!(f.doc.name(setup), "1 - Setup");
}

#[test]
fn test_settings_command() {
    let mut f = templates();
    let [setup, _, _] = f.setup_install_configure();
    let mut store = JsonSettingsStore::new();

    let cancelled =
        dispatch_command(&mut f.doc, &mut store, Command::Settings(None), &now()).unwrap();
    assert_eq!(cancelled, Report::Nothing);
    assert_eq!(f.doc.name(setup), "Artboard");
    assert_eq!(store, JsonSettingsStore::new());

    let confirmed = Settings {
        use_sections: false,
        use_toc: false,
        ..Default::default()
    };
    dispatch_command(
        &mut f.doc,
        &mut store,
        Command::Settings(Some(confirmed.clone())),
        &now(),
    )
    .unwrap();
    assert_eq!(f.doc.name(setup), "Setup");
    assert_eq!(Settings::from_store(&store).unwrap(), confirmed);
}

#[test]
fn test_invalid_store_is_an_error() {
    let mut f = templates();
    f.setup_install_configure();
    let mut store = JsonSettingsStore::new();
    store.set_setting_for_key("nearestPixelToRoundTo", json!(2.0));

    let result = dispatch_command(&mut f.doc, &mut store, Command::OrganizeDocument, &now());
    assert!(matches!(result, Err(OrganizeError::Config(_))));
}

#[test]
fn test_update_callouts_needs_selection() {
    let mut f = templates();
    let [_, install, _] = f.setup_install_configure();
    let first = f.add_callout(install, 10.0, 10.0, "First");
    f.add_callout(install, 10.0, 60.0, "Second");
    let mut store = JsonSettingsStore::new();

    let report = dispatch_command(
        &mut f.doc,
        &mut store,
        Command::UpdateCalloutsOnArtboard,
        &now(),
    )
    .unwrap();
    assert_eq!(
        report,
        Report::Alert {
            title: "Update Callouts".into(),
            message: "No artboard selected".into(),
        }
    );
    assert_eq!(f.doc.override_text(first, CALLOUT_NUMBER_SLOT).as_deref(), Some("0"));

    f.doc.select(first, false);
    let report = dispatch_command(
        &mut f.doc,
        &mut store,
        Command::UpdateCalloutsOnArtboard,
        &now(),
    )
    .unwrap();
    let Report::Summary(summary) = report else {
        panic!("Expected a summary");
    };
    assert_eq!(summary.partition().0.as_deref(), Some("2 callouts updated"));
    // Artboard is still unnumbered, so callouts have no section prefix
    assert_eq!(f.doc.override_text(first, CALLOUT_NUMBER_SLOT).as_deref(), Some("1"));
}

#[test]
fn test_document_saved_refreshes_dates() {
    let mut f = templates();
    let [setup, install, _] = f.setup_install_configure();
    let mut store = JsonSettingsStore::new();
    store.set_setting_for_key("dateFormatChoice", json!(1));

    let autosave = dispatch_event(
        &mut f.doc,
        &store,
        HostEvent::DocumentSaved { autosaved: true },
        &now(),
    )
    .unwrap();
    assert_eq!(autosave, Report::Nothing);

    let saved = dispatch_event(
        &mut f.doc,
        &store,
        HostEvent::DocumentSaved { autosaved: false },
        &now(),
    )
    .unwrap();
    let Report::Summary(summary) = saved else {
        panic!("Expected a summary");
    };
    assert_eq!(
        summary.partition().0.as_deref(),
        Some("3 current-date instance(s) updated on Save")
    );
    for artboard in [setup, install] {
        let footer = f
            .doc
            .children(artboard)
            .into_iter()
            .find(|l| f.doc.has_override(*l, CURRENT_DATE_SLOT))
            .unwrap();
        assert_eq!(
            f.doc.override_text(footer, CURRENT_DATE_SLOT).as_deref(),
            Some("10/19/2026")
        );
    }
}

#[test]
fn test_resized_callout_list_is_laid_out_again() {
    let mut f = templates();
    let [_, install, _] = f.setup_install_configure();
    f.add_callout(install, 10.0, 10.0, "Twelve chars");
    let settings = Settings {
        use_toc: false,
        ..hyphen_settings()
    };
    organize_document(&mut f.doc, &settings, &now());

    let list = child_named(&f.doc, install, LayerKind::Group, CALLOUT_LIST_GROUP).unwrap();
    // 100 wide list leaves 60 for text: two lines
    assert_eq!(f.doc.frame(list).height, 40.0);

    let frame = f.doc.frame(list);
    f.doc
        .set_frame(list, Rect::new(frame.x, frame.y, 200.0, frame.height));
    let mut store = JsonSettingsStore::new();
    settings.write_to(&mut store).unwrap();
    let report = dispatch_event(
        &mut f.doc,
        &store,
        HostEvent::LayersResized { layers: vec![list] },
        &now(),
    )
    .unwrap();

    assert!(matches!(report, Report::Summary(_)));
    assert_eq!(f.doc.frame(list).height, 24.0);
    let entry = children_of_kind(&f.doc, list, LayerKind::SymbolInstance)[0];
    assert_eq!(f.doc.frame(entry), Rect::new(0.0, 0.0, 200.0, 24.0));
}

#[test]
fn test_resized_toc_follows_container() {
    let mut f = templates();
    let [setup, _, _] = f.setup_install_configure();
    let container = f.toc_container(setup, Rect::new(20.0, 80.0, 300.0, 50.0));
    let settings = hyphen_settings();
    organize_document(&mut f.doc, &settings, &now());

    // One run of height 70 overflows a 50 high container but stays in one column
    assert_eq!(children_of_kind(&f.doc, container, LayerKind::Group).len(), 1);

    let frame = f.doc.frame(container);
    f.doc
        .set_frame(container, Rect::new(frame.x, frame.y, 640.0, 200.0));
    let mut store = JsonSettingsStore::new();
    settings.write_to(&mut store).unwrap();
    let report = dispatch_event(
        &mut f.doc,
        &store,
        HostEvent::LayersResized {
            layers: vec![container, setup],
        },
        &now(),
    )
    .unwrap();

    let Report::Summary(summary) = report else {
        panic!("Expected a summary");
    };
    assert_eq!(summary.entries().len(), 1);
    let run = children_of_kind(&f.doc, container, LayerKind::Group)[0];
    assert_eq!(f.doc.frame(run).width, 640.0);
    let rect = child_named(&f.doc, container, LayerKind::Shape, TOC_GROUP_RECT).unwrap();
    assert_eq!(f.doc.frame(rect), Rect::new(0.0, 0.0, 640.0, 200.0));
}
