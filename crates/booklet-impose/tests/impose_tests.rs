use booklet_impose::render::{LopdfSource, LopdfWriter};
use booklet_impose::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Build an in-memory document whose pages share one font resource
fn create_test_pdf(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));

    // Create pages array
    let mut kids = Vec::new();
    for i in 0..num_pages {
        let content = format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut fonts = Dictionary::new();
        fonts.set("F1", Object::Reference(font_id));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(resources)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    // Create pages dict
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    // Create catalog
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

fn media_box(doc: &Document, page_id: ObjectId) -> Vec<f32> {
    doc.get_dictionary(page_id)
        .unwrap()
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_float().unwrap())
        .collect()
}

fn xobject_names(doc: &Document, page_id: ObjectId) -> Vec<String> {
    let resources = doc
        .get_dictionary(page_id)
        .unwrap()
        .get(b"Resources")
        .unwrap()
        .as_dict()
        .unwrap();
    resources
        .get(b"XObject")
        .unwrap()
        .as_dict()
        .unwrap()
        .iter()
        .map(|(k, _)| String::from_utf8_lossy(k).into_owned())
        .collect()
}

fn content_text(doc: &Document, page_id: ObjectId) -> String {
    String::from_utf8(doc.get_page_content(page_id).unwrap()).unwrap()
}

#[tokio::test]
async fn test_load_pdf() {
    use tempfile::NamedTempFile;

    let mut doc = create_test_pdf(5);
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path();

    // Save test PDF
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    std::fs::write(path, writer).unwrap();

    // Load it back
    let loaded = load_pdf(path).await.unwrap();
    assert_eq!(loaded.get_pages().len(), 5);
}

#[tokio::test]
async fn test_load_missing_file_is_io_error() {
    let result = load_pdf("/nonexistent/booklet-input.pdf").await;
    assert!(matches!(result, Err(ImposeError::Io(_))));
}

#[tokio::test]
async fn test_single_mode_one_page_per_sheet() {
    let doc = create_test_pdf(3);
    let options = BookletOptions::new(Mode::Single);
    let store = TransformStore::new(3);

    let imposed = impose(&doc, &options, &store, NoProgress).await.unwrap();
    let output = &imposed.document;

    let ids = page_ids(output);
    assert_eq!(ids.len(), 3);
    for &id in &ids {
        assert_eq!(media_box(output, id), vec![0.0, 0.0, 612.0, 792.0]);
        assert_eq!(xobject_names(output, id), vec!["P0".to_string()]);

        let content = content_text(output, id);
        assert!(content.contains("0 0 612 792 re W n"));
        // Same size target: identity placement
        assert!(content.contains("1 0 0 1 0 0 cm"));
        assert!(content.contains("/P0 Do"));
    }

    assert_eq!(imposed.report.sheets, 3);
    assert_eq!(imposed.report.placements, 3);
    assert_eq!(imposed.report.blank_slots, 0);
    assert!(imposed.report.is_complete());
}

#[tokio::test]
async fn test_booklet_pads_and_doubles_width() {
    let doc = create_test_pdf(6);
    let options = BookletOptions::new(Mode::Booklet);
    let store = TransformStore::new(6);

    let imposed = impose(&doc, &options, &store, NoProgress).await.unwrap();
    let output = &imposed.document;

    // 6 pages pad to 8, two slots per sheet side
    let ids = page_ids(output);
    assert_eq!(ids.len(), 4);
    assert_eq!(media_box(output, ids[0]), vec![0.0, 0.0, 1224.0, 792.0]);

    // First slot is (7, 0): the left half is padding
    assert_eq!(xobject_names(output, ids[0]).len(), 1);
    let first = content_text(output, ids[0]);
    assert!(first.contains("612 0 612 792 re W n"));
    assert!(!first.contains("0 0 612 792 re W n"));

    // Second slot is (1, 6): the right half is padding
    let second = content_text(output, ids[1]);
    assert!(second.contains("0 0 612 792 re W n"));
    assert!(!second.contains("612 0 612 792 re W n"));

    assert_eq!(imposed.report.placements, 6);
    assert_eq!(imposed.report.blank_slots, 2);
    assert!(imposed.report.is_complete());
}

#[tokio::test]
async fn test_calendar_stacks_pages_vertically() {
    let doc = create_test_pdf(3);
    let options = BookletOptions::new(Mode::Calendar);
    let store = TransformStore::new(3);

    let imposed = impose(&doc, &options, &store, NoProgress).await.unwrap();
    let output = &imposed.document;

    let ids = page_ids(output);
    assert_eq!(ids.len(), 2);
    assert_eq!(media_box(output, ids[0]), vec![0.0, 0.0, 612.0, 1584.0]);

    // First page of the pair goes on top
    let first = content_text(output, ids[0]);
    let top = first.find("0 792 612 792 re W n").unwrap();
    let bottom = first.find("0 0 612 792 re W n").unwrap();
    assert!(top < bottom);

    // The unpaired last page leaves the bottom half blank
    assert_eq!(xobject_names(output, ids[1]).len(), 1);
    assert_eq!(imposed.report.blank_slots, 1);
}

#[tokio::test]
async fn test_xobject_keeps_source_box_and_resources() {
    let doc = create_test_pdf(2);
    let options = BookletOptions::new(Mode::Single);
    let store = TransformStore::new(2);

    let imposed = impose(&doc, &options, &store, NoProgress).await.unwrap();
    let output = &imposed.document;

    let page = output.get_dictionary(page_ids(output)[0]).unwrap();
    let xobjects = page
        .get(b"Resources")
        .unwrap()
        .as_dict()
        .unwrap()
        .get(b"XObject")
        .unwrap()
        .as_dict()
        .unwrap();
    let id = xobjects.get(b"P0").unwrap().as_reference().unwrap();
    let stream = output.get_object(id).unwrap().as_stream().unwrap();

    assert_eq!(stream.dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Form");
    let bbox: Vec<f32> = stream
        .dict
        .get(b"BBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_float().unwrap())
        .collect();
    assert_eq!(bbox, vec![0.0, 0.0, 612.0, 792.0]);
    assert!(stream.dict.get(b"Resources").is_ok());
    assert_eq!(stream.content, b"BT /F1 12 Tf 72 720 Td (Page 1) Tj ET".to_vec());
}

#[tokio::test]
async fn test_shared_font_copied_once() {
    let doc = create_test_pdf(4);
    let options = BookletOptions::new(Mode::Single);
    let store = TransformStore::new(4);

    let imposed = impose(&doc, &options, &store, NoProgress).await.unwrap();

    let fonts = imposed
        .document
        .objects
        .values()
        .filter(|obj| {
            obj.as_dict()
                .and_then(|d| d.get(b"Type"))
                .and_then(|t| t.as_name())
                .map(|n| n == b"Font")
                .unwrap_or(false)
        })
        .count();
    assert_eq!(fonts, 1);
}

#[tokio::test]
async fn test_missing_content_is_skipped_not_fatal() {
    let mut doc = create_test_pdf(3);
    let second = page_ids(&doc)[1];
    doc.get_object_mut(second)
        .unwrap()
        .as_dict_mut()
        .unwrap()
        .remove(b"Contents");

    let options = BookletOptions::new(Mode::Single);
    let store = TransformStore::new(3);
    let imposed = impose(&doc, &options, &store, NoProgress).await.unwrap();

    assert_eq!(page_ids(&imposed.document).len(), 3);
    assert_eq!(imposed.report.placements, 2);
    assert_eq!(
        imposed.report.skipped,
        vec![SkippedPlacement {
            sheet_index: 1,
            source_page: 1,
            reason: SkipReason::MissingContent,
        }]
    );
    assert!(!imposed.report.is_complete());
}

#[tokio::test]
async fn test_empty_document_is_no_pages() {
    let doc = create_test_pdf(0);
    let options = BookletOptions::default();
    let store = TransformStore::new(0);

    let result = impose(&doc, &options, &store, NoProgress).await;
    assert!(matches!(result, Err(ImposeError::NoPages)));
}

#[tokio::test]
async fn test_invalid_options_rejected_before_work() {
    let doc = create_test_pdf(2);
    let options = BookletOptions {
        output_size: OutputSize::Custom {
            width: 0.0,
            height: 100.0,
            unit: Unit::Millimeters,
        },
        ..Default::default()
    };
    let store = TransformStore::new(2);

    let result = impose(&doc, &options, &store, NoProgress).await;
    assert!(matches!(result, Err(ImposeError::Config(_))));
}

#[tokio::test]
async fn test_default_transform_reaches_content() {
    let doc = create_test_pdf(1);
    let options = BookletOptions::new(Mode::Single);
    let mut store = TransformStore::new(1);
    store.set_default(Transform {
        h_shift_mm: 25.4,
        v_shift_mm: -25.4,
        ..Transform::IDENTITY
    });

    let imposed = impose(&doc, &options, &store, NoProgress).await.unwrap();
    let output = &imposed.document;
    let content = content_text(output, page_ids(output)[0]);
    assert!(content.contains("1 0 0 1 72 -72 cm"));
}

#[test]
fn test_emit_reports_progress_per_sheet() {
    let doc = create_test_pdf(8);
    let source = LopdfSource::new(&doc);
    let mut writer = LopdfWriter::new(&doc);
    let plan = LayoutPlan::new(8, Mode::Booklet);
    let store = TransformStore::new(8);
    let mut updates: Vec<ProgressUpdate> = Vec::new();

    let report = emit(
        &source,
        &mut writer,
        &plan,
        (1224.0, 792.0),
        &store,
        &mut updates,
    )
    .unwrap();

    assert_eq!(report.sheets, 4);
    assert_eq!(writer.page_count(), 4);

    let percents: Vec<u8> = updates.iter().map(|u| u.percent).collect();
    assert_eq!(percents, vec![5, 27, 50, 72, 95]);
}

#[test]
fn test_emit_out_of_range_plan_leaves_blank() {
    let doc = create_test_pdf(2);
    let source = LopdfSource::new(&doc);
    let mut writer = LopdfWriter::new(&doc);
    // Plan believes there are four pages
    let plan = LayoutPlan::new(4, Mode::Single);
    let store = TransformStore::new(4);

    let report = emit(
        &source,
        &mut writer,
        &plan,
        (612.0, 792.0),
        &store,
        &mut NoProgress,
    )
    .unwrap();

    assert_eq!(report.sheets, 4);
    assert_eq!(report.placements, 2);
    let reasons: Vec<SkipReason> = report.skipped.iter().map(|s| s.reason).collect();
    assert_eq!(reasons, vec![SkipReason::OutOfRange, SkipReason::OutOfRange]);

    let output = writer.finish();
    assert_eq!(output.get_pages().len(), 4);
}

#[tokio::test]
async fn test_save_booklet_round_trip() {
    use tempfile::TempDir;

    let temp = TempDir::new().unwrap();
    let input = temp.path().join("input.pdf");
    let output = temp.path().join("booklet.pdf");

    let mut doc = create_test_pdf(5);
    doc.save(&input).unwrap();

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let report = save_booklet(
        &input,
        &output,
        &BookletOptions::default(),
        TransformStore::new(5),
        tx,
    )
    .await
    .unwrap();

    assert_eq!(report.sheets, 4);
    assert_eq!(report.blank_slots, 3);

    let saved = load_pdf(&output).await.unwrap();
    assert_eq!(saved.get_pages().len(), 4);

    let mut percents = Vec::new();
    while let Some(update) = rx.recv().await {
        percents.push(update.percent);
    }
    assert_eq!(percents.first(), Some(&0));
    assert_eq!(percents.last(), Some(&100));
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
}

/// `cm` operands in the order they appear in a content stream
fn cm_operands(content: &str) -> Vec<Vec<f64>> {
    content
        .lines()
        .filter(|line| line.ends_with(" cm"))
        .map(|line| {
            line.split_whitespace()
                .take(6)
                .map(|v| v.parse().unwrap())
                .collect()
        })
        .collect()
}

fn xobject_stream(doc: &Document, page_id: ObjectId, name: &str) -> (ObjectId, Stream) {
    let page = doc.get_dictionary(page_id).unwrap();
    let id = page
        .get(b"Resources")
        .unwrap()
        .as_dict()
        .unwrap()
        .get(b"XObject")
        .unwrap()
        .as_dict()
        .unwrap()
        .get(name.as_bytes())
        .unwrap()
        .as_reference()
        .unwrap();
    (id, doc.get_object(id).unwrap().as_stream().unwrap().clone())
}

#[tokio::test]
async fn test_default_store_applies_to_every_page() {
    let doc = create_test_pdf(4);
    let options = BookletOptions::new(Mode::Single);
    let mut store = TransformStore::default();
    store.set_default(Transform {
        h_shift_mm: 25.4,
        ..Transform::IDENTITY
    });

    let imposed = impose(&doc, &options, &store, NoProgress).await.unwrap();
    let output = &imposed.document;

    let ids = page_ids(output);
    assert_eq!(ids.len(), 4);
    for &id in &ids {
        assert!(content_text(output, id).contains("1 0 0 1 72 0 cm"));
    }
}

#[tokio::test]
async fn test_store_sized_for_fewer_pages_still_applies() {
    let doc = create_test_pdf(4);
    let options = BookletOptions::new(Mode::Single);
    let mut store = TransformStore::new(2);
    store.set_default(Transform {
        h_shift_mm: 25.4,
        ..Transform::IDENTITY
    });
    store.set_override(
        3,
        Transform {
            v_shift_mm: 25.4,
            ..Transform::IDENTITY
        },
    );

    let imposed = impose(&doc, &options, &store, NoProgress).await.unwrap();
    let output = &imposed.document;
    let ids = page_ids(output);

    assert!(content_text(output, ids[2]).contains("1 0 0 1 72 0 cm"));
    assert!(content_text(output, ids[3]).contains("1 0 0 1 72 72 cm"));
}

#[tokio::test]
async fn test_undecodable_content_is_skipped() {
    let mut doc = create_test_pdf(3);
    let second = page_ids(&doc)[1];
    let content_id = doc
        .get_dictionary(second)
        .unwrap()
        .get(b"Contents")
        .unwrap()
        .as_reference()
        .unwrap();
    doc.get_object_mut(content_id)
        .unwrap()
        .as_stream_mut()
        .unwrap()
        .dict
        .set("Filter", Object::Name(b"UnknownDecode".to_vec()));

    let options = BookletOptions::new(Mode::Single);
    let store = TransformStore::new(3);
    let imposed = impose(&doc, &options, &store, NoProgress).await.unwrap();

    assert_eq!(page_ids(&imposed.document).len(), 3);
    assert_eq!(imposed.report.placements, 2);
    assert_eq!(
        imposed.report.skipped,
        vec![SkippedPlacement {
            sheet_index: 1,
            source_page: 1,
            reason: SkipReason::MissingContent,
        }]
    );

    // The raw filtered bytes never reach the output
    let undecoded = imposed.document.objects.values().any(|obj| {
        obj.as_stream()
            .map(|s| s.dict.get(b"Filter").is_ok())
            .unwrap_or(false)
    });
    assert!(!undecoded);
}

#[tokio::test]
async fn test_pages_on_one_sheet_get_separate_blocks() {
    let doc = create_test_pdf(4);
    let options = BookletOptions::new(Mode::Booklet);
    let store = TransformStore::new(4);

    let imposed = impose(&doc, &options, &store, NoProgress).await.unwrap();
    let output = &imposed.document;

    // Back of the first sheet carries pages 2 and 3
    let back = page_ids(output)[1];
    let mut names = xobject_names(output, back);
    names.sort();
    assert_eq!(names, vec!["P0".to_string(), "P1".to_string()]);

    let (left_id, left) = xobject_stream(output, back, "P0");
    let (right_id, right) = xobject_stream(output, back, "P1");
    assert_ne!(left_id, right_id);
    assert_eq!(left.content, b"BT /F1 12 Tf 72 720 Td (Page 2) Tj ET".to_vec());
    assert_eq!(right.content, b"BT /F1 12 Tf 72 720 Td (Page 3) Tj ET".to_vec());

    // Each block names its own font; both resolve to the one shared copy
    let font_ref = |stream: &Stream| {
        stream
            .dict
            .get(b"Resources")
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"Font")
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"F1")
            .unwrap()
            .as_reference()
            .unwrap()
    };
    assert_eq!(font_ref(&left), font_ref(&right));

    let content = content_text(output, back);
    let first = content.find("/P0 Do").unwrap();
    let second = content.find("/P1 Do").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn test_clip_stays_on_target_when_content_moves_off_it() {
    let doc = create_test_pdf(2);
    let options = BookletOptions::new(Mode::Booklet);
    let mut store = TransformStore::new(2);
    store.set_default(Transform {
        h_shift_mm: 200.0,
        ..Transform::IDENTITY
    });

    let imposed = impose(&doc, &options, &store, NoProgress).await.unwrap();
    let output = &imposed.document;

    // 2 pages pad to 4; page 1 sits on the right half of the front
    let front = content_text(output, page_ids(output)[0]);
    assert!(front.contains("612 0 612 792 re W n"));
    assert!(!front.contains("0 0 612 792 re W n"));

    let cms = cm_operands(&front);
    assert_eq!(cms.len(), 1);
    let m = &cms[0];
    assert_eq!((m[0], m[3]), (1.0, 1.0));
    // Page centre lands past the right edge of the sheet
    let center_x = m[4] + 306.0;
    assert!(center_x > 1224.0);
    assert!((m[4] - (612.0 + 200.0 * 72.0 / 25.4)).abs() < 1e-2);
}

#[tokio::test]
async fn test_encode_decode_preserves_sheets() {
    let doc = create_test_pdf(3);
    let options = BookletOptions::new(Mode::Single);
    let store = TransformStore::new(3);

    let imposed = impose(&doc, &options, &store, NoProgress).await.unwrap();

    let bytes = encode_pdf(imposed.document).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));

    let decoded = decode_pdf(&bytes).unwrap();
    let ids = page_ids(&decoded);
    assert_eq!(ids.len(), 3);
    for &id in &ids {
        assert_eq!(xobject_names(&decoded, id), vec!["P0".to_string()]);
        assert!(content_text(&decoded, id).contains("/P0 Do"));
    }

    let (_, block) = xobject_stream(&decoded, ids[2], "P0");
    let text = match block.dict.get(b"Filter") {
        Ok(_) => block.decompressed_content().unwrap(),
        Err(_) => block.content.clone(),
    };
    assert_eq!(text, b"BT /F1 12 Tf 72 720 Td (Page 3) Tj ET".to_vec());
}

#[test]
fn test_decode_garbage_is_pdf_error() {
    let result = decode_pdf(b"not a pdf");
    assert!(matches!(result, Err(ImposeError::Pdf(_))));
}
