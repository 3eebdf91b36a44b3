use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use matcha_log::{
    DraftEntry, EntrySchema, MatchaApp, MatchaError, PhotoSource, ScoreScale, SortPolicy,
    StarRating, UserSettings,
};

fn write_cup(dir: &Path, name: &str, rgb: [u8; 3]) -> PathBuf {
    let image = RgbaImage::from_fn(24, 18, |x, _| {
        // white rim on the far left, drink everywhere else
        if x < 2 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([rgb[0], rgb[1], rgb[2], 255])
        }
    });
    let path = dir.join(name);
    image.save(&path).unwrap();
    path
}

#[tokio::test]
async fn rate_save_and_render_a_cup() {
    let dir = tempfile::tempdir().unwrap();
    let app = MatchaApp::open(&dir.path().join("data")).unwrap();
    let photo = write_cup(dir.path(), "cup.png", [40, 180, 60]);

    let draft = DraftEntry::new()
        .with_rating(StarRating::new(4).unwrap())
        .with_location("Uji")
        .with_thoughts("bright and grassy");
    let draft = app
        .analyze_into(&draft, PhotoSource::File(photo.clone()))
        .await
        .unwrap();
    assert_eq!(draft.greenness().unwrap().value(), 100);

    let (saved, fresh) = app.save_entry(&draft).await.unwrap();
    assert_eq!(fresh.rating(), None);
    assert_eq!(fresh.photo(), None);
    assert_eq!(saved.photo, photo.display().to_string());

    let stored = app.load_entries().await.unwrap();
    assert_eq!(stored, vec![saved.clone()]);

    let rows = app.render_log().await.unwrap();
    assert_eq!(rows[0].title, "Uji");
    assert_eq!(rows[0].greenness, "Greenness: 100/100");
    assert_eq!(rows[0].thoughts, "bright and grassy");
}

#[tokio::test]
async fn photo_requirement_follows_settings() {
    let dir = tempfile::tempdir().unwrap();
    let app = MatchaApp::open(dir.path()).unwrap();

    let (draft, _ticket) = DraftEntry::new()
        .with_rating(StarRating::new(3).unwrap())
        .begin_analysis();
    let err = app.save_entry(&draft).await.unwrap_err();
    assert!(matches!(err, MatchaError::IncompleteEntry { .. }));
    assert_eq!(err.to_string(), "missing: photo, greenness");

    app.update_settings(UserSettings {
        require_photo: false,
        ..UserSettings::default()
    })
    .unwrap();
    let err = app.save_entry(&draft).await.unwrap_err();
    assert_eq!(err.to_string(), "missing: greenness");
}

#[tokio::test]
async fn imported_browser_log_mixes_with_new_entries() {
    let dir = tempfile::tempdir().unwrap();
    let app = MatchaApp::open(dir.path()).unwrap();

    let export = r#"[
        {"photo": "data:image/png;base64,AAAA", "rating": 4, "greenness": 9, "date": "1/2/2024, 10:00:00 AM"},
        {"photo": "data:image/png;base64,BBBB", "rating": 4, "greenness": 6, "date": "1/1/2024, 10:00:00 AM"}
    ]"#;
    let report = app.import_legacy(export, EntrySchema::V1).await.unwrap();
    assert_eq!(report.imported, 2);

    let photo = write_cup(dir.path(), "today.png", [30, 90, 15]);
    let draft = app
        .analyze_into(
            &DraftEntry::new().with_rating(StarRating::new(4).unwrap()),
            PhotoSource::File(photo),
        )
        .await
        .unwrap();
    app.save_entry(&draft).await.unwrap();

    let sorted = app.sorted_entries().await.unwrap();
    let order: Vec<_> = sorted
        .iter()
        .map(|e| (e.greenness.value(), e.greenness.scale()))
        .collect();
    assert_eq!(
        order,
        vec![
            (100, ScoreScale::OutOfHundred),
            (9, ScoreScale::OutOfTen),
            (6, ScoreScale::OutOfTen),
        ]
    );

    app.update_settings(UserSettings {
        sort_policy: SortPolicy::RecencyFirst,
        ..UserSettings::default()
    })
    .unwrap();
    let recent = app.sorted_entries().await.unwrap();
    assert_eq!(recent.last().unwrap().date, "1/1/2024, 10:00:00 AM");
}
