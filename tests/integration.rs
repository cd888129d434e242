// SPDX-License-Identifier: MPL-2.0
use futures_util::future::BoxFuture;
use image_rs::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use magnet_studio::compositor::GridSlot;
use magnet_studio::config::{self, Config, IntakeOrder, HISTORY_LIMIT, MAX_PHOTOS};
use magnet_studio::domain::editing::{AdjustmentKind, Size};
use magnet_studio::domain::photo::PhotoFormat;
use magnet_studio::error::IntakeError;
use magnet_studio::intake::{
    cancellation_token, CameraDevice, CameraSession, CameraStream, Candidate, CapturedFrame,
    UploadStatus,
};
use magnet_studio::media::build_render_filter;
use magnet_studio::Studio;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([120, 90, 60])));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).expect("encode png");
    out.into_inner()
}

fn files(count: usize) -> Vec<Candidate> {
    (0..count)
        .map(|i| Candidate::Memory {
            file_name: format!("photo-{i}.png"),
            bytes: png(6, 4),
        })
        .collect()
}

async fn studio_with_photo() -> Studio {
    let mut studio = Studio::new(Config::default());
    studio
        .import(files(1), &cancellation_token())
        .await
        .expect("import");
    studio
}

#[tokio::test]
async fn ten_files_into_empty_store_keep_nine() {
    let mut studio = Studio::new(Config::default());
    let report = studio
        .import(files(10), &cancellation_token())
        .await
        .expect("import");

    assert_eq!(studio.store().len(), MAX_PHOTOS);
    assert_eq!(report.added.len(), 9);
    assert_eq!(report.skipped, 1);
    assert!(report.failed.is_empty());

    let again = studio.import(files(1), &cancellation_token()).await;
    assert!(matches!(again, Err(IntakeError::CapacityExceeded)));
    assert_eq!(studio.store().len(), MAX_PHOTOS);
}

#[tokio::test]
async fn heic_that_cannot_be_converted_is_an_error_task() {
    let mut studio = Studio::new(Config::default());
    let report = studio
        .import(
            vec![Candidate::Memory {
                file_name: "IMG_4032.heic".into(),
                bytes: b"\0\0\0\x18ftypheic not really".to_vec(),
            }],
            &cancellation_token(),
        )
        .await
        .expect("import");

    assert!(studio.store().is_empty());
    assert!(matches!(
        report.failed.as_slice(),
        [(_, IntakeError::ConversionFailed(_))]
    ));
    let tasks = studio.board().tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, UploadStatus::Error);
    let message = tasks[0].error.clone().unwrap_or_default();
    assert!(message.to_lowercase().contains("conversion"), "{message}");
    assert_eq!(studio.previews().outstanding(), 0);
}

#[tokio::test]
async fn two_slider_gestures_undo_back_to_open_state() {
    let studio = studio_with_photo().await;
    let id = studio.store().ids()[0];
    let mut editor = studio
        .open_editor(id, Size::new(600.0, 400.0))
        .expect("editor");

    editor.set_adjustment(AdjustmentKind::Brightness, 1.2);
    assert!(editor.release_adjustment());
    editor.set_adjustment(AdjustmentKind::Contrast, 0.8);
    assert!(editor.release_adjustment());
    assert_eq!(editor.history().len(), 3);

    assert!(editor.undo());
    assert!(editor.undo());
    assert_eq!(editor.state().adjustments.brightness(), 1.0);
    assert_eq!(editor.state().adjustments.contrast(), 1.0);
    assert!(!editor.can_undo());
    editor.cancel();
}

#[tokio::test]
async fn preset_follows_active_brightness() {
    let mut studio = studio_with_photo().await;
    let id = studio.store().ids()[0];
    let mut editor = studio
        .open_editor(id, Size::new(600.0, 400.0))
        .expect("editor");

    editor.set_adjustment(AdjustmentKind::Brightness, 1.3);
    editor.release_adjustment();
    assert!(editor.apply_preset("Noir"));
    assert_eq!(
        editor.render_filter(),
        "brightness(1.3) grayscale(1) contrast(1.2) brightness(0.95)"
    );
    assert!(studio.commit_editor(editor));

    let GridSlot::Filled(slot) = &studio.grid()[0] else {
        panic!("first slot should be filled");
    };
    assert_eq!(
        slot.filter,
        "brightness(1.3) grayscale(1) contrast(1.2) brightness(0.95)"
    );
}

#[tokio::test]
async fn three_clockwise_turns_render_at_270() {
    let mut studio = studio_with_photo().await;
    let id = studio.store().ids()[0];
    let mut editor = studio
        .open_editor(id, Size::new(600.0, 400.0))
        .expect("editor");

    for _ in 0..3 {
        assert!(editor.rotate_clockwise());
    }
    assert_eq!(editor.state().rotation.degrees(), 270);
    assert_eq!(editor.state().rotation.normalized(), 270);
    assert!(studio.commit_editor(editor));

    let GridSlot::Filled(slot) = &studio.grid()[0] else {
        panic!("first slot should be filled");
    };
    assert_eq!(slot.transform.rotation, 270);
    assert_eq!(slot.transform.css(), "rotate(270deg)");
}

#[test]
fn default_adjustments_render_no_filter() {
    let state = magnet_studio::domain::editing::EditState::default();
    assert_eq!(build_render_filter(&state.adjustments, ""), "none");
}

#[tokio::test]
async fn history_is_bounded_across_many_edits() {
    let studio = studio_with_photo().await;
    let id = studio.store().ids()[0];
    let mut editor = studio
        .open_editor(id, Size::new(100.0, 100.0))
        .expect("editor");

    for _ in 0..(HISTORY_LIMIT + 10) {
        editor.flip_horizontal();
    }
    assert_eq!(editor.history().len(), HISTORY_LIMIT);
    let mut undos = 0;
    while editor.undo() {
        undos += 1;
    }
    assert_eq!(undos, HISTORY_LIMIT - 1);
    editor.cancel();
}

#[tokio::test]
async fn previews_do_not_leak() {
    let mut studio = Studio::new(Config::default());
    studio
        .import(files(3), &cancellation_token())
        .await
        .expect("import");
    assert_eq!(studio.previews().outstanding(), 3);

    let id = studio.store().ids()[1];
    let mut editor = studio
        .open_editor(id, Size::new(60.0, 40.0))
        .expect("editor");
    editor.rotate_clockwise();
    editor.render_preview().expect("preview");
    editor.flip_vertical();
    editor.render_preview().expect("preview");
    assert_eq!(studio.previews().outstanding(), 4);
    editor.cancel();
    assert_eq!(studio.previews().outstanding(), 3);

    assert!(studio.store_mut().remove(id));
    assert_eq!(studio.previews().outstanding(), 2);

    studio.reset();
    assert_eq!(studio.previews().outstanding(), 0);
}

#[tokio::test]
async fn cancelled_batch_adds_nothing() {
    let mut studio = Studio::new(Config::default());
    let token = cancellation_token();
    token.store(true, Ordering::SeqCst);

    let report = studio.import(files(4), &token).await.expect("import");
    assert!(studio.store().is_empty());
    assert_eq!(report.failed.len(), 4);
    assert!(studio
        .board()
        .tasks()
        .iter()
        .all(|task| task.status == UploadStatus::Error));
}

struct Webcam {
    live: Arc<AtomicBool>,
    allowed: bool,
}

struct WebcamStream {
    live: Arc<AtomicBool>,
}

impl CameraStream for WebcamStream {
    fn capture(&mut self) -> Result<CapturedFrame, IntakeError> {
        Ok(CapturedFrame {
            bytes: png(8, 8),
            format: PhotoFormat::Png,
        })
    }

    fn stop(&mut self) {
        self.live.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

impl CameraDevice for Webcam {
    fn open(&self) -> BoxFuture<'_, Result<Box<dyn CameraStream>, IntakeError>> {
        Box::pin(async move {
            if !self.allowed {
                return Err(IntakeError::CameraUnavailable("permission denied".into()));
            }
            self.live.store(true, Ordering::SeqCst);
            let stream: Box<dyn CameraStream> = Box::new(WebcamStream {
                live: Arc::clone(&self.live),
            });
            Ok(stream)
        })
    }
}

#[tokio::test]
async fn camera_capture_lands_in_store_and_stops_stream() {
    let webcam = Webcam {
        live: Arc::new(AtomicBool::new(false)),
        allowed: true,
    };
    let mut studio = Studio::new(Config::default());
    let mut session = CameraSession::start(&webcam).await.expect("camera");
    assert!(webcam.live.load(Ordering::SeqCst));

    let report = studio
        .capture(&mut session, &cancellation_token())
        .await
        .expect("capture");
    assert!(!webcam.live.load(Ordering::SeqCst));
    assert_eq!(report.added.len(), 1);
    assert_eq!(studio.store().photos()[0].file_name(), "camera-capture.png");
    assert_eq!(studio.store().photos()[0].dimensions(), Some((8, 8)));

    let again = CameraSession::start(&webcam).await.expect("camera");
    drop(again);
    assert!(!webcam.live.load(Ordering::SeqCst));

    let denied = Webcam {
        live: Arc::new(AtomicBool::new(false)),
        allowed: false,
    };
    assert!(matches!(
        CameraSession::start(&denied).await,
        Err(IntakeError::CameraUnavailable(_))
    ));
}

#[test]
fn config_round_trips_through_toml() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let saved = Config {
        max_photos: Some(4),
        intake_order: Some(IntakeOrder::Submission),
        history_limit: Some(30),
        ..Config::default()
    };
    config::save_to_path(&saved, &path).expect("Failed to write config file");
    let loaded = config::load_from_path(&path).expect("Failed to load config from path");
    assert_eq!(loaded, saved);

    let studio = Studio::new(loaded);
    assert_eq!(studio.store().capacity(), 4);
    assert_eq!(studio.pipeline().order(), IntakeOrder::Submission);

    dir.close().expect("Failed to close temporary directory");
}
