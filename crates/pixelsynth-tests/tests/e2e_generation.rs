//! End-to-End Generation Tests for PixelSynth
//!
//! Tests verify the full flow from an image file on disk to a `.mid` file:
//! decoding, settings layering, generation, and the written bytes.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pixelsynth-tests --test e2e_generation
//! ```

use std::fs;
use std::process::ExitCode;

use midly::{MidiMessage, Smf, TrackEventKind};
use pixelsynth_cli::commands::generate::{self, GenerateOptions, EXIT_GENERATION_FAILED};
use pixelsynth_cli::commands::preview;
use pixelsynth_cli::input::SettingsOverrides;
use pixelsynth_spec::{PitchClass, Scale, Settings};
use pixelsynth_tests::fixtures::{ImageFixture, BLACK, WHITE};
use pixelsynth_tests::validate_smf;
use pretty_assertions::assert_eq;

/// (tick, key, velocity) for every note event, velocity 0 meaning off.
fn note_events(data: &[u8]) -> Vec<(u32, u8, u8)> {
    let smf = Smf::parse(data).expect("output should parse");
    let mut tick = 0u32;
    let mut events = Vec::new();
    for event in &smf.tracks[0] {
        tick += event.delta.as_int();
        if let TrackEventKind::Midi {
            message: MidiMessage::NoteOn { key, vel },
            ..
        } = event.kind
        {
            events.push((tick, key.as_int(), vel.as_int()));
        }
    }
    events
}

fn options(input: &std::path::Path, output: &std::path::Path) -> GenerateOptions {
    GenerateOptions {
        input: input.to_string_lossy().into_owned(),
        output: Some(output.to_string_lossy().into_owned()),
        max_width: 512,
        ..Default::default()
    }
}

// ============================================================================
// Successful Generation
// ============================================================================

/// The 2x2 diagonal scenario: two notes, one per column.
#[test]
fn test_generate_diagonal_png() {
    let fixture = ImageFixture::new();
    let input = fixture.write_png("diag.png", 2, 2, |x, y| if x == y { WHITE } else { BLACK });
    let settings = Settings::builder()
        .bpm(120.0)
        .threshold(100)
        .duration_bars(1)
        .note_range(60, 72)
        .resolution(2, 2)
        .build();
    let settings_path = fixture.write_settings("settings.json", &settings);
    let output = fixture.path().join("diag.mid");

    let mut opts = options(&input, &output);
    opts.settings = Some(settings_path.to_string_lossy().into_owned());
    let code = generate::run(&opts, true).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let data = fs::read(&output).unwrap();
    let info = validate_smf(&data).unwrap();
    assert_eq!(info.format, 0);
    assert_eq!(info.division, 480);
    assert_eq!(info.tempo, Some(500_000));
    assert_eq!(info.note_ons, 2);
    assert_eq!(info.note_offs, 2);
    assert_eq!(info.last_tick, 1920);

    assert_eq!(
        note_events(&data),
        vec![(0, 72, 127), (960, 72, 0), (960, 66, 127), (1920, 66, 0)]
    );
}

/// A black image produces a file with no notes and still succeeds.
#[test]
fn test_generate_black_image_has_no_notes() {
    let fixture = ImageFixture::new();
    let input = fixture.write_png("black.png", 8, 8, |_, _| BLACK);
    let output = fixture.path().join("black.mid");

    let mut opts = options(&input, &output);
    opts.overrides = SettingsOverrides {
        resolution_x: Some(8),
        resolution_y: Some(8),
        ..Default::default()
    };
    assert_eq!(generate::run(&opts, false).unwrap(), ExitCode::SUCCESS);

    let info = validate_smf(&fs::read(&output).unwrap()).unwrap();
    assert_eq!(info.note_ons, 0);
    assert!(info.has_end_of_track);
    assert_eq!(info.last_tick, 0);
}

/// Command-line overrides win over the settings file.
#[test]
fn test_overrides_apply_over_settings_file() {
    let fixture = ImageFixture::new();
    let input = fixture.write_png("white.png", 1, 1, |_, _| WHITE);
    let settings = Settings::builder().bpm(90.0).resolution(1, 1).build();
    let settings_path = fixture.write_settings("settings.json", &settings);
    let output = fixture.path().join("white.mid");

    let mut opts = options(&input, &output);
    opts.settings = Some(settings_path.to_string_lossy().into_owned());
    opts.overrides = SettingsOverrides {
        bpm: Some(75.0),
        channel: Some(3),
        ..Default::default()
    };
    assert_eq!(generate::run(&opts, true).unwrap(), ExitCode::SUCCESS);

    let info = validate_smf(&fs::read(&output).unwrap()).unwrap();
    assert_eq!(info.tempo, Some(800_000));
    assert_eq!(info.channels, vec![3]);
}

/// A suggestion file supplies tempo, scale, and root.
#[test]
fn test_suggestion_sets_musical_parameters() {
    let fixture = ImageFixture::new();
    let input = fixture.write_png("col.png", 1, 12, |_, _| WHITE);
    let suggestion = fixture.write_file(
        "suggestion.json",
        r#"{
            "suggestedBpm": 100,
            "suggestedScale": "major",
            "suggestedRoot": "D",
            "title": "Sunrise"
        }"#,
    );
    let output = fixture.path().join("col.mid");

    let mut opts = options(&input, &output);
    opts.suggestion = Some(suggestion.to_string_lossy().into_owned());
    opts.overrides = SettingsOverrides {
        resolution_x: Some(1),
        resolution_y: Some(12),
        min_note: Some(60),
        max_note: Some(72),
        ..Default::default()
    };
    assert_eq!(generate::run(&opts, true).unwrap(), ExitCode::SUCCESS);

    let data = fs::read(&output).unwrap();
    assert_eq!(validate_smf(&data).unwrap().tempo, Some(600_000));
    for (_, key, _) in note_events(&data) {
        assert!(
            Scale::Major.contains(key as i32, PitchClass::D),
            "pitch {} is not in D major",
            key
        );
    }
}

/// A malformed suggestion falls back instead of failing.
#[test]
fn test_invalid_suggestion_falls_back() {
    let fixture = ImageFixture::new();
    let input = fixture.write_png("dot.png", 1, 1, |_, _| WHITE);
    let suggestion = fixture.write_file(
        "suggestion.json",
        r#"{"suggestedBpm": 96, "suggestedScale": "klingon", "suggestedRoot": "H"}"#,
    );
    let output = fixture.path().join("dot.mid");

    let mut opts = options(&input, &output);
    opts.suggestion = Some(suggestion.to_string_lossy().into_owned());
    opts.overrides.resolution_x = Some(1);
    opts.overrides.resolution_y = Some(1);
    assert_eq!(generate::run(&opts, true).unwrap(), ExitCode::SUCCESS);
    assert!(output.exists());
}

/// Without an explicit output path the file lands next to the input.
#[test]
fn test_default_output_path_uses_mid_extension() {
    let fixture = ImageFixture::new();
    let input = fixture.write_png("photo.png", 2, 2, |_, _| WHITE);

    let opts = GenerateOptions {
        input: input.to_string_lossy().into_owned(),
        max_width: 512,
        overrides: SettingsOverrides {
            resolution_x: Some(2),
            resolution_y: Some(2),
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(generate::run(&opts, true).unwrap(), ExitCode::SUCCESS);
    assert!(fixture.path().join("photo.mid").exists());
}

// ============================================================================
// Failures
// ============================================================================

/// Invalid settings exit with 1 and write nothing.
#[test]
fn test_invalid_settings_exit_one() {
    let fixture = ImageFixture::new();
    let input = fixture.write_png("dot.png", 1, 1, |_, _| WHITE);
    let output = fixture.path().join("dot.mid");

    let mut opts = options(&input, &output);
    opts.overrides.min_note = Some(90);
    opts.overrides.max_note = Some(30);
    assert_eq!(generate::run(&opts, true).unwrap(), ExitCode::from(1));
    assert!(!output.exists());
}

/// Too many columns for the song length is a generation failure.
#[test]
fn test_degenerate_timing_exit_two() {
    let fixture = ImageFixture::new();
    let input = fixture.write_png("wide.png", 4, 1, |_, _| WHITE);
    let output = fixture.path().join("wide.mid");

    let mut opts = options(&input, &output);
    opts.overrides = SettingsOverrides {
        duration_bars: Some(1),
        resolution_x: Some(4000),
        resolution_y: Some(1),
        ..Default::default()
    };
    assert_eq!(
        generate::run(&opts, true).unwrap(),
        ExitCode::from(EXIT_GENERATION_FAILED)
    );
    assert!(!output.exists());
}

/// A missing image is an input failure.
#[test]
fn test_missing_image_exit_one_in_json_mode() {
    let fixture = ImageFixture::new();
    let output = fixture.path().join("none.mid");
    let opts = options(&fixture.path().join("missing.png"), &output);
    assert_eq!(generate::run(&opts, true).unwrap(), ExitCode::from(1));
}

/// Non-image bytes fail to decode.
#[test]
fn test_undecodable_image_exit_one() {
    let fixture = ImageFixture::new();
    let input = fixture.write_file("fake.png", "not an image");
    let output = fixture.path().join("fake.mid");
    assert_eq!(
        generate::run(&options(&input, &output), true).unwrap(),
        ExitCode::from(1)
    );
}

// ============================================================================
// Preview
// ============================================================================

/// The preview PNG has one block per cell and marks active cells.
#[test]
fn test_preview_writes_cell_png() {
    let fixture = ImageFixture::new();
    let input = fixture.write_png("diag.png", 2, 2, |x, y| if x == y { WHITE } else { BLACK });
    let output = fixture.path().join("diag.preview.png");
    let overrides = SettingsOverrides {
        resolution_x: Some(2),
        resolution_y: Some(2),
        ..Default::default()
    };

    let code = preview::run(
        &input.to_string_lossy(),
        None,
        output.to_str(),
        3,
        512,
        &overrides,
    )
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let decoded = image::open(&output).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (6, 6));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(decoded.get_pixel(5, 0).0, [0, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(5, 5).0, [255, 255, 255, 255]);
}

/// An oversized cell size fails cleanly and writes nothing.
#[test]
fn test_preview_rejects_oversized_cell_size() {
    let fixture = ImageFixture::new();
    let input = fixture.write_png("dot.png", 4, 4, |_, _| WHITE);
    let output = fixture.path().join("dot.preview.png");
    let overrides = SettingsOverrides {
        resolution_x: Some(512),
        resolution_y: Some(128),
        ..Default::default()
    };

    let result = preview::run(
        &input.to_string_lossy(),
        None,
        output.to_str(),
        16_777_216,
        512,
        &overrides,
    );
    assert!(result.is_err());
    assert!(!output.exists());
}
