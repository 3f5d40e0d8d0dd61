//! Property-based tests for PixelSynth using proptest.
//!
//! These tests verify that generation never panics on arbitrary pixels and
//! valid settings, and that the musical and structural guarantees hold for
//! every input, not just hand-picked ones.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pixelsynth-tests --test proptest_properties
//! ```

use proptest::prelude::*;

use midly::{MidiMessage, Smf, TrackEventKind};
use pixelsynth_backend_midi::mapper::{raw_pitch, velocity_for, MAX_SNAP_DISTANCE};
use pixelsynth_backend_midi::smf::{vlq_len, write_vlq, MAX_VLQ_VALUE};
use pixelsynth_backend_midi::{generate_midi, snap_to_scale, GenerateError, RgbaImage};
use pixelsynth_spec::{validate_settings, PitchClass, Scale, Settings};
use pixelsynth_tests::validate_smf;

// ============================================================================
// Strategies
// ============================================================================

fn arb_scale() -> impl Strategy<Value = Scale> {
    prop::sample::select(Scale::ALL.to_vec())
}

fn arb_root() -> impl Strategy<Value = PitchClass> {
    prop::sample::select(PitchClass::ALL.to_vec())
}

/// Valid settings whose note range leaves room for scale snapping, so the
/// only possible outcome is a successful file.
fn arb_settings() -> impl Strategy<Value = Settings> {
    (
        30.0f64..240.0,
        0u8..=254,
        1u32..=8,
        (11u8..=100).prop_flat_map(|min| (Just(min), min..=116)),
        arb_scale(),
        arb_root(),
        1u32..=48,
        1u32..=24,
        0u8..=15,
    )
        .prop_map(
            |(bpm, threshold, bars, (min_note, max_note), scale, root, rx, ry, channel)| {
                Settings::builder()
                    .bpm(bpm)
                    .threshold(threshold)
                    .duration_bars(bars)
                    .note_range(min_note, max_note)
                    .scale(scale)
                    .root_note(root)
                    .resolution(rx, ry)
                    .channel(channel)
                    .build()
            },
        )
}

fn arb_image() -> impl Strategy<Value = RgbaImage> {
    (1u32..=12, 1u32..=12).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u8>(), (w * h * 4) as usize)
            .prop_map(move |data| RgbaImage::new(w, h, data).unwrap())
    })
}

/// Absolute ticks of every event in the single track.
fn event_ticks(data: &[u8]) -> Vec<u32> {
    let smf = Smf::parse(data).unwrap();
    let mut tick = 0u32;
    smf.tracks[0]
        .iter()
        .map(|event| {
            tick += event.delta.as_int();
            tick
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // ========================================================================
    // 1. Generation
    // ========================================================================

    /// Valid settings on any pixels produce a well-formed file.
    #[test]
    fn generation_produces_valid_smf(image in arb_image(), settings in arb_settings()) {
        prop_assert!(validate_settings(&settings).is_ok());
        let result = generate_midi(&image, &settings).unwrap();
        let info = validate_smf(&result.data).unwrap();

        prop_assert_eq!(info.format, 0);
        prop_assert_eq!(info.num_tracks, 1);
        prop_assert_eq!(info.division, 480);
        prop_assert_eq!(info.note_ons, result.note_count);
        prop_assert_eq!(info.note_offs, result.note_count);
        prop_assert!((info.last_tick as u64) <= settings.total_ticks());
        if result.note_count > 0 {
            prop_assert_eq!(info.channels, vec![settings.channel]);
        }
    }

    /// Event times never decrease.
    #[test]
    fn event_ticks_are_monotonic(image in arb_image(), settings in arb_settings()) {
        let result = generate_midi(&image, &settings).unwrap();
        let ticks = event_ticks(&result.data);
        prop_assert!(ticks.windows(2).all(|w| w[0] <= w[1]), "ticks out of order: {:?}", ticks);
    }

    /// Every sounding note lies in the chosen scale and below max_note plus
    /// the snap reach.
    #[test]
    fn notes_fit_scale_and_velocity_range(image in arb_image(), settings in arb_settings()) {
        let result = generate_midi(&image, &settings).unwrap();
        let smf = Smf::parse(&result.data).unwrap();
        for event in &smf.tracks[0] {
            if let TrackEventKind::Midi { message: MidiMessage::NoteOn { key, vel }, .. } = event.kind {
                let key = key.as_int() as i32;
                prop_assert!(settings.scale.contains(key, settings.root_note));
                prop_assert!(key <= settings.max_note as i32 + MAX_SNAP_DISTANCE);
                let vel = vel.as_int();
                prop_assert!(vel == 0 || (40..=127).contains(&vel), "velocity {}", vel);
            }
        }
    }

    /// Same inputs, same bytes.
    #[test]
    fn generation_is_deterministic(image in arb_image(), settings in arb_settings()) {
        let a = generate_midi(&image, &settings).unwrap();
        let b = generate_midi(&image, &settings).unwrap();
        prop_assert_eq!(a.hash, b.hash);
        prop_assert_eq!(a.data, b.data);
    }

    /// Arbitrary settings never panic; they either generate or fail cleanly.
    #[test]
    fn arbitrary_settings_never_panic(
        image in arb_image(),
        bpm in prop_oneof![Just(0.0f64), Just(f64::NAN), -10.0f64..1000.0],
        threshold in any::<u8>(),
        bars in 0u32..4,
        min_note in any::<u8>(),
        max_note in any::<u8>(),
        rx in 0u32..2500,
        ry in 0u32..40,
        channel in any::<u8>(),
    ) {
        let settings = Settings {
            bpm,
            threshold,
            duration_bars: bars,
            min_note,
            max_note,
            resolution_x: rx,
            resolution_y: ry,
            channel,
            ..Default::default()
        };
        match generate_midi(&image, &settings) {
            Ok(result) => prop_assert!(validate_smf(&result.data).is_ok()),
            Err(GenerateError::InvalidSettings(errors)) => prop_assert!(!errors.is_empty()),
            Err(_) => {}
        }
    }

    // ========================================================================
    // 2. Mapping
    // ========================================================================

    /// Snapping lands in the scale, within reach, and leaves members alone.
    #[test]
    fn snap_lands_in_scale(pitch in 12i32..=115, scale in arb_scale(), root in arb_root()) {
        let snapped = snap_to_scale(pitch, scale, root);
        prop_assert!(scale.contains(snapped, root));
        prop_assert!((snapped - pitch).abs() <= MAX_SNAP_DISTANCE);
        if scale.contains(pitch, root) {
            prop_assert_eq!(snapped, pitch);
        }
    }

    /// Raw pitch stays inside the configured range and never rises with y.
    #[test]
    fn raw_pitch_is_bounded_and_descending(
        (min_note, max_note) in (0u8..=127).prop_flat_map(|min| (Just(min), min..=127)),
        ry in 1u32..=128,
    ) {
        let settings = Settings::builder().note_range(min_note, max_note).resolution(16, ry).build();
        let mut previous = i32::MAX;
        for y in 0..ry {
            let pitch = raw_pitch(y, &settings);
            prop_assert!(pitch >= min_note as i32 && pitch <= max_note as i32);
            prop_assert!(pitch <= previous);
            previous = pitch;
        }
    }

    /// Velocity above the threshold is always 40..=127.
    #[test]
    fn velocity_in_range(
        (threshold, brightness) in (0u8..=254)
            .prop_flat_map(|t| (Just(t), (t as f64 + 0.001)..=255.0)),
    ) {
        let velocity = velocity_for(brightness, threshold);
        prop_assert!((40..=127).contains(&velocity), "velocity {}", velocity);
    }

    // ========================================================================
    // 3. Encoding
    // ========================================================================

    /// VLQ output has the predicted length and continuation bits.
    #[test]
    fn vlq_shape(value in 0u32..=MAX_VLQ_VALUE) {
        let mut buf = Vec::new();
        write_vlq(&mut buf, value).unwrap();
        prop_assert_eq!(buf.len(), vlq_len(value));
        let (last, rest) = buf.split_last().unwrap();
        prop_assert_eq!(last & 0x80, 0);
        prop_assert!(rest.iter().all(|b| b & 0x80 != 0));
        let decoded = buf.iter().fold(0u32, |acc, b| (acc << 7) | (b & 0x7F) as u32);
        prop_assert_eq!(decoded, value);
    }

    /// Values above the 28-bit limit are refused.
    #[test]
    fn vlq_rejects_oversized(value in (MAX_VLQ_VALUE + 1)..=u32::MAX) {
        let mut buf = Vec::new();
        prop_assert!(write_vlq(&mut buf, value).is_err());
    }
}
