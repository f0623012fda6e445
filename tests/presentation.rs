// Result presentation and boundary-mapping tests (native) for the
// `inkly-client` crate. These exercise the pure view-model builders, the
// JSON service contract, color parsing, coordinate mapping and the brush
// progression ladder, all without wasm/browser APIs.

use inkly_client::api::CompleteResponse;
use inkly_client::brush::Brush;
use inkly_client::color::Color;
use inkly_client::geometry::CanvasMetrics;
use inkly_client::view;
use inkly_client::{GameConfig, brushes_for_level};

#[test]
fn complete_response_parses_from_service_json() {
    let json = r#"{
        "correct": true,
        "guesses": ["cat", "dog", "fox"],
        "confidence": 82,
        "feedback": "Nice whiskers!",
        "score": 50,
        "xp_gained": 35,
        "achievements": [{"name": "First Win", "description": "Win a round"}],
        "level_up": true,
        "new_level": 2,
        "player_stats": {"level": 2, "xp": 110, "streak": 3}
    }"#;
    let resp: CompleteResponse = serde_json::from_str(json).unwrap();
    assert!(resp.correct);
    assert_eq!(resp.guesses[0], "cat");
    assert_eq!(resp.confidence, 82);
    assert_eq!(resp.new_level, Some(2));
    assert_eq!(resp.player_stats.streak, 3);
}

// Optional fields the service may omit must default rather than fail.
#[test]
fn complete_response_tolerates_missing_optionals() {
    let json = r#"{
        "correct": false,
        "guesses": ["pelican"],
        "confidence": 41,
        "score": 0,
        "xp_gained": 5,
        "player_stats": {"level": 1, "xp": 5, "streak": 0}
    }"#;
    let resp: CompleteResponse = serde_json::from_str(json).unwrap();
    assert!(resp.feedback.is_empty());
    assert!(resp.achievements.is_empty());
    assert!(!resp.level_up);
    assert_eq!(resp.new_level, None);
}

#[test]
fn guesses_are_ranked_and_only_the_top_carries_confidence() {
    let guesses = vec!["cat".to_string(), "dog".to_string(), "fox".to_string()];
    let lines = view::guess_lines(&guesses, 82);
    assert_eq!(lines, vec!["1. cat (82%)", "2. dog", "3. fox"]);
}

#[test]
fn score_and_xp_lines_are_signed_gains() {
    assert_eq!(view::score_line(50), "+50");
    assert_eq!(view::xp_line(35), "+35 XP");
    // The service may deduct; the sign must come from the value, not the
    // format string.
    assert_eq!(view::score_line(-5), "-5");
    assert_eq!(view::score_line(0), "+0");
    assert_eq!(view::xp_line(-10), "-10 XP");
}

#[test]
fn verdict_matches_outcome() {
    assert_eq!(view::verdict_line(true), "The AI got it!");
    assert_eq!(view::verdict_line(false), "So close!");
}

// One burst for a correct guess plus one per achievement; a near miss with
// no achievements celebrates nothing.
#[test]
fn confetti_burst_count() {
    assert_eq!(view::burst_count(true, 0), 1);
    assert_eq!(view::burst_count(false, 0), 0);
    assert_eq!(view::burst_count(false, 2), 2);
    assert_eq!(view::burst_count(true, 3), 4);
}

#[test]
fn color_parses_both_external_forms() {
    assert_eq!(Color::parse("#ff8000"), Some(Color { r: 255, g: 128, b: 0 }));
    assert_eq!(Color::parse("#fff"), Some(Color { r: 255, g: 255, b: 255 }));
    assert_eq!(Color::parse("rgb(12, 34, 56)"), Some(Color { r: 12, g: 34, b: 56 }));
    assert_eq!(Color::parse("hsl(10, 5%, 5%)"), None);
    assert_eq!(Color::parse("#ff80"), None);
    assert_eq!(Color { r: 12, g: 34, b: 56 }.css(), "rgb(12,34,56)");
}

// A canvas displayed at half its intrinsic size must double pointer offsets.
#[test]
fn pointer_coordinates_scale_with_layout() {
    let m = CanvasMetrics {
        intrinsic_width: 800.0,
        intrinsic_height: 600.0,
        rect_left: 10.0,
        rect_top: 10.0,
        rect_width: 400.0,
        rect_height: 300.0,
    };
    let p = m.to_canvas(10.0, 10.0);
    assert_eq!((p.x, p.y), (0.0, 0.0));
    let p = m.to_canvas(20.0, 20.0);
    assert_eq!((p.x, p.y), (20.0, 20.0));
    let p = m.to_canvas(410.0, 310.0);
    assert_eq!((p.x, p.y), (800.0, 600.0));
}

#[test]
fn brush_ladder_unlocks_by_level() {
    assert!(brushes_for_level(1).is_empty());
    assert_eq!(brushes_for_level(3), vec![Brush::Neon]);
    assert_eq!(brushes_for_level(5), vec![Brush::Neon, Brush::Spray]);
    assert_eq!(
        brushes_for_level(10),
        vec![Brush::Neon, Brush::Spray, Brush::Marker, Brush::Sparkle]
    );
}

#[test]
fn game_config_defaults_and_overrides() {
    let d = GameConfig::default();
    assert!(!d.debug_logging);
    assert_eq!(d.unlocked_brushes, vec!["normal", "thick", "dotted", "eraser"]);

    let parsed: GameConfig =
        serde_json::from_str(r#"{"debug_logging": true, "unlocked_brushes": ["normal"]}"#).unwrap();
    assert!(parsed.debug_logging);
    assert_eq!(parsed.unlocked_brushes, vec!["normal"]);

    let partial: GameConfig = serde_json::from_str(r#"{"debug_logging": true}"#).unwrap();
    assert_eq!(partial.unlocked_brushes.len(), 4);
}
