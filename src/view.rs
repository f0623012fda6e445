//! Result presentation.
//!
//! The text the panel shows is built by pure functions so ordering and
//! annotation rules test natively; the DOM half only places those strings
//! and runs the decorative confetti burst.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::api::{CompleteResponse, PlayerStats};

/// Elements per confetti burst.
const CONFETTI_COUNT: usize = 50;
/// Stagger between element creations, ms.
const CONFETTI_STAGGER_MS: i32 = 30;
/// Lifetime of each element before it removes itself, ms.
const CONFETTI_LIFETIME_MS: i32 = 3000;
/// Delay before the level-up notice appears, ms.
const LEVEL_UP_DELAY_MS: i32 = 1200;

const CONFETTI_COLORS: [&str; 6] = [
    "#ff5d5d", "#ffb13d", "#ffe44d", "#5dd05d", "#4db3ff", "#c45dff",
];

// --- Pure view-model builders ------------------------------------------------

pub fn verdict_line(correct: bool) -> &'static str {
    if correct { "The AI got it!" } else { "So close!" }
}

/// Ranked guesses, best first, with the top guess annotated with the model's
/// confidence percentage.
pub fn guess_lines(guesses: &[String], confidence: u32) -> Vec<String> {
    guesses
        .iter()
        .enumerate()
        .map(|(i, g)| {
            if i == 0 {
                format!("1. {g} ({confidence}%)")
            } else {
                format!("{}. {g}", i + 1)
            }
        })
        .collect()
}

pub fn score_line(score: i64) -> String {
    format!("{score:+}")
}

pub fn xp_line(xp_gained: i64) -> String {
    format!("{xp_gained:+} XP")
}

pub fn stats_line(stats: &PlayerStats) -> String {
    format!(
        "Level {} | {} XP | streak {}",
        stats.level, stats.xp, stats.streak
    )
}

/// Confetti bursts a result triggers: one for a correct guess plus one per
/// unlocked achievement.
pub fn burst_count(correct: bool, achievements: usize) -> usize {
    usize::from(correct) + achievements
}

// --- DOM rendering -----------------------------------------------------------

pub struct ResultPanel {
    window: Window,
    document: Document,
}

impl ResultPanel {
    pub fn new(window: Window, document: Document) -> ResultPanel {
        ResultPanel { window, document }
    }

    pub fn render(&self, result: &CompleteResponse) -> Result<(), JsValue> {
        let panel = self.require("result-panel")?;
        panel.remove_attribute("hidden")?;
        panel.set_class_name(if result.correct {
            "result success"
        } else {
            "result near-miss"
        });

        self.set_text("result-verdict", verdict_line(result.correct))?;
        self.set_text("result-feedback", &result.feedback)?;
        self.set_text("result-score", &score_line(result.score))?;
        self.set_text("result-xp", &xp_line(result.xp_gained))?;
        self.set_text("player-stats", &stats_line(&result.player_stats))?;

        self.fill_list(
            "result-guesses",
            &guess_lines(&result.guesses, result.confidence),
        )?;
        let achievement_lines: Vec<String> = result
            .achievements
            .iter()
            .map(|a| {
                if a.description.is_empty() {
                    a.name.clone()
                } else {
                    format!("{}: {}", a.name, a.description)
                }
            })
            .collect();
        self.fill_list("result-achievements", &achievement_lines)?;

        if result.correct {
            self.confetti_burst()?;
        }
        for _ in &result.achievements {
            self.confetti_burst()?;
        }

        if result.level_up {
            self.show_level_up(result.new_level.unwrap_or(result.player_stats.level))?;
        }
        Ok(())
    }

    pub fn hide(&self) -> Result<(), JsValue> {
        if let Some(panel) = self.document.get_element_by_id("result-panel") {
            panel.set_attribute("hidden", "")?;
        }
        Ok(())
    }

    fn require(&self, id: &str) -> Result<Element, JsValue> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))
    }

    fn set_text(&self, id: &str, text: &str) -> Result<(), JsValue> {
        self.require(id)?.set_text_content(Some(text));
        Ok(())
    }

    fn fill_list(&self, id: &str, lines: &[String]) -> Result<(), JsValue> {
        let list = self.require(id)?;
        list.set_text_content(None);
        for line in lines {
            let item = self.document.create_element("li")?;
            item.set_text_content(Some(line));
            list.append_child(&item)?;
        }
        Ok(())
    }

    /// Delayed modal notice; cosmetic, nothing gameplay-visible depends on it.
    fn show_level_up(&self, new_level: u32) -> Result<(), JsValue> {
        let Some(notice) = self.document.get_element_by_id("level-up") else {
            return Ok(());
        };
        notice.set_text_content(Some(&format!("Level {new_level}!")));
        let shown = notice.clone();
        let show = Closure::once_into_js(move || {
            let _ = shown.remove_attribute("hidden");
        });
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                show.unchecked_ref(),
                LEVEL_UP_DELAY_MS,
            )?;
        Ok(())
    }

    /// Fifty independently timed falling elements, staggered in, each
    /// removing itself after a fixed lifetime.
    pub fn confetti_burst(&self) -> Result<(), JsValue> {
        let body: HtmlElement = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("no document body"))?;

        for i in 0..CONFETTI_COUNT {
            let document = self.document.clone();
            let window = self.window.clone();
            let parent = body.clone();
            let spawn = Closure::once_into_js(move || {
                let _ = spawn_confetti_piece(&window, &document, &parent);
            });
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    spawn.unchecked_ref(),
                    i as i32 * CONFETTI_STAGGER_MS,
                )?;
        }
        Ok(())
    }
}

fn spawn_confetti_piece(
    window: &Window,
    document: &Document,
    parent: &HtmlElement,
) -> Result<(), JsValue> {
    let piece: HtmlElement = document.create_element("div")?.dyn_into()?;
    piece.set_class_name("confetti");
    let style = piece.style();
    style.set_property("left", &format!("{:.1}%", js_sys::Math::random() * 100.0))?;
    let color = CONFETTI_COLORS[(js_sys::Math::random() * CONFETTI_COLORS.len() as f64) as usize
        % CONFETTI_COLORS.len()];
    style.set_property("background-color", color)?;
    parent.append_child(&piece)?;

    let doomed = piece.clone();
    let remove = Closure::once_into_js(move || {
        doomed.remove();
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        remove.unchecked_ref(),
        CONFETTI_LIFETIME_MS,
    )?;
    Ok(())
}
