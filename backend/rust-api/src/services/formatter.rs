use crate::models::email::SendMode;
use crate::models::puzzle::Puzzle;

pub const DEFAULT_LINK_BASE: &str = "https://brainstellar.com/puzzles";

const SEPARATOR_WIDTH: usize = 40;
const MISSING_FIELD: &str = "N/A";

/// Renders the email body for `puzzles` in the given mode.
pub fn format_output(puzzles: &[Puzzle], mode: SendMode, link_base: &str) -> String {
    let link_base = link_base.trim_end_matches('/');

    puzzles
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut parts = vec![format!(
                "🧩 Puzzle {}: {} ({})",
                i + 1,
                p.title,
                p.difficulty
            )];

            match mode {
                SendMode::Question => parts.push(p.question.clone()),
                SendMode::Hint => {
                    if let Some(hint) = &p.hint {
                        parts.push(format!("💡 Hint: {}", hint));
                    }
                }
                SendMode::Solution => parts.push(format!(
                    "✅ Answer: {}\n🧠 Solution: {}",
                    p.answer.as_deref().unwrap_or(MISSING_FIELD),
                    p.solution.as_deref().unwrap_or(MISSING_FIELD)
                )),
            }

            parts.push(format!(
                "🔗 {}/{}/{}\n{}",
                link_base,
                p.difficulty,
                p.id,
                "-".repeat(SEPARATOR_WIDTH)
            ));
            parts.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
