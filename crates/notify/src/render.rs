use common::{Direction, Match};

/// Discord rejects message content longer than this.
pub const DEFAULT_MAX_LEN: usize = common::config::DEFAULT_MAX_MESSAGE_LEN;

const HEADER: &str = "🚨 **MARKET SCAN** 🚨";
const SEPARATOR: &str = "\n----------------\n";

/// Render one match as a three-line markdown block.
///
/// Prices always carry a fractional part (`101.0`, not `101`).
pub fn render_match(m: &Match) -> String {
    let marker = match m.direction {
        Direction::Bearish => "🔴",
        Direction::Bullish => "🟢",
    };
    let detail = match m.wick {
        Some(wick) => format!("Wick: {wick:.4}"),
        None => title_case(&m.pattern),
    };
    format!(
        "**{}** [{}]\n{} {marker} ({detail})\nPrice: `{:?}`",
        m.symbol, m.timeframe, m.direction, m.price
    )
}

/// Render a whole cycle into one message, cut to `max_len` characters.
pub fn render_alert(matches: &[Match], max_len: usize) -> String {
    let blocks: Vec<String> = matches.iter().map(render_match).collect();
    let message = format!("{HEADER}\n{}", blocks.join(SEPARATOR));
    if message.chars().count() <= max_len {
        message
    } else {
        message.chars().take(max_len).collect()
    }
}

// "shooting_star" -> "Shooting Star"
fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
