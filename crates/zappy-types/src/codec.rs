//! Line codec between [`Command`]/[`ServerEvent`] and the text protocol.
//!
//! The protocol is one command or reply per `\n`-terminated line. Encoding
//! is infallible. Decoding never fails either: anything the codec cannot
//! place becomes [`ServerEvent::Unknown`] and is left to the caller to log.

use crate::commands::Command;
use crate::events::ServerEvent;
use crate::ids::Direction;

const LEVEL_PREFIX: &str = "Current level:";
const MESSAGE_PREFIX: &str = "message ";
const EJECT_PREFIX: &str = "eject:";

/// Render a command as a complete wire line, newline included.
pub fn encode(command: &Command) -> String {
    format!("{command}\n")
}

/// Decode one server line.
///
/// `answering` is the oldest pending command, if any. A bracketed list is an
/// inventory result when it answers `Inventory` and a look result otherwise,
/// since both replies share the same syntax.
pub fn decode(line: &str, answering: Option<&Command>) -> ServerEvent {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim();

    match trimmed {
        "ok" => return ServerEvent::Ok,
        "ko" => return ServerEvent::Negative,
        "dead" => return ServerEvent::Dead,
        "end" => return ServerEvent::EndOfGame,
        "Elevation underway" => return ServerEvent::RitualStarted,
        _ => {}
    }

    if trimmed.starts_with('[') {
        let items = split_list(trimmed);
        return if matches!(answering, Some(Command::Inventory)) {
            ServerEvent::InventoryResult(items)
        } else {
            ServerEvent::LookResult(items)
        };
    }

    if let Some(rest) = trimmed.strip_prefix(LEVEL_PREFIX) {
        if let Ok(level) = rest.trim().parse::<u8>() {
            return ServerEvent::LevelUp(level);
        }
    } else if let Some(rest) = trimmed.strip_prefix(MESSAGE_PREFIX) {
        if let Some(event) = decode_message(rest) {
            return event;
        }
    } else if let Some(rest) = trimmed.strip_prefix(EJECT_PREFIX) {
        if let Some(direction) = parse_direction(rest) {
            return ServerEvent::Ejected(direction);
        }
    }

    ServerEvent::Unknown(line.to_owned())
}

/// `K, text` with `K` in 0..=8. The text keeps inner commas.
fn decode_message(rest: &str) -> Option<ServerEvent> {
    let (direction, text) = rest.split_once(',')?;
    let direction = parse_direction(direction)?;
    Some(ServerEvent::Message {
        direction,
        text: strip_quotes(text.trim()).to_owned(),
    })
}

fn parse_direction(raw: &str) -> Option<Direction> {
    raw.trim().parse::<u8>().ok().and_then(Direction::new)
}

fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

/// Split a bracketed, comma-separated list into trimmed elements.
///
/// One leading `[` and one trailing `]` are removed. An empty list yields no
/// elements, but empty elements between commas are kept so tile indices stay
/// aligned with the server's ordering.
pub fn split_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    let raw = raw.strip_prefix('[').unwrap_or(raw);
    let raw = raw.strip_suffix(']').unwrap_or(raw);
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|element| element.trim().to_owned()).collect()
}

/// Count reported for `name` in an inventory result.
///
/// Entries look like `"food 12"`. Entries that do not parse are skipped.
pub fn inventory_count(entries: &[String], name: &str) -> Option<u32> {
    entries.iter().find_map(|entry| {
        let mut parts = entry.split_whitespace();
        let key = parts.next()?;
        let count = parts.next()?.parse::<u32>().ok()?;
        (key == name && parts.next().is_none()).then_some(count)
    })
}
