//! Team broadcast signals.
//!
//! Coordination rides on ordinary broadcasts of the form `Level N k`, where
//! `N` is the sender's level and `k` is `r` (ready: the sender passed its
//! gate and is gathering players) or `c` (call: the sender reached the
//! ready player's tile and joins the count). Anything else on the channel
//! is chatter and is ignored.

use core::fmt;

use zappy_types::{Command, Level};

const PREFIX: &str = "Level";

/// The two coordination signal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// `c`: a follower has arrived and counts toward the quorum.
    Call,
    /// `r`: the sender is ready to cast and wants company.
    Ready,
}

impl SignalKind {
    const fn code(self) -> &'static str {
        match self {
            Self::Call => "c",
            Self::Ready => "r",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "c" => Some(Self::Call),
            "r" => Some(Self::Ready),
            _ => None,
        }
    }
}

/// A parsed coordination broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    /// Level declared by the sender.
    pub level: Level,
    /// What the sender is announcing.
    pub kind: SignalKind,
}

impl Signal {
    /// A ready announcement for `level`.
    pub const fn ready(level: Level) -> Self {
        Self {
            level,
            kind: SignalKind::Ready,
        }
    }

    /// An arrival call for `level`.
    pub const fn call(level: Level) -> Self {
        Self {
            level,
            kind: SignalKind::Call,
        }
    }

    /// Parse a received broadcast text. Surrounding quotes are tolerated.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().trim_matches('"');
        let mut words = text.split_whitespace();
        if words.next()? != PREFIX {
            return None;
        }
        let level = words.next()?.parse::<u8>().ok().and_then(Level::new)?;
        let kind = SignalKind::from_code(words.next()?)?;
        if words.next().is_some() {
            return None;
        }
        Some(Self { level, kind })
    }

    /// The broadcast command carrying this signal.
    pub fn to_command(self) -> Command {
        Command::Broadcast(self.to_string())
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX} {} {}", self.level, self.kind.code())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn level(n: u8) -> Level {
        Level::new(n).unwrap()
    }

    #[test]
    fn parses_both_kinds() {
        assert_eq!(Signal::parse("Level 2 r"), Some(Signal::ready(level(2))));
        assert_eq!(Signal::parse("\"Level 7 c\""), Some(Signal::call(level(7))));
    }

    #[test]
    fn rejects_chatter() {
        assert_eq!(Signal::parse("hello team"), None);
        assert_eq!(Signal::parse("Level 9 r"), None);
        assert_eq!(Signal::parse("Level 0 r"), None);
        assert_eq!(Signal::parse("Level 2 x"), None);
        assert_eq!(Signal::parse("Level 2"), None);
        assert_eq!(Signal::parse("Level 2 r extra"), None);
    }

    #[test]
    fn formats_as_broadcast() {
        assert_eq!(
            Signal::ready(level(3)).to_command(),
            Command::Broadcast("Level 3 r".to_owned())
        );
        assert_eq!(Signal::call(level(4)).to_string(), "Level 4 c");
    }
}
