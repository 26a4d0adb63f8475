use crate::shared::Result;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Maximum length for package versions (security limit)
const MAX_VERSION_LENGTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PreKind {
    Alpha,
    Beta,
    Rc,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum PreKey {
    /// Developmental release of a final version: 1.0.dev0 < 1.0a0
    DevOfFinal,
    Pre(PreKind, u64),
    Final,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum DevKey {
    Dev(u64),
    None,
}

/// Numeric local segments sort above alphanumeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum LocalSegment {
    Alpha(String),
    Numeric(u64),
}

/// Comparison key following PEP 440 precedence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PrecedenceKey {
    epoch: u64,
    release: Vec<u64>,
    pre: PreKey,
    post: Option<u64>,
    dev: DevKey,
    local: Vec<LocalSegment>,
}

/// An installed or published version.
///
/// Keeps the raw text for display and, when the text is a valid PEP 440 version,
/// a precedence key for ordering. Two versions are only ordered when both parse;
/// legacy version strings compare equal to identical text and are otherwise unordered.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    key: Option<PrecedenceKey>,
}

impl Version {
    pub fn new(version: String) -> Result<Self> {
        let version = version.trim().to_string();
        if version.is_empty() {
            anyhow::bail!("Package version cannot be empty");
        }

        // Security: Length limit to prevent DoS
        if version.len() > MAX_VERSION_LENGTH {
            anyhow::bail!(
                "Package version is too long ({} bytes). Maximum allowed: {} bytes",
                version.len(),
                MAX_VERSION_LENGTH
            );
        }

        if version.chars().any(|c| c.is_control() || c == '/' || c == '\\') {
            anyhow::bail!("Package version contains invalid characters");
        }

        let key = parse_pep440(&version);
        Ok(Self { raw: version, key })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// False for legacy version strings that cannot be ordered.
    pub fn is_pep440(&self) -> bool {
        self.key.is_some()
    }

    /// `Some(true)` when `self` strictly follows `other`; `None` when either is unordered.
    pub fn is_newer_than(&self, other: &Version) -> Option<bool> {
        self.partial_cmp(other).map(|ordering| ordering == Ordering::Greater)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        match (&self.key, &other.key) {
            (Some(a), Some(b)) => a == b,
            _ => self.raw == other.raw,
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (&self.key, &other.key) {
            (Some(a), Some(b)) => Some(a.cmp(b)),
            _ if self.raw == other.raw => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn eat_separator(&mut self) -> bool {
        match self.rest().chars().next() {
            Some('-' | '_' | '.') => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Words must be listed longest first when one is a prefix of another.
    fn eat_word<'w>(&mut self, words: &[&'w str]) -> Option<&'w str> {
        let word = words.iter().find(|w| self.rest().starts_with(**w))?;
        self.pos += word.len();
        Some(word)
    }

    fn eat_number(&mut self) -> Option<u64> {
        let digits = self.rest().bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let value = self.rest()[..digits].parse().ok()?;
        self.pos += digits;
        Some(value)
    }

    fn peek_is_digit(&self, offset: usize) -> bool {
        self.rest()
            .as_bytes()
            .get(offset)
            .is_some_and(u8::is_ascii_digit)
    }
}

fn parse_pep440(text: &str) -> Option<PrecedenceKey> {
    let lowered = text.trim().to_ascii_lowercase();
    let lowered = lowered.strip_prefix('v').unwrap_or(&lowered);

    let (public, local) = match lowered.split_once('+') {
        Some((public, local)) => (public, Some(local)),
        None => (lowered, None),
    };

    let local = match local {
        Some(local) => parse_local(local)?,
        None => Vec::new(),
    };

    let (epoch, public) = match public.split_once('!') {
        Some((epoch, rest)) => (epoch.parse().ok()?, rest),
        None => (0, public),
    };

    let mut cursor = Cursor {
        text: public,
        pos: 0,
    };

    let mut release = vec![cursor.eat_number()?];
    while cursor.rest().starts_with('.') && cursor.peek_is_digit(1) {
        cursor.pos += 1;
        release.push(cursor.eat_number()?);
    }

    let pre = {
        let saved = cursor.pos;
        cursor.eat_separator();
        let kind = match cursor.eat_word(&["alpha", "a", "beta", "b", "preview", "pre", "rc", "c"]) {
            Some("alpha" | "a") => Some(PreKind::Alpha),
            Some("beta" | "b") => Some(PreKind::Beta),
            Some(_) => Some(PreKind::Rc),
            None => None,
        };
        match kind {
            Some(kind) => {
                cursor.eat_separator();
                Some((kind, cursor.eat_number().unwrap_or(0)))
            }
            None => {
                cursor.pos = saved;
                None
            }
        }
    };

    let post = {
        let saved = cursor.pos;
        if cursor.rest().starts_with('-') && cursor.peek_is_digit(1) {
            cursor.pos += 1;
            cursor.eat_number()
        } else {
            cursor.eat_separator();
            if cursor.eat_word(&["post", "rev", "r"]).is_some() {
                cursor.eat_separator();
                Some(cursor.eat_number().unwrap_or(0))
            } else {
                cursor.pos = saved;
                None
            }
        }
    };

    let dev = {
        let saved = cursor.pos;
        cursor.eat_separator();
        if cursor.eat_word(&["dev"]).is_some() {
            cursor.eat_separator();
            Some(cursor.eat_number().unwrap_or(0))
        } else {
            cursor.pos = saved;
            None
        }
    };

    if !cursor.rest().is_empty() {
        return None;
    }

    while release.len() > 1 && release.last() == Some(&0) {
        release.pop();
    }

    let pre = match (pre, post, dev) {
        (Some((kind, n)), _, _) => PreKey::Pre(kind, n),
        (None, None, Some(_)) => PreKey::DevOfFinal,
        (None, _, _) => PreKey::Final,
    };

    Some(PrecedenceKey {
        epoch,
        release,
        pre,
        post,
        dev: dev.map_or(DevKey::None, DevKey::Dev),
        local,
    })
}

fn parse_local(local: &str) -> Option<Vec<LocalSegment>> {
    local
        .split(['-', '_', '.'])
        .map(|segment| {
            if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_alphanumeric()) {
                None
            } else if segment.chars().all(|c| c.is_ascii_digit()) {
                segment.parse().ok().map(LocalSegment::Numeric)
            } else {
                Some(LocalSegment::Alpha(segment.to_string()))
            }
        })
        .collect()
}
