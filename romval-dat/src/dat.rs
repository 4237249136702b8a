use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use romval_core::{HashKind, normalize_hash};

use crate::error::{DatError, ParseError};

/// Game description used when a DAT names none.
pub const UNKNOWN: &str = "Unknown";

/// One ROM record flattened with its owning game's description.
///
/// Hash fields are lowercase hex of the exact length for their kind, or
/// absent. The parser never builds an entry with a malformed hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatEntry {
    pub rom_name: String,
    pub game_description: String,
    pub sha1: Option<String>,
    pub md5: Option<String>,
    pub crc32: Option<String>,
}

impl DatEntry {
    pub fn hash(&self, kind: HashKind) -> Option<&str> {
        match kind {
            HashKind::Sha1 => self.sha1.as_deref(),
            HashKind::Md5 => self.md5.as_deref(),
            HashKind::Crc32 => self.crc32.as_deref(),
        }
    }

    pub fn has_hashes(&self) -> bool {
        HashKind::ALL.iter().any(|kind| self.hash(*kind).is_some())
    }
}

/// The two DAT encodings in circulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatFormat {
    /// Logiqx XML (`<datafile><game><rom .../></game></datafile>`).
    Logiqx,
    /// ClrMamePro bracketed text (`game ( rom ( ... ) )`).
    ClrMamePro,
}

impl DatFormat {
    /// XML when the first non-whitespace character is `<`.
    pub fn detect(text: &str) -> Option<Self> {
        let first = text.trim_start_matches('\u{feff}').trim_start().chars().next()?;
        Some(if first == '<' {
            DatFormat::Logiqx
        } else {
            DatFormat::ClrMamePro
        })
    }
}

/// Result of parsing one DAT: every entry that could be recovered, plus
/// what was wrong with the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDat {
    pub format: Option<DatFormat>,
    pub entries: Vec<DatEntry>,
    pub issues: Vec<ParseError>,
}

impl ParsedDat {
    fn empty(format: Option<DatFormat>) -> Self {
        Self {
            format,
            entries: Vec::new(),
            issues: Vec::new(),
        }
    }
}

/// Parse raw DAT bytes, auto-detecting the format.
///
/// Never fails: invalid UTF-8 is replaced, and malformed games or hashes are
/// skipped and reported in [`ParsedDat::issues`].
pub fn parse_dat(bytes: &[u8]) -> ParsedDat {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_start_matches('\u{feff}');

    let Some(format) = DatFormat::detect(text) else {
        let mut parsed = ParsedDat::empty(None);
        parsed.issues.push(ParseError::Empty);
        return parsed;
    };

    let mut parsed = ParsedDat::empty(Some(format));
    match format {
        DatFormat::Logiqx => parse_logiqx(text, &mut parsed),
        DatFormat::ClrMamePro => parse_clrmamepro(text, &mut parsed),
    }
    parsed
}

/// Read and parse a DAT from disk. Only I/O errors are fatal.
pub fn parse_dat_file(path: &Path) -> Result<ParsedDat, DatError> {
    let bytes = std::fs::read(path)?;
    Ok(parse_dat(&bytes))
}

/// Build an entry from raw field values, validating each hash.
fn build_entry(
    rom_name: Option<String>,
    game_description: &str,
    raw_hashes: [(HashKind, Option<&str>); 3],
    issues: &mut Vec<ParseError>,
) -> DatEntry {
    let rom_name = rom_name.unwrap_or_else(|| UNKNOWN.to_string());
    let mut entry = DatEntry {
        rom_name,
        game_description: game_description.to_string(),
        sha1: None,
        md5: None,
        crc32: None,
    };

    for (kind, raw) in raw_hashes {
        let Some(raw) = raw else { continue };
        match normalize_hash(kind, raw) {
            Some(hash) => match kind {
                HashKind::Sha1 => entry.sha1 = Some(hash),
                HashKind::Md5 => entry.md5 = Some(hash),
                HashKind::Crc32 => entry.crc32 = Some(hash),
            },
            None => issues.push(ParseError::MalformedHash {
                rom: entry.rom_name.clone(),
                kind,
                value: raw.to_string(),
            }),
        }
    }

    entry
}

// ---------------------------------------------------------------------------
// Logiqx XML
// ---------------------------------------------------------------------------

#[derive(Default)]
struct XmlRom {
    name: Option<String>,
    sha1: Option<String>,
    md5: Option<String>,
    crc: Option<String>,
}

#[derive(Default)]
struct XmlGame {
    name: Option<String>,
    description_attr: Option<String>,
    description_text: Option<String>,
    roms: Vec<XmlRom>,
}

impl XmlGame {
    /// `description` attribute, then `<description>` text, then `name`.
    fn description(&self) -> &str {
        [&self.description_attr, &self.description_text, &self.name]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|d| !d.is_empty())
            .unwrap_or(UNKNOWN)
    }
}

fn attribute_values(e: &BytesStart<'_>) -> impl Iterator<Item = (Vec<u8>, String)> {
    e.attributes().flatten().map(|attr| {
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        (attr.key.as_ref().to_vec(), value)
    })
}

fn xml_game(e: &BytesStart<'_>) -> XmlGame {
    let mut game = XmlGame::default();
    for (key, value) in attribute_values(e) {
        match key.as_slice() {
            b"name" => game.name = Some(value),
            b"description" => game.description_attr = Some(value),
            _ => {}
        }
    }
    game
}

fn xml_rom(e: &BytesStart<'_>) -> XmlRom {
    let mut rom = XmlRom::default();
    for (key, value) in attribute_values(e) {
        match key.as_slice() {
            b"name" => rom.name = Some(value),
            b"sha1" => rom.sha1 = Some(value),
            b"md5" => rom.md5 = Some(value),
            b"crc" => rom.crc = Some(value),
            _ => {}
        }
    }
    rom
}

fn flush_xml_game(game: XmlGame, parsed: &mut ParsedDat) {
    let description = game.description().to_string();
    for rom in game.roms {
        let entry = build_entry(
            rom.name,
            &description,
            [
                (HashKind::Sha1, rom.sha1.as_deref()),
                (HashKind::Md5, rom.md5.as_deref()),
                (HashKind::Crc32, rom.crc.as_deref()),
            ],
            &mut parsed.issues,
        );
        parsed.entries.push(entry);
    }
}

/// Stream `<game>` elements. A syntax error stops the stream but keeps every
/// game closed before it.
fn parse_logiqx(text: &str, parsed: &mut ParsedDat) {
    let mut xml = Reader::from_str(text);
    xml.config_mut().trim_text(true);

    let mut current: Option<XmlGame> = None;
    let mut in_description = false;

    loop {
        match xml.read_event() {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"game" => current = Some(xml_game(e)),
                b"rom" => {
                    if let Some(game) = current.as_mut() {
                        game.roms.push(xml_rom(e));
                    }
                }
                b"description" => in_description = current.is_some(),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"rom" => {
                    if let Some(game) = current.as_mut() {
                        game.roms.push(xml_rom(e));
                    }
                }
                b"game" => current = None,
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_description => {
                if let (Some(game), Ok(text)) = (current.as_mut(), e.unescape()) {
                    if game.description_text.is_none() {
                        game.description_text = Some(text.into_owned());
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"game" => {
                    if let Some(game) = current.take() {
                        flush_xml_game(game, parsed);
                    }
                }
                b"description" => in_description = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                parsed.issues.push(ParseError::Xml {
                    position: xml.error_position(),
                    message: e.to_string(),
                });
                break;
            }
            Ok(_) => {}
        }
    }
}

// ---------------------------------------------------------------------------
// ClrMamePro
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Open,
    Close,
    Bare(String),
    Quoted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    line: usize,
}

impl Token {
    fn is_bare(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Bare(w) if w == word)
    }

    fn text(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Bare(w) | TokenKind::Quoted(w) => Some(w),
            TokenKind::Open | TokenKind::Close => None,
        }
    }
}

/// Split ClrMamePro text into words, quoted strings and parens.
///
/// `rom ( name "Game (USA).nds" crc AB )` becomes
/// `rom`, `(`, `name`, `"Game (USA).nds"`, `crc`, `AB`, `)`.
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut line = 1;

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' | ')' => {
                chars.next();
                let kind = if c == '(' {
                    TokenKind::Open
                } else {
                    TokenKind::Close
                };
                tokens.push(Token { kind, line });
            }
            '"' => {
                chars.next();
                let start_line = line;
                let mut word = String::new();
                for c in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                    if c == '\n' {
                        line += 1;
                    }
                    word.push(c);
                }
                tokens.push(Token {
                    kind: TokenKind::Quoted(word),
                    line: start_line,
                });
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '(' | ')' | '"') {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Bare(word),
                    line,
                });
            }
        }
    }

    tokens
}

fn is_block_opener(tokens: &[Token], i: usize, keyword: &str) -> bool {
    tokens[i].is_bare(keyword) && tokens.get(i + 1).is_some_and(|t| t.kind == TokenKind::Open)
}

enum Extent {
    /// Index of the closing paren.
    Closed(usize),
    /// Index where scanning stopped: a new game opener or end of input.
    Interrupted(usize),
}

/// Find the paren closing a game body that starts at `start`.
///
/// A nested `game (` means the current game never closed.
fn game_extent(tokens: &[Token], start: usize) -> Extent {
    let mut depth = 1usize;
    for i in start..tokens.len() {
        match tokens[i].kind {
            TokenKind::Open => depth += 1,
            TokenKind::Close => {
                depth -= 1;
                if depth == 0 {
                    return Extent::Closed(i);
                }
            }
            _ if is_block_opener(tokens, i, "game") => return Extent::Interrupted(i),
            _ => {}
        }
    }
    Extent::Interrupted(tokens.len())
}

/// Index of the paren closing a block whose contents start at `start`,
/// or `tokens.len()` if it never closes.
fn block_end(tokens: &[Token], start: usize) -> usize {
    let mut depth = 1usize;
    for (i, token) in tokens.iter().enumerate().skip(start) {
        match token.kind {
            TokenKind::Open => depth += 1,
            TokenKind::Close => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
    }
    tokens.len()
}

fn parse_clrmamepro(text: &str, parsed: &mut ParsedDat) {
    let tokens = tokenize(text);
    let mut i = 0;

    while i < tokens.len() {
        if !is_block_opener(&tokens, i, "game") {
            i += 1;
            continue;
        }
        let body_start = i + 2;
        match game_extent(&tokens, body_start) {
            Extent::Closed(end) => {
                parse_clr_game(&tokens[body_start..end], parsed);
                i = end + 1;
            }
            Extent::Interrupted(next) => {
                parsed.issues.push(ParseError::UnterminatedGame {
                    line: tokens[i].line,
                });
                i = next;
            }
        }
    }
}

fn parse_clr_game(body: &[Token], parsed: &mut ParsedDat) {
    let mut description: Option<&str> = None;
    let mut roms: Vec<&[Token]> = Vec::new();

    let mut j = 0;
    while j < body.len() {
        if body.get(j + 1).is_some_and(|t| t.kind == TokenKind::Open) {
            let end = block_end(body, j + 2);
            if body[j].is_bare("rom") {
                roms.push(&body[j + 2..end]);
            }
            j = end + 1;
            continue;
        }
        if description.is_none() && body[j].is_bare("description") {
            if let Some(value) = body.get(j + 1).and_then(Token::text) {
                description = Some(value);
                j += 2;
                continue;
            }
        }
        j += 1;
    }

    let description = description.unwrap_or(UNKNOWN);
    for record in roms {
        let entry = parse_clr_rom(record, description, &mut parsed.issues);
        parsed.entries.push(entry);
    }
}

/// Key/value pairs of a rom record; the first occurrence of a key wins.
fn parse_clr_rom(record: &[Token], description: &str, issues: &mut Vec<ParseError>) -> DatEntry {
    let mut name = None;
    let mut sha1 = None;
    let mut md5 = None;
    let mut crc = None;

    let mut j = 0;
    while j < record.len() {
        let (TokenKind::Bare(key), Some(value)) =
            (&record[j].kind, record.get(j + 1).and_then(Token::text))
        else {
            j += 1;
            continue;
        };
        let slot = match key.as_str() {
            "name" => &mut name,
            "sha1" => &mut sha1,
            "md5" => &mut md5,
            "crc" => &mut crc,
            _ => {
                j += 2;
                continue;
            }
        };
        if slot.is_none() {
            *slot = Some(value);
        }
        j += 2;
    }

    build_entry(
        name.map(str::to_string),
        description,
        [
            (HashKind::Sha1, sha1),
            (HashKind::Md5, md5),
            (HashKind::Crc32, crc),
        ],
        issues,
    )
}

#[cfg(test)]
#[path = "tests/dat_tests.rs"]
mod tests;
