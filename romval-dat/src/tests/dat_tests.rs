use super::*;

// -- ClrMamePro tests --

const SAMPLE_CLR_DAT: &str = r#"clrmamepro (
	name "Nintendo - Nintendo DS"
	description "Nintendo - Nintendo DS"
	version 20240101-000000
)

game (
	name "Mario Kart DS (USA, Australia) (En,Fr,Es)"
	description "Mario Kart DS (USA, Australia) (En,Fr,Es)"
	rom ( name "Mario Kart DS (USA, Australia) (En,Fr,Es).nds" size 33554432 crc 1C5F3E4E md5 0E2C2CDC4B8E6E4A8F4E47C5F5B3E0C2 sha1 4A8C3E0D1E2F3A4B5C6D7E8F9A0B1C2D3E4F5A6B )
)

game (
	name "Tetris DS (USA)"
	description "Tetris DS (USA)"
	rom ( name "Tetris DS (USA).nds" size 33554432 crc abcdef01 )
)
"#;

#[test]
fn test_parse_clrmamepro_dat() {
    let parsed = parse_dat(SAMPLE_CLR_DAT.as_bytes());
    assert_eq!(parsed.format, Some(DatFormat::ClrMamePro));
    assert!(parsed.issues.is_empty(), "{:?}", parsed.issues);
    assert_eq!(parsed.entries.len(), 2);

    let mkds = &parsed.entries[0];
    assert_eq!(mkds.rom_name, "Mario Kart DS (USA, Australia) (En,Fr,Es).nds");
    assert_eq!(
        mkds.game_description,
        "Mario Kart DS (USA, Australia) (En,Fr,Es)"
    );
    assert_eq!(mkds.crc32.as_deref(), Some("1c5f3e4e"));
    assert_eq!(mkds.md5.as_deref(), Some("0e2c2cdc4b8e6e4a8f4e47c5f5b3e0c2"));
    assert_eq!(
        mkds.sha1.as_deref(),
        Some("4a8c3e0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b")
    );

    let tetris = &parsed.entries[1];
    assert_eq!(tetris.crc32.as_deref(), Some("abcdef01"));
    assert_eq!(tetris.sha1, None);
    assert_eq!(tetris.md5, None);
}

#[test]
fn test_single_line_game() {
    let dat = r#"game ( description "X" rom ( name "Y.nds" sha1 ABCDEF0123456789ABCDEF0123456789ABCDEF01 ) )"#;
    let parsed = parse_dat(dat.as_bytes());
    assert_eq!(
        parsed.entries,
        vec![DatEntry {
            rom_name: "Y.nds".into(),
            game_description: "X".into(),
            sha1: Some("abcdef0123456789abcdef0123456789abcdef01".into()),
            md5: None,
            crc32: None,
        }]
    );
}

#[test]
fn test_game_without_description_is_unknown() {
    let dat = "game (\n\tname \"Nameless\"\n\trom ( name \"a.gb\" crc 12345678 )\n)\n";
    let parsed = parse_dat(dat.as_bytes());
    assert_eq!(parsed.entries.len(), 1);
    assert_eq!(parsed.entries[0].game_description, "Unknown");
}

#[test]
fn test_rom_without_name_is_unknown() {
    let dat = "game ( description \"G\" rom ( size 12 crc 12345678 ) )";
    let parsed = parse_dat(dat.as_bytes());
    assert_eq!(parsed.entries[0].rom_name, "Unknown");
}

#[test]
fn test_multiple_roms_share_description() {
    let dat = r#"game (
	description "Disc Game (USA)"
	rom ( name "Disc Game (USA) (Track 1).bin" size 1 crc 11111111 )
	rom ( name "Disc Game (USA) (Track 2).bin" size 1 crc 22222222 )
	rom ( name "Disc Game (USA).cue" size 1 crc 33333333 )
)"#;
    let parsed = parse_dat(dat.as_bytes());
    assert_eq!(parsed.entries.len(), 3);
    assert!(
        parsed
            .entries
            .iter()
            .all(|e| e.game_description == "Disc Game (USA)")
    );
    assert_eq!(parsed.entries[1].crc32.as_deref(), Some("22222222"));
}

#[test]
fn test_parens_inside_quotes_do_not_close_game() {
    let dat = r#"game (
	description "Odd (Name)) Game"
	rom ( name "odd ( name.gba" crc deadbeef )
)
game (
	description "Next"
	rom ( name "next.gba" crc 0badf00d )
)"#;
    let parsed = parse_dat(dat.as_bytes());
    assert!(parsed.issues.is_empty(), "{:?}", parsed.issues);
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[0].game_description, "Odd (Name)) Game");
    assert_eq!(parsed.entries[0].rom_name, "odd ( name.gba");
    assert_eq!(parsed.entries[1].game_description, "Next");
}

#[test]
fn test_unterminated_game_is_skipped() {
    let dat = "game (\n\tdescription \"Broken\"\n\trom ( name \"b.gba\" crc 11111111 )\n\ngame (\n\tdescription \"Fine\"\n\trom ( name \"f.gba\" crc 22222222 )\n)\n";
    let parsed = parse_dat(dat.as_bytes());
    assert_eq!(parsed.entries.len(), 1);
    assert_eq!(parsed.entries[0].game_description, "Fine");
    assert_eq!(parsed.issues, vec![ParseError::UnterminatedGame { line: 1 }]);
}

#[test]
fn test_truncated_final_game_is_skipped() {
    let dat = "game ( description \"A\" rom ( name \"a.gb\" crc 11111111 ) )\ngame ( description \"B\" rom ( name \"b.gb\" crc 22222222 )";
    let parsed = parse_dat(dat.as_bytes());
    assert_eq!(parsed.entries.len(), 1);
    assert_eq!(parsed.entries[0].rom_name, "a.gb");
    assert!(matches!(parsed.issues[..], [ParseError::UnterminatedGame { line: 2 }]));
}

#[test]
fn test_malformed_hash_is_dropped() {
    let dat = "game ( description \"G\" rom ( name \"g.gba\" crc 1234 sha1 ZZZZ md5 0E2C2CDC4B8E6E4A8F4E47C5F5B3E0C2 ) )";
    let parsed = parse_dat(dat.as_bytes());
    let entry = &parsed.entries[0];
    assert_eq!(entry.crc32, None);
    assert_eq!(entry.sha1, None);
    assert_eq!(entry.md5.as_deref(), Some("0e2c2cdc4b8e6e4a8f4e47c5f5b3e0c2"));
    assert_eq!(parsed.issues.len(), 2);
    assert!(matches!(
        &parsed.issues[0],
        ParseError::MalformedHash { kind: HashKind::Sha1, value, .. } if value == "ZZZZ"
    ));
}

#[test]
fn test_first_field_occurrence_wins() {
    let dat = "game ( description \"G\" rom ( name \"first.gb\" crc 11111111 name \"second.gb\" crc 22222222 ) )";
    let parsed = parse_dat(dat.as_bytes());
    assert_eq!(parsed.entries[0].rom_name, "first.gb");
    assert_eq!(parsed.entries[0].crc32.as_deref(), Some("11111111"));
}

#[test]
fn test_header_block_is_not_a_game() {
    let dat = "clrmamepro ( name \"game\" description \"game (\" )\n";
    let parsed = parse_dat(dat.as_bytes());
    assert!(parsed.entries.is_empty());
    assert!(parsed.issues.is_empty());
}

#[test]
fn test_tokenize_quoted_rom() {
    let tokens = tokenize(r#"rom ( name "Game (Region).ext" size 12345 crc AB )"#);
    let kinds: Vec<TokenKind> = tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Bare("rom".into()),
            TokenKind::Open,
            TokenKind::Bare("name".into()),
            TokenKind::Quoted("Game (Region).ext".into()),
            TokenKind::Bare("size".into()),
            TokenKind::Bare("12345".into()),
            TokenKind::Bare("crc".into()),
            TokenKind::Bare("AB".into()),
            TokenKind::Close,
        ]
    );
}

// -- XML tests --

const SAMPLE_XML_DAT: &str = r#"<?xml version="1.0"?>
<!DOCTYPE datafile SYSTEM "http://www.logiqx.com/Dats/datafile.dtd">
<datafile>
    <header>
        <name>Nintendo - Nintendo DS (Encrypted)</name>
        <description>Nintendo - Nintendo DS (Encrypted)</description>
    </header>
    <game name="Pokemon - Platinum Version (USA)">
        <description>Pokemon - Platinum Version (USA)</description>
        <rom name="Pokemon - Platinum Version (USA).nds" size="134217728" crc="9B2B2C4C" md5="D66AD7A2A0068B5D46E0781CA4953AE9" sha1="CE81046EDA7D232513069519CB2085349896DEC7"/>
    </game>
    <game name="Brain Age (USA)" description="Brain Age - Train Your Brain in Minutes a Day! (USA)">
        <rom name="Brain Age (USA).nds" size="8388608" crc="ad8a8a64"/>
    </game>
    <game name="Name Only &amp; Co">
        <rom name="Name Only.nds" size="1" crc="00000001"/>
    </game>
</datafile>"#;

#[test]
fn test_parse_xml_dat() {
    let parsed = parse_dat(SAMPLE_XML_DAT.as_bytes());
    assert_eq!(parsed.format, Some(DatFormat::Logiqx));
    assert!(parsed.issues.is_empty(), "{:?}", parsed.issues);
    assert_eq!(parsed.entries.len(), 3);

    let plat = &parsed.entries[0];
    assert_eq!(plat.rom_name, "Pokemon - Platinum Version (USA).nds");
    assert_eq!(plat.game_description, "Pokemon - Platinum Version (USA)");
    assert_eq!(plat.crc32.as_deref(), Some("9b2b2c4c"));
    assert_eq!(plat.md5.as_deref(), Some("d66ad7a2a0068b5d46e0781ca4953ae9"));
    assert_eq!(
        plat.sha1.as_deref(),
        Some("ce81046eda7d232513069519cb2085349896dec7")
    );
}

#[test]
fn test_xml_description_fallbacks() {
    let parsed = parse_dat(SAMPLE_XML_DAT.as_bytes());
    assert_eq!(
        parsed.entries[1].game_description,
        "Brain Age - Train Your Brain in Minutes a Day! (USA)"
    );
    assert_eq!(parsed.entries[2].game_description, "Name Only & Co");
}

#[test]
fn test_xml_game_without_any_name_is_unknown() {
    let dat = r#"<datafile><game><rom name="x.gba" crc="12345678"/></game></datafile>"#;
    let parsed = parse_dat(dat.as_bytes());
    assert_eq!(parsed.entries[0].game_description, "Unknown");
}

#[test]
fn test_xml_error_keeps_earlier_games() {
    let dat = r#"<datafile>
<game name="Good"><rom name="good.gba" crc="12345678"/></game>
<game name="Bad"><rom name="bad.gba" crc="87654321"></game>
</datafile>"#;
    let parsed = parse_dat(dat.as_bytes());
    assert_eq!(parsed.entries.len(), 1);
    assert_eq!(parsed.entries[0].rom_name, "good.gba");
    assert!(matches!(parsed.issues[..], [ParseError::Xml { .. }]));
}

#[test]
fn test_parse_empty_xml() {
    let parsed = parse_dat(b"<?xml version=\"1.0\"?><datafile></datafile>");
    assert_eq!(parsed.format, Some(DatFormat::Logiqx));
    assert!(parsed.entries.is_empty());
}

// -- Detection --

#[test]
fn test_auto_detect() {
    assert_eq!(DatFormat::detect("  \n<?xml"), Some(DatFormat::Logiqx));
    assert_eq!(DatFormat::detect("\u{feff}<datafile>"), Some(DatFormat::Logiqx));
    assert_eq!(DatFormat::detect("clrmamepro ("), Some(DatFormat::ClrMamePro));
    assert_eq!(DatFormat::detect(" \t\n"), None);
}

#[test]
fn test_empty_input_reports_issue() {
    let parsed = parse_dat(b"   \n");
    assert!(parsed.entries.is_empty());
    assert_eq!(parsed.issues, vec![ParseError::Empty]);
}

#[test]
fn test_parse_is_repeatable() {
    assert_eq!(
        parse_dat(SAMPLE_CLR_DAT.as_bytes()),
        parse_dat(SAMPLE_CLR_DAT.as_bytes())
    );
    assert_eq!(
        parse_dat(SAMPLE_XML_DAT.as_bytes()),
        parse_dat(SAMPLE_XML_DAT.as_bytes())
    );
}

#[test]
fn test_every_hash_is_canonical() {
    for text in [SAMPLE_CLR_DAT, SAMPLE_XML_DAT] {
        for entry in parse_dat(text.as_bytes()).entries {
            for kind in HashKind::ALL {
                if let Some(hash) = entry.hash(kind) {
                    assert_eq!(hash.len(), kind.hex_len());
                    assert_eq!(hash, hash.to_ascii_lowercase());
                }
            }
        }
    }
}

#[test]
fn test_parse_dat_file_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Game Boy.dat");
    std::fs::write(&path, SAMPLE_CLR_DAT).unwrap();
    assert_eq!(parse_dat_file(&path).unwrap().entries.len(), 2);

    let missing = dir.path().join("missing.dat");
    assert!(matches!(parse_dat_file(&missing), Err(DatError::Io(_))));
}
