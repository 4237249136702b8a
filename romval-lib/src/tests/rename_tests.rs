use super::*;

fn write(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn proposes_rename_in_same_directory() {
    let dir = tempfile::tempdir().unwrap();
    let rom = dir.path().join("dump.gba");
    write(&rom, b"x");

    assert_eq!(
        propose_file_rename(&rom, "Game (USA).gba"),
        RenameProposal::Rename {
            source: rom.clone(),
            target: dir.path().join("Game (USA).gba"),
        }
    );
}

#[test]
fn same_name_is_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let rom = dir.path().join("Game (USA).gba");
    write(&rom, b"x");
    assert_eq!(propose_file_rename(&rom, "Game (USA).gba"), RenameProposal::Unchanged);
}

#[test]
fn existing_target_is_a_conflict_and_nothing_moves() {
    let dir = tempfile::tempdir().unwrap();
    let rom = dir.path().join("dump.gba");
    let taken = dir.path().join("Game (USA).gba");
    write(&rom, b"mine");
    write(&taken, b"theirs");

    let proposal = propose_file_rename(&rom, "Game (USA).gba");
    assert!(matches!(proposal, RenameProposal::Conflict { .. }));
    assert!(!apply(&proposal).unwrap());
    assert_eq!(fs::read(&rom).unwrap(), b"mine");
    assert_eq!(fs::read(&taken).unwrap(), b"theirs");
}

#[test]
fn apply_moves_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let rom = dir.path().join("dump.gba");
    write(&rom, b"x");

    let proposal = propose_file_rename(&rom, "Game (USA).gba");
    assert!(apply(&proposal).unwrap());
    assert!(!rom.exists());
    assert!(dir.path().join("Game (USA).gba").exists());
}

#[test]
fn apply_rechecks_target() {
    let dir = tempfile::tempdir().unwrap();
    let rom = dir.path().join("dump.gba");
    write(&rom, b"x");
    let proposal = propose_file_rename(&rom, "Game.gba");

    write(&dir.path().join("Game.gba"), b"late");
    assert!(!apply(&proposal).unwrap());
    assert!(rom.exists());
}

#[test]
fn dat_name_cannot_escape_directory() {
    let dir = tempfile::tempdir().unwrap();
    let rom = dir.path().join("sub/dump.gba");
    write(&rom, b"x");

    let proposal = propose_file_rename(&rom, "../../outside.gba");
    assert_eq!(
        proposal,
        RenameProposal::Rename {
            source: rom.clone(),
            target: dir.path().join("sub/outside.gba"),
        }
    );
}

#[test]
fn folder_rename_keeps_parent() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("ps1 rip");
    fs::create_dir_all(&folder).unwrap();

    let proposal = propose_folder_rename(&folder, "Game (USA)");
    assert_eq!(
        proposal,
        RenameProposal::Rename {
            source: folder.clone(),
            target: dir.path().join("Game (USA)"),
        }
    );
    assert!(apply(&proposal).unwrap());
    assert!(dir.path().join("Game (USA)").is_dir());
}

#[test]
fn saves_follow_their_rom() {
    let dir = tempfile::tempdir().unwrap();
    let rom = dir.path().join("dump.gba");
    write(&rom, b"x");
    write(&dir.path().join("dump.sav"), b"s1");
    write(&dir.path().join("saves/dump.sav"), b"s2");
    write(&dir.path().join("other.sav"), b"s3");

    let renamed = rename_saves(&rom, "Game (USA).gba", false);
    assert_eq!(renamed.len(), 2);
    assert_eq!(fs::read(dir.path().join("Game (USA).sav")).unwrap(), b"s1");
    assert_eq!(fs::read(dir.path().join("saves/Game (USA).sav")).unwrap(), b"s2");
    assert!(dir.path().join("other.sav").exists());
}

#[test]
fn dry_run_saves_are_only_reported() {
    let dir = tempfile::tempdir().unwrap();
    let rom = dir.path().join("dump.gba");
    write(&rom, b"x");
    write(&dir.path().join("dump.sav"), b"s1");

    let renamed = rename_saves(&rom, "Game (USA).gba", true);
    assert_eq!(
        renamed,
        vec![(dir.path().join("dump.sav"), dir.path().join("Game (USA).sav"))]
    );
    assert!(dir.path().join("dump.sav").exists());
}

#[test]
fn save_with_taken_target_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let rom = dir.path().join("dump.gba");
    write(&rom, b"x");
    write(&dir.path().join("dump.sav"), b"old");
    write(&dir.path().join("Game.sav"), b"existing");

    assert!(rename_saves(&rom, "Game.gba", false).is_empty());
    assert_eq!(fs::read(dir.path().join("Game.sav")).unwrap(), b"existing");
}
