//! End-to-end scenarios against a real on-disk engine.

use launchgrid_core::config::AppConfig;
use launchgrid_core::{BackupOutcome, ButtonSpec, Launchgrid, Settings};
use tempfile::TempDir;

fn spec(name: &str, path: &str) -> ButtonSpec {
    ButtonSpec {
        name: name.into(),
        path: path.into(),
        ..Default::default()
    }
}

#[test]
fn fresh_database_scenario() {
    let temp = TempDir::new().unwrap();
    let engine = Launchgrid::new(temp.path()).unwrap();

    // A brand-new data root comes up with exactly the default group and no
    // buttons, and renders without errors (empty reads, default settings).
    let groups = engine.store().get_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, AppConfig::DEFAULT_GROUP_NAME);
    assert!(engine.store().get_buttons(groups[0].id).is_empty());
    assert_eq!(engine.load_settings(), Settings::default());
}

#[test]
fn corrupt_database_first_launch_scenario() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("launcher.db"), b"garbage bytes").unwrap();

    // Startup still succeeds: the broken file is set aside, a fresh schema is
    // created, and the default group appears as on any first launch.
    let engine = Launchgrid::new(temp.path()).unwrap();
    let groups = engine.store().get_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, AppConfig::DEFAULT_GROUP_NAME);
    assert!(engine.store().get_all_buttons().is_empty());
}

#[test]
fn two_button_reorder_scenario() {
    let temp = TempDir::new().unwrap();
    let engine = Launchgrid::new(temp.path()).unwrap();
    let store = engine.store();
    let gid = store.get_groups()[0].id;

    let editor = store.add_button(gid, &spec("Editor", "/usr/bin/editor")).unwrap();
    let term = store.add_button(gid, &spec("Terminal", "/usr/bin/term")).unwrap();

    let before = store.get_buttons(gid);
    assert_eq!(before[0].id, editor);

    store.reorder_buttons(&[term, editor]).unwrap();

    let after = store.get_buttons(gid);
    assert_eq!(after[0].id, term);
    assert_eq!(after[1].id, editor);
    assert_eq!(after[0].position, 1);
    assert_eq!(after[1].position, 2);
}

#[test]
fn group_lifecycle_scenario() {
    let temp = TempDir::new().unwrap();
    let engine = Launchgrid::new(temp.path()).unwrap();
    let store = engine.store();

    let tools = store.add_group("Tools", false).unwrap();
    let games = store.add_group("Games", false).unwrap();

    let a = store.add_button(tools, &spec("a", "/bin/a")).unwrap();
    let b = store.add_button(tools, &spec("b", "/bin/b")).unwrap();
    store.add_button(games, &spec("c", "/bin/c")).unwrap();

    // Move both tool buttons into games, then delete the emptied group.
    store.move_buttons_to_group(&[a, b], games).unwrap();
    assert!(store.get_buttons(tools).is_empty());
    let games_buttons = store.get_buttons(games);
    assert_eq!(games_buttons.len(), 3);
    assert_eq!(games_buttons[1].id, a);
    assert_eq!(games_buttons[2].id, b);

    store.delete_group(tools).unwrap();
    assert_eq!(store.get_all_buttons().len(), 3);

    // Favoriting games floats it above the default group.
    store.set_group_favorite(games, true).unwrap();
    assert_eq!(store.get_groups()[0].id, games);
}

#[test]
fn backup_and_reopen_scenario() {
    let temp = TempDir::new().unwrap();
    let backup_path;
    {
        let engine = Launchgrid::new(temp.path()).unwrap();
        let gid = engine.store().get_groups()[0].id;
        engine
            .store()
            .add_button(gid, &spec("keeper", "/bin/keeper"))
            .unwrap();

        backup_path = match engine.backup_now().unwrap() {
            BackupOutcome::Created(path) => path,
            other => panic!("expected a backup, got {:?}", other),
        };
        assert!(backup_path.exists());
    }

    // Data survives a full close/reopen cycle.
    let engine = Launchgrid::new(temp.path()).unwrap();
    let buttons = engine.store().get_all_buttons();
    assert_eq!(buttons.len(), 1);
    assert_eq!(buttons[0].name, "keeper");

    // The backup file is itself a usable database.
    let restored = launchgrid_core::ShortcutStore::open(&backup_path).unwrap();
    assert_eq!(restored.get_all_buttons().len(), 1);
}

#[test]
fn settings_survive_restart() {
    let temp = TempDir::new().unwrap();
    {
        let engine = Launchgrid::new(temp.path()).unwrap();
        engine
            .save_settings(&Settings {
                window_width: 1280.0,
                window_height: 720.0,
                backup_on_exit: false,
            })
            .unwrap();
    }

    let engine = Launchgrid::new(temp.path()).unwrap();
    let settings = engine.load_settings();
    assert_eq!(settings.window_width, 1280.0);
    assert!(!settings.backup_on_exit);
}
