//! Integration tests for tab lifecycle scenarios driven through an AppSession.

use diffvibe_core::{
    AppSession, CompareMode, DirectoryStatePatch, ScanResult, StatusFilter,
    SystemAppearance, TabKind, HOME_TAB_ID,
};

fn session() -> AppSession {
    let mut session = AppSession::in_memory();
    session.init(SystemAppearance::Dark);
    session
}

fn tab_ids(session: &AppSession) -> Vec<String> {
    session.tabs.tabs().iter().map(|t| t.id.clone()).collect()
}

#[test]
fn test_open_same_file_pair_twice_then_close() {
    let mut session = session();

    let first = session
        .tabs
        .open_compare("a.txt", "b.txt", CompareMode::File, None, None);
    assert_eq!(tab_ids(&session), vec![HOME_TAB_ID.to_string(), first.clone()]);
    assert_eq!(session.tabs.active_tab_id(), first);

    let second = session
        .tabs
        .open_compare("a.txt", "b.txt", CompareMode::File, None, None);
    assert_eq!(second, first);
    assert_eq!(session.tabs.tabs().len(), 2);
    assert_eq!(session.tabs.active_tab_id(), first);

    assert!(session.close_tab(&first, false));
    assert_eq!(tab_ids(&session), vec![HOME_TAB_ID]);
    assert_eq!(session.tabs.active_tab_id(), HOME_TAB_ID);
}

#[test]
fn test_closing_active_middle_tab_moves_to_following_tab() {
    let mut session = session();
    assert!(!session.close_tab(HOME_TAB_ID, false));

    let a = session.tabs.open_compare("a1", "a2", CompareMode::File, None, None);
    let b = session.tabs.open_compare("b1", "b2", CompareMode::File, None, None);
    let c = session.tabs.open_compare("c1", "c2", CompareMode::File, None, None);
    assert!(session.close_tab(HOME_TAB_ID, false));
    assert_eq!(tab_ids(&session), vec![a.clone(), b.clone(), c.clone()]);

    session.tabs.set_active(&b);
    assert!(session.close_tab(&b, false));
    assert_eq!(session.tabs.active_tab_id(), c);

    assert!(session.close_tab(&c, false));
    assert_eq!(session.tabs.active_tab_id(), a);
}

#[test]
fn test_dirty_merge_survives_unforced_close() {
    let mut session = session();
    let merge = session
        .tabs
        .open_merge("/repo/base.rs", "/repo/ours.rs", "/repo/theirs.rs", Some("/repo/out.rs"));
    session.tabs.set_dirty(&merge, true);
    let before = tab_ids(&session);

    assert!(!session.close_tab(&merge, false));
    assert_eq!(tab_ids(&session), before);

    assert!(session.close_tab(&merge, true));
    assert_eq!(tab_ids(&session), vec![HOME_TAB_ID]);
}

#[test]
fn test_close_all_always_leaves_fresh_home() {
    let mut session = session();
    for i in 0..4 {
        let id = session
            .tabs
            .open_compare(&format!("l{}", i), "r", CompareMode::Directory, None, None);
        session.tabs.set_dirty(&id, true);
    }
    session.close_tab(HOME_TAB_ID, false);

    session.tabs.close_all();

    let tabs = session.tabs.tabs();
    assert_eq!(tabs.len(), 1);
    assert_eq!(tabs[0].id, HOME_TAB_ID);
    assert_eq!(tabs[0].kind, TabKind::Home);
    assert_eq!(session.tabs.active_tab_id(), HOME_TAB_ID);
}

#[test]
fn test_directory_drill_down_and_back() {
    let mut session = session();
    let dir = session
        .tabs
        .open_compare("/proj/v1", "/proj/v2", CompareMode::Directory, None, None);
    session
        .tabs
        .set_scan_result(&dir, Some(ScanResult::new(vec!["src/lib.rs".to_string()])));
    session.tabs.set_directory_state(
        &dir,
        DirectoryStatePatch {
            filter: Some(StatusFilter::Modified),
            left_selection: Some(Some("src/lib.rs".to_string())),
            ..Default::default()
        },
    );
    session.tabs.toggle_directory_row(&dir, "src");

    let file = session.tabs.open_compare(
        "/proj/v1/src/lib.rs",
        "/proj/v2/src/lib.rs",
        CompareMode::File,
        None,
        Some(&dir),
    );
    assert_eq!(session.tabs.active_tab_id(), file);
    assert_eq!(session.tabs.recent().len(), 1);

    assert!(session.tabs.activate_parent(&file));
    assert_eq!(session.tabs.active_tab_id(), dir);

    let cached = session.tabs.scan_result(&dir).unwrap();
    assert_eq!(
        cached.downcast_ref::<Vec<String>>().map(Vec::len),
        Some(1)
    );
    let state = session.tabs.directory_state(&dir);
    assert_eq!(state.filter, StatusFilter::Modified);
    assert_eq!(state.left_selection.as_deref(), Some("src/lib.rs"));
    assert!(state.expanded.contains("src"));
}

#[test]
fn test_reopening_from_recents_reuses_tab() {
    let mut session = session();
    let id = session
        .tabs
        .open_compare("/x/old.md", "/x/new.md", CompareMode::File, None, None);
    session.tabs.set_active(HOME_TAB_ID);

    let recent = session.tabs.recent().items()[0].clone();
    let reopened = session.tabs.open_compare(
        &recent.left,
        &recent.right,
        recent.mode,
        recent.base.as_deref(),
        None,
    );

    assert_eq!(reopened, id);
    assert_eq!(session.tabs.recent().len(), 1);
}
