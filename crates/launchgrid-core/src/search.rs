//! Name search across groups and buttons.
//!
//! A linear scan is plenty at launcher scale. Queries match case-insensitive
//! substrings, or the initial letters of a multi-word name so "np" finds
//! "Note Pad".

use crate::models::{Button, Group};

/// Which kind of record a hit points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Group,
    Button,
}

/// One search result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub kind: HitKind,
    pub id: i64,
    /// For buttons, the group the hit lives in; for groups, the group itself.
    pub group_id: i64,
    pub name: String,
    /// Secondary display line: the owning group and target for buttons.
    pub detail: String,
}

/// Does `query` match `candidate` by substring or word initials?
pub fn matches(candidate: &str, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return false;
    }
    let lower = candidate.to_lowercase();
    if lower.contains(&query) {
        return true;
    }

    let initials: String = lower
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter_map(|word| word.chars().next())
        .collect();
    initials.contains(&query)
}

/// Scan groups and buttons for a query. Empty queries return nothing.
pub fn search(groups: &[Group], buttons: &[Button], query: &str) -> Vec<SearchHit> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();

    for group in groups {
        if matches(&group.name, query) {
            hits.push(SearchHit {
                kind: HitKind::Group,
                id: group.id,
                group_id: group.id,
                name: group.name.clone(),
                detail: String::new(),
            });
        }
    }

    for button in buttons {
        if matches(&button.name, query) || matches(&button.path, query) {
            let group_name = groups
                .iter()
                .find(|g| g.id == button.group_id)
                .map(|g| g.name.as_str())
                .unwrap_or("?");
            hits.push(SearchHit {
                kind: HitKind::Button,
                id: button.id,
                group_id: button.group_id,
                name: button.name.clone(),
                detail: format!("{} · {}", group_name, button.path),
            });
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: i64, name: &str) -> Group {
        Group {
            id,
            name: name.into(),
            position: id,
            is_favorite: false,
        }
    }

    fn button(id: i64, group_id: i64, name: &str, path: &str) -> Button {
        Button {
            id,
            group_id,
            name: name.into(),
            path: path.into(),
            arguments: String::new(),
            working_dir: String::new(),
            run_as_admin: false,
            icon_path: String::new(),
            position: id,
            is_favorite: false,
        }
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        assert!(matches("Notepad", "note"));
        assert!(matches("notepad", "PAD"));
        assert!(!matches("notepad", "xyz"));
    }

    #[test]
    fn test_initial_letter_match() {
        assert!(matches("Note Pad", "np"));
        assert!(matches("visual_studio_code", "vsc"));
        assert!(matches("my-cool-tool", "mct"));
        assert!(!matches("Note Pad", "pn"));
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        assert!(!matches("anything", ""));
        assert!(!matches("anything", "   "));
        assert!(search(&[group(1, "Tools")], &[], "  ").is_empty());
    }

    #[test]
    fn test_search_hits_both_kinds() {
        let groups = vec![group(1, "Dev Tools"), group(2, "Games")];
        let buttons = vec![
            button(10, 1, "Devenv", "/opt/devenv"),
            button(11, 2, "Chess", "/usr/games/chess"),
        ];

        let hits = search(&groups, &buttons, "dev");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].kind, HitKind::Group);
        assert_eq!(hits[0].name, "Dev Tools");
        assert_eq!(hits[1].kind, HitKind::Button);
        assert_eq!(hits[1].group_id, 1);
        assert!(hits[1].detail.contains("Dev Tools"));
    }

    #[test]
    fn test_search_matches_button_path() {
        let groups = vec![group(1, "Misc")];
        let buttons = vec![button(10, 1, "Editor", "/usr/bin/emacs")];
        let hits = search(&groups, &buttons, "emacs");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 10);
    }
}
