use super::*;

const SAMPLE: &str = "\
Loading repository data...
Reading installed packages...

S  | Name                 | Summary                                   | Type
---+----------------------+-------------------------------------------+--------
i+ | emacs                | GNU Emacs Base Package                    | package
   | emacs-auctex         | AUC TeX: An Emacs Extension               | package
i  | emacs-info           | Info files for GNU Emacs                  | package
   | emacs-nox            | GNU Emacs-nox: An Emacs Binary without X  | package
   | emacs                | GNU Emacs Base Package                    | srcpackage
";

#[test]
fn test_parse_sample() {
    let packages = parse_search(SAMPLE);
    assert_eq!(packages.len(), 5);
    assert_eq!(packages[0].name, "emacs");
    assert_eq!(packages[0].description.as_deref(), Some("GNU Emacs Base Package"));
    assert_eq!(packages[3].name, "emacs-nox");
    assert_eq!(
        packages[3].description.as_deref(),
        Some("GNU Emacs-nox: An Emacs Binary without X")
    );
}

#[test]
fn test_installed_status() {
    let packages = parse_search(SAMPLE);
    let flags: Vec<bool> = packages.iter().map(|p| p.installed).collect();
    assert_eq!(flags, vec![true, false, true, false, false]);
}

#[test]
fn test_header_and_separator_are_skipped() {
    let packages = parse_search(SAMPLE);
    assert!(packages.iter().all(|p| p.name != "Name"));
    assert!(packages.iter().all(|p| !p.name.starts_with('-')));
}

#[test]
fn test_localized_type_column() {
    let packages = parse_search("i+ | emacs | GNU Emacs Base Package | Paket\n");
    assert_eq!(
        packages,
        vec![Package {
            name: "emacs".to_string(),
            version: None,
            description: Some("GNU Emacs Base Package".to_string()),
            installed: true,
        }]
    );
}

#[test]
fn test_empty_summary() {
    let packages = parse_search("   | libfoo1 |  | package\n");
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].description, None);
}

#[test]
fn test_no_matches() {
    assert!(parse_search("").is_empty());
    assert!(parse_search("Loading repository data...\nNo matching items found.\n").is_empty());
}
