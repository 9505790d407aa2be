mod common;

use storypages::error::PageError;
use storypages::lock::LockRule;
use storypages::object::GameObject;
use storypages::page::{Page, PageRequest, build_view};

fn load(name: &str) -> Page {
    Page::from_reader(common::fixture(name).as_bytes()).unwrap()
}

#[test]
fn vault_unlocks_with_matching_key() {
    let page = load("vault.md");
    let request = PageRequest::from_header("Alex", "key=gold");
    let view = build_view(&page, &request, LockRule::FirstUsed).unwrap();

    assert_eq!(view.title, "Vault");
    assert_eq!(view.icon, "fa-key");
    assert_eq!(view.text, "<p>You see a vault. It creaks open, Alex.</p>\n");
    assert_eq!(view.objects, vec![GameObject::new("coin", "old")]);
}

#[test]
fn vault_stays_locked_without_objects() {
    let page = load("vault.md");
    let view = build_view(&page, &PageRequest::new("Alex", Vec::new()), LockRule::FirstUsed)
        .unwrap();
    assert_eq!(view.text, "<p>You see a vault. It is locked.</p>\n");
}

#[test]
fn vault_with_wrong_key_value() {
    let page = load("vault.md");
    let request = PageRequest::from_header("Alex", "key=brass");
    let view = build_view(&page, &request, LockRule::AnyUsed).unwrap();
    assert!(view.text.contains("It is locked."));
}

#[test]
fn index_page_renders_markdown() {
    let page = load("index.md");
    let meta = page.meta().unwrap();
    assert_eq!(meta.title, "Start");
    assert!(meta.editor);
    assert!(meta.required.is_empty());

    let html = page.content("Sam", false).unwrap();
    assert!(html.contains("<h1>Welcome, Sam</h1>"));
    assert!(html.contains("<a href=\"/vault/\">The vault</a>"));
    assert!(!html.contains("players arrive"));
}

#[test]
fn meta_is_stable_across_calls() {
    let page = load("vault.md");
    assert_eq!(page.meta().unwrap(), page.meta().unwrap());
    assert_eq!(
        page.content("Alex", true).unwrap(),
        page.content("Alex", true).unwrap()
    );
}

#[test]
fn unterminated_front_matter_fails_parse() {
    let err = Page::from_reader(common::fixture("unterminated.md").as_bytes()).unwrap_err();
    assert!(matches!(err, PageError::UnterminatedFrontMatter));
}

#[test]
fn wrong_delimiter_fails_parse() {
    let err = Page::from_reader(common::fixture("no_front_matter.md").as_bytes()).unwrap_err();
    assert!(matches!(err, PageError::MalformedDocument { ref found } if found == b"---"));
}

#[test]
fn invalid_metadata_fails_meta_only() {
    let page = load("bad_meta.md");
    assert!(matches!(page.meta(), Err(PageError::MetadataDecode(_))));
    assert_eq!(page.content("", false).unwrap(), "<p>Body.</p>\n");
}

#[test]
fn template_typo_reports_line_and_suggestion() {
    let page = load("bad_template.md");
    let Err(PageError::Template(err)) = page.content("Alex", false) else {
        panic!("expected template error");
    };
    assert_eq!(err.line, 2);
    assert!(err.message.contains("Nmae"), "{}", err.message);
    assert!(err.message.contains("Name"), "{}", err.message);
}

#[test]
fn reparse_replaces_document() {
    let mut page = load("vault.md");
    page.parse(common::fixture("index.md").as_bytes()).unwrap();
    assert_eq!(page.meta().unwrap().title, "Start");

    assert!(page.parse(common::fixture("unterminated.md").as_bytes()).is_err());
    assert!(!page.is_parsed());
}
