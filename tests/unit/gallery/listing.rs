use super::*;

const LISTING: &str = r#"[
  {"name": "Sunset.JPG", "download_url": "https://raw.example/Sunset.JPG", "type": "file"},
  {"name": "notes.txt", "download_url": "https://raw.example/notes.txt", "type": "file"},
  {"name": "leaf.v2.webp", "download_url": "https://raw.example/leaf.v2.webp", "type": "file"},
  {"name": "old.png", "download_url": null, "type": "dir"},
  {"name": "anim.gif", "download_url": "https://raw.example/anim.gif", "type": "file", "size": 12}
]"#;

#[test]
fn default_repo_points_at_the_portfolio_folder() {
    assert_eq!(
        RepoPath::default().api_url(),
        "https://api.github.com/repos/MaeNoSurname/portfolio-images/contents/images"
    );
}

#[test]
fn image_extensions_match_case_insensitively() {
    for name in ["a.png", "b.JPG", "c.jpeg", "d.Gif", "e.webp"] {
        assert!(is_image_name(name), "{name}");
    }
    for name in ["a.svg", "png", "b.png.txt", "c.jpe", "d."] {
        assert!(!is_image_name(name), "{name}");
    }
}

#[test]
fn title_strips_only_the_last_extension() {
    assert_eq!(title_from_filename("leaf.v2.webp"), "leaf.v2");
    assert_eq!(title_from_filename("Sunset.JPG"), "Sunset");
    assert_eq!(title_from_filename("README"), "README");
    assert_eq!(title_from_filename("trailing."), "trailing.");
}

#[test]
fn listing_becomes_items_in_order() {
    let entries = parse_listing(LISTING).unwrap();
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[3].kind.as_deref(), Some("dir"));

    let items = gallery_items(&entries);
    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Sunset", "leaf.v2", "anim"]);
    assert_eq!(
        items[0],
        GalleryItem {
            src: "https://raw.example/Sunset.JPG".to_owned(),
            alt: "Sunset.JPG".to_owned(),
            title: "Sunset".to_owned(),
            desc: GALLERY_DESC.to_owned(),
        }
    );
}

#[test]
fn api_error_object_is_an_asset_error() {
    let err = parse_listing(r#"{"message": "API rate limit exceeded"}"#).unwrap_err();
    assert!(matches!(err, LeafFallError::Asset(_)));
    assert!(err.to_string().contains("rate limit"));
}

#[test]
fn malformed_listing_is_a_serde_error() {
    assert!(matches!(
        parse_listing("not json").unwrap_err(),
        LeafFallError::Serde(_)
    ));
    assert!(matches!(
        parse_listing(r#"[{"download_url": "x"}]"#).unwrap_err(),
        LeafFallError::Serde(_)
    ));
}
