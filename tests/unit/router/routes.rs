use super::*;

#[test]
fn normalization_strips_one_trailing_slash() {
    assert_eq!(normalize_path("/"), "/");
    assert_eq!(normalize_path("/music/"), "/music");
    assert_eq!(normalize_path("/music"), "/music");
    assert_eq!(normalize_path(""), "");
}

#[test]
fn site_table_resolves_sections() {
    let t = RouteTable::site();
    assert!(t.validate().is_ok());
    assert_eq!(t.resolve("/music/").unwrap().section, "music-layer");
    assert_eq!(t.resolve("/contact").unwrap().section, "contact-layer");
    assert!(t.resolve("/").unwrap().is_root());
    assert!(t.resolve("/shop").is_none());
    assert!(t.resolve("music").is_none());
}

#[test]
fn invalid_tables_are_rejected() {
    assert!(RouteTable::new(vec![Route::new("about", "a")]).is_err());
    assert!(RouteTable::new(vec![Route::new("/about/", "a")]).is_err());
    assert!(RouteTable::new(vec![Route::new("/about", " ")]).is_err());
    assert!(
        RouteTable::new(vec![Route::new("/about", "a"), Route::new("/about", "b")]).is_err()
    );
}

#[test]
fn table_is_a_plain_json_array() {
    let t: RouteTable =
        serde_json::from_str(r#"[{"path":"/","section":"top"},{"path":"/x","section":"x"}]"#)
            .unwrap();
    assert_eq!(t.routes().len(), 2);
    assert_eq!(t.resolve("/x/").unwrap().section, "x");
}
