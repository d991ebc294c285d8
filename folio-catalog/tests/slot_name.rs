use folio_catalog::slot_name::{StoredSlotName, record_prefix, stored_slot};

#[test]
fn primary_name_is_zero_padded() {
    let name = StoredSlotName::new(78, None, ".jpg");
    assert_eq!(name.to_string(), "000078.jpg");
    assert!(name.is_primary());
}

#[test]
fn suffixed_name_places_letter_before_extension() {
    let name = StoredSlotName::for_source(1, Some('c'), "001a_alternate_view.PNG");
    assert_eq!(name.to_string(), "000001c.PNG");
}

#[test]
fn name_without_extension() {
    assert_eq!(StoredSlotName::for_source(5, Some('a'), "5 sketch").to_string(), "000005a");
}

#[test]
fn wide_ids_are_not_truncated() {
    assert_eq!(record_prefix(1234567), "1234567");
}

#[test]
fn stored_slot_recognizes_own_names() {
    assert_eq!(stored_slot(78, "000078.jpg"), Some(None));
    assert_eq!(stored_slot(78, "000078b.jpg"), Some(Some('b')));
    assert_eq!(stored_slot(78, "000078z"), Some(Some('z')));
}

#[test]
fn stored_slot_ignores_foreign_names() {
    assert_eq!(stored_slot(78, "000079a.jpg"), None);
    assert_eq!(stored_slot(1, "0000012.jpg"), None);
    assert_eq!(stored_slot(78, "000078ab.jpg"), None);
    assert_eq!(stored_slot(78, "000078B.jpg"), None);
    assert_eq!(stored_slot(78, "notes.txt"), None);
}
