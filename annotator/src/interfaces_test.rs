use super::*;

fn entry(name: &str) -> InterfaceEntry {
    InterfaceEntry { name: name.to_owned(), ..Default::default() }
}

fn sample() -> InterfacesFile {
    let mut file = InterfacesFile::default();
    file.interfaces.insert(2, entry("USB 3.0"));
    file.interfaces.insert(10, entry("HDMI"));
    file.interfaces.insert(101, entry("M.2 slot"));
    file.interfaces.insert(150, entry("microSD"));
    file
}

#[test]
fn keys_serialize_as_strings_in_numeric_order() {
    let json = sample().to_json().unwrap();
    let two = json.find("\"2\"").unwrap();
    let ten = json.find("\"10\"").unwrap();
    let back = json.find("\"101\"").unwrap();
    assert!(two < ten && ten < back, "{json}");
}

#[test]
fn parses_viewer_data_file() {
    let text = r#"{
        "interfaces": {
            "1": {
                "name": "Power",
                "description": "USB-C PD",
                "details": "5V-20V input",
                "voltage": "12V",
                "type": "USB-C",
                "power": "65W"
            },
            "101": { "name": "Back" }
        }
    }"#;
    let file = InterfacesFile::from_json(text).unwrap();
    let power = &file.interfaces[&1];
    assert_eq!(power.kind.as_deref(), Some("USB-C"));
    assert_eq!(power.power.as_deref(), Some("65W"));
    assert_eq!(file.interfaces[&101].description, "");
}

#[test]
fn rejects_non_numeric_keys() {
    assert!(InterfacesFile::from_json(r#"{"interfaces": {"abc": {"name": "x"}}}"#).is_err());
}

#[test]
fn optional_fields_are_omitted_when_absent() {
    let json = serde_json::to_value(entry("GPIO")).unwrap();
    assert_eq!(json, serde_json::json!({ "name": "GPIO", "description": "", "details": "" }));
}

#[test]
fn lookup_by_data_id() {
    let file = sample();
    assert_eq!(file.lookup("10").map(|e| e.name.as_str()), Some("HDMI"));
    assert_eq!(file.lookup(" 2 ").map(|e| e.name.as_str()), Some("USB 3.0"));
    assert!(file.lookup("3").is_none());
    assert!(file.lookup("ten").is_none());
}

#[test]
fn in_range_partitions_front_and_back() {
    let file = sample();
    let front: Vec<u32> = file.in_range(FRONT_RANGE).map(|(n, _)| n).collect();
    let back: Vec<u32> = file.in_range(BACK_RANGE).map(|(n, _)| n).collect();
    assert_eq!(front, vec![2, 10]);
    assert_eq!(back, vec![101, 150]);
}

#[test]
fn spec_items_in_display_order() {
    let e = InterfaceEntry {
        name: "Fan".to_owned(),
        voltage: Some("5V".to_owned()),
        count: Some("1".to_owned()),
        kind: Some("PWM".to_owned()),
        ..Default::default()
    };
    let items = e.spec_items();
    assert_eq!(items, vec![(SpecField::Voltage, "5V"), (SpecField::Type, "PWM"), (SpecField::Count, "1")]);
    assert_eq!(items[1].0.label(), "Type");
}
