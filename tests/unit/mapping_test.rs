//! Unit tests for the mapping reader

use retrace::mapping::MethodMapping;
use retrace::{MappingProcessor, MappingReader};

use crate::helpers::sample_mapping;

/// Collects members as "Class.member -> new".
#[derive(Default)]
struct Collector {
    skip_class: Option<String>,
    entries: Vec<String>,
}

impl MappingProcessor for Collector {
    fn process_class_mapping(&mut self, class_name: &str, _new_class_name: &str) -> bool {
        self.skip_class.as_deref() != Some(class_name)
    }

    fn process_field_mapping(
        &mut self,
        class_name: &str,
        _field_type: &str,
        field_name: &str,
        _new_class_name: &str,
        new_field_name: &str,
    ) {
        self.entries
            .push(format!("{}.{} -> {}", class_name, field_name, new_field_name));
    }

    fn process_method_mapping(&mut self, mapping: &MethodMapping<'_>) {
        self.entries.push(format!(
            "{}.{}() -> {}",
            mapping.class_name, mapping.method_name, mapping.new_method_name
        ));
    }
}

#[test]
fn summary_counts_sample_mapping() {
    let mut collector = Collector::default();
    let summary = MappingReader::new(&sample_mapping()).pump(&mut collector);
    assert_eq!(summary.classes, 2);
    assert_eq!(summary.fields, 1);
    assert_eq!(summary.methods, 4);
    assert_eq!(summary.skipped, 0);
}

#[test]
fn entries_are_reported_in_file_order() {
    let mut collector = Collector::default();
    MappingReader::new(&sample_mapping()).pump(&mut collector);
    assert_eq!(
        collector.entries,
        vec![
            "com.example.Main.main() -> main",
            "com.example.Main.helper() -> b",
            "com.example.Widget.count -> a",
            "com.example.Widget.draw() -> c",
            "com.example.Widget.draw() -> c",
        ]
    );
}

#[test]
fn declined_class_members_are_not_reported() {
    let mut collector = Collector {
        skip_class: Some("com.example.Main".to_string()),
        ..Collector::default()
    };
    let summary = MappingReader::new(&sample_mapping()).pump(&mut collector);
    assert_eq!(collector.entries.len(), 3);
    assert_eq!(summary.classes, 2);
    assert_eq!(summary.methods, 2);
}

#[test]
fn empty_mapping_reports_nothing() {
    let mut collector = Collector::default();
    let summary = MappingReader::new("").pump(&mut collector);
    assert_eq!(summary, Default::default());
    assert!(collector.entries.is_empty());
}
