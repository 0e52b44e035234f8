//! Read/Write behavior of the registry pipeline over in-memory rows.

use sepmap_core::{
    ConvertError, MapError, MapperRegistry, PropertyRule, Records, RowSink, RowSource, write_rows,
};

#[derive(Debug, Clone, Default, PartialEq)]
struct Something {
    some_string_a: String,
    some_string_b: String,
    some_int: i32,
}

fn registry_with(b_rule: PropertyRule<Something, String>) -> MapperRegistry {
    let mut registry = MapperRegistry::new();
    registry
        .register_class::<Something>()
        .unwrap()
        .add_property(
            "A",
            |s: &Something| s.some_string_a.clone(),
            |s: &mut Something, v| s.some_string_a = v,
        )
        .unwrap()
        .add_rule("B", b_rule)
        .unwrap()
        .add_property(
            "I",
            |s: &Something| s.some_int,
            |s: &mut Something, v| s.some_int = v,
        )
        .unwrap();
    registry
}

fn b_rule() -> PropertyRule<Something, String> {
    PropertyRule::new(
        |s: &Something| s.some_string_b.clone(),
        |s: &mut Something, v| s.some_string_b = v,
    )
}

// ============================================================================
// Read
// ============================================================================

#[test]
fn read_applies_parse_function() {
    let registry = registry_with(b_rule().parse_with(str::to_uppercase));
    let rows = Records::new(["A", "B", "I"]).with_row(["raw", "transformed", "1"]);

    let result: Vec<Something> = registry.read(&mut rows.reader()).unwrap();

    assert_eq!(
        result,
        vec![Something {
            some_string_a: "raw".to_string(),
            some_string_b: "TRANSFORMED".to_string(),
            some_int: 1,
        }]
    );
}

#[test]
fn read_preserves_row_order() {
    let registry = registry_with(b_rule());
    let mut rows = Records::new(["A", "B", "I"]);
    for i in 0..5 {
        rows.push_row([format!("a{i}"), format!("b{i}"), i.to_string()]);
    }

    let result: Vec<Something> = registry.read(&mut rows.reader()).unwrap();

    let ints: Vec<i32> = result.iter().map(|s| s.some_int).collect();
    assert_eq!(ints, vec![0, 1, 2, 3, 4]);
    assert_eq!(result[3].some_string_a, "a3");
}

#[test]
fn read_ignores_unmapped_columns() {
    let registry = registry_with(b_rule());
    let rows = Records::new(["EXTRA", "I", "A"]).with_row(["ignored", "7", "x"]);

    let result: Vec<Something> = registry.read(&mut rows.reader()).unwrap();

    assert_eq!(result[0].some_int, 7);
    assert_eq!(result[0].some_string_a, "x");
}

#[test]
fn read_leaves_missing_columns_at_default() {
    let registry = registry_with(b_rule());
    let rows = Records::new(["A"]).with_row(["only-a"]);

    let result: Vec<Something> = registry.read(&mut rows.reader()).unwrap();

    assert_eq!(
        result[0],
        Something {
            some_string_a: "only-a".to_string(),
            ..Default::default()
        }
    );
}

#[test]
fn read_fails_fast_on_bad_cell() {
    let registry = registry_with(b_rule());
    let rows = Records::new(["A", "B", "I"])
        .with_row(["a", "b", "1"])
        .with_row(["a", "b", "2"])
        .with_row(["a", "b", "three"])
        .with_row(["a", "b", "4"]);

    let err = registry
        .read::<Something, _>(&mut rows.reader())
        .unwrap_err();

    match err {
        MapError::Conversion {
            column,
            row,
            source,
            ..
        } => {
            assert_eq!(column, "I");
            assert_eq!(row, 2);
            assert!(matches!(source, ConvertError::Parse { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn read_surfaces_custom_parse_errors() {
    let registry = registry_with(b_rule().try_parse_with(|text| {
        if text.is_empty() {
            Err("B must not be empty")
        } else {
            Ok(text.to_string())
        }
    }));
    let rows = Records::new(["A", "B", "I"]).with_row(["a", "", "1"]);

    let err = registry
        .read::<Something, _>(&mut rows.reader())
        .unwrap_err();

    assert!(err.to_string().contains("B must not be empty"));
}

#[test]
fn read_unregistered_type_returns_error() {
    let registry = MapperRegistry::new();
    let rows = Records::new(["A"]).with_row(["a"]);

    let result = registry.read::<Something, _>(&mut rows.reader());

    assert!(matches!(result, Err(MapError::UnregisteredType { .. })));
}

/// Source whose header changes from row to row.
struct VaryingRows {
    rows: Vec<(Vec<String>, Vec<String>)>,
    current: Option<usize>,
}

impl RowSource for VaryingRows {
    type Error = std::io::Error;

    fn next_row(&mut self) -> Result<bool, Self::Error> {
        let next = self.current.map_or(0, |i| i + 1);
        if next == 1 && self.rows.len() == 1 {
            return Err(std::io::Error::other("stream truncated"));
        }
        self.current = Some(next);
        Ok(next < self.rows.len())
    }

    fn header(&self) -> &[String] {
        self.current.map_or(&[][..], |i| self.rows[i].0.as_slice())
    }

    fn cell(&self, column: &str) -> Option<&str> {
        let (header, cells) = &self.rows[self.current?];
        let idx = header.iter().position(|h| h == column)?;
        cells.get(idx).map(String::as_str)
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[test]
fn read_uses_each_rows_own_header() {
    let registry = registry_with(b_rule());
    let mut source = VaryingRows {
        rows: vec![
            (strings(&["A", "I"]), strings(&["first", "1"])),
            (strings(&["I", "B"]), strings(&["2", "second"])),
        ],
        current: None,
    };

    let result: Vec<Something> = registry.read(&mut source).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].some_string_a, "first");
    assert_eq!(result[0].some_string_b, "");
    assert_eq!(result[1].some_int, 2);
    assert_eq!(result[1].some_string_b, "second");
}

#[test]
fn read_surfaces_source_errors() {
    let registry = registry_with(b_rule());
    let mut source = VaryingRows {
        rows: vec![(strings(&["A"]), strings(&["a"]))],
        current: None,
    };

    let err = registry.read::<Something, _>(&mut source).unwrap_err();

    assert!(matches!(err, MapError::Source { row: 1, .. }));
}

// ============================================================================
// Write
// ============================================================================

#[test]
fn write_applies_format_function() {
    let registry = registry_with(b_rule().format_with(|v| v.to_lowercase()));
    let items = vec![Something {
        some_string_a: "raw".to_string(),
        some_string_b: "TRANSFORMED".to_string(),
        some_int: 1,
    }];

    let records = registry.write(&items, Records::writer()).unwrap();

    assert_eq!(
        records,
        Records::new(["A", "B", "I"]).with_row(["raw", "transformed", "1"])
    );
}

#[test]
fn write_uses_registration_order() {
    let mut registry = MapperRegistry::new();
    registry
        .register_class::<Something>()
        .unwrap()
        .add_property(
            "I",
            |s: &Something| s.some_int,
            |s: &mut Something, v| s.some_int = v,
        )
        .unwrap()
        .add_property(
            "A",
            |s: &Something| s.some_string_a.clone(),
            |s: &mut Something, v| s.some_string_a = v,
        )
        .unwrap();

    let items = vec![Something {
        some_string_a: "a".to_string(),
        some_string_b: "not written".to_string(),
        some_int: 9,
    }];
    let records = registry.write(&items, Records::writer()).unwrap();

    assert_eq!(records.header, vec!["I", "A"]);
    assert_eq!(records.rows, vec![vec!["9", "a"]]);
}

#[test]
fn write_emits_header_for_empty_input() {
    let registry = registry_with(b_rule());

    let records = registry
        .write::<Something, _>(&[], Records::writer())
        .unwrap();

    assert_eq!(records.header, vec!["A", "B", "I"]);
    assert!(records.rows.is_empty());
}

#[test]
fn write_failure_does_not_emit_partial_row() {
    let mut registry = MapperRegistry::new();
    registry
        .register_class::<Something>()
        .unwrap()
        .add_property(
            "A",
            |s: &Something| s.some_string_a.clone(),
            |s: &mut Something, v| s.some_string_a = v,
        )
        .unwrap()
        .add_rule(
            "I",
            PropertyRule::new(
                |s: &Something| s.some_int,
                |s: &mut Something, v| s.some_int = v,
            )
            .try_format_with(|v| {
                if *v < 0 {
                    Err("negative")
                } else {
                    Ok(v.to_string())
                }
            }),
        )
        .unwrap();

    let items = vec![
        Something {
            some_int: 1,
            ..Default::default()
        },
        Something {
            some_string_a: "bad".to_string(),
            some_int: -1,
            ..Default::default()
        },
    ];

    let rules = registry.rule_set::<Something>().unwrap();
    let mut sink = Records::writer();
    let err = write_rows(rules, &items, &mut sink).unwrap_err();
    assert!(matches!(err, MapError::Conversion { row: 1, .. }));

    let written = sink.finish().unwrap();
    assert_eq!(written.rows, vec![vec!["", "1"]]);
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn write_then_read_reproduces_instances() {
    let registry = registry_with(
        b_rule()
            .parse_with(|text| text.replace("\\n", "\n"))
            .format_with(|v| v.replace('\n', "\\n")),
    );
    let items = vec![
        Something {
            some_string_a: "first".to_string(),
            some_string_b: "multi\nline".to_string(),
            some_int: -3,
        },
        Something::default(),
    ];

    let records = registry.write(&items, Records::writer()).unwrap();
    let back: Vec<Something> = registry.read(&mut records.reader()).unwrap();

    assert_eq!(back, items);
}

#[test]
fn concurrent_reads_share_registry() {
    #[derive(Debug, Default, PartialEq)]
    struct Other {
        code: String,
    }

    let mut registry = registry_with(b_rule());
    registry
        .register_class::<Other>()
        .unwrap()
        .add_property("CODE", |o: &Other| o.code.clone(), |o: &mut Other, v| o.code = v)
        .unwrap();
    let registry = &registry;

    std::thread::scope(|scope| {
        let somethings = scope.spawn(move || {
            let rows = Records::new(["I"]).with_row(["5"]);
            registry.read::<Something, _>(&mut rows.reader()).unwrap()
        });
        let others = scope.spawn(move || {
            let rows = Records::new(["CODE"]).with_row(["X1"]);
            registry.read::<Other, _>(&mut rows.reader()).unwrap()
        });

        assert_eq!(somethings.join().unwrap()[0].some_int, 5);
        assert_eq!(others.join().unwrap()[0].code, "X1");
    });
}
