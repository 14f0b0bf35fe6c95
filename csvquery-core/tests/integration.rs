use csvquery_core::{
    load_file, parse, ColumnSpec, CsvQueryError, LoadedTable, LoaderConfig, RowBuildError,
    Searcher, TableHolder,
};
use std::io::Write;

fn create_test_csv(rows: usize) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();

    // Header
    writeln!(f, "id,name,status,note").unwrap();

    for i in 0..rows {
        let status = match i % 3 {
            0 => "active",
            1 => "inactive",
            _ => "pending",
        };
        writeln!(f, "{},user_{},{},\"seen {}, twice\"", i, i, status, i).unwrap();
    }

    f.flush().unwrap();
    f
}

#[test]
fn full_workflow_load_view_search_unload() {
    let f = create_test_csv(3_000);
    let holder = TableHolder::new();

    // 1. Load into the holder
    let loaded = load_file(f.path(), &LoaderConfig::default()).unwrap();
    assert_eq!(loaded.table().len(), 3_001);
    assert_eq!(loaded.table().width(), Some(4));
    holder.load(loaded);

    // 2. View
    let snapshot = holder.require().unwrap();
    let rows = snapshot.table().rows();
    assert_eq!(rows[0], vec!["id", "name", "status", "note"]);
    assert_eq!(rows[1], vec!["0", "user_0", "active", "\"seen 0, twice\""]);

    // 3. Search by name, exact match only ("inactive" must not match "active")
    let searcher = Searcher::new(snapshot.table(), true).unwrap();
    assert_eq!(searcher.header(), &["id", "name", "status", "note"]);
    let active = searcher
        .search("active", &ColumnSpec::ByName("status".into()))
        .unwrap();
    assert_eq!(active.len(), 1_000);
    assert!(active.windows(2).all(|w| w[0].row_num < w[1].row_num));
    assert!(active.iter().all(|r| r.row[2] == "active"));

    // 4. Search by index and across all columns
    let by_index = searcher.search("user_42", &ColumnSpec::ByIndex(1)).unwrap();
    assert_eq!(by_index.len(), 1);
    assert_eq!(by_index[0].row_num, 42);

    let anywhere = searcher.search("1500", &ColumnSpec::Unspecified).unwrap();
    assert_eq!(anywhere.len(), 1);
    assert_eq!(anywhere[0].row[1], "user_1500");

    // 5. Unknown column reports the header
    match searcher.search("x", &ColumnSpec::ByName("state".into())) {
        Err(CsvQueryError::ColumnNotFound { available, .. }) => {
            assert_eq!(available, vec!["id", "name", "status", "note"]);
        }
        other => panic!("expected ColumnNotFound, got {other:?}"),
    }

    // 6. Unload; the snapshot taken earlier is still usable
    holder.clear();
    assert!(matches!(holder.require(), Err(CsvQueryError::NoTableLoaded)));
    assert_eq!(snapshot.table().len(), 3_001);
}

#[test]
fn reload_replaces_table() {
    let first = create_test_csv(10);
    let mut second = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(second, "city").unwrap();
    writeln!(second, "Providence").unwrap();
    second.flush().unwrap();

    let holder = TableHolder::new();
    holder.load(load_file(first.path(), &LoaderConfig::default()).unwrap());
    holder.load(load_file(second.path(), &LoaderConfig::default()).unwrap());

    let current = holder.require().unwrap();
    assert_eq!(current.source(), second.path());
    let searcher = Searcher::new(current.table(), true).unwrap();
    assert_eq!(
        searcher
            .search("Providence", &ColumnSpec::ByName("city".into()))
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn failed_load_leaves_previous_table() {
    let good = create_test_csv(5);
    let mut ragged = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(ragged, "a,b").unwrap();
    writeln!(ragged, "1,2,3").unwrap();
    ragged.flush().unwrap();

    let holder = TableHolder::new();
    holder.load(load_file(good.path(), &LoaderConfig::default()).unwrap());

    let result = load_file(ragged.path(), &LoaderConfig::default());
    assert!(matches!(result, Err(CsvQueryError::RaggedRow { line: 2, expected: 2, found: 3 })));
    assert_eq!(holder.require().unwrap().source(), good.path());
}

#[test]
fn typed_rows_via_builder() {
    #[derive(Debug, PartialEq)]
    struct Star {
        name: String,
        distance: f64,
    }

    let build = |fields: Vec<String>| -> Result<Star, RowBuildError> {
        match fields[1].trim().parse::<f64>() {
            Ok(distance) => Ok(Star {
                name: fields[0].clone(),
                distance,
            }),
            Err(_) => Err(RowBuildError::new("distance is not a number", fields)),
        }
    };

    let stars = parse("Sol,0\nProxima Centauri, 4.24\n", &build).unwrap();
    assert_eq!(stars.len(), 2);
    assert_eq!(stars.rows()[1].distance, 4.24);

    let err = parse("Sol,0\nVega,far\n", &build).unwrap_err();
    assert!(err.to_string().contains("distance is not a number"));
}

#[test]
fn holder_accepts_tables_built_in_memory() {
    let holder = TableHolder::new();
    let table = csvquery_core::parse_rows("A,A,B\na,b,c\nd,e,f\ne,f,g").unwrap();
    holder.load(LoadedTable::new("memory", table));

    let snapshot = holder.require().unwrap();
    let results = csvquery_core::search(
        snapshot.table(),
        true,
        "e",
        &ColumnSpec::ByName("A".into()),
    )
    .unwrap();
    let rows: Vec<_> = results.iter().map(|r| r.row.join(",")).collect();
    assert_eq!(rows, vec!["d,e,f", "e,f,g"]);
}
