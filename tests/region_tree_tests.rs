use pretty_assertions::assert_eq;
use proptest::prelude::*;
use region_metrics::aggregator::{
    average_cyclomatic_complexity, parse_report, AnomalyKind, BuildOptions, RegionTree,
};
use region_metrics::export::{export_records, find_order_violations};
use region_metrics::parser::{sanitize, RegionKind};

fn report(top: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<view><data><file-data><regions>{}</regions></file-data></data></view>"#,
        top
    )
}

fn function(name: &str, code: u64, comments: u64, raw_ccn: u64, children: &str) -> String {
    format!(
        r#"<subregion><info type="function" name="{name}" line_begin="1" line_end="5"/><data><std.code.lines code="{code}" comments="{comments}" preprocessor="0"/><std.code.complexity cyclomatic="{raw_ccn}"/></data><subregions>{children}</subregions></subregion>"#
    )
}

fn container(tag: &str, kind: &str, name: &str, code: u64, comments: u64, children: &str) -> String {
    format!(
        r#"<{tag}><info type="{kind}" name="{name}" line_begin="1" line_end="50"/><data><std.code.lines code="{code}" comments="{comments}" preprocessor="0"/></data><subregions>{children}</subregions></{tag}>"#
    )
}

#[test]
fn test_namespace_with_two_functions() {
    let functions = format!("{}{}", function("a", 3, 0, 2, ""), function("b", 4, 1, 4, ""));
    let namespace = container("subregion", "namespace", "N", 1, 0, &functions);
    let raw = report(&container("region", "global", "__global__", 0, 0, &namespace));

    let parsed = parse_report(&raw, &BuildOptions::default()).unwrap();
    let records = export_records(&parsed.tree);

    let ns = records.iter().find(|r| r.name == "N").unwrap();
    assert_eq!(ns.ccn_sum, 8);
    assert_eq!(ns.n_functions, 2);
    assert_eq!(ns.average_cyclomatic_complexity(), Some(4.0));
    assert_eq!(ns.cyclomatic_complexity(), None);

    let complexities: Vec<u64> = records
        .iter()
        .filter_map(|r| r.cyclomatic_complexity())
        .collect();
    assert_eq!(complexities.len(), 2);
    assert!(complexities.contains(&3));
    assert!(complexities.contains(&5));
}

#[test]
fn test_nested_function_is_dropped() {
    let inner = function("inner", 2, 0, 1, "");
    let outer = function("outer", 6, 0, 0, &inner);
    let raw = report(&container("region", "global", "__global__", 0, 0, &outer));

    let parsed = parse_report(&raw, &BuildOptions::default()).unwrap();
    let tree = &parsed.tree;

    assert_eq!(tree.len(), 2);
    let outer = tree.children(tree.root_id()).next().unwrap();
    assert_eq!(outer.name, "outer");
    assert_eq!(outer.n_functions, 1);
    assert!(outer.children.is_empty());
    assert_eq!(outer.total_code_lines, 6);
    assert_eq!(tree.root().n_functions, 1);

    assert_eq!(parsed.anomalies.len(), 1);
    assert_eq!(
        parsed.anomalies[0].kind,
        AnomalyKind::NestedFunction { dropped_children: 1 }
    );
    assert_eq!(parsed.anomalies[0].region, "outer");
}

#[test]
fn test_unescaped_operator_name_is_repaired() {
    let raw = report(&container(
        "region",
        "global",
        "__global__",
        0,
        0,
        &function("operator<<", 2, 0, 0, ""),
    ));

    let parsed = parse_report(&raw, &BuildOptions::default()).unwrap();
    assert!(parsed.sanitized);

    let records = export_records(&parsed.tree);
    assert_eq!(records[1].name, "operator<<");
    assert_eq!(records[1].kind, RegionKind::Function);
}

#[test]
fn test_well_formed_report_is_not_sanitized() {
    let raw = report(&container(
        "region",
        "global",
        "__global__",
        0,
        0,
        &function("operator&lt;", 2, 0, 0, ""),
    ));

    let parsed = parse_report(&raw, &BuildOptions::default()).unwrap();
    assert!(!parsed.sanitized);
    assert_eq!(export_records(&parsed.tree)[1].name, "operator<");
}

#[test]
fn test_file_class_function_totals() {
    let method = function("m", 20, 2, 0, "");
    let class = container("subregion", "class", "C", 10, 1, &method);
    let raw = report(&container("region", "global", "__global__", 5, 0, &class));

    let parsed = parse_report(&raw, &BuildOptions::default()).unwrap();
    let records = export_records(&parsed.tree);

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].name, "__global__");
    assert_eq!(records[0].total_code_lines, 35);
    assert_eq!(records[0].own_code_lines, 5);
    assert_eq!(records[0].total_comment_lines, 3);
    assert_eq!(records[1].name, "C");
    assert_eq!(records[1].total_code_lines, 30);
    assert_eq!(records[1].parent, Some(0));
    assert_eq!(records[2].parent, Some(1));
    assert_eq!(records[2].cyclomatic_complexity(), Some(1));
}

#[test]
fn test_container_without_functions_averages_zero() {
    let raw = report(&container("region", "global", "__global__", 3, 0, ""));
    let parsed = parse_report(&raw, &BuildOptions::default()).unwrap();
    let records = export_records(&parsed.tree);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].average_cyclomatic_complexity(), Some(0.0));
    assert_eq!(average_cyclomatic_complexity(0, 0), 0.0);
}

#[test]
fn test_malformed_report_fails() {
    let raw = "<view><data><file-data><regions><region>";
    assert!(parse_report(raw, &BuildOptions::default()).is_err());
}

/// Random report shape used by the property tests
#[derive(Debug, Clone)]
enum Shape {
    Function {
        code: u64,
        comments: u64,
        raw_ccn: u64,
    },
    Container {
        kind: &'static str,
        code: u64,
        comments: u64,
        children: Vec<Shape>,
    },
}

impl Shape {
    fn render(&self, name: &str) -> String {
        match self {
            Shape::Function {
                code,
                comments,
                raw_ccn,
            } => function(name, *code, *comments, *raw_ccn, ""),
            Shape::Container {
                kind,
                code,
                comments,
                children,
            } => {
                let rendered: String = children
                    .iter()
                    .enumerate()
                    .map(|(i, child)| child.render(&format!("{}_{}", name, i)))
                    .collect();
                container("subregion", kind, name, *code, *comments, &rendered)
            }
        }
    }

    /// (total code, total comments, ccn sum, function count) with a bias of 1
    fn expected(&self) -> (u64, u64, u64, u64) {
        match self {
            Shape::Function {
                code,
                comments,
                raw_ccn,
            } => (*code, *comments, raw_ccn + 1, 1),
            Shape::Container {
                code,
                comments,
                children,
                ..
            } => children.iter().map(Shape::expected).fold(
                (*code, *comments, 0, 0),
                |acc, child| (acc.0 + child.0, acc.1 + child.1, acc.2 + child.2, acc.3 + child.3),
            ),
        }
    }
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = (0u64..50, 0u64..20, 0u64..15).prop_map(|(code, comments, raw_ccn)| {
        Shape::Function {
            code,
            comments,
            raw_ccn,
        }
    });

    leaf.prop_recursive(4, 48, 4, |inner| {
        (
            prop::sample::select(vec!["namespace", "class", "struct", "interface"]),
            0u64..30,
            0u64..10,
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(kind, code, comments, children)| Shape::Container {
                kind,
                code,
                comments,
                children,
            })
    })
}

/// Wraps the random shape so the tree is at least three levels deep
fn render_report(shape: &Shape) -> String {
    let class = container("subregion", "class", "Outer", 1, 0, &shape.render("s"));
    let namespace = container("subregion", "namespace", "ns", 0, 1, &class);
    report(&container("region", "global", "__global__", 2, 0, &namespace))
}

fn check_rollup(tree: &RegionTree) -> Result<(), TestCaseError> {
    for id in tree.post_order() {
        let region = tree.get(*id);
        prop_assert!(!region.is_inside_function);
        if region.kind == RegionKind::Function {
            prop_assert_eq!(region.n_functions, 1);
            prop_assert_eq!(Some(region.ccn_sum), region.cyclomatic_complexity);
            continue;
        }

        let children: Vec<_> = tree.children(*id).collect();
        let code: u64 = children.iter().map(|c| c.total_code_lines).sum();
        let comments: u64 = children.iter().map(|c| c.total_comment_lines).sum();
        let ccn: u64 = children.iter().map(|c| c.ccn_sum).sum();
        let functions: u64 = children.iter().map(|c| c.n_functions).sum();

        prop_assert_eq!(region.total_code_lines, region.own_code_lines + code);
        prop_assert_eq!(region.total_comment_lines, region.own_comment_lines + comments);
        prop_assert_eq!(region.ccn_sum, ccn);
        prop_assert_eq!(region.n_functions, functions);
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_totals_roll_up(shape in shape_strategy()) {
        let parsed = parse_report(&render_report(&shape), &BuildOptions::default()).unwrap();
        check_rollup(&parsed.tree)?;

        let (code, comments, ccn, functions) = shape.expected();
        let root = parsed.tree.root();
        prop_assert_eq!(root.total_code_lines, code + 3);
        prop_assert_eq!(root.total_comment_lines, comments + 1);
        prop_assert_eq!(root.ccn_sum, ccn);
        prop_assert_eq!(root.n_functions, functions);
    }

    #[test]
    fn prop_export_is_ancestors_first(shape in shape_strategy()) {
        let parsed = parse_report(&render_report(&shape), &BuildOptions::default()).unwrap();
        let records = export_records(&parsed.tree);

        prop_assert_eq!(records.len(), parsed.tree.len());
        prop_assert!(find_order_violations(&records).is_empty());
        prop_assert_eq!(records[0].parent, None);
        for (index, record) in records.iter().enumerate().skip(1) {
            let parent = record.parent.unwrap();
            prop_assert!(parent < index);
            prop_assert_ne!(records[parent].kind, RegionKind::Function);
        }
    }

    #[test]
    fn prop_sanitize_is_idempotent(name in "operator( ?)(<<|>>|<=|>=|&&|<|>|&)[a-z]{0,3}") {
        let raw = format!(r#"<info name="{}"/>"#, name);
        let once = sanitize(&raw);
        prop_assert_eq!(sanitize(&once), once.clone());
        prop_assert!(roxmltree::Document::parse(&once).is_ok());
    }
}
