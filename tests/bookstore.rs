//! End-to-end lookup scenarios over the bookstore document.

use jpath::{lookup, CompiledPath, JsonPathError, MatchSet};
use serde_json::{json, Value};

fn bookstore() -> Value {
    json!({
        "store": {
            "book": [
                {
                    "category": "reference",
                    "author": "Nigel Rees",
                    "title": "Sayings of the Century",
                    "price": 8.95
                },
                {
                    "category": "fiction",
                    "author": "Evelyn Waugh",
                    "title": "Sword of Honour",
                    "price": 12.99
                },
                {
                    "category": "fiction",
                    "author": "Herman Melville",
                    "title": "Moby Dick",
                    "isbn": "0-553-21311-3",
                    "price": 8.99
                },
                {
                    "category": "fiction",
                    "author": "J. R. R. Tolkien",
                    "title": "The Lord of the Rings",
                    "isbn": "0-395-19395-8",
                    "price": 22.99
                }
            ],
            "bicycle": {
                "color": "red",
                "price": 19.95
            }
        },
        "expensive": 10
    })
}

/// Clone a match set into a JSON object for whole-result comparisons.
fn as_object(set: &MatchSet<'_>) -> Value {
    Value::Object(set.iter().map(|(k, &v)| (k.clone(), v.clone())).collect())
}

#[test]
fn test_key_from_root() {
    let doc = bookstore();
    let set = lookup(&doc, "$.expensive").unwrap();
    assert_eq!(as_object(&set), json!({"$.expensive": 10}));
}

#[test]
fn test_single_index() {
    let doc = bookstore();
    let set = lookup(&doc, "$.store.book[0].price").unwrap();
    assert_eq!(as_object(&set), json!({"$.store.book[0].price": 8.95}));
}

#[test]
fn test_negative_index_keeps_written_form() {
    let doc = bookstore();
    let set = lookup(&doc, "$.store.book[-1].isbn").unwrap();
    assert_eq!(
        as_object(&set),
        json!({"$.store.book[-1].isbn": "0-395-19395-8"})
    );
}

#[test]
fn test_multiple_indices() {
    let doc = bookstore();
    let set = lookup(&doc, "$.store.book[0,1].title").unwrap();
    assert_eq!(
        as_object(&set),
        json!({
            "$.store.book[0].title": "Sayings of the Century",
            "$.store.book[1].title": "Sword of Honour",
        })
    );
}

#[test]
fn test_range_upper_bound_is_inclusive() {
    let doc = bookstore();
    let set = lookup(&doc, "$.store.book[0:1].title").unwrap();
    assert_eq!(
        as_object(&set),
        json!({
            "$.store.book[0].title": "Sayings of the Century",
            "$.store.book[1].title": "Sword of Honour",
        })
    );
}

#[test]
fn test_range_with_blank_upper_bound() {
    let doc = bookstore();
    let set = lookup(&doc, "$.store.book[0:].price").unwrap();
    assert_eq!(
        as_object(&set),
        json!({
            "$.store.book[0].price": 8.95,
            "$.store.book[1].price": 12.99,
            "$.store.book[2].price": 8.99,
            "$.store.book[3].price": 22.99,
        })
    );
}

#[test]
fn test_wildcard_over_array() {
    let doc = bookstore();
    let set = lookup(&doc, "$.store.book[*].author").unwrap();
    assert_eq!(
        as_object(&set),
        json!({
            "$.store.book[0].author": "Nigel Rees",
            "$.store.book[1].author": "Evelyn Waugh",
            "$.store.book[2].author": "Herman Melville",
            "$.store.book[3].author": "J. R. R. Tolkien",
        })
    );
}

#[test]
fn test_recursive_descent_then_key() {
    let doc = bookstore();
    let set = lookup(&doc, "$.store..price").unwrap();
    // One scan level exposes `book` and `bicycle`; only the bicycle is an
    // object with a direct `price`.
    assert_eq!(as_object(&set), json!({"$.store.bicycle.price": 19.95}));
}

#[test]
fn test_existence_filter() {
    let doc = bookstore();
    let set = lookup(&doc, "$.store.book[?(@.isbn)].isbn").unwrap();
    assert_eq!(
        as_object(&set),
        json!({
            "$.store.book[2].isbn": "0-553-21311-3",
            "$.store.book[3].isbn": "0-395-19395-8",
        })
    );
}

#[test]
fn test_filter_against_literal() {
    let doc = bookstore();
    let set = lookup(&doc, "$.store.book[?(@.price > 10)].title").unwrap();
    assert_eq!(
        as_object(&set),
        json!({
            "$.store.book[1].title": "Sword of Honour",
            "$.store.book[3].title": "The Lord of the Rings",
        })
    );
}

#[test]
fn test_filter_against_root_path() {
    let doc = bookstore();
    let set = lookup(&doc, "$.store.book[?(@.price > $.expensive)].price").unwrap();
    assert_eq!(
        as_object(&set),
        json!({
            "$.store.book[1].price": 12.99,
            "$.store.book[3].price": 22.99,
        })
    );
    let set = lookup(&doc, "$.store.book[?(@.price < $.expensive)].price").unwrap();
    assert_eq!(
        as_object(&set),
        json!({
            "$.store.book[0].price": 8.95,
            "$.store.book[2].price": 8.99,
        })
    );
}

#[test]
fn test_filter_keeps_whole_objects() {
    let doc = bookstore();
    let set = lookup(&doc, "$.store.book[?(@.price > 20)]").unwrap();
    assert_eq!(
        as_object(&set),
        json!({
            "$.store.book[3]": {
                "category": "fiction",
                "author": "J. R. R. Tolkien",
                "title": "The Lord of the Rings",
                "isbn": "0-395-19395-8",
                "price": 22.99
            },
        })
    );
}

#[test]
fn test_regex_filter() {
    let doc = bookstore();
    let set = lookup(&doc, "$.store.book[?(@.author =~ /(?i).*rees/)].author").unwrap();
    assert_eq!(
        as_object(&set),
        json!({"$.store.book[0].author": "Nigel Rees"})
    );
}

#[test]
fn test_filter_over_object_entries() {
    let doc = json!({
        "fields": {
            "人力评估": {"name": "manpower", "value": 2},
            "任务执行人": {
                "name": "executor",
                "value": [{"id": "ou_debc524b2d8cb187704df652b43d29de"}]
            },
            "状态": {"name": "status", "value": "已结束"}
        }
    });
    let set = lookup(&doc, "$.fields[?(@.name == executor)].value[*].id").unwrap();
    assert_eq!(
        as_object(&set),
        json!({"$.fields.任务执行人.value[0].id": "ou_debc524b2d8cb187704df652b43d29de"})
    );
}

#[test]
fn test_scan_filter_with_unusual_keys() {
    let doc = json!({
        "data": {
            "records": [
                {
                    "record_id": "123",
                    "fields": {
                        "1": "haha",
                        "2": false,
                        "3": ["1", "2"],
                        "4": [
                            {"id": "ou_xxx", "name": "haha", "@type": "person"},
                            {"id": "ou_yyy", "name": "hhhh"}
                        ]
                    }
                }
            ]
        }
    });
    let set = lookup(&doc, "$.data.records[*].fields.*[?(@.@type == person)].id").unwrap();
    assert_eq!(
        as_object(&set),
        json!({"$.data.records[0].fields.4[0].id": "ou_xxx"})
    );
}

#[test]
fn test_null_values_in_the_middle() {
    let doc = json!({
        "head_commit": null,
        "test": {"author": {"username": "Jack"}}
    });
    let set = lookup(&doc, "$.test[*]").unwrap();
    assert_eq!(
        as_object(&set),
        json!({"$.test.author": {"username": "Jack"}})
    );
    let set = lookup(&doc, "$..author.username").unwrap();
    assert_eq!(as_object(&set), json!({"$.test.author.username": "Jack"}));
}

#[test]
fn test_array_root() {
    let doc = json!([{"test": 12.34}, {"test": 13.34}, {"test": 14.34}]);
    let set = lookup(&doc, "$[0].test").unwrap();
    assert_eq!(as_object(&set), json!({"$[0].test": 12.34}));
}

#[test]
fn test_array_root_range_is_inclusive() {
    let doc = json!([{"test": 12.34}, {"test": 13.34}, {"test": 14.34}]);
    let set = lookup(&doc, "$[:1].test").unwrap();
    assert_eq!(
        as_object(&set),
        json!({"$[0].test": 12.34, "$[1].test": 13.34})
    );
}

#[test]
fn test_nested_array_root() {
    let doc = json!([[{"test": 1.1}, {"test": 2.1}], [{"test": 3.1}, {"test": 4.1}]]);
    let set = lookup(&doc, "$[0].[0].test").unwrap();
    assert_eq!(as_object(&set), json!({"$[0][0].test": 1.1}));
    let set = lookup(&doc, "$[0][0].test").unwrap();
    assert_eq!(as_object(&set), json!({"$[0][0].test": 1.1}));
    let set = lookup(&doc, "$[:1].[0].test").unwrap();
    assert_eq!(
        as_object(&set),
        json!({"$[0][0].test": 1.1, "$[1][0].test": 3.1})
    );
}

#[test]
fn test_filter_equality_is_precision_exact() {
    // Adjacent integers around 2^53 collapse together under f64; the
    // filter must compare the decoder's lexical form exactly.
    let doc = json!({"records": [
        {"id": 9007199254740992i64},
        {"id": 9007199254740993i64},
        {"id": 9007199254740994i64}
    ]});
    let set = lookup(&doc, "$.records[?(@.id == 9007199254740993)]").unwrap();
    assert_eq!(
        as_object(&set),
        json!({"$.records[1]": {"id": 9007199254740993i64}})
    );
    let set = lookup(&doc, "$.records[?(@.id > 9007199254740992)].id").unwrap();
    assert_eq!(
        as_object(&set),
        json!({
            "$.records[1].id": 9007199254740993i64,
            "$.records[2].id": 9007199254740994i64,
        })
    );
}

#[test]
fn test_filter_skips_candidates_missing_the_key() {
    let doc = json!({"list": [{"a": 1}, {"b": 2}, {"a": 3}]});
    let set = lookup(&doc, "$.list[?(@.a > 0)]").unwrap();
    assert_eq!(
        as_object(&set),
        json!({"$.list[0]": {"a": 1}, "$.list[2]": {"a": 3}})
    );
}

#[test]
fn test_empty_array_under_wildcard() {
    let doc = json!({"items": []});
    assert!(lookup(&doc, "$.items[*]").unwrap().is_empty());
}

#[test]
fn test_negative_indices_at_both_ends() {
    let doc = json!({"list": [10, 20, 30]});
    let set = lookup(&doc, "$.list[-3]").unwrap();
    assert_eq!(as_object(&set), json!({"$.list[-3]": 10}));
    assert!(matches!(
        lookup(&doc, "$.list[-4]"),
        Err(JsonPathError::IndexOutOfRange { .. })
    ));
}

#[test]
fn test_lookup_replays_concrete_paths() {
    let doc = bookstore();
    for (path, &value) in &lookup(&doc, "$.store.book[*].price").unwrap() {
        let replayed = lookup(&doc, path).unwrap();
        assert_eq!(replayed.len(), 1);
        assert_eq!(replayed[path.as_str()], value);
    }
}

#[test]
fn test_compiled_plan_reuse() {
    let plan = CompiledPath::compile("$.store.book[?(@.isbn)].isbn").unwrap();
    let doc = bookstore();
    assert_eq!(plan.lookup(&doc).unwrap().len(), 2);
    let other = json!({"store": {"book": [{"isbn": "x"}]}});
    assert_eq!(plan.lookup(&other).unwrap().len(), 1);
    assert_eq!(plan.source(), "$.store.book[?(@.isbn)].isbn");
}

#[test]
fn test_syntax_errors_are_returned_not_panicked() {
    let doc = bookstore();
    for bad in [
        "store.book",
        "",
        "$.book[]",
        "$.book[a]",
        "$.book[1:2:3]",
        "$.book[?@.isbn]",
    ] {
        assert!(lookup(&doc, bad).is_err(), "expected error for {bad:?}");
    }
}
