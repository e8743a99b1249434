#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::collections::HashSet;

use fst_symbols::{
    compatible, CompatPolicy, Symbols, SymbolsMut, SymbolTable, TextOptions, NO_SYMBOL,
};
use quickcheck_macros::quickcheck;

fn distinct(strings: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    strings
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

fn sequential(symbols: &[String]) -> SymbolTable {
    let mut table = SymbolTable::new("seq");
    for (key, symbol) in symbols.iter().enumerate() {
        let key = i64::try_from(key).unwrap();
        assert_eq!(key, table.add_symbol_with_key(symbol, key));
    }
    table
}

#[quickcheck]
fn sequential_keys_are_dense(strings: Vec<String>) -> bool {
    let symbols = distinct(strings);
    let table = sequential(&symbols);
    table.dense_key_limit() == symbols.len()
        && symbols
            .iter()
            .zip(0..)
            .all(|(symbol, key)| table.find(key) == Some(symbol.as_str()))
}

#[quickcheck]
fn re_adding_keeps_original_key(strings: Vec<String>, key: i64) -> bool {
    if key == NO_SYMBOL {
        return true;
    }
    let symbols = distinct(strings);
    let mut table = sequential(&symbols);
    let len = table.len();
    symbols.iter().zip(0..).all(|(symbol, original)| {
        table.add_symbol_with_key(symbol, key) == original && table.len() == len
    })
}

#[quickcheck]
fn removal_leaves_other_keys(strings: Vec<String>, victim: usize) -> bool {
    let symbols = distinct(strings);
    if symbols.is_empty() {
        return true;
    }
    let mut table = sequential(&symbols);
    let victim = victim % symbols.len();
    let victim_key = i64::try_from(victim).unwrap();
    if !table.remove_symbol(victim_key) || table.find(victim_key).is_some() {
        return false;
    }
    symbols.iter().zip(0..).enumerate().all(|(n, (symbol, key))| {
        n == victim || table.find(key) == Some(symbol.as_str())
    })
}

#[quickcheck]
fn binary_roundtrip_preserves_checksums(entries: Vec<(String, i16)>, removals: Vec<i16>) -> bool {
    let mut table = SymbolTable::new("roundtrip");
    for (symbol, key) in &entries {
        table.add_symbol_with_key(symbol, i64::from(*key));
    }
    for key in removals {
        table.remove_symbol(i64::from(key));
    }
    let read = SymbolTable::from_bytes(&table.to_bytes().unwrap()).unwrap();
    read.checksum() == table.checksum()
        && read.labeled_checksum() == table.labeled_checksum()
        && read.iter().eq(table.iter())
}

#[test]
fn table_is_compatible_with_itself_but_not_with_a_rekeyed_copy() {
    let policy = CompatPolicy::default();
    let mut table = SymbolTable::new("t");
    for symbol in ["a", "b", "c"] {
        table.add_symbol(symbol);
    }
    assert!(compatible(Some(&table), Some(&table), &policy));

    let mut renamed = table.clone();
    renamed.set_name("other");
    assert!(compatible(Some(&table), Some(&renamed), &policy));

    let mut rekeyed = table.clone();
    rekeyed.remove_symbol(2);
    rekeyed.add_symbol_with_key("c", 9);
    assert!(!compatible(Some(&table), Some(&rekeyed), &policy));
}

#[test]
fn text_roundtrip_and_single_column_failure() {
    let opts = TextOptions::default();
    let mut table = SymbolTable::new("abc");
    table.add_symbol_with_key("a", 0);
    table.add_symbol_with_key("b", 1);
    table.add_symbol_with_key("c", 5);

    let mut text = Vec::new();
    table.write_text(&mut text, &opts).unwrap();
    let read = SymbolTable::read_text(text.as_slice(), "abc", &opts).unwrap();
    assert!(read.iter().eq(table.iter()));

    assert!(SymbolTable::read_text("x\n".as_bytes(), "bad", &opts).is_err());
}

#[test]
fn removing_middle_dense_key_moves_tail_to_sparse() {
    let mut table = SymbolTable::new("abc");
    for symbol in ["a", "b", "c"] {
        table.add_symbol(symbol);
    }
    assert!(table.remove_symbol(1));
    assert_eq!(1, table.dense_key_limit());
    assert_eq!(Some("a"), table.find(0));
    assert_eq!(None, table.find(1));
    assert_eq!(Some("c"), table.find(2));
    assert_eq!(Some(2), table.reverse_find("c"));
    assert_eq!(3, table.available_key());
}

#[test]
fn growth_across_bucket_boundaries() {
    for count in [20, 200] {
        let symbols = (0..count).map(|n| format!("s{n}")).collect::<Vec<_>>();
        let table = sequential(&symbols);
        assert_eq!(count, table.len());
        for (key, symbol) in (0..).zip(&symbols) {
            assert_eq!(Some(key), table.reverse_find(symbol));
        }
        assert_eq!(count, table.iter().map(|(_, s)| s).collect::<HashSet<_>>().len());
    }
}
