//! Property test: running the assignment repair scanner on its own output
//! must yield no further changes, for arbitrary interleavings of the line
//! shapes it reacts to.

use camino::Utf8Path;
use forkfix_domain::{PassContext, find_pass};
use proptest::prelude::*;

fn repair(lines: &[String]) -> (Vec<String>, usize) {
    let pass = find_pass("gn.repair_malformed_assignments").expect("pass registered");
    let rewrite = pass
        .rewrite(&PassContext::default(), Utf8Path::new("prop.gni"), lines)
        .expect("rewrite");
    (rewrite.lines, rewrite.fixes.len())
}

fn gn_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("x = ["),
        Just("  deps = ["),
        Just("]"),
        Just("  ]"),
        Just("foo"),
        Just("bar_var"),
        Just("\"lit\""),
        Just("[ \"a\", \"b\" ]"),
        Just("# comment"),
        Just("# Initialize as empty array since Acme components have been removed"),
        Just("if (cond) {"),
        Just("}"),
        Just("y ="),
        Just("  z = 1"),
        Just(""),
        Just("a + b"),
        Just("x += y"),
        Just("$root_out_dir/gen"),
        Just("rebase_path(\"x\")"),
        Just("declare_args() {"),
    ]
    .prop_map(str::to_string)
}

proptest! {
    #[test]
    fn repair_is_idempotent(lines in prop::collection::vec(gn_line(), 0..48)) {
        let (once, _) = repair(&lines);
        let (twice, fixes_again) = repair(&once);
        prop_assert_eq!(fixes_again, 0usize);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn every_input_line_is_accounted_for(lines in prop::collection::vec(gn_line(), 0..48)) {
        // Patterns only ever shrink the file: 3 lines -> 1, 4 -> 1, 2 -> 1.
        let (out, fixes) = repair(&lines);
        prop_assert!(out.len() <= lines.len());
        if fixes == 0 {
            prop_assert_eq!(out, lines);
        }
    }
}
