use dmp_core::patch::patch_add_context;
use dmp_core::text::to_chars;
use dmp_core::{
    diff_main, patch_add_padding, patch_apply, patch_from_text, patch_make,
    patch_make_from_diffs, patch_make_from_texts, patch_split_max, patch_to_text, Diff, Op, Patch,
    PatchParseError, Settings,
};

fn d(op: Op, text: &str) -> Diff {
    Diff::new(op, text)
}

#[test]
fn upstream_port_patch_obj_to_string() {
    let patch = Patch {
        start1: 20,
        start2: 21,
        length1: 18,
        length2: 17,
        diffs: vec![
            d(Op::Equal, "jump"),
            d(Op::Delete, "s"),
            d(Op::Insert, "ed"),
            d(Op::Equal, " over "),
            d(Op::Delete, "the"),
            d(Op::Insert, "a"),
            d(Op::Equal, "\nlaz"),
        ],
    };
    assert_eq!(
        patch.to_string(),
        "@@ -21,18 +22,17 @@\n jump\n-s\n+ed\n  over \n-the\n+a\n %0Alaz\n"
    );
}

#[test]
fn upstream_port_patch_from_text_matrix() {
    assert_eq!(patch_from_text(""), Ok(Vec::new()));

    let strp = "@@ -21,18 +22,17 @@\n jump\n-s\n+ed\n  over \n-the\n+a\n %0Alaz\n";
    let patches = patch_from_text(strp).unwrap();
    assert_eq!(patches[0].to_string(), strp);

    let patches = patch_from_text("@@ -1 +1 @@\n-a\n+b\n").unwrap();
    assert_eq!(patches[0].to_string(), "@@ -1 +1 @@\n-a\n+b\n");

    let patches = patch_from_text("@@ -1,3 +0,0 @@\n-abc\n").unwrap();
    assert_eq!(patches[0].to_string(), "@@ -1,3 +0,0 @@\n-abc\n");

    let patches = patch_from_text("@@ -0,0 +1,3 @@\n+abc\n").unwrap();
    assert_eq!(patches[0].to_string(), "@@ -0,0 +1,3 @@\n+abc\n");

    assert_eq!(
        patch_from_text("Bad\nPatch\n"),
        Err(PatchParseError::InvalidHeader("Bad".to_string()))
    );
}

#[test]
fn upstream_port_patch_to_text_matrix() {
    let strp = "@@ -21,18 +22,17 @@\n jump\n-s\n+ed\n  over \n-the\n+a\n  laz\n";
    let patches = patch_from_text(strp).unwrap();
    assert_eq!(patch_to_text(&patches), strp);

    let strp = "@@ -1,9 +1,9 @@\n-f\n+F\n oo+fooba\n@@ -7,9 +7,9 @@\n obar\n-,\n+.\n  tes\n";
    let patches = patch_from_text(strp).unwrap();
    assert_eq!(patch_to_text(&patches), strp);
}

#[test]
fn upstream_port_patch_add_context_matrix() {
    let settings = Settings::default();

    let mut patch = patch_from_text("@@ -21,4 +21,10 @@\n-jump\n+somersault\n")
        .unwrap()
        .remove(0);
    patch_add_context(
        &settings,
        &mut patch,
        &to_chars("The quick brown fox jumps over the lazy dog."),
    );
    assert_eq!(
        patch.to_string(),
        "@@ -17,12 +17,18 @@\n fox \n-jump\n+somersault\n s ov\n"
    );

    let mut patch = patch_from_text("@@ -21,4 +21,10 @@\n-jump\n+somersault\n")
        .unwrap()
        .remove(0);
    patch_add_context(&settings, &mut patch, &to_chars("The quick brown fox jumps."));
    assert_eq!(
        patch.to_string(),
        "@@ -17,10 +17,16 @@\n fox \n-jump\n+somersault\n s.\n"
    );

    let mut patch = patch_from_text("@@ -3 +3,2 @@\n-e\n+at\n").unwrap().remove(0);
    patch_add_context(&settings, &mut patch, &to_chars("The quick brown fox jumps."));
    assert_eq!(patch.to_string(), "@@ -1,7 +1,8 @@\n Th\n-e\n+at\n  qui\n");

    let mut patch = patch_from_text("@@ -3 +3,2 @@\n-e\n+at\n").unwrap().remove(0);
    patch_add_context(
        &settings,
        &mut patch,
        &to_chars("The quick brown fox jumps.  The quick brown fox crashes."),
    );
    assert_eq!(
        patch.to_string(),
        "@@ -1,27 +1,28 @@\n Th\n-e\n+at\n  quick brown fox jumps. \n"
    );
}

#[test]
fn upstream_port_patch_make_matrix() {
    let settings = Settings::default();

    let patches = patch_make_from_texts(&settings, "", "");
    assert_eq!(patch_to_text(&patches), "");

    let text1 = "The quick brown fox jumps over the lazy dog.";
    let text2 = "That quick brown fox jumped over a lazy dog.";

    // The second patch must be "-21,17 +21,18", not "-22,17 +21,18", due to
    // the rolling context.
    let expected = "@@ -1,8 +1,7 @@\n Th\n-at\n+e\n  qui\n@@ -21,17 +21,18 @@\n jump\n-ed\n+s\n  over \n-a\n+the\n  laz\n";
    let patches = patch_make_from_texts(&settings, text2, text1);
    assert_eq!(patch_to_text(&patches), expected);

    let expected = "@@ -1,11 +1,12 @@\n Th\n-e\n+at\n  quick b\n@@ -22,18 +22,17 @@\n jump\n-s\n+ed\n  over \n-the\n+a\n  laz\n";
    let patches = patch_make_from_texts(&settings, text1, text2);
    assert_eq!(patch_to_text(&patches), expected);

    let diffs = diff_main(&settings, text1, text2, false);
    let patches = patch_make_from_diffs(&settings, &diffs);
    assert_eq!(patch_to_text(&patches), expected);

    let patches = patch_make(&settings, text1, &diffs);
    assert_eq!(patch_to_text(&patches), expected);

    let patches = patch_make_from_texts(
        &settings,
        "`1234567890-=[]\\;',./",
        "~!@#$%^&*()_+{}|:\"<>?",
    );
    assert_eq!(
        patch_to_text(&patches),
        "@@ -1,21 +1,21 @@\n-%601234567890-=%5B%5D%5C;',./\n+~!@#$%25%5E&*()_+%7B%7D%7C:%22%3C%3E?\n"
    );

    let diffs = vec![
        d(Op::Delete, "`1234567890-=[]\\;',./"),
        d(Op::Insert, "~!@#$%^&*()_+{}|:\"<>?"),
    ];
    let parsed = patch_from_text(
        "@@ -1,21 +1,21 @@\n-%601234567890-=%5B%5D%5C;',./\n+~!@#$%25%5E&*()_+%7B%7D%7C:%22%3C%3E?\n",
    )
    .unwrap();
    assert_eq!(parsed[0].diffs, diffs);

    let text3 = "abcdef".repeat(100);
    let text4 = format!("{text3}123");
    let patches = patch_make_from_texts(&settings, &text3, &text4);
    assert_eq!(
        patch_to_text(&patches),
        "@@ -573,28 +573,31 @@\n cdefabcdefabcdefabcdefabcdef\n+123\n"
    );
}

#[test]
fn upstream_port_patch_split_max_matrix() {
    // Assumes that match_max_bits is 32.
    let settings = Settings::default();

    let mut patches = patch_make_from_texts(
        &settings,
        "abcdefghijklmnopqrstuvwxyz01234567890",
        "XabXcdXefXghXijXklXmnXopXqrXstXuvXwxXyzX01X23X45X67X89X0",
    );
    patch_split_max(&settings, &mut patches);
    assert_eq!(
        patch_to_text(&patches),
        "@@ -1,32 +1,46 @@\n+X\n ab\n+X\n cd\n+X\n ef\n+X\n gh\n+X\n ij\n+X\n kl\n+X\n mn\n+X\n op\n+X\n qr\n+X\n st\n+X\n uv\n+X\n wx\n+X\n yz\n+X\n 012345\n@@ -25,13 +39,18 @@\n zX01\n+X\n 23\n+X\n 45\n+X\n 67\n+X\n 89\n+X\n 0\n"
    );

    let mut patches = patch_make_from_texts(
        &settings,
        "abcdef1234567890123456789012345678901234567890123456789012345678901234567890uvwxyz",
        "abcdefuvwxyz",
    );
    let old_text = patch_to_text(&patches);
    patch_split_max(&settings, &mut patches);
    assert_eq!(patch_to_text(&patches), old_text);

    let mut patches = patch_make_from_texts(
        &settings,
        "1234567890123456789012345678901234567890123456789012345678901234567890",
        "abc",
    );
    patch_split_max(&settings, &mut patches);
    assert_eq!(
        patch_to_text(&patches),
        "@@ -1,32 +1,4 @@\n-1234567890123456789012345678\n 9012\n@@ -29,32 +1,4 @@\n-9012345678901234567890123456\n 7890\n@@ -57,14 +1,3 @@\n-78901234567890\n+abc\n"
    );

    let mut patches = patch_make_from_texts(
        &settings,
        "abcdefghij , h : 0 , t : 1 abcdefghij , h : 0 , t : 1 abcdefghij , h : 0 , t : 1",
        "abcdefghij , h : 1 , t : 1 abcdefghij , h : 1 , t : 1 abcdefghij , h : 0 , t : 1",
    );
    patch_split_max(&settings, &mut patches);
    assert_eq!(
        patch_to_text(&patches),
        "@@ -2,32 +2,32 @@\n bcdefghij , h : \n-0\n+1\n  , t : 1 abcdef\n@@ -29,32 +29,32 @@\n bcdefghij , h : \n-0\n+1\n  , t : 1 abcdef\n"
    );
}

#[test]
fn upstream_port_patch_add_padding_matrix() {
    let settings = Settings::default();

    // Both edges full.
    let mut patches = patch_make_from_texts(&settings, "", "test");
    assert_eq!(patch_to_text(&patches), "@@ -0,0 +1,4 @@\n+test\n");
    patch_add_padding(&settings, &mut patches);
    assert_eq!(
        patch_to_text(&patches),
        "@@ -1,8 +1,12 @@\n %01%02%03%04\n+test\n %01%02%03%04\n"
    );

    // Both edges partial.
    let mut patches = patch_make_from_texts(&settings, "XY", "XtestY");
    assert_eq!(patch_to_text(&patches), "@@ -1,2 +1,6 @@\n X\n+test\n Y\n");
    patch_add_padding(&settings, &mut patches);
    assert_eq!(
        patch_to_text(&patches),
        "@@ -2,8 +2,12 @@\n %02%03%04X\n+test\n Y%01%02%03\n"
    );

    // Both edges none.
    let mut patches = patch_make_from_texts(&settings, "XXXXYYYY", "XXXXtestYYYY");
    assert_eq!(patch_to_text(&patches), "@@ -1,8 +1,12 @@\n XXXX\n+test\n YYYY\n");
    patch_add_padding(&settings, &mut patches);
    assert_eq!(patch_to_text(&patches), "@@ -5,8 +5,12 @@\n XXXX\n+test\n YYYY\n");
}

#[test]
fn upstream_port_patch_apply_matrix() {
    let settings = Settings::default();

    let patches = patch_make_from_texts(&settings, "", "");
    let (text, results) = patch_apply(&settings, &patches, "Hello world.");
    assert_eq!(text, "Hello world.");
    assert_eq!(results.len(), 0);

    let patches = patch_make_from_texts(
        &settings,
        "The quick brown fox jumps over the lazy dog.",
        "That quick brown fox jumped over a lazy dog.",
    );
    let (text, results) = patch_apply(
        &settings,
        &patches,
        "The quick brown fox jumps over the lazy dog.",
    );
    assert_eq!(text, "That quick brown fox jumped over a lazy dog.");
    assert_eq!(results, vec![true, true]);

    let (text, results) = patch_apply(
        &settings,
        &patches,
        "The quick red rabbit jumps over the tired tiger.",
    );
    assert_eq!(text, "That quick red rabbit jumped over a tired tiger.");
    assert_eq!(results, vec![true, true]);

    let (text, results) = patch_apply(
        &settings,
        &patches,
        "I am the very model of a modern major general.",
    );
    assert_eq!(text, "I am the very model of a modern major general.");
    assert_eq!(results, vec![false, false]);

    // Big delete, small change.
    let patches = patch_make_from_texts(
        &settings,
        "x1234567890123456789012345678901234567890123456789012345678901234567890y",
        "xabcy",
    );
    let (text, results) = patch_apply(
        &settings,
        &patches,
        "x123456789012345678901234567890-----++++++++++-----123456789012345678901234567890y",
    );
    assert_eq!(text, "xabcy");
    assert_eq!(results, vec![true, true]);

    // Big delete, big change: the delete is rejected, the edge insert holds.
    let patches = patch_make_from_texts(
        &settings,
        "x1234567890123456789012345678901234567890123456789012345678901234567890y",
        "xabcy",
    );
    let (text, results) = patch_apply(
        &settings,
        &patches,
        "x12345678901234567890---------------++++++++++---------------12345678901234567890y",
    );
    assert_eq!(
        text,
        "xabc12345678901234567890---------------++++++++++---------------12345678901234567890y"
    );
    assert_eq!(results, vec![false, true]);

    // With a looser delete threshold the same patch applies.
    let loose = Settings {
        patch_delete_threshold: 0.6,
        ..Settings::default()
    };
    let patches = patch_make_from_texts(
        &loose,
        "x1234567890123456789012345678901234567890123456789012345678901234567890y",
        "xabcy",
    );
    let (text, results) = patch_apply(
        &loose,
        &patches,
        "x12345678901234567890---------------++++++++++---------------12345678901234567890y",
    );
    assert_eq!(text, "xabcy");
    assert_eq!(results, vec![true, true]);

    // Compensate for a failed patch.
    let strict = Settings {
        match_threshold: 0.0,
        match_distance: 0,
        ..Settings::default()
    };
    let patches = patch_make_from_texts(
        &strict,
        "abcdefghijklmnopqrstuvwxyz--------------------1234567890",
        "abcXXXXXXXXXXdefghijklmnopqrstuvwxyz--------------------1234567YYYYYYYYYY890",
    );
    let (text, results) = patch_apply(
        &strict,
        &patches,
        "ABCDEFGHIJKLMNOPQRSTUVWXYZ--------------------1234567890",
    );
    assert_eq!(
        text,
        "ABCDEFGHIJKLMNOPQRSTUVWXYZ--------------------1234567YYYYYYYYYY890"
    );
    assert_eq!(results, vec![false, true]);

    // No side effects on the caller's patches.
    let patches = patch_make_from_texts(&settings, "", "test");
    let before = patch_to_text(&patches);
    patch_apply(&settings, &patches, "");
    assert_eq!(patch_to_text(&patches), before);

    let patches = patch_make_from_texts(
        &settings,
        "The quick brown fox jumps over the lazy dog.",
        "Woof",
    );
    let before = patch_to_text(&patches);
    patch_apply(
        &settings,
        &patches,
        "The quick brown fox jumps over the lazy dog.",
    );
    assert_eq!(patch_to_text(&patches), before);

    // Edge matches lean on the sentinel padding.
    let patches = patch_make_from_texts(&settings, "", "test");
    let (text, results) = patch_apply(&settings, &patches, "");
    assert_eq!(text, "test");
    assert_eq!(results, vec![true]);

    let patches = patch_make_from_texts(&settings, "XY", "XtestY");
    let (text, results) = patch_apply(&settings, &patches, "XY");
    assert_eq!(text, "XtestY");
    assert_eq!(results, vec![true]);

    let patches = patch_make_from_texts(&settings, "y", "y123");
    let (text, results) = patch_apply(&settings, &patches, "x");
    assert_eq!(text, "x123");
    assert_eq!(results, vec![true]);
}
